//! Reassembly of the global grid on the root worker

use crate::comm::Communicator;
use crate::error::CommError;
use crate::grid::LocalSlice;
use tracing::debug;

/// Rank that collects the grid and builds the report
pub const ROOT: usize = 0;

/// Collect every worker's owned rows on [`ROOT`], in rank order
///
/// Halo rows are never sent. Returns the `rows × columns` grid on the root and `None`
/// on every other worker.
///
/// # Errors
///
/// Propagates communicator failures, and fails with [`CommError::LengthMismatch`] if the
/// assembled grid does not cover the partitioned rows exactly.
pub fn gather_grid<C>(comm: &C, slice: &LocalSlice) -> Result<Option<Vec<f32>>, CommError>
where
    C: Communicator + ?Sized,
{
    let partition = slice.partition();
    let Some(grid) = comm.gather(ROOT, slice.owned())? else {
        return Ok(None);
    };

    let expected = partition.rows * partition.columns;
    if grid.len() != expected {
        return Err(CommError::LengthMismatch {
            peer: ROOT,
            expected,
            found: grid.len(),
        });
    }
    debug!(cells = grid.len(), "global grid assembled");
    Ok(Some(grid))
}
