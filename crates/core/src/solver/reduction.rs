//! Global reductions and the stability vote
//!
//! Every worker reduces the same values and evaluates [`is_stable`] on the results, so
//! all workers reach the same decision without a broadcast.

use crate::comm::Communicator;
use crate::core_types::{count_deactivated, FocalPoint};
use crate::error::CommError;
use crate::grid::Partition;
use tracing::warn;

/// Residual below which the field counts as settled
pub const THRESHOLD: f32 = 0.1;

/// Largest local residual over the cohort
///
/// # Errors
///
/// Propagates communicator failures.
pub fn global_residual<C>(comm: &C, local: f32) -> Result<f32, CommError>
where
    C: Communicator + ?Sized,
{
    comm.all_reduce_max(local)
}

/// Deactivated focal points this worker answers for
///
/// A point is attributed to the worker owning its row; points outside the grid rows
/// are attributed to rank 0. Summing these over the cohort counts every point once.
#[must_use]
pub fn owned_deactivated(points: &[FocalPoint], partition: &Partition) -> u32 {
    points
        .iter()
        .filter(|p| p.is_deactivated())
        .filter(|p| {
            let row = i64::from(p.x);
            if row < 0 || row >= partition.rows as i64 {
                partition.rank == 0
            } else {
                partition.owns(row)
            }
        })
        .count() as u32
}

/// Deactivated focal point count agreed by the cohort
///
/// Sums the per-owner counts. The focal array is replicated, so the sum must equal the
/// local count; a mismatch means the replicas diverged and is logged. The reduced value
/// is used either way so that every worker takes the same decision.
///
/// # Errors
///
/// Propagates communicator failures.
pub fn global_deactivated<C>(
    comm: &C,
    partition: &Partition,
    points: &[FocalPoint],
) -> Result<u32, CommError>
where
    C: Communicator + ?Sized,
{
    let global = comm.all_reduce_sum(owned_deactivated(points, partition))?;
    let replicated = count_deactivated(points);
    if global != replicated {
        warn!(
            rank = comm.rank(),
            global, replicated, "focal point replicas diverged"
        );
    }
    Ok(global)
}

/// Stop condition: every focal point extinguished and the field settled
#[must_use]
pub fn is_stable(deactivated: u32, focal_points: usize, residual: f32) -> bool {
    deactivated as usize == focal_points && residual < THRESHOLD
}
