//! Halo row exchange between row-adjacent workers
//!
//! Each worker sends its first owned row up and its last owned row down, and receives
//! the neighbours' boundary rows into its halo rows. Edge workers skip the side that
//! faces the global border, so their outer halo keeps its initial value.

use crate::comm::Communicator;
use crate::error::CommError;
use crate::grid::LocalSlice;

/// Synchronise both halo rows of `slice` with its neighbours
///
/// Blocks until every exchange this worker takes part in has completed.
///
/// # Errors
///
/// Propagates communicator failures.
pub fn exchange_halos<C>(slice: &mut LocalSlice, comm: &C) -> Result<(), CommError>
where
    C: Communicator + ?Sized,
{
    let partition = *slice.partition();

    if let Some(upper) = partition.upper_neighbor() {
        let send = slice.row(1).to_vec();
        comm.send_recv(upper, &send, slice.row_mut(0))?;
    }

    if let Some(lower) = partition.lower_neighbor() {
        let chunk = partition.chunk;
        let send = slice.row(chunk).to_vec();
        comm.send_recv(lower, &send, slice.row_mut(chunk + 1))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{SingleProcessComm, ThreadComm};
    use crate::grid::Partition;
    use std::thread;

    #[test]
    fn test_single_worker_leaves_halos_alone() {
        let partition = Partition::new(4, 3, 1, 0).unwrap();
        let mut slice = LocalSlice::new(partition).unwrap();
        slice.row_mut(0).fill(9.0);
        slice.row_mut(5).fill(9.0);
        exchange_halos(&mut slice, &SingleProcessComm).unwrap();
        assert_eq!(slice.row(0), &[9.0; 3]);
        assert_eq!(slice.row(5), &[9.0; 3]);
    }

    #[test]
    fn test_halos_mirror_neighbour_boundaries() {
        let workers = 3;
        let (rows, columns) = (9, 4);

        let slices: Vec<LocalSlice> = thread::scope(|scope| {
            let handles: Vec<_> = ThreadComm::cohort(workers)
                .into_iter()
                .map(|comm| {
                    scope.spawn(move || {
                        let rank = comm.rank();
                        let partition = Partition::new(rows, columns, workers, rank).unwrap();
                        let mut slice = LocalSlice::new(partition).unwrap();
                        // Distinct value per owned cell: 100*global_row + column
                        for global in partition.owned_rows() {
                            let local = partition.local_row(global);
                            for j in 0..columns {
                                slice.set(local, j, (100 * global + j) as f32);
                            }
                        }
                        // Outer halos carry a marker that must survive
                        slice.row_mut(0).fill(-1.0);
                        slice.row_mut(partition.chunk + 1).fill(-1.0);

                        exchange_halos(&mut slice, &comm).unwrap();
                        slice
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for slice in &slices {
            let partition = slice.partition();
            let expected_row = |global: usize| -> Vec<f32> {
                (0..columns).map(|j| (100 * global + j) as f32).collect()
            };
            match partition.upper_neighbor() {
                Some(_) => assert_eq!(slice.row(0), expected_row(partition.first_row() - 1)),
                None => assert_eq!(slice.row(0), &[-1.0; 4]),
            }
            match partition.lower_neighbor() {
                Some(_) => assert_eq!(
                    slice.row(partition.chunk + 1),
                    expected_row(partition.first_row() + partition.chunk)
                ),
                None => assert_eq!(slice.row(partition.chunk + 1), &[-1.0; 4]),
            }
        }
    }
}
