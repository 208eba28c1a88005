//! Running a task on every rank of a thread cohort

use crate::comm::ThreadComm;
use crate::error::{SimError, SimResult};
use std::thread;
use tracing::warn;

/// Run `task` once per rank, each on its own scoped thread, and collect the results
///
/// Results come back in rank order. If any worker fails, the error returned is the
/// first one that did not merely report a lost peer, since those are the cohort
/// reacting to the original failure. A panicking worker is reported as
/// [`SimError::WorkerPanicked`].
///
/// # Errors
///
/// Returns [`SimError::NoWorkers`] for an empty cohort, otherwise the originating error
/// of a failed worker.
pub fn run_cohort<T, F>(workers: usize, task: F) -> SimResult<Vec<T>>
where
    T: Send,
    F: Fn(ThreadComm) -> SimResult<T> + Sync,
{
    if workers == 0 {
        return Err(SimError::NoWorkers);
    }

    let results: Vec<SimResult<T>> = thread::scope(|scope| {
        let handles: Vec<_> = ThreadComm::cohort(workers)
            .into_iter()
            .map(|comm| {
                let task = &task;
                scope.spawn(move || task(comm))
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(SimError::WorkerPanicked { rank }))
            })
            .collect()
    });

    let mut outputs = Vec::with_capacity(workers);
    let mut origin = None;
    let mut cascade = None;
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(output) => outputs.push(output),
            Err(err) => {
                warn!(rank, error = %err, "worker failed");
                if err.is_cascade() {
                    cascade.get_or_insert(err);
                } else {
                    origin.get_or_insert(err);
                }
            }
        }
    }

    match origin.or(cascade) {
        Some(err) => Err(err),
        None => Ok(outputs),
    }
}
