//! Fire extinguishing simulation driver
//!
//! [`run`] validates the input, splits the grid into row blocks and runs one
//! [`Worker`] per block. A single worker runs on the calling thread with
//! [`SingleProcessComm`]; larger cohorts run on scoped threads joined by
//! [`ThreadComm`](crate::comm::ThreadComm) channels. The report is built on the root
//! worker from the gathered grid.

mod cohort;
mod gather;
pub mod reference;
mod report;
mod worker;

pub use cohort::run_cohort;
pub use gather::{gather_grid, ROOT};
pub use report::{IterationRecord, SimulationReport};
pub use worker::{Worker, WorkerOutcome};

use crate::comm::SingleProcessComm;
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::grid::Partition;
use tracing::info;

/// Run the simulation on `workers` workers and return every worker's outcome
///
/// The partition is checked before any worker starts, so an uneven split fails without
/// spawning threads.
///
/// # Errors
///
/// Configuration and partition errors, or the originating failure of a worker.
pub fn run_workers(config: &SimulationConfig, workers: usize) -> SimResult<Vec<WorkerOutcome>> {
    config.validate()?;
    Partition::all(config.rows, config.columns, workers)?;

    info!(
        rows = config.rows,
        columns = config.columns,
        max_iter = config.max_iter,
        teams = config.teams.len(),
        focal_points = config.focal_points.len(),
        workers,
        "starting simulation"
    );

    if workers == 1 {
        let outcome = Worker::new(config, SingleProcessComm)?.run()?;
        return Ok(vec![outcome]);
    }
    run_cohort(workers, |comm| Worker::new(config, comm)?.run())
}

/// Run the simulation on `workers` workers and return the root's report
///
/// # Errors
///
/// Same as [`run_workers`].
pub fn run(config: &SimulationConfig, workers: usize) -> SimResult<SimulationReport> {
    let report = run_workers(config, workers)?
        .into_iter()
        .find_map(|outcome| outcome.report)
        .ok_or(SimError::MissingReport)?;

    info!(
        iterations = report.iterations,
        stable = report.stable,
        residual = report.final_residual().unwrap_or(0.0),
        "simulation finished"
    );
    Ok(report)
}
