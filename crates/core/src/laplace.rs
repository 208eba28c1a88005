//! Distributed Laplace relaxation
//!
//! Solves the steady-state heat equation on a rectangle whose left edge follows
//! `sin(iπ / (rows - 1))` and whose right edge is the same profile scaled by `e^(-π)`.
//! The top, bottom and interior start at zero. It reuses the fire simulation's
//! partition, halo exchange, stencil and residual reduction, without sources or teams.

use crate::comm::{Communicator, SingleProcessComm};
use crate::error::{SimError, SimResult};
use crate::grid::{LocalSlice, Partition};
use crate::simulation::{gather_grid, run_cohort};
use crate::solver::{exchange_halos, global_residual, update_slice};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

/// Default stopping residual
pub const DEFAULT_TOLERANCE: f32 = 1.0e-6;

/// Default iteration budget
pub const DEFAULT_MAX_ITER: usize = 100;

/// Iterations between progress messages
const PROGRESS_INTERVAL: usize = 10;

/// Progress figure for a residual: its square root, the value the classic solver prints
fn progress_error(residual: f32) -> f32 {
    residual.sqrt()
}

/// Size and stopping rule of a Laplace run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaplaceConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Iteration budget
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Iteration stops once the global residual is at or below this value
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

fn default_tolerance() -> f32 {
    DEFAULT_TOLERANCE
}

impl LaplaceConfig {
    /// Grid of the given size with the default budget and tolerance
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            max_iter: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for fewer than two rows or columns, or a
    /// negative or non-finite tolerance.
    pub fn validate(&self) -> SimResult<()> {
        if self.rows < 2 || self.columns < 2 {
            return Err(SimError::invalid_config(format!(
                "laplace grid must be at least 2x2, got {}x{}",
                self.rows, self.columns
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SimError::invalid_config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Value of the fixed left and right edges on a global row
    pub fn boundary(&self, row: usize) -> (f32, f32) {
        let left = (row as f64 * PI / (self.rows - 1) as f64).sin() as f32;
        let right = (-PI).exp() as f32 * left;
        (left, right)
    }
}

/// Result of a Laplace run, assembled on the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaplaceReport {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Iterations executed
    pub iterations: usize,
    /// Global residual of the last iteration
    pub residual: f32,
    /// Final grid, row-major
    #[serde(skip)]
    pub surface: Vec<f32>,
}

fn initial_slice(config: &LaplaceConfig, partition: Partition) -> SimResult<LocalSlice> {
    let mut slice = LocalSlice::new(partition)?;
    let last = config.columns - 1;
    for global in partition.owned_rows() {
        let (left, right) = config.boundary(global);
        let row = slice.row_mut(partition.local_row(global));
        row[0] = left;
        row[last] = right;
    }
    Ok(slice)
}

/// Relax the grid on one rank of a cohort
///
/// Returns the report on the root and `None` elsewhere.
///
/// # Errors
///
/// Configuration and partition errors, allocation failures and communicator failures.
pub fn solve<C>(config: &LaplaceConfig, comm: &C) -> SimResult<Option<LaplaceReport>>
where
    C: Communicator + ?Sized,
{
    config.validate()?;
    let partition = Partition::new(config.rows, config.columns, comm.size(), comm.rank())?;
    let mut slice = initial_slice(config, partition)?;

    let mut residual = f32::INFINITY;
    let mut iterations = 0;
    while residual > config.tolerance && iterations < config.max_iter {
        exchange_halos(&mut slice, comm)?;
        slice.snapshot();
        let local = update_slice(&mut slice);
        residual = global_residual(comm, local)?;
        iterations += 1;

        if iterations % PROGRESS_INTERVAL == 0 && comm.rank() == 0 {
            debug!(
                iterations,
                residual,
                error = progress_error(residual),
                "laplace progress"
            );
        }
    }

    let report = gather_grid(comm, &slice)?.map(|surface| LaplaceReport {
        rows: config.rows,
        columns: config.columns,
        iterations,
        residual: if iterations == 0 { 0.0 } else { residual },
        surface,
    });
    Ok(report)
}

/// Relax the grid on `workers` workers and return the root's report
///
/// # Errors
///
/// Same as [`solve`], plus the originating failure of any worker.
pub fn run(config: &LaplaceConfig, workers: usize) -> SimResult<LaplaceReport> {
    config.validate()?;
    Partition::all(config.rows, config.columns, workers)?;
    info!(
        rows = config.rows,
        columns = config.columns,
        max_iter = config.max_iter,
        tolerance = config.tolerance,
        workers,
        "starting laplace relaxation"
    );

    let root = if workers == 1 {
        solve(config, &SingleProcessComm)?
    } else {
        run_cohort(workers, |comm| solve(config, &comm))?
            .into_iter()
            .flatten()
            .next()
    };
    let report = root.ok_or(SimError::MissingReport)?;

    info!(
        iterations = report.iterations,
        residual = report.residual,
        "laplace relaxation finished"
    );
    Ok(report)
}
