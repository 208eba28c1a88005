//! One rank of the simulation
//!
//! Every worker runs the same loop over its own slice and its replicated copies of the
//! teams and focal points:
//!
//! ```text
//! for iteration in 0.. while iteration < max_iter and not stable:
//!     activate due focal points
//!     agree on the deactivated count
//!     SUB_STEPS times: reassert heat, exchange halos, snapshot, relax, agree on residual
//!     evaluate the stop condition
//!     move teams, extinguish reached points, apply suppression to owned rows
//! gather the grid on the root
//! ```
//!
//! The team stage still runs on the iteration that turns out stable, so its suppression
//! is part of the reported grid.

use super::gather::{gather_grid, ROOT};
use super::report::{IterationRecord, SimulationReport};
use crate::comm::Communicator;
use crate::config::SimulationConfig;
use crate::core_types::{activate_due, FocalPoint, Team};
use crate::error::SimResult;
use crate::grid::{LocalSlice, Partition};
use crate::solver::{
    exchange_halos, global_deactivated, global_residual, is_stable, reassert_heat,
    update_slice, SUB_STEPS,
};
use crate::suppression::{apply_suppression, deactivate_reached, move_teams};
use tracing::{debug, trace};

/// What a worker hands back when its run completes
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    /// Rows this worker owned
    pub partition: Partition,
    /// Final values of the owned rows, row-major
    pub owned: Vec<f32>,
    /// The assembled report, on the root worker only
    pub report: Option<SimulationReport>,
}

/// Simulation state held by one rank
#[derive(Debug)]
pub struct Worker<C> {
    comm: C,
    slice: LocalSlice,
    teams: Vec<Team>,
    focal_points: Vec<FocalPoint>,
    max_iter: usize,
    /// Iteration records, kept on the root only
    trace: Vec<IterationRecord>,
}

impl<C: Communicator> Worker<C> {
    /// Allocate the slice for this rank and build the replicated state
    ///
    /// # Errors
    ///
    /// Fails if the grid cannot be partitioned across the communicator's workers, if a
    /// team type is unknown, or if the slice cannot be allocated.
    pub fn new(config: &SimulationConfig, comm: C) -> SimResult<Self> {
        let partition = Partition::new(config.rows, config.columns, comm.size(), comm.rank())?;
        let slice = LocalSlice::new(partition)?;
        Ok(Self {
            comm,
            slice,
            teams: config.build_teams()?,
            focal_points: config.build_focal_points(),
            max_iter: config.max_iter,
            trace: Vec::new(),
        })
    }

    /// The worker's slice
    pub fn slice(&self) -> &LocalSlice {
        &self.slice
    }

    /// Replicated team state
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Replicated focal point state
    pub fn focal_points(&self) -> &[FocalPoint] {
        &self.focal_points
    }

    /// Iteration records collected by [`Worker::run`] so far; always empty off the root
    pub fn trace(&self) -> &[IterationRecord] {
        &self.trace
    }

    /// Run one outer iteration
    ///
    /// # Errors
    ///
    /// Propagates communicator failures.
    pub fn iterate(&mut self, iteration: usize) -> SimResult<IterationRecord> {
        let activated = activate_due(&mut self.focal_points, iteration as i64);
        if activated > 0 {
            debug!(rank = self.comm.rank(), iteration, activated, "focal points activated");
        }

        let partition = *self.slice.partition();
        let deactivated = global_deactivated(&self.comm, &partition, &self.focal_points)?;

        let mut residual = 0.0;
        for step in 0..SUB_STEPS {
            reassert_heat(&mut self.slice, &self.focal_points);
            exchange_halos(&mut self.slice, &self.comm)?;
            self.slice.snapshot();
            let local = update_slice(&mut self.slice);
            residual = global_residual(&self.comm, local)?;
            trace!(rank = self.comm.rank(), iteration, step, local, residual, "sub-step");
        }

        let stable = is_stable(deactivated, self.focal_points.len(), residual);

        move_teams(&mut self.teams, &self.focal_points);
        deactivate_reached(&self.teams, &mut self.focal_points);
        apply_suppression(&mut self.slice, &self.teams);

        if self.comm.rank() == 0 {
            debug!(iteration, residual, deactivated, stable, "iteration complete");
        }
        Ok(IterationRecord {
            iteration,
            global_residual: residual,
            deactivated,
            stable,
        })
    }

    /// Iterate until stable or out of budget, then gather the grid
    ///
    /// # Errors
    ///
    /// Propagates communicator failures. Any error leaves the peers to observe this
    /// worker's endpoint going away.
    pub fn run(mut self) -> SimResult<WorkerOutcome> {
        let mut iteration = 0;
        let mut stable = false;
        while iteration < self.max_iter && !stable {
            stable = self.advance(iteration)?;
            iteration += 1;
        }
        self.finish()
    }

    fn advance(&mut self, iteration: usize) -> SimResult<bool> {
        let record = self.iterate(iteration)?;
        let stable = record.stable;
        if self.comm.rank() == ROOT {
            self.trace.push(record);
        }
        Ok(stable)
    }

    fn finish(self) -> SimResult<WorkerOutcome> {
        let Self {
            comm,
            slice,
            teams,
            focal_points,
            trace,
            ..
        } = self;
        let partition = *slice.partition();
        let report = gather_grid(&comm, &slice)?.map(|surface| {
            SimulationReport::new(
                partition.rows,
                partition.columns,
                surface,
                teams,
                focal_points,
                trace,
            )
        });
        Ok(WorkerOutcome {
            partition,
            owned: slice.owned().to_vec(),
            report,
        })
    }
}
