//! Fire Extinguishing Simulation Core Library
//!
//! Heat diffusion over a rectangular surface with scheduled fire focal points and
//! extinguishing teams, computed by a cohort of workers that each own a block of grid
//! rows. Workers exchange one halo row with each neighbour per sub-step and agree on
//! the global residual through collective reductions; teams and focal points are
//! replicated and updated identically on every worker.
//!
//! ## Layout
//!
//! - [`grid`]: row-block partition and the double-buffered local slice
//! - [`comm`]: the [`Communicator`] seam with single-worker and thread-cohort backends
//! - [`solver`]: heat sources, halo exchange, stencil and reductions
//! - [`suppression`]: team targeting, movement and cooling
//! - [`simulation`]: the worker loop, result gather and the sequential reference
//! - [`laplace`]: steady-state relaxation on the same machinery

// Core types and utilities
pub mod core_types;
pub mod config;
pub mod error;

// Distributed machinery
pub mod comm;
pub mod grid;
pub mod solver;

// Simulation stages
pub mod suppression;
pub mod simulation;
pub mod laplace;

// Re-export core types
pub use core_types::{FocalPoint, FocalState, Team, TeamType};
pub use config::{FocalSpec, SimulationConfig, TeamSpec};
pub use error::{CommError, SimError, SimResult};

// Re-export runtime types
pub use comm::{Communicator, SingleProcessComm, ThreadComm};
pub use grid::{LocalSlice, Partition};

// Re-export entry points
pub use laplace::{LaplaceConfig, LaplaceReport};
pub use simulation::{run, run_workers, IterationRecord, SimulationReport, WorkerOutcome};
