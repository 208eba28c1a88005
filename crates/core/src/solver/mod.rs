//! Distributed stencil solver
//!
//! One sub-step of the solver on a worker is:
//!
//! 1. [`reassert_heat`] writes the active focal points the worker owns
//! 2. [`exchange_halos`] refreshes both halo rows from the neighbours
//! 3. the slice is snapshotted into its previous generation
//! 4. [`update_slice`] relaxes the owned interior rows and yields the local residual
//! 5. [`global_residual`] agrees on the cohort-wide residual
//!
//! The order matters: neighbours must see the reasserted heat, and the stencil must
//! read halos that are at most one sub-step old.

mod halo;
mod reduction;
mod sources;
mod stencil;

pub use halo::exchange_halos;
pub use reduction::{
    global_deactivated, global_residual, is_stable, owned_deactivated, THRESHOLD,
};
pub use sources::reassert_heat;
pub use stencil::{relax, update_slice};

/// Stencil sub-steps per outer iteration
pub const SUB_STEPS: usize = 10;
