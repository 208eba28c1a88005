//! Team engine: targeting, movement and heat suppression
//!
//! Runs once per outer iteration on every worker over the replicated team and focal
//! point arrays:
//!
//! 1. [`move_teams`] picks the nearest active focal point for each team and steps it
//! 2. [`deactivate_reached`] extinguishes targets that a team now stands on
//! 3. [`apply_suppression`] multiplies the owned cells within each team's radius by
//!    [`SUPPRESSION_FACTOR`]
//!
//! Steps 1 and 2 are identical on every worker. Step 3 only touches owned rows.

mod actions;
mod movement;

pub use actions::{apply_suppression, deactivate_reached, suppression_cells, SUPPRESSION_FACTOR};
pub use movement::{choose_target, move_teams};
