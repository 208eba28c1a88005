//! Fire focal points and their activation state machine
//!
//! A focal point is a fixed heat source. It goes through three states and never
//! goes back:
//!
//! ```text
//! Inactive --(iteration == start)--> Active --(team on the cell)--> Deactivated
//! ```
//!
//! The focal point array is replicated on every worker. All transitions are pure
//! functions of replicated data (the iteration counter and team positions), so each
//! worker applies them independently and the arrays stay identical without messages.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a focal point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocalState {
    /// Not yet reached its start iteration
    Inactive,
    /// Emitting heat every sub-step
    Active,
    /// Extinguished by a team, permanently
    Deactivated,
}

/// A fire focal point in global grid coordinates
///
/// `x` is the global row and `y` the column, matching the input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocalPoint {
    /// Global row
    pub x: i32,
    /// Column
    pub y: i32,
    /// Outer iteration at which the point activates
    pub start: i32,
    /// Temperature written into the cell while active
    pub heat: i32,
    /// Current lifecycle state
    pub state: FocalState,
}

impl FocalPoint {
    /// Create an inactive focal point
    #[must_use]
    pub fn new(x: i32, y: i32, start: i32, heat: i32) -> Self {
        Self {
            x,
            y,
            start,
            heat,
            state: FocalState::Inactive,
        }
    }

    /// Whether the point currently emits heat
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == FocalState::Active
    }

    /// Whether a team already extinguished the point
    #[must_use]
    pub fn is_deactivated(&self) -> bool {
        self.state == FocalState::Deactivated
    }

    /// Whether `(rows, columns)` contains the point
    #[must_use]
    pub fn in_bounds(&self, rows: usize, columns: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < rows && (self.y as usize) < columns
    }

    /// Inactive -> Active when the iteration counter hits `start`
    ///
    /// Returns `true` if the point changed state.
    pub fn activate_if_due(&mut self, iteration: i64) -> bool {
        // Only the scheduled tick activates; an extinguished point stays out.
        if i64::from(self.start) == iteration && self.state == FocalState::Inactive {
            self.state = FocalState::Active;
            return true;
        }
        false
    }

    /// Active -> Deactivated when a team stands on the exact cell
    ///
    /// Returns `true` if the point changed state.
    pub fn deactivate_if_reached(&mut self, row: i32, column: i32) -> bool {
        if self.state == FocalState::Active && self.x == row && self.y == column {
            self.state = FocalState::Deactivated;
            return true;
        }
        false
    }
}

/// Activate every point whose start tick equals `iteration`
///
/// Returns how many points became active.
pub fn activate_due(points: &mut [FocalPoint], iteration: i64) -> usize {
    points
        .iter_mut()
        .map(|point| point.activate_if_due(iteration))
        .filter(|&changed| changed)
        .count()
}

/// Number of points extinguished so far on this worker
#[must_use]
pub fn count_deactivated(points: &[FocalPoint]) -> u32 {
    points.iter().filter(|p| p.is_deactivated()).count() as u32
}
