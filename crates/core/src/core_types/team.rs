//! Extinguishing teams
//!
//! Teams move one cell per outer iteration towards their target focal point and cool
//! a disc of cells around themselves. Positions are global grid coordinates; like
//! focal points, `x` is the row and `y` the column.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Suppression radius of diagonal teams, in cells
pub const RADIUS_TYPE_1: i32 = 3;

/// Suppression radius of axis-first teams, in cells
pub const RADIUS_TYPE_2_3: i32 = 9;

/// Movement policy of a team
///
/// The discriminants are the type codes of the input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamType {
    /// Type 1: closes the row and column gaps simultaneously
    Diagonal = 1,
    /// Type 2: closes the column gap first, then the row gap
    HorizontalFirst = 2,
    /// Type 3: closes the row gap first, then the column gap
    VerticalFirst = 3,
}

impl TeamType {
    /// Convert from the input type code
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Diagonal),
            2 => Some(Self::HorizontalFirst),
            3 => Some(Self::VerticalFirst),
            _ => None,
        }
    }

    /// Input type code
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Radius of the suppression disc
    #[must_use]
    pub fn radius(self) -> i32 {
        match self {
            Self::Diagonal => RADIUS_TYPE_1,
            Self::HorizontalFirst | Self::VerticalFirst => RADIUS_TYPE_2_3,
        }
    }
}

/// An extinguishing team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Global row
    pub x: i32,
    /// Column
    pub y: i32,
    /// Movement policy and suppression radius
    pub kind: TeamType,
    /// Index of the focal point being pursued, `None` when nothing is active
    pub target: Option<usize>,
}

impl Team {
    /// Create a team without a target
    #[must_use]
    pub fn new(x: i32, y: i32, kind: TeamType) -> Self {
        Self {
            x,
            y,
            kind,
            target: None,
        }
    }

    /// Advance one step towards `(row, column)` according to the movement policy
    pub fn step_toward(&mut self, row: i32, column: i32) {
        match self.kind {
            TeamType::Diagonal => {
                self.x += unit_step(self.x, row);
                self.y += unit_step(self.y, column);
            }
            TeamType::HorizontalFirst => {
                if column != self.y {
                    self.y += unit_step(self.y, column);
                } else {
                    self.x += unit_step(self.x, row);
                }
            }
            TeamType::VerticalFirst => {
                if row != self.x {
                    self.x += unit_step(self.x, row);
                } else {
                    self.y += unit_step(self.y, column);
                }
            }
        }
    }

    /// Euclidean distance to a cell, computed the same way on every worker
    #[must_use]
    pub fn distance_to(&self, row: i32, column: i32) -> f32 {
        // Offsets between arbitrary i32 coordinates need the wider type
        let dx = (i64::from(row) - i64::from(self.x)) as f32;
        let dy = (i64::from(column) - i64::from(self.y)) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Signed unit step from `from` towards `to`, without forming their difference
fn unit_step(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}
