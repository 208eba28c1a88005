//! Core types shared by every worker

pub mod focal;
pub mod team;

pub use focal::{activate_due, count_deactivated, FocalPoint, FocalState};
pub use team::{Team, TeamType, RADIUS_TYPE_1, RADIUS_TYPE_2_3};
