//! Heat reassertion of active focal points

use crate::core_types::FocalPoint;
use crate::grid::LocalSlice;

/// Write the heat of every active focal point into the cells this worker owns
///
/// Points outside the grid, and points whose row belongs to another worker, are
/// skipped. Returns the number of cells written.
pub fn reassert_heat(slice: &mut LocalSlice, points: &[FocalPoint]) -> usize {
    let partition = *slice.partition();
    points
        .iter()
        .filter(|p| p.is_active() && p.in_bounds(partition.rows, partition.columns))
        .filter(|p| slice.write_global(i64::from(p.x), i64::from(p.y), p.heat as f32))
        .count()
}
