//! Team actions: extinguishing focal points and cooling the surroundings

use crate::core_types::{FocalPoint, Team};
use crate::grid::LocalSlice;
use tracing::debug;

/// Temperature multiplier applied to every cell in a team's radius
pub const SUPPRESSION_FACTOR: f32 = 0.75;

/// Deactivate the target of every team standing on it
///
/// Returns the indices of the points extinguished by this call, in team order.
pub fn deactivate_reached(teams: &[Team], points: &mut [FocalPoint]) -> Vec<usize> {
    let mut extinguished = Vec::new();
    for (index, team) in teams.iter().enumerate() {
        let Some(target) = team.target else {
            continue;
        };
        if points[target].deactivate_if_reached(team.x, team.y) {
            debug!(team = index, focal = target, x = team.x, y = team.y, "focal point extinguished");
            extinguished.push(target);
        }
    }
    extinguished
}

/// Interior cells within the team's suppression radius
///
/// Scans the `(2r + 1)²` box around the team and keeps cells at Euclidean distance
/// `<= r` that are not on the global border. Yields `(row, column)` in row-major order.
pub fn suppression_cells(
    team: &Team,
    rows: usize,
    columns: usize,
) -> impl Iterator<Item = (i64, i64)> {
    let radius = team.kind.radius();
    let (cx, cy) = (i64::from(team.x), i64::from(team.y));
    let r = i64::from(radius);
    let (rows, columns) = (rows as i64, columns as i64);
    let centre = *team;

    (cx - r..=cx + r)
        .flat_map(move |i| (cy - r..=cy + r).map(move |j| (i, j)))
        .filter(move |&(i, j)| i >= 1 && i < rows - 1 && j >= 1 && j < columns - 1)
        .filter(move |&(i, j)| centre.distance_to(i as i32, j as i32) <= radius as f32)
}

/// Cool the owned cells around every team
///
/// Cells in rows owned by other workers are skipped; their owners apply the same
/// computation from their own replicated team array. Returns the number of cells scaled.
pub fn apply_suppression(slice: &mut LocalSlice, teams: &[Team]) -> usize {
    let partition = *slice.partition();
    let mut scaled = 0;
    for team in teams {
        for (i, j) in suppression_cells(team, partition.rows, partition.columns) {
            if slice.scale_global(i, j, SUPPRESSION_FACTOR) {
                scaled += 1;
            }
        }
    }
    scaled
}
