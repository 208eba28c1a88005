//! Sequential whole-grid simulation
//!
//! Runs the same algorithm as the distributed workers over one full grid with no
//! partition, halos or communicator. The float operations happen in the same order, so
//! a correct distributed run reproduces this grid bit for bit with any worker count.

use super::report::{IterationRecord, SimulationReport};
use crate::config::SimulationConfig;
use crate::core_types::{activate_due, count_deactivated, FocalPoint, Team, TeamType};
use crate::error::SimResult;
use crate::solver::{is_stable, SUB_STEPS};
use crate::suppression::SUPPRESSION_FACTOR;
use std::cmp::Ordering;

fn write_sources(surface: &mut [f32], columns: usize, rows: usize, points: &[FocalPoint]) {
    for point in points {
        if point.is_active() && point.in_bounds(rows, columns) {
            surface[point.x as usize * columns + point.y as usize] = point.heat as f32;
        }
    }
}

fn relax_grid(surface: &mut [f32], previous: &[f32], rows: usize, columns: usize) -> f32 {
    let mut residual = 0.0_f32;
    for i in 1..rows.saturating_sub(1) {
        for j in 1..columns.saturating_sub(1) {
            let value = (previous[(i - 1) * columns + j]
                + previous[(i + 1) * columns + j]
                + previous[i * columns + j - 1]
                + previous[i * columns + j + 1])
                / 4.0;
            surface[i * columns + j] = value;
            residual = residual.max((value - previous[i * columns + j]).abs());
        }
    }
    residual
}

fn toward(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

fn advance_teams(teams: &mut [Team], points: &[FocalPoint]) {
    for team in teams.iter_mut() {
        team.target = None;
        let mut closest = f32::INFINITY;
        for (index, point) in points.iter().enumerate() {
            if !point.is_active() {
                continue;
            }
            let dx = (i64::from(point.x) - i64::from(team.x)) as f32;
            let dy = (i64::from(point.y) - i64::from(team.y)) as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            if team.target.is_none() || distance < closest {
                team.target = Some(index);
                closest = distance;
            }
        }
        let Some(target) = team.target else {
            continue;
        };

        let (row, column) = (points[target].x, points[target].y);
        match team.kind {
            TeamType::Diagonal => {
                team.x += toward(team.x, row);
                team.y += toward(team.y, column);
            }
            TeamType::HorizontalFirst if team.y != column => team.y += toward(team.y, column),
            TeamType::HorizontalFirst => team.x += toward(team.x, row),
            TeamType::VerticalFirst if team.x != row => team.x += toward(team.x, row),
            TeamType::VerticalFirst => team.y += toward(team.y, column),
        }
    }
}

fn extinguish(teams: &[Team], points: &mut [FocalPoint]) {
    for team in teams {
        if let Some(target) = team.target {
            points[target].deactivate_if_reached(team.x, team.y);
        }
    }
}

fn suppress(surface: &mut [f32], rows: usize, columns: usize, teams: &[Team]) {
    let (rows, columns) = (rows as i64, columns as i64);
    for team in teams {
        let radius = i64::from(team.kind.radius());
        let (cx, cy) = (i64::from(team.x), i64::from(team.y));
        for i in (cx - radius).max(1)..=(cx + radius).min(rows - 2) {
            for j in (cy - radius).max(1)..=(cy + radius).min(columns - 2) {
                let (dx, dy) = (i - cx, j - cy);
                if dx * dx + dy * dy <= radius * radius {
                    surface[(i * columns + j) as usize] *= SUPPRESSION_FACTOR;
                }
            }
        }
    }
}

/// Run the whole simulation on a single grid
///
/// # Errors
///
/// Fails if the configuration does not validate.
pub fn simulate(config: &SimulationConfig) -> SimResult<SimulationReport> {
    config.validate()?;
    let (rows, columns) = (config.rows, config.columns);
    let mut teams = config.build_teams()?;
    let mut points = config.build_focal_points();
    let mut surface = vec![0.0_f32; rows * columns];
    let mut previous = surface.clone();
    let mut trace = Vec::new();

    let mut stable = false;
    let mut iteration = 0;
    while iteration < config.max_iter && !stable {
        activate_due(&mut points, iteration as i64);
        let deactivated = count_deactivated(&points);

        let mut residual = 0.0;
        for _ in 0..SUB_STEPS {
            write_sources(&mut surface, columns, rows, &points);
            previous.copy_from_slice(&surface);
            residual = relax_grid(&mut surface, &previous, rows, columns);
        }
        stable = is_stable(deactivated, points.len(), residual);

        advance_teams(&mut teams, &points);
        extinguish(&teams, &mut points);
        suppress(&mut surface, rows, columns, &teams);

        trace.push(IterationRecord {
            iteration,
            global_residual: residual,
            deactivated,
            stable,
        });
        iteration += 1;
    }

    Ok(SimulationReport::new(
        rows, columns, surface, teams, points, trace,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relax_grid_keeps_borders() {
        let (rows, columns) = (3, 3);
        let mut previous = vec![0.0; 9];
        previous[1] = 4.0;
        previous[3] = 8.0;
        let mut surface = previous.clone();
        let residual = relax_grid(&mut surface, &previous, rows, columns);
        assert_eq!(surface[4], 3.0);
        assert_eq!(residual, 3.0);
        assert_eq!(surface[1], 4.0);
        assert_eq!(surface[3], 8.0);
    }

    #[test]
    fn test_out_of_grid_points_are_ignored() {
        let config = SimulationConfig::parse_str("4 4 5 0 1 9 9 0 100").unwrap();
        let report = simulate(&config).unwrap();
        assert!(report.surface.iter().all(|&v| v == 0.0));
        assert_eq!(report.focal_temperatures, vec![None]);
        assert_eq!(report.iterations, 5);
    }

    #[test]
    fn test_team_reaching_point_extinguishes_it() {
        let config = SimulationConfig::parse_str("10 10 40 1 4 4 1 1 5 5 0 200").unwrap();
        let report = simulate(&config).unwrap();
        assert!(report.focal_points[0].is_deactivated());
        assert_eq!((report.teams[0].x, report.teams[0].y), (5, 5));
        assert_eq!(report.trace[0].deactivated, 0);
        assert_eq!(report.trace[1].deactivated, 1);
    }

    #[test]
    fn test_suppression_disc_matches_worker_cells() {
        use crate::suppression::suppression_cells;

        let (rows, columns) = (24, 20);
        for (x, y, kind) in [
            (10, 10, TeamType::Diagonal),
            (1, 18, TeamType::HorizontalFirst),
            (-4, 3, TeamType::VerticalFirst),
        ] {
            let team = Team::new(x, y, kind);
            let mut surface = vec![1.0_f32; rows * columns];
            suppress(&mut surface, rows, columns, &[team]);
            let touched: Vec<(i64, i64)> = (0..rows * columns)
                .filter(|&k| surface[k] != 1.0)
                .map(|k| ((k / columns) as i64, (k % columns) as i64))
                .collect();
            let expected: Vec<_> = suppression_cells(&team, rows, columns).collect();
            assert_eq!(touched, expected, "team at ({x},{y})");
        }
    }

    #[test]
    fn test_team_chases_nearest_point_with_lowest_index_on_ties() {
        let mut points = vec![
            FocalPoint::new(0, 4, 0, 10),
            FocalPoint::new(4, 0, 0, 10),
            FocalPoint::new(1, 1, 5, 10),
        ];
        activate_due(&mut points, 0);
        let mut teams = vec![Team::new(0, 0, TeamType::VerticalFirst)];

        advance_teams(&mut teams, &points);
        assert_eq!(teams[0].target, Some(0));
        assert_eq!((teams[0].x, teams[0].y), (0, 1));
    }
}
