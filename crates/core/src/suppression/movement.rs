//! Team targeting and movement

use crate::core_types::{FocalPoint, Team};
use tracing::debug;

/// Nearest active focal point to the team
///
/// Ties keep the lowest index. Returns `None` when no point is active.
#[must_use]
pub fn choose_target(team: &Team, points: &[FocalPoint]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in points.iter().enumerate() {
        if !point.is_active() {
            continue;
        }
        let distance = team.distance_to(point.x, point.y);
        let closer = match best {
            Some((_, closest)) => distance < closest,
            None => true,
        };
        if closer {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Retarget every team and advance it one step
///
/// Teams without an active focal point keep their position.
pub fn move_teams(teams: &mut [Team], points: &[FocalPoint]) {
    for (index, team) in teams.iter_mut().enumerate() {
        let target = choose_target(team, points);
        if target != team.target {
            debug!(team = index, ?target, "team retargeted");
        }
        team.target = target;

        if let Some(target) = target {
            let point = &points[target];
            team.step_toward(point.x, point.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::TeamType;

    fn active(x: i32, y: i32) -> FocalPoint {
        let mut point = FocalPoint::new(x, y, 0, 100);
        point.activate_if_due(0);
        point
    }

    #[test]
    fn test_nearest_active_point_wins() {
        let team = Team::new(0, 0, TeamType::Diagonal);
        let points = vec![
            FocalPoint::new(1, 1, 9, 100), // inactive, nearest
            active(5, 5),
            active(2, 3),
        ];
        assert_eq!(choose_target(&team, &points), Some(2));
    }

    #[test]
    fn test_ties_keep_lowest_index() {
        let team = Team::new(5, 5, TeamType::Diagonal);
        let points = vec![active(5, 8), active(8, 5), active(2, 5)];
        assert_eq!(choose_target(&team, &points), Some(0));
    }

    #[test]
    fn test_no_active_point_means_no_target_and_no_move() {
        let mut teams = vec![Team::new(3, 4, TeamType::VerticalFirst)];
        teams[0].target = Some(0);
        let mut extinguished = active(1, 1);
        extinguished.deactivate_if_reached(1, 1);

        move_teams(&mut teams, &[extinguished, FocalPoint::new(0, 0, 7, 1)]);
        assert_eq!(teams[0].target, None);
        assert_eq!((teams[0].x, teams[0].y), (3, 4));
    }

    #[test]
    fn test_move_teams_steps_toward_target() {
        let points = vec![active(2, 2), active(10, 0)];
        let mut teams = vec![
            Team::new(0, 0, TeamType::Diagonal),
            Team::new(10, 3, TeamType::HorizontalFirst),
        ];
        move_teams(&mut teams, &points);
        assert_eq!(teams[0].target, Some(0));
        assert_eq!((teams[0].x, teams[0].y), (1, 1));
        assert_eq!(teams[1].target, Some(1));
        assert_eq!((teams[1].x, teams[1].y), (10, 2));
    }
}
