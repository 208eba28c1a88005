//! Distributed runs against the sequential reference
//!
//! The workers perform the same float operations in the same order as the reference,
//! so results are compared bit for bit rather than within a tolerance.

mod common;

use common::{random_scenario, scenario};
use fire_extinguish_core::config::SimulationConfig;
use fire_extinguish_core::simulation::{self, reference, SimulationReport};

fn assert_same_run(expected: &SimulationReport, actual: &SimulationReport, label: &str) {
    assert_eq!(actual.iterations, expected.iterations, "{label}: iterations");
    assert_eq!(actual.stable, expected.stable, "{label}: stability");
    assert_eq!(actual.trace, expected.trace, "{label}: iteration trace");
    assert_eq!(actual.teams, expected.teams, "{label}: teams");
    assert_eq!(actual.focal_points, expected.focal_points, "{label}: focal points");
    assert_eq!(
        actual.focal_temperatures, expected.focal_temperatures,
        "{label}: focal temperatures"
    );
    for (index, (a, e)) in actual.surface.iter().zip(&expected.surface).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "{label}: cell ({}, {}) differs: {a} vs {e}",
            index / expected.columns,
            index % expected.columns
        );
    }
    assert_eq!(actual.surface.len(), expected.surface.len());
}

fn check_all_worker_counts(config: &SimulationConfig, label: &str) {
    let expected = reference::simulate(config).unwrap();
    for workers in [1, 2, 4] {
        if config.rows % workers != 0 {
            continue;
        }
        let actual = simulation::run(config, workers).unwrap();
        assert_same_run(&expected, &actual, &format!("{label}, {workers} workers"));
    }
}

#[test]
fn test_single_worker_matches_reference() {
    let config = scenario("12 10 60 2 0 0 1 11 9 2 2 3 3 0 800 8 6 5 300");
    let expected = reference::simulate(&config).unwrap();
    let actual = simulation::run(&config, 1).unwrap();
    assert_same_run(&expected, &actual, "single worker");
}

#[test]
fn test_fixed_scenarios_match_reference() {
    // Sources straddling every block boundary of a four-way split
    check_all_worker_counts(
        &scenario("16 12 80 3 0 0 1 15 11 2 7 0 3 4 3 4 0 900 4 8 2 700 8 3 4 400 12 6 6 1200"),
        "boundary sources",
    );
    // Teams whose radius-9 discs cover several blocks
    check_all_worker_counts(
        &scenario("20 20 50 2 10 10 2 2 17 3 2 5 5 0 1000 15 15 3 1000"),
        "wide suppression",
    );
    // Narrow grid: every cell is a border column
    check_all_worker_counts(&scenario("8 2 10 0 1 3 1 0 500"), "two columns");
}

#[test]
fn test_random_scenarios_match_reference() {
    for seed in 0..40 {
        let config = random_scenario(seed);
        check_all_worker_counts(&config, &format!("seed {seed}"));
    }
}

#[test]
fn test_one_row_per_worker() {
    // Every worker's slice is a single owned row between two halos
    let config = scenario("4 9 30 1 0 4 3 1 2 4 0 600");
    let expected = reference::simulate(&config).unwrap();
    let actual = simulation::run(&config, 4).unwrap();
    assert_same_run(&expected, &actual, "one row per worker");
}
