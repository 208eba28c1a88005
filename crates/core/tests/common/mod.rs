//! Shared helpers for the integration tests
#![allow(dead_code)]

use fire_extinguish_core::config::{FocalSpec, SimulationConfig, TeamSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Route `tracing` output through the test harness, filtered by `RUST_LOG`
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a scenario written in the input file format
pub fn scenario(input: &str) -> SimulationConfig {
    SimulationConfig::parse_str(input).expect("scenario should parse")
}

/// Random scenario whose row count splits evenly over 1, 2 and 4 workers
///
/// Coordinates sometimes fall just outside the grid so the skipping paths get exercised.
pub fn random_scenario(seed: u64) -> SimulationConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = 4 * rng.random_range(1..=5_usize);
    let columns = rng.random_range(3..=14_usize);
    let max_iter = rng.random_range(5..=40_usize);

    let coordinate = |rng: &mut StdRng, limit: usize| rng.random_range(-1..=limit as i32);

    let teams = (0..rng.random_range(0..=3))
        .map(|_| TeamSpec {
            x: coordinate(&mut rng, rows),
            y: coordinate(&mut rng, columns),
            kind: rng.random_range(1..=3),
        })
        .collect();
    let focal_points = (0..rng.random_range(0..=4))
        .map(|_| FocalSpec {
            x: coordinate(&mut rng, rows),
            y: coordinate(&mut rng, columns),
            start: rng.random_range(0..=max_iter as i32 / 2),
            heat: rng.random_range(10..=1500),
        })
        .collect();

    SimulationConfig {
        rows,
        columns,
        max_iter,
        teams,
        focal_points,
    }
}
