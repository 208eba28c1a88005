//! Simulation input
//!
//! The input is a flat list of integers:
//!
//! ```text
//! rows columns max_iter
//! num_teams   [x y type]*
//! num_focal   [x y start heat]*
//! ```
//!
//! It can come from a file (any whitespace layout) or from command-line values.

use crate::core_types::{FocalPoint, Team, TeamType};
use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Team as given in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    /// Global row
    pub x: i32,
    /// Column
    pub y: i32,
    /// Type code, 1 to 3
    #[serde(rename = "type")]
    pub kind: i32,
}

/// Focal point as given in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocalSpec {
    /// Global row
    pub x: i32,
    /// Column
    pub y: i32,
    /// Activation iteration
    pub start: i32,
    /// Emitted temperature
    pub heat: i32,
}

/// Complete description of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Outer iteration budget
    pub max_iter: usize,
    /// Teams in input order
    pub teams: Vec<TeamSpec>,
    /// Focal points in input order
    pub focal_points: Vec<FocalSpec>,
}

/// Pulls named integers off a token stream
struct Tokens<I> {
    inner: I,
}

impl<'a, I: Iterator<Item = &'a str>> Tokens<I> {
    fn next_i64(&mut self, field: &str) -> SimResult<i64> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| SimError::invalid_config(format!("missing {field}")))?;
        token
            .parse::<i64>()
            .map_err(|_| SimError::invalid_config(format!("{field}: '{token}' is not an integer")))
    }

    fn next_i32(&mut self, field: &str) -> SimResult<i32> {
        let value = self.next_i64(field)?;
        i32::try_from(value)
            .map_err(|_| SimError::invalid_config(format!("{field}: {value} out of range")))
    }

    fn next_count(&mut self, field: &str) -> SimResult<usize> {
        let value = self.next_i64(field)?;
        usize::try_from(value)
            .map_err(|_| SimError::invalid_config(format!("{field} must not be negative, got {value}")))
    }
}

impl SimulationConfig {
    /// Parse the whitespace-separated integer format
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first missing or malformed
    /// field, or reporting values left over after the last focal point.
    pub fn parse_tokens<'a, I>(tokens: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tokens = Tokens {
            inner: tokens.into_iter(),
        };

        let rows = tokens.next_count("rows")?;
        let columns = tokens.next_count("columns")?;
        let max_iter = tokens.next_count("max_iter")?;

        let num_teams = tokens.next_count("num_teams")?;
        let mut teams = Vec::with_capacity(num_teams.min(1 << 16));
        for index in 0..num_teams {
            teams.push(TeamSpec {
                x: tokens.next_i32(&format!("team {index} x"))?,
                y: tokens.next_i32(&format!("team {index} y"))?,
                kind: tokens.next_i32(&format!("team {index} type"))?,
            });
        }

        let num_focal = tokens.next_count("num_focal")?;
        let mut focal_points = Vec::with_capacity(num_focal.min(1 << 16));
        for index in 0..num_focal {
            focal_points.push(FocalSpec {
                x: tokens.next_i32(&format!("focal point {index} x"))?,
                y: tokens.next_i32(&format!("focal point {index} y"))?,
                start: tokens.next_i32(&format!("focal point {index} start"))?,
                heat: tokens.next_i32(&format!("focal point {index} heat"))?,
            });
        }

        if let Some(extra) = tokens.inner.next() {
            return Err(SimError::invalid_config(format!(
                "unexpected trailing value '{extra}'"
            )));
        }

        Ok(Self {
            rows,
            columns,
            max_iter,
            teams,
            focal_points,
        })
    }

    /// Parse the contents of an input file
    ///
    /// # Errors
    ///
    /// Same as [`SimulationConfig::parse_tokens`].
    pub fn parse_str(input: &str) -> SimResult<Self> {
        Self::parse_tokens(input.split_whitespace())
    }

    /// Check the values the core relies on
    ///
    /// Coordinates outside the grid are allowed; their effects are skipped at run time.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for an empty grid or an unknown team type.
    pub fn validate(&self) -> SimResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SimError::invalid_config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.columns
            )));
        }
        if let Some((index, team)) = self
            .teams
            .iter()
            .enumerate()
            .find(|(_, team)| TeamType::from_code(team.kind).is_none())
        {
            return Err(SimError::invalid_config(format!(
                "team {index} has unknown type {}",
                team.kind
            )));
        }
        Ok(())
    }

    /// Initial team array
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for an unknown team type.
    pub fn build_teams(&self) -> SimResult<Vec<Team>> {
        self.teams
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                TeamType::from_code(spec.kind)
                    .map(|kind| Team::new(spec.x, spec.y, kind))
                    .ok_or_else(|| {
                        SimError::invalid_config(format!(
                            "team {index} has unknown type {}",
                            spec.kind
                        ))
                    })
            })
            .collect()
    }

    /// Initial focal point array, all inactive
    #[must_use]
    pub fn build_focal_points(&self) -> Vec<FocalPoint> {
        self.focal_points
            .iter()
            .map(|spec| FocalPoint::new(spec.x, spec.y, spec.start, spec.heat))
            .collect()
    }
}
