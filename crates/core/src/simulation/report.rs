//! Run results and their text renderings

use crate::core_types::{FocalPoint, Team};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// What the cohort agreed on at the end of one outer iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Zero-based outer iteration
    pub iteration: usize,
    /// Global residual of the last sub-step
    pub global_residual: f32,
    /// Deactivated focal points counted at the start of the iteration
    pub deactivated: u32,
    /// Whether the stop condition held
    pub stable: bool,
}

/// Result of a run, assembled on the root worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Number of outer iterations executed
    pub iterations: usize,
    /// Whether the run stopped on the stability condition
    pub stable: bool,
    /// Final temperature at each focal point, `None` for points outside the grid
    pub focal_temperatures: Vec<Option<f32>>,
    /// Final team state
    pub teams: Vec<Team>,
    /// Final focal point state
    pub focal_points: Vec<FocalPoint>,
    /// One record per outer iteration
    pub trace: Vec<IterationRecord>,
    /// Final global grid, row-major
    #[serde(skip)]
    pub surface: Vec<f32>,
}

impl SimulationReport {
    /// Assemble a report from the gathered grid and the final replicated state
    #[must_use]
    pub fn new(
        rows: usize,
        columns: usize,
        surface: Vec<f32>,
        teams: Vec<Team>,
        focal_points: Vec<FocalPoint>,
        trace: Vec<IterationRecord>,
    ) -> Self {
        let focal_temperatures = focal_points
            .iter()
            .map(|p| {
                p.in_bounds(rows, columns)
                    .then(|| surface[p.x as usize * columns + p.y as usize])
            })
            .collect();
        Self {
            rows,
            columns,
            iterations: trace.len(),
            stable: trace.last().is_some_and(|r| r.stable),
            focal_temperatures,
            teams,
            focal_points,
            trace,
            surface,
        }
    }

    /// Temperature at a global position
    #[must_use]
    pub fn temperature(&self, row: usize, column: usize) -> Option<f32> {
        (row < self.rows && column < self.columns).then(|| self.surface[row * self.columns + column])
    }

    /// One full row of the final grid
    #[must_use]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.surface[row * self.columns..(row + 1) * self.columns]
    }

    /// Global residual of the last iteration
    #[must_use]
    pub fn final_residual(&self) -> Option<f32> {
        self.trace.last().map(|r| r.global_residual)
    }

    /// `Result: <iterations> <t0> <t1> ...`, skipping focal points outside the grid
    #[must_use]
    pub fn result_line(&self) -> String {
        let mut line = format!("Result: {}", self.iterations);
        for temperature in self.focal_temperatures.iter().flatten() {
            let _ = write!(line, " {temperature:.6}");
        }
        line
    }

    /// ASCII picture of the final grid
    ///
    /// `*` is 1000 degrees or more, a digit counts hundreds, `+` is 50 or more, `.` is
    /// 25 or more, `0` anything colder. Teams are shown in `[ ]`, active focal points
    /// in `( )`.
    #[must_use]
    pub fn render_status(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Iteration: {}", self.iterations);
        let border = format!("+{}+", "---".repeat(self.columns));
        let _ = writeln!(out, "{border}");

        for i in 0..self.rows {
            out.push('|');
            for j in 0..self.columns {
                let symbol = status_symbol(self.surface[i * self.columns + j]);
                let (row, column) = (i as i64, j as i64);
                let team_here = self
                    .teams
                    .iter()
                    .any(|t| i64::from(t.x) == row && i64::from(t.y) == column);
                let focal_here = self
                    .focal_points
                    .iter()
                    .any(|p| p.is_active() && i64::from(p.x) == row && i64::from(p.y) == column);
                let _ = if team_here {
                    write!(out, "[{symbol}]")
                } else if focal_here {
                    write!(out, "({symbol})")
                } else {
                    write!(out, " {symbol} ")
                };
            }
            out.push_str("|\n");
        }

        let _ = writeln!(out, "{border}");
        let _ = writeln!(
            out,
            "Global residual: {:.6}",
            self.final_residual().unwrap_or(0.0)
        );
        out
    }
}

fn status_symbol(value: f32) -> char {
    if value >= 1000.0 {
        '*'
    } else if value >= 100.0 {
        char::from(b'0' + (value / 100.0) as u8)
    } else if value >= 50.0 {
        '+'
    } else if value >= 25.0 {
        '.'
    } else {
        '0'
    }
}
