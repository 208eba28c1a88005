//! Row-block decomposition of the global grid
//!
//! Each worker owns `chunk = rows / workers` consecutive global rows and stores them
//! between two halo rows. Uneven splits are rejected up front.

use crate::error::{SimError, SimResult};
use std::ops::Range;

/// One worker's share of the global grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Rank of the owning worker
    pub rank: usize,
    /// Total number of workers
    pub workers: usize,
    /// Global row count
    pub rows: usize,
    /// Column count
    pub columns: usize,
    /// Owned rows per worker
    pub chunk: usize,
}

impl Partition {
    /// Compute the partition of `rank` among `workers`
    ///
    /// # Errors
    ///
    /// - [`SimError::NoWorkers`] when `workers == 0`
    /// - [`SimError::UnevenPartition`] when `rows` is not a multiple of `workers`
    ///   (a zero-row share counts as uneven)
    /// - [`SimError::InvalidConfig`] when `rank` is out of range or `columns == 0`
    pub fn new(rows: usize, columns: usize, workers: usize, rank: usize) -> SimResult<Self> {
        if workers == 0 {
            return Err(SimError::NoWorkers);
        }
        if rows == 0 || rows % workers != 0 {
            return Err(SimError::UnevenPartition { rows, workers });
        }
        if columns == 0 {
            return Err(SimError::invalid_config("columns must be positive"));
        }
        if rank >= workers {
            return Err(SimError::invalid_config(format!(
                "rank {rank} out of range for {workers} workers"
            )));
        }
        Ok(Self {
            rank,
            workers,
            rows,
            columns,
            chunk: rows / workers,
        })
    }

    /// Partitions of every rank, in rank order
    ///
    /// # Errors
    ///
    /// Same conditions as [`Partition::new`].
    pub fn all(rows: usize, columns: usize, workers: usize) -> SimResult<Vec<Self>> {
        (0..workers.max(1))
            .map(|rank| Self::new(rows, columns, workers, rank))
            .collect()
    }

    /// First owned global row
    #[must_use]
    pub fn first_row(&self) -> usize {
        self.rank * self.chunk
    }

    /// Owned global rows
    #[must_use]
    pub fn owned_rows(&self) -> Range<usize> {
        self.first_row()..self.first_row() + self.chunk
    }

    /// Whether this worker owns the global row (negative rows are never owned)
    #[must_use]
    pub fn owns(&self, global_row: i64) -> bool {
        global_row >= 0 && self.owned_rows().contains(&(global_row as usize))
    }

    /// Local buffer row of an owned global row (`1..=chunk`)
    #[must_use]
    pub fn local_row(&self, global_row: usize) -> usize {
        global_row - self.first_row() + 1
    }

    /// Height of the local buffer, halos included
    #[must_use]
    pub fn local_height(&self) -> usize {
        self.chunk + 2
    }

    /// Rank holding the rows directly above, if any
    #[must_use]
    pub fn upper_neighbor(&self) -> Option<usize> {
        self.rank.checked_sub(1)
    }

    /// Rank holding the rows directly below, if any
    #[must_use]
    pub fn lower_neighbor(&self) -> Option<usize> {
        (self.rank + 1 < self.workers).then_some(self.rank + 1)
    }

    /// Owned global rows that the stencil may overwrite (global border excluded)
    #[must_use]
    pub fn interior_rows(&self) -> Range<usize> {
        let start = self.first_row().max(1);
        let end = (self.first_row() + self.chunk).min(self.rows.saturating_sub(1));
        start..end.max(start)
    }
}
