//! Worker-local slice of the temperature grid
//!
//! Stores the owned rows plus one halo row above and below as a flat row-major buffer
//! of `(chunk + 2) × columns` cells. Local row 0 is the upper halo, rows `1..=chunk`
//! are owned, row `chunk + 1` is the lower halo.
//!
//! The slice is double-buffered: `surface` holds the current generation and
//! `surface_copy` the previous one, which the stencil reads from.

use super::partition::Partition;
use crate::error::{SimError, SimResult};

/// Temperature buffers of one worker
#[derive(Debug, Clone)]
pub struct LocalSlice {
    partition: Partition,
    surface: Vec<f32>,
    surface_copy: Vec<f32>,
}

fn zeroed(what: &'static str, cells: usize) -> SimResult<Vec<f32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cells)
        .map_err(|_| SimError::Allocation { what, cells })?;
    buffer.resize(cells, 0.0);
    Ok(buffer)
}

impl LocalSlice {
    /// Allocate a zeroed slice for the partition
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Allocation`] if either buffer cannot be reserved.
    pub fn new(partition: Partition) -> SimResult<Self> {
        let cells = partition
            .local_height()
            .checked_mul(partition.columns)
            .ok_or(SimError::Allocation {
                what: "surface",
                cells: usize::MAX,
            })?;
        Ok(Self {
            partition,
            surface: zeroed("surface", cells)?,
            surface_copy: zeroed("surface copy", cells)?,
        })
    }

    /// Partition this slice was built for
    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Number of columns
    #[must_use]
    pub fn columns(&self) -> usize {
        self.partition.columns
    }

    /// Buffer height including both halos
    #[must_use]
    pub fn height(&self) -> usize {
        self.partition.local_height()
    }

    #[inline]
    fn index(&self, local_row: usize, column: usize) -> usize {
        assert!(
            local_row < self.height() && column < self.columns(),
            "Coordinates out of bounds"
        );
        local_row * self.columns() + column
    }

    /// Current value at a local position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, local_row: usize, column: usize) -> f32 {
        self.surface[self.index(local_row, column)]
    }

    /// Overwrite a local position, halos included
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, local_row: usize, column: usize, value: f32) {
        let idx = self.index(local_row, column);
        self.surface[idx] = value;
    }

    /// One local row of the current generation
    #[must_use]
    pub fn row(&self, local_row: usize) -> &[f32] {
        let start = self.index(local_row, 0);
        &self.surface[start..start + self.columns()]
    }

    /// One local row of the current generation, mutable
    pub fn row_mut(&mut self, local_row: usize) -> &mut [f32] {
        let start = self.index(local_row, 0);
        let columns = self.columns();
        &mut self.surface[start..start + columns]
    }

    /// Owned rows only, contiguous in global row order
    #[must_use]
    pub fn owned(&self) -> &[f32] {
        let columns = self.columns();
        &self.surface[columns..columns * (self.partition.chunk + 1)]
    }

    /// Whole current generation, halos included
    #[must_use]
    pub fn surface(&self) -> &[f32] {
        &self.surface
    }

    /// Whole previous generation, halos included
    #[must_use]
    pub fn surface_copy(&self) -> &[f32] {
        &self.surface_copy
    }

    /// Current generation (mutable) and previous generation, for the stencil
    pub fn generations_mut(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.surface, &self.surface_copy)
    }

    /// Copy the current generation, halos included, into the previous one
    pub fn snapshot(&mut self) {
        self.surface_copy.copy_from_slice(&self.surface);
    }

    fn owned_index(&self, row: i64, column: i64) -> Option<usize> {
        if !self.partition.owns(row) || column < 0 || column as usize >= self.columns() {
            return None;
        }
        let local = self.partition.local_row(row as usize);
        Some(local * self.columns() + column as usize)
    }

    /// Value at a global position, if this worker owns its row
    #[must_use]
    pub fn get_global(&self, row: i64, column: i64) -> Option<f32> {
        self.owned_index(row, column).map(|idx| self.surface[idx])
    }

    /// Write a global position if this worker owns its row
    ///
    /// Returns whether the write happened. Cells in halo rows belong to a neighbor and
    /// are never written through this path.
    pub fn write_global(&mut self, row: i64, column: i64, value: f32) -> bool {
        match self.owned_index(row, column) {
            Some(idx) => {
                self.surface[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Multiply a global position by `factor` if this worker owns its row
    ///
    /// Returns whether the cell was scaled.
    pub fn scale_global(&mut self, row: i64, column: i64, factor: f32) -> bool {
        match self.owned_index(row, column) {
            Some(idx) => {
                self.surface[idx] *= factor;
                true
            }
            None => false,
        }
    }
}
