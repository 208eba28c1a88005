//! Four-neighbour averaging stencil
//!
//! Every interior cell takes the mean of its four axis neighbours from the previous
//! generation:
//!
//! ```text
//! T'[i][j] = (T[i-1][j] + T[i+1][j] + T[i][j-1] + T[i][j+1]) / 4
//! ```
//!
//! Global border rows and columns are never written. The residual of an update is the
//! largest absolute change over the updated cells.

use crate::grid::LocalSlice;
use rayon::prelude::*;
use std::ops::Range;

/// Relax `rows` of a row-major buffer and return the largest absolute change
///
/// Reads from `previous`, writes into `current`. Only columns `1..columns-1` of the
/// given rows are touched; rows outside `rows` are left as they are. Both buffers must
/// hold the row above and below every row in `rows`.
///
/// # Panics
///
/// Panics if the buffers differ in length or `rows` reaches the first or last buffer row.
pub fn relax(current: &mut [f32], previous: &[f32], columns: usize, rows: Range<usize>) -> f32 {
    assert_eq!(current.len(), previous.len(), "Generation size mismatch");
    if rows.is_empty() || columns < 3 {
        return 0.0;
    }
    assert!(
        rows.start >= 1 && (rows.end + 1) * columns <= current.len(),
        "Stencil rows need a neighbour row on both sides"
    );

    current
        .par_chunks_mut(columns)
        .enumerate()
        .filter(|(row, _)| rows.contains(row))
        .map(|(row, cells)| {
            let up = &previous[(row - 1) * columns..row * columns];
            let mid = &previous[row * columns..(row + 1) * columns];
            let down = &previous[(row + 1) * columns..(row + 2) * columns];

            let mut residual = 0.0_f32;
            for j in 1..columns - 1 {
                let value = (up[j] + down[j] + mid[j - 1] + mid[j + 1]) / 4.0;
                cells[j] = value;
                let diff = (value - mid[j]).abs();
                if diff > residual {
                    residual = diff;
                }
            }
            residual
        })
        .reduce(|| 0.0, f32::max)
}

/// Apply the stencil to the owned interior rows of a worker slice
///
/// Reads the previous generation (halos included) and returns the local residual.
/// Callers snapshot the slice first so the previous generation holds the values after
/// heat reassertion and halo exchange.
pub fn update_slice(slice: &mut LocalSlice) -> f32 {
    let partition = *slice.partition();
    let global = partition.interior_rows();
    let local = if global.is_empty() {
        0..0
    } else {
        partition.local_row(global.start)..partition.local_row(global.end - 1) + 1
    };
    let columns = partition.columns;
    let (current, previous) = slice.generations_mut();
    relax(current, previous, columns, local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Partition;

    #[test]
    fn test_average_of_four_neighbours() {
        let columns = 3;
        let mut previous = vec![0.0; 9];
        previous[1] = 4.0; // up
        previous[7] = 8.0; // down
        previous[3] = 12.0; // left
        previous[5] = 16.0; // right
        previous[4] = 100.0; // centre, ignored by the mean
        let mut current = previous.clone();

        let residual = relax(&mut current, &previous, columns, 1..2);
        assert_eq!(current[4], 10.0);
        assert_eq!(residual, 90.0);
    }

    #[test]
    fn test_borders_untouched() {
        let columns = 5;
        let previous: Vec<f32> = (0..25).map(|v| v as f32).collect();
        let mut current = vec![-1.0; 25];
        relax(&mut current, &previous, columns, 1..4);

        for j in 0..columns {
            assert_eq!(current[j], -1.0, "top row");
            assert_eq!(current[4 * columns + j], -1.0, "bottom row");
        }
        for i in 0..5 {
            assert_eq!(current[i * columns], -1.0, "left column");
            assert_eq!(current[i * columns + 4], -1.0, "right column");
        }
        // A linear ramp is a fixed point of the mean
        assert_eq!(current[2 * columns + 2], previous[2 * columns + 2]);
    }

    #[test]
    fn test_residual_is_max_abs_change() {
        let columns = 4;
        let mut previous = vec![0.0; 16];
        previous[5] = -8.0;
        previous[10] = 2.0;
        let mut current = previous.clone();
        let residual = relax(&mut current, &previous, columns, 1..3);

        let mut expected = 0.0_f32;
        for i in 1..3 {
            for j in 1..3 {
                let idx = i * columns + j;
                expected = expected.max((current[idx] - previous[idx]).abs());
            }
        }
        assert_eq!(residual, expected);
        assert_eq!(residual, 8.0);
    }

    #[test]
    fn test_narrow_grid_is_noop() {
        let mut current = vec![1.0; 6];
        let previous = vec![2.0; 6];
        assert_eq!(relax(&mut current, &previous, 2, 1..2), 0.0);
        assert!(current.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_update_slice_skips_global_border_row() {
        // Rank 0 of 2 on a 6-row grid owns global rows 0..3; global row 0 is fixed
        let partition = Partition::new(6, 4, 2, 0).unwrap();
        let mut slice = LocalSlice::new(partition).unwrap();
        slice.row_mut(1).fill(50.0); // global row 0
        slice.row_mut(4).fill(40.0); // lower halo (global row 3)
        slice.snapshot();

        let residual = update_slice(&mut slice);
        assert_eq!(slice.row(1), &[50.0; 4]);
        // Global row 1 averages global row 0 above
        assert_eq!(slice.get(2, 1), 12.5);
        // Global row 2 sees the lower halo
        assert_eq!(slice.get(3, 1), 10.0);
        assert_eq!(residual, 12.5);
    }
}
