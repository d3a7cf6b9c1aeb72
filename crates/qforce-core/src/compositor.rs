//! Boundary-clipped kernel compositing.
//!
//! [`merge`] overlays a [`Kernel`] centered at a (possibly off-board) cell of
//! a larger [`Grid`]. Each of the four sides is clipped independently, so only
//! the in-bounds part of the kernel contributes and no index ever escapes the
//! target grid. There is no wraparound.
//!
//! ```text
//!        kernel window
//!      ┌───────────┐
//!      │   ┌───────┼─────────── grid
//!      │   │ ░░░░░ │
//!      │   │ ░░░░░ │   ░ = cells written
//!      └───┼───────┘
//!          │
//! ```

use std::ops::Range;

use crate::{cell::Cell, field::Kernel, grid::Grid};

/// How kernel values combine with the target cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Add,
    Subtract,
}

impl Blend {
    fn apply<T: Cell>(self, target: T, value: T) -> T {
        match self {
            Blend::Add => target.wrapping_add(&value),
            Blend::Subtract => target.wrapping_sub(&value),
        }
    }
}

/// Overlays `kernel` centered at `(x, y)` onto `grid`.
///
/// `Blend::Subtract` with the same arguments is the exact inverse of
/// `Blend::Add`. A kernel lying entirely outside the grid is a no-op.
///
/// # Examples
///
/// ```
/// # use qforce_core::{compositor::{merge, Blend}, field::repulsion_field, grid::Grid};
/// let kernel = repulsion_field::<i32>(2, 4.0, true);
/// let mut board = Grid::zeros(5);
///
/// merge(&kernel, &mut board, 0, 0, Blend::Add);
/// assert_eq!(board[(0, 0)], 1000);
/// assert_eq!(board[(4, 4)], 0);
///
/// merge(&kernel, &mut board, 0, 0, Blend::Subtract);
/// assert!(board.as_slice().iter().all(|v| *v == 0));
/// ```
pub fn merge<T: Cell>(kernel: &Kernel<T>, grid: &mut Grid<T>, x: isize, y: isize, blend: Blend) {
    let radius = kernel.radius();
    let bound = grid.dimension();
    let (Some((rows, source_row)), Some((cols, source_col))) = (
        clip_axis(x, radius, bound),
        clip_axis(y, radius, bound),
    ) else {
        return;
    };

    let source = kernel.grid();
    let width = cols.len();
    for (offset, target_row) in rows.enumerate() {
        let values = &source.row(source_row + offset)[source_col..source_col + width];
        let cells = &mut grid.row_mut(target_row)[cols.clone()];
        for (cell, value) in cells.iter_mut().zip(values) {
            *cell = blend.apply(*cell, *value);
        }
    }
}

/// Clips the span `center - radius ..= center + radius` to `0..bound`.
///
/// Returns the in-bounds target range and the matching start index inside
/// the kernel, or `None` when nothing overlaps.
fn clip_axis(center: isize, radius: usize, bound: usize) -> Option<(Range<usize>, usize)> {
    let radius = isize::try_from(radius).ok()?;
    let bound = isize::try_from(bound).ok()?;
    let start = center.saturating_sub(radius);
    let end = center.saturating_add(radius);

    let clipped_start = start.max(0);
    let clipped_end = end.min(bound - 1);
    if clipped_start > clipped_end {
        return None;
    }

    let source_start = (clipped_start - start) as usize;
    Some((clipped_start as usize..clipped_end as usize + 1, source_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{attraction_field, repulsion_field};

    fn ramp_kernel(radius: usize) -> Kernel<i32> {
        Kernel::from_fn(radius, |dx, dy| (dx * 10 + dy) as i32)
    }

    #[test]
    fn test_merge_centered() {
        let kernel = ramp_kernel(1);
        let mut grid = Grid::<i32>::zeros(5);
        merge(&kernel, &mut grid, 2, 2, Blend::Add);

        assert_eq!(grid[(1, 1)], -11);
        assert_eq!(grid[(2, 2)], 0);
        assert_eq!(grid[(3, 3)], 11);
        assert_eq!(grid[(0, 0)], 0);
        assert_eq!(grid[(4, 4)], 0);
    }

    #[test]
    fn test_merge_clips_top_left() {
        let kernel = ramp_kernel(2);
        let mut grid = Grid::<i32>::zeros(4);
        merge(&kernel, &mut grid, 0, 1, Blend::Add);

        // cell (0, 0) sees kernel offset (0, -1)
        assert_eq!(grid[(0, 0)], -1);
        assert_eq!(grid[(2, 3)], 22);
        assert_eq!(grid[(3, 0)], 0);
    }

    #[test]
    fn test_merge_clips_bottom_right() {
        let kernel = ramp_kernel(2);
        let mut grid = Grid::<i32>::zeros(4);
        merge(&kernel, &mut grid, 3, 3, Blend::Add);

        assert_eq!(grid[(3, 3)], 0);
        assert_eq!(grid[(1, 1)], -22);
        assert_eq!(grid[(2, 3)], -10);
        assert_eq!(grid[(0, 3)], 0);
    }

    #[test]
    fn test_merge_kernel_larger_than_grid() {
        let kernel = repulsion_field::<i32>(10, 7.0, true);
        let mut grid = Grid::<i32>::zeros(3);
        merge(&kernel, &mut grid, 1, 1, Blend::Add);

        assert_eq!(grid[(1, 1)], 1000);
        assert_eq!(grid[(0, 1)], 77);
        assert_eq!(grid[(2, 1)], 77);
    }

    #[test]
    fn test_merge_fully_outside_is_noop() {
        let kernel = attraction_field::<i32>(2, 5.0);
        let mut grid = Grid::<i32>::zeros(5);
        merge(&kernel, &mut grid, -10, 2, Blend::Add);
        merge(&kernel, &mut grid, 2, 50, Blend::Add);
        assert!(grid.as_slice().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_merge_partially_outside() {
        let kernel = ramp_kernel(1);
        let mut grid = Grid::<i32>::zeros(3);
        merge(&kernel, &mut grid, -1, 0, Blend::Add);

        // only the bottom kernel row lands on grid row 0
        assert_eq!(grid.row(0), &[10, 11, 0]);
        assert_eq!(grid.row(1), &[0, 0, 0]);
    }

    #[test]
    fn test_subtract_is_inverse() {
        let kernel = repulsion_field::<i16>(4, 9.0, true);
        let mut grid = Grid::<i16>::from_fn(7, |x, y| (x * 7 + y) as i16);
        let original = grid.clone();

        merge(&kernel, &mut grid, 6, 1, Blend::Add);
        assert_ne!(grid, original);
        merge(&kernel, &mut grid, 6, 1, Blend::Subtract);
        assert_eq!(grid, original);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn kernel_strategy() -> impl Strategy<Value = Kernel<i16>> {
        (0usize..6).prop_flat_map(|radius| {
            let side = 2 * radius + 1;
            prop::collection::vec(any::<i16>(), side * side).prop_map(move |values| {
                Kernel::from_fn(radius, |dx, dy| {
                    let r = radius as isize;
                    values[((dx + r) as usize) * side + (dy + r) as usize]
                })
            })
        })
    }

    fn grid_strategy() -> impl Strategy<Value = Grid<i16>> {
        (1usize..12).prop_flat_map(|dimension| {
            prop::collection::vec(any::<i16>(), dimension * dimension)
                .prop_map(move |values| Grid::from_fn(dimension, |x, y| values[x * dimension + y]))
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Subtracting right after adding restores the grid exactly, wherever the kernel lands.
    fn check_subtract_restores(
        kernel: Kernel<i16>,
        mut grid: Grid<i16>,
        x: isize,
        y: isize,
    ) -> Result<(), TestCaseError> {
        let original = grid.clone();
        merge(&kernel, &mut grid, x, y, Blend::Add);
        merge(&kernel, &mut grid, x, y, Blend::Subtract);
        prop_assert_eq!(grid, original);
        Ok(())
    }

    /// Cells farther than the kernel radius from the center are never touched.
    fn check_writes_stay_in_window(
        kernel: Kernel<i16>,
        grid: Grid<i16>,
        x: isize,
        y: isize,
    ) -> Result<(), TestCaseError> {
        let mut merged = grid.clone();
        merge(&kernel, &mut merged, x, y, Blend::Add);

        let radius = kernel.radius() as isize;
        for gx in 0..grid.dimension() {
            for gy in 0..grid.dimension() {
                let outside = (gx as isize - x).abs() > radius || (gy as isize - y).abs() > radius;
                if outside {
                    prop_assert_eq!(merged[(gx, gy)], grid[(gx, gy)]);
                }
            }
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn subtract_restores(kernel in kernel_strategy(), grid in grid_strategy(), x in -20isize..20, y in -20isize..20) {
            check_subtract_restores(kernel, grid, x, y)?;
        }

        #[test]
        fn writes_stay_in_window(kernel in kernel_strategy(), grid in grid_strategy(), x in -20isize..20, y in -20isize..20) {
            check_writes_stay_in_window(kernel, grid, x, y)?;
        }
    }
}
