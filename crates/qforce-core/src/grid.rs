//! Square grids of integer cells.
//!
//! A [`Grid`] is the storage behind energy boards, scratch buffers, kernels
//! and bias fields. Cells are stored row-major.
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +y (column)
//!     │
//!     │
//!     ▼
//!    +x (row)
//! ```
//!
//! `x` selects the row and `y` the column. Row-major order therefore visits
//! `(0,0), (0,1), .., (0,d-1), (1,0), ..`.

use std::ops::{Index, IndexMut};

use crate::cell::Cell;

/// A square, row-major grid of cells.
///
/// # Examples
///
/// ```
/// # use qforce_core::grid::Grid;
/// let mut grid = Grid::<i32>::zeros(3);
/// grid[(1, 2)] = -5;
///
/// assert_eq!(grid.dimension(), 3);
/// assert_eq!(grid.center(), 1);
/// assert_eq!(grid.argmin(), Some((1, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T: Cell> {
    dimension: usize,
    cells: Vec<T>,
}

impl<T: Cell> Grid<T> {
    /// Creates a `dimension` x `dimension` grid filled with zeros.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![T::zero(); dimension * dimension],
        }
    }

    /// Creates a grid whose cell `(x, y)` is `f(x, y)`.
    pub fn from_fn(dimension: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let cells = (0..dimension)
            .flat_map(|x| (0..dimension).map(move |y| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self { dimension, cells }
    }

    /// Side length of the grid.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Index of the center row and column.
    ///
    /// Only meaningful for odd dimensions, where it is the exact middle.
    pub fn center(&self) -> usize {
        self.dimension / 2
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.dimension && y < self.dimension {
            Some(self.cells[x * self.dimension + y])
        } else {
            None
        }
    }

    /// Borrow row `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is out of bounds.
    pub fn row(&self, x: usize) -> &[T] {
        let start = x * self.dimension;
        &self.cells[start..start + self.dimension]
    }

    /// Mutably borrow row `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is out of bounds.
    pub fn row_mut(&mut self, x: usize) -> &mut [T] {
        let start = x * self.dimension;
        &mut self.cells[start..start + self.dimension]
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Adds `other` element-wise (wrapping).
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn add_assign(&mut self, other: &Grid<T>) {
        self.zip_apply(other, |a, b| a.wrapping_add(&b));
    }

    /// Subtracts `other` element-wise (wrapping).
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn sub_assign(&mut self, other: &Grid<T>) {
        self.zip_apply(other, |a, b| a.wrapping_sub(&b));
    }

    /// Coordinates of the minimum cell.
    ///
    /// Ties resolve to the first cell in row-major order. Returns `None` for
    /// an empty grid.
    pub fn argmin(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .min_by_key(|(_, value)| **value)
            .map(|(index, _)| (index / self.dimension, index % self.dimension))
    }

    fn zip_apply(&mut self, other: &Grid<T>, op: impl Fn(T, T) -> T) {
        assert_eq!(
            self.dimension, other.dimension,
            "grid dimensions must match"
        );
        for (cell, value) in self.cells.iter_mut().zip(&other.cells) {
            *cell = op(*cell, *value);
        }
    }
}

impl<T: Cell> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.dimension && y < self.dimension, "cell out of bounds");
        &self.cells[x * self.dimension + y]
    }
}

impl<T: Cell> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(x < self.dimension && y < self.dimension, "cell out of bounds");
        &mut self.cells[x * self.dimension + y]
    }
}
