//! Force-field kernels.
//!
//! A kernel is an immutable square grid of odd side `2 * radius + 1` whose
//! center cell corresponds to distance zero from the node that emits it.
//! Negative values attract, positive values repel.
//!
//! # Overview
//!
//! - [`attraction_field`] - Linear well, strongest at the center
//! - [`repulsion_field`] - Inverse-square hill with an optional center spike
//! - [`bias_fields`] - Board-sized gradients for directed-flow layouts
//!
//! Every builder special-cases distance zero, so radius-zero kernels are valid.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{cell::Cell, grid::Grid};

/// Center value of a repulsion kernel built with `center_spike`.
pub const REPULSION_CENTER_SPIKE: f64 = 1000.0;

/// An immutable square kernel with odd side length `2 * radius + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel<T: Cell> {
    radius: usize,
    grid: Grid<T>,
}

impl<T: Cell> Kernel<T> {
    /// Builds a kernel whose cell at offset `(dx, dy)` from the center is `f(dx, dy)`.
    pub fn from_fn(radius: usize, mut f: impl FnMut(isize, isize) -> T) -> Self {
        let center = radius as isize;
        let grid = Grid::from_fn(2 * radius + 1, |x, y| f(x as isize - center, y as isize - center));
        Self { radius, grid }
    }

    /// Builds a radially symmetric kernel from a function of the distance to the center.
    fn radial(radius: usize, f: impl Fn(f64) -> T) -> Self {
        Self::from_fn(radius, |dx, dy| {
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            f(distance)
        })
    }

    /// Radius of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the kernel, always odd.
    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    /// Value at distance zero.
    pub fn center_value(&self) -> T {
        self.grid[(self.radius, self.radius)]
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }
}

/// Builds an attraction kernel.
///
/// With `energy = trunc(scale * radius)` the kernel is a linear ramp from
/// `-energy` at the center up to zero at `radius` and beyond.
///
/// # Examples
///
/// ```
/// # use qforce_core::field::attraction_field;
/// let kernel = attraction_field::<i32>(10, 5.0);
/// assert_eq!(kernel.dimension(), 21);
/// assert_eq!(kernel.center_value(), -50);
/// ```
pub fn attraction_field<T: Cell>(radius: usize, scale: f64) -> Kernel<T> {
    let energy = (scale * radius as f64).trunc();
    let slope = if radius == 0 {
        0.0
    } else {
        energy / radius as f64
    };
    debug!(radius, scale, energy; "Building attraction field");

    Kernel::radial(radius, |distance| {
        if distance == 0.0 {
            T::truncate_from(-energy)
        } else {
            T::truncate_from((slope * distance - energy).min(0.0))
        }
    })
}

/// Builds a repulsion kernel.
///
/// With `energy = trunc(scale * radius)` a cell at distance `d > 0` holds
/// `trunc(energy / d²) + trunc(0.1 * energy / d)`. The center holds
/// [`REPULSION_CENTER_SPIKE`] when `center_spike` is set, otherwise `energy`.
pub fn repulsion_field<T: Cell>(radius: usize, scale: f64, center_spike: bool) -> Kernel<T> {
    let energy = (scale * radius as f64).trunc();
    let center_energy = if center_spike {
        REPULSION_CENTER_SPIKE
    } else {
        energy
    };
    debug!(radius, scale, energy, center_spike; "Building repulsion field");

    Kernel::radial(radius, |distance| {
        if distance == 0.0 {
            T::truncate_from(center_energy)
        } else {
            let inverse_square = (energy / (distance * distance)).trunc();
            let inverse = (0.1 * (energy / distance)).trunc();
            T::truncate_from(inverse_square + inverse)
        }
    })
}

/// An edge of the board.
///
/// `Top` and `Bottom` are the first and last grid rows; `Left` and `Right`
/// are the first and last grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl BoardEdge {
    /// The edge across the board from this one.
    pub fn opposite(self) -> Self {
        match self {
            BoardEdge::Top => BoardEdge::Bottom,
            BoardEdge::Bottom => BoardEdge::Top,
            BoardEdge::Left => BoardEdge::Right,
            BoardEdge::Right => BoardEdge::Left,
        }
    }

    /// Distance in cells from this edge to cell `(x, y)` on a board of side `dimension`.
    fn distance(self, dimension: usize, x: usize, y: usize) -> usize {
        match self {
            BoardEdge::Top => x,
            BoardEdge::Bottom => dimension - 1 - x,
            BoardEdge::Left => y,
            BoardEdge::Right => dimension - 1 - y,
        }
    }
}

/// Directed-flow mode.
///
/// The named edge is where flow runs to: pure targets gather there and pure
/// sources gather on the opposite edge. The names match external
/// configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectedFlow {
    /// No directional bias (default)
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl DirectedFlow {
    /// The board edge targets are pulled toward, or `None` when disabled.
    pub fn edge(self) -> Option<BoardEdge> {
        match self {
            DirectedFlow::None => None,
            DirectedFlow::Top => Some(BoardEdge::Top),
            DirectedFlow::Bottom => Some(BoardEdge::Bottom),
            DirectedFlow::Left => Some(BoardEdge::Left),
            DirectedFlow::Right => Some(BoardEdge::Right),
        }
    }
}

impl FromStr for DirectedFlow {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err("Unsupported directed flow"),
        }
    }
}

impl From<DirectedFlow> for &'static str {
    fn from(val: DirectedFlow) -> Self {
        match val {
            DirectedFlow::None => "none",
            DirectedFlow::Top => "top",
            DirectedFlow::Bottom => "bottom",
            DirectedFlow::Left => "left",
            DirectedFlow::Right => "right",
        }
    }
}

impl Display for DirectedFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The pair of board-sized fields used in directed-flow mode.
#[derive(Debug, Clone)]
pub struct BiasFields<T: Cell> {
    source: Grid<T>,
    target: Grid<T>,
}

impl<T: Cell> BiasFields<T> {
    /// Field added for nodes that only have outgoing edges.
    pub fn source(&self) -> &Grid<T> {
        &self.source
    }

    /// Field added for nodes that only have incoming edges.
    pub fn target(&self) -> &Grid<T> {
        &self.target
    }
}

/// Builds the source and target bias fields for a board of side `dimension`.
///
/// The target field is a linear well running from `-bias` on `toward` to
/// zero on the opposite edge; the source field is its mirror image.
pub fn bias_fields<T: Cell>(dimension: usize, toward: BoardEdge, bias: f64) -> BiasFields<T> {
    debug!(dimension, edge:? = toward, bias; "Building bias fields");
    BiasFields {
        source: linear_well(dimension, toward.opposite(), bias),
        target: linear_well(dimension, toward, bias),
    }
}

fn linear_well<T: Cell>(dimension: usize, edge: BoardEdge, bias: f64) -> Grid<T> {
    let span = dimension.saturating_sub(1);
    Grid::from_fn(dimension, |x, y| {
        let ratio = if span == 0 {
            0.0
        } else {
            edge.distance(dimension, x, y) as f64 / span as f64
        };
        T::truncate_from(-bias * (1.0 - ratio))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attraction_shape_and_center() {
        for radius in [0, 1, 5, 40] {
            let kernel = attraction_field::<i32>(radius, 5.0);
            assert_eq!(kernel.dimension(), 2 * radius + 1);
            assert_eq!(kernel.grid().dimension(), 2 * radius + 1);
            assert_eq!(kernel.center_value(), -5 * radius as i32);
        }
    }

    #[test]
    fn test_attraction_ramp() {
        let kernel = attraction_field::<i32>(10, 5.0);
        let grid = kernel.grid();
        // energy = 50, slope = 5 per cell
        assert_eq!(grid[(10, 11)], -45);
        assert_eq!(grid[(10, 15)], -25);
        assert_eq!(grid[(10, 20)], 0);
        assert_eq!(grid[(0, 0)], 0);
        assert!(grid.as_slice().iter().all(|v| *v <= 0));
    }

    #[test]
    fn test_attraction_truncates_scale() {
        // 0.02 * 7 = 0.14, truncated energy is zero everywhere
        let kernel = attraction_field::<i16>(7, 0.02);
        assert!(kernel.grid().as_slice().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_repulsion_center_values() {
        let spiked = repulsion_field::<i32>(10, 7.0, true);
        assert_eq!(spiked.dimension(), 21);
        assert_eq!(spiked.center_value(), 1000);

        let flat = repulsion_field::<i32>(10, 7.0, false);
        assert_eq!(flat.center_value(), 70);
    }

    #[test]
    fn test_repulsion_decay() {
        let kernel = repulsion_field::<i32>(10, 7.0, true);
        let grid = kernel.grid();
        // d = 1: 70 + 7
        assert_eq!(grid[(10, 11)], 77);
        // d = 2: 17 + 3
        assert_eq!(grid[(12, 10)], 20);
        // d = 10: 0 + 0
        assert_eq!(grid[(10, 20)], 0);
    }

    #[test]
    fn test_radius_zero_kernels() {
        let attraction = attraction_field::<i32>(0, 3.0);
        assert_eq!(attraction.dimension(), 1);
        assert_eq!(attraction.center_value(), 0);

        let repulsion = repulsion_field::<i32>(0, 3.0, true);
        assert_eq!(repulsion.center_value(), 1000);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let kernel = repulsion_field::<i64>(6, 9.0, true);
        let grid = kernel.grid();
        let d = grid.dimension();
        for x in 0..d {
            for y in 0..d {
                assert_eq!(grid[(x, y)], grid[(y, x)]);
                assert_eq!(grid[(x, y)], grid[(d - 1 - x, y)]);
            }
        }
    }

    #[test]
    fn test_bias_fields_bottom() {
        let fields = bias_fields::<i32>(5, BoardEdge::Bottom, 100.0);
        let target = fields.target();
        let source = fields.source();

        assert_eq!(target.row(4), &[-100; 5]);
        assert_eq!(target.row(2), &[-50; 5]);
        assert_eq!(target.row(0), &[0; 5]);
        assert_eq!(source.row(0), &[-100; 5]);
        assert_eq!(source.row(4), &[0; 5]);
        assert_eq!(target.argmin(), Some((4, 0)));
        assert_eq!(source.argmin(), Some((0, 0)));
    }

    #[test]
    fn test_bias_fields_right() {
        let fields = bias_fields::<i32>(5, BoardEdge::Right, 40.0);
        let target = fields.target();
        for x in 0..5 {
            assert_eq!(target[(x, 4)], -40);
            assert_eq!(target[(x, 0)], 0);
            assert_eq!(fields.source()[(x, 0)], -40);
        }
    }

    #[test]
    fn test_bias_fields_single_cell() {
        let fields = bias_fields::<i16>(1, BoardEdge::Top, 10.0);
        assert_eq!(fields.target()[(0, 0)], -10);
        assert_eq!(fields.source()[(0, 0)], -10);
    }

    #[test]
    fn test_directed_flow_parsing() {
        assert_eq!("left".parse::<DirectedFlow>(), Ok(DirectedFlow::Left));
        assert_eq!(DirectedFlow::None.edge(), None);
        assert_eq!(DirectedFlow::Top.edge(), Some(BoardEdge::Top));
        assert_eq!(DirectedFlow::Right.to_string(), "right");
        assert!("diagonal".parse::<DirectedFlow>().is_err());
    }

    #[test]
    fn test_board_edge_opposite() {
        assert_eq!(BoardEdge::Top.opposite(), BoardEdge::Bottom);
        assert_eq!(BoardEdge::Left.opposite().opposite(), BoardEdge::Left);
    }
}
