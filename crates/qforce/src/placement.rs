//! Initial placement strategies.
//!
//! A strategy assigns every node of a [`Graph`] a distinct (or, for
//! [`InitialPlacement::Center`], shared) cell of a square board before the
//! first relaxation round.

use std::{
    collections::HashSet,
    fmt::{self, Display},
    str::FromStr,
};

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::LayoutError,
    graph::{DegreeOrder, Graph, GridPoint},
};

/// Strategy for the coordinates nodes start from.
///
/// The names match external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPlacement {
    /// Every node on the board center
    Center,
    /// Distinct uniformly random cells in the central region
    Random,
    /// Successive cells of an outward spiral, lowest degree first (default)
    #[default]
    Spiral,
}

impl InitialPlacement {
    /// Places every node of `graph` on a board of side `dimension`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PlacementCapacity`] when random placement has
    /// fewer candidate cells than nodes, and [`LayoutError::OffBoard`] when a
    /// spiral cell falls outside the board.
    pub fn apply<R: Rng + ?Sized>(
        self,
        graph: &mut Graph,
        dimension: usize,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        debug!(strategy:% = self, nodes = graph.node_count(), dimension; "Placing nodes");
        match self {
            InitialPlacement::Center => {
                graph.place_at_center(dimension);
                Ok(())
            }
            InitialPlacement::Random => graph.place_randomly(dimension, rng),
            InitialPlacement::Spiral => graph.place_in_spiral(dimension),
        }
    }
}

impl FromStr for InitialPlacement {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "random" => Ok(Self::Random),
            "spiral" => Ok(Self::Spiral),
            _ => Err("Unsupported initial placement"),
        }
    }
}

impl From<InitialPlacement> for &'static str {
    fn from(val: InitialPlacement) -> Self {
        match val {
            InitialPlacement::Center => "center",
            InitialPlacement::Random => "random",
            InitialPlacement::Spiral => "spiral",
        }
    }
}

impl Display for InitialPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

impl Graph {
    /// Puts every node on the center cell.
    pub fn place_at_center(&mut self, dimension: usize) {
        let center = dimension / 2;
        for index in self.sorted_nodes(DegreeOrder::Ascending) {
            self.set_position(index, GridPoint::new(center, center));
        }
    }

    /// Puts every node on a distinct random cell of the central region.
    ///
    /// The region spans `round(d / 4)` to `d - round(d / 4)` inclusive on both
    /// axes, clamped to the board. Cells are drawn until an unused one turns up.
    pub fn place_randomly<R: Rng + ?Sized>(
        &mut self,
        dimension: usize,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        if dimension == 0 {
            return Err(LayoutError::EmptyBoard);
        }
        let margin = (dimension as f64 / 4.0).round() as usize;
        let low = margin.min(dimension - 1);
        let high = (dimension - margin).clamp(low, dimension - 1);
        let side = high - low + 1;

        let nodes = self.node_count();
        if side * side < nodes {
            return Err(LayoutError::PlacementCapacity {
                nodes,
                cells: side * side,
            });
        }

        let mut used = HashSet::with_capacity(nodes);
        for index in self.sorted_nodes(DegreeOrder::Ascending) {
            let point = loop {
                let candidate = GridPoint::new(
                    rng.random_range(low..=high),
                    rng.random_range(low..=high),
                );
                if used.insert(candidate) {
                    break candidate;
                }
            };
            trace!(node = self.node(index).id(), x = point.x(), y = point.y(); "Random cell");
            self.set_position(index, point);
        }
        Ok(())
    }

    /// Walks an outward spiral from the center, giving each node (lowest
    /// degree first) the next cell.
    pub fn place_in_spiral(&mut self, dimension: usize) -> Result<(), LayoutError> {
        let order = self.sorted_nodes(DegreeOrder::Ascending);
        let center = (dimension / 2) as isize;
        let cells = spiral((center, center), order.len());

        for (index, (x, y)) in order.into_iter().zip(cells) {
            let on_board = 0..dimension as isize;
            if !on_board.contains(&x) || !on_board.contains(&y) {
                return Err(LayoutError::OffBoard {
                    node: self.node(index).id(),
                    x,
                    y,
                    dimension,
                });
            }
            self.set_position(index, GridPoint::new(x as usize, y as usize));
        }
        Ok(())
    }
}

/// The first `count` cells of a rectangular spiral around `start`.
///
/// Runs alternate between the x and y axes. Both axes start heading in the
/// positive direction and flip after every run; run length grows by one
/// after each x/y pair, starting from zero. The cells are pairwise distinct.
///
/// ```
/// # use qforce::placement::spiral;
/// let cells = spiral((0, 0), 5);
/// assert_eq!(cells, vec![(0, 0), (-1, 0), (-1, -1), (0, -1), (1, -1)]);
/// ```
pub fn spiral(start: (isize, isize), count: usize) -> Vec<(isize, isize)> {
    let mut cells = Vec::with_capacity(count);
    if count == 0 {
        return cells;
    }

    let (mut x, mut y) = start;
    cells.push((x, y));
    let (mut x_step, mut y_step) = (1, 1);
    let mut run = 0;

    loop {
        for _ in 0..run {
            x += x_step;
            cells.push((x, y));
            if cells.len() == count {
                return cells;
            }
        }
        x_step = -x_step;

        for _ in 0..run {
            y += y_step;
            cells.push((x, y));
            if cells.len() == count {
                return cells;
            }
        }
        y_step = -y_step;

        run += 1;
    }
}
