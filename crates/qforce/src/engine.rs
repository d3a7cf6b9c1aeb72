//! The relaxation-driven layout engine.
//!
//! An [`Engine`] owns the graph, the energy board and a scratch buffer of the
//! same size. Construction sizes the board from the node count, drops a
//! static attractor on its center, runs the initial placement and seeds the
//! board with one repulsion kernel per node. Each relaxation step then moves
//! a single node to the lowest-energy cell given everybody else's position.
//!
//! # Relaxation step
//!
//! For node `n` at cell `p`:
//!
//! 1. subtract `n`'s repulsion at `p` from the board
//! 2. clear the scratch buffer
//! 3. add `n`'s tier kernel into scratch at every neighbor's cell
//! 4. in directed-flow mode, add the target (or source) bias to scratch
//! 5. add scratch to the board
//! 6. move `n` to the first minimum cell of the board
//! 7. add `n`'s repulsion at its new cell
//! 8. subtract scratch from the board
//!
//! Between steps the board holds exactly the center attractor plus one
//! repulsion kernel per node.

use log::{debug, info, trace};
use rand::{SeedableRng, rngs::StdRng};

use qforce_core::{
    cell::Cell,
    compositor::{Blend, merge},
    field::{BiasFields, Kernel, attraction_field, bias_fields, repulsion_field},
    grid::Grid,
};

use crate::{
    config::{AttractionTier, LayoutConfig},
    error::LayoutError,
    graph::{DegreeOrder, Graph, GridPoint, LayoutRecord, NodeIndex},
};

/// An attraction kernel shared by all nodes up to a degree bound.
#[derive(Debug, Clone)]
pub struct Tier<T: Cell> {
    max_degree: usize,
    kernel: Kernel<T>,
}

impl<T: Cell> Tier<T> {
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }
}

/// Degree-tiered attraction kernels.
///
/// Low-degree nodes pull harder, so leaves hug their hub while hubs spread
/// out under repulsion.
#[derive(Debug, Clone)]
pub struct AttractionTiers<T: Cell> {
    tiers: Vec<Tier<T>>,
    fallback: Kernel<T>,
}

impl<T: Cell> AttractionTiers<T> {
    /// Builds one kernel of `radius` per tier, scaled by `scale * multiplier`.
    pub fn new(radius: usize, scale: f64, tiers: &[AttractionTier], fallback_multiplier: f64) -> Self {
        let mut tiers: Vec<Tier<T>> = tiers
            .iter()
            .map(|tier| Tier {
                max_degree: tier.max_degree(),
                kernel: attraction_field(radius, scale * tier.multiplier()),
            })
            .collect();
        tiers.sort_by_key(|tier| tier.max_degree);

        Self {
            tiers,
            fallback: attraction_field(radius, scale * fallback_multiplier),
        }
    }

    /// The kernel of the first tier whose bound admits `degree`.
    pub fn kernel_for(&self, degree: usize) -> &Kernel<T> {
        self.tiers
            .iter()
            .find(|tier| degree <= tier.max_degree)
            .map_or(&self.fallback, |tier| &tier.kernel)
    }

    pub fn tiers(&self) -> &[Tier<T>] {
        &self.tiers
    }
}

/// Board radius for `nodes` nodes at the given sparsity.
///
/// Halfway values round to the nearest even radius.
pub fn board_radius(nodes: usize, sparsity: f64) -> usize {
    (nodes as f64 * sparsity).sqrt().round_ties_even() as usize
}

/// Grid-quantized force-field layout engine over cells of type `T`.
#[derive(Debug)]
pub struct Engine<T: Cell> {
    graph: Graph,
    board: Grid<T>,
    scratch: Grid<T>,
    repulsion: Kernel<T>,
    attraction: AttractionTiers<T>,
    bias: Option<BiasFields<T>>,
    order: Vec<NodeIndex>,
}

impl<T: Cell> Engine<T> {
    /// Sizes the board, places every node and seeds the repulsion field.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the placement strategy cannot fit the
    /// nodes on the board.
    pub fn new(mut graph: Graph, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let radius = board_radius(graph.node_count(), config.sparsity());
        let dimension = 2 * radius + 1;

        let mut board = Grid::zeros(dimension);
        let center = board.center();
        let center_radius = (2.0 * (center * center) as f64).sqrt() as usize;
        let center_attractor: Kernel<T> =
            attraction_field(center_radius, config.center_attractor_scale());
        merge(
            &center_attractor,
            &mut board,
            center as isize,
            center as isize,
            Blend::Add,
        );

        let mut rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        config
            .initialize_coordinates()
            .apply(&mut graph, dimension, &mut rng)?;

        let repulsion = repulsion_field(config.r_radius(), config.r_scale(), true);
        let attraction = AttractionTiers::new(
            config.a_radius(),
            config.a_scale(),
            config.attraction_tiers(),
            config.fallback_multiplier(),
        );
        let bias = config
            .directed_flow()
            .edge()
            .map(|edge| bias_fields(dimension, edge, config.directed_flow_bias()));

        for (_, node) in graph.nodes() {
            let position = node
                .position()
                .ok_or(LayoutError::Unplaced { node: node.id() })?;
            merge(
                &repulsion,
                &mut board,
                position.x() as isize,
                position.y() as isize,
                Blend::Add,
            );
        }

        let order = graph.sorted_nodes(DegreeOrder::Descending);

        info!(
            nodes = graph.node_count(),
            dimension,
            placement:% = config.initialize_coordinates(),
            flow:% = config.directed_flow();
            "Layout engine initialized"
        );

        Ok(Self {
            graph,
            scratch: Grid::zeros(dimension),
            board,
            repulsion,
            attraction,
            bias,
            order,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The energy board between relaxation steps.
    pub fn board(&self) -> &Grid<T> {
        &self.board
    }

    pub fn dimension(&self) -> usize {
        self.board.dimension()
    }

    /// Moves one node to the lowest-energy cell of the board.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unplaced`] if the node or one of its neighbors
    /// has no position, and [`LayoutError::EmptyBoard`] for a board without
    /// cells.
    pub fn relax_node(&mut self, index: NodeIndex) -> Result<(), LayoutError> {
        let node = self.graph.node(index);
        let id = node.id();
        let position = node.position().ok_or(LayoutError::Unplaced { node: id })?;
        let neighbors = node
            .neighbors()
            .map(|neighbor| {
                let neighbor = self.graph.node(neighbor);
                neighbor.position().ok_or(LayoutError::Unplaced {
                    node: neighbor.id(),
                })
            })
            .collect::<Result<Vec<GridPoint>, _>>()?;
        let kernel = self.attraction.kernel_for(node.degree());
        let pulled_to_target = node.degree() > 0 && node.out_degree() == 0;
        let pulled_to_source = node.degree() > 0 && node.in_degree() == 0;

        merge(
            &self.repulsion,
            &mut self.board,
            position.x() as isize,
            position.y() as isize,
            Blend::Subtract,
        );

        self.scratch.fill(T::zero());
        for neighbor in &neighbors {
            merge(
                kernel,
                &mut self.scratch,
                neighbor.x() as isize,
                neighbor.y() as isize,
                Blend::Add,
            );
        }
        if let Some(bias) = &self.bias {
            if pulled_to_target {
                self.scratch.add_assign(bias.target());
            }
            if pulled_to_source {
                self.scratch.add_assign(bias.source());
            }
        }

        self.board.add_assign(&self.scratch);
        let (x, y) = self.board.argmin().ok_or(LayoutError::EmptyBoard)?;
        let target = GridPoint::new(x, y);
        trace!(node = id, from_x = position.x(), from_y = position.y(), x, y; "Relaxed node");

        self.graph.set_position(index, target);
        merge(
            &self.repulsion,
            &mut self.board,
            x as isize,
            y as isize,
            Blend::Add,
        );
        self.board.sub_assign(&self.scratch);
        Ok(())
    }

    /// Relaxes every node once, highest degree first.
    pub fn relax_round(&mut self) -> Result<(), LayoutError> {
        for position in 0..self.order.len() {
            self.relax_node(self.order[position])?;
        }
        Ok(())
    }

    /// Runs `rounds` relaxation rounds and returns the scaled coordinates.
    pub fn run(mut self, rounds: usize, node_size: f64) -> Result<Vec<LayoutRecord>, LayoutError> {
        for round in 0..rounds {
            self.relax_round()?;
            debug!(round = round + 1, rounds; "Relaxation round complete");
        }
        self.graph.layout_records(node_size)
    }
}
