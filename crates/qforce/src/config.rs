//! Configuration types for qforce layouts.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file; every field falls back to its default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and output settings.
//! - [`LayoutConfig`] - Board size, kernel parameters, degree tiers, placement and flow.
//! - [`OutputConfig`] - Coordinate scale and JSON formatting.
//!
//! # Example
//!
//! ```
//! # use qforce::config::{AppConfig, LayoutConfig};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().rounds(), 10);
//!
//! let layout = LayoutConfig::default().with_rounds(3).with_seed(Some(9));
//! assert_eq!(layout.rounds(), 3);
//! ```

use serde::Deserialize;

use qforce_core::{cell::CellWidth, field::DirectedFlow};

use crate::placement::InitialPlacement;

/// Coordinate scale used when neither configuration nor input provides one.
pub const DEFAULT_NODE_SIZE: f64 = 40.0;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, output: OutputConfig) -> Self {
        Self { layout, output }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// One degree tier: nodes with `degree <= max_degree` pull their neighbors
/// with an attraction kernel scaled by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AttractionTier {
    max_degree: usize,
    multiplier: f64,
}

impl AttractionTier {
    pub fn new(max_degree: usize, multiplier: f64) -> Self {
        Self {
            max_degree,
            multiplier,
        }
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// Layout engine parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of relaxation sweeps over all nodes.
    rounds: usize,
    /// Board cells per node; the board radius is `round(sqrt(nodes * sparsity))`.
    sparsity: f64,
    /// Radius of the repulsion kernel.
    r_radius: usize,
    /// Scale of the repulsion kernel.
    r_scale: f64,
    /// Radius of the attraction kernels.
    a_radius: usize,
    /// Base scale of the attraction kernels, multiplied per tier.
    a_scale: f64,
    /// Degree tiers, in any order.
    attraction_tiers: Vec<AttractionTier>,
    /// Multiplier for degrees above every tier bound.
    fallback_multiplier: f64,
    /// Scale of the static attractor at the board center.
    center_attractor_scale: f64,
    initialize_coordinates: InitialPlacement,
    directed_flow: DirectedFlow,
    directed_flow_bias: f64,
    cell_width: CellWidth,
    /// Seed for random placement; a fresh seed is drawn when unset.
    seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            sparsity: 30.0,
            r_radius: 10,
            r_scale: 7.0,
            a_radius: 40,
            a_scale: 5.0,
            attraction_tiers: vec![AttractionTier::new(1, 10.0), AttractionTier::new(4, 5.0)],
            fallback_multiplier: 1.0,
            center_attractor_scale: 0.02,
            initialize_coordinates: InitialPlacement::default(),
            directed_flow: DirectedFlow::default(),
            directed_flow_bias: 100.0,
            cell_width: CellWidth::default(),
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn sparsity(&self) -> f64 {
        self.sparsity
    }

    pub fn r_radius(&self) -> usize {
        self.r_radius
    }

    pub fn r_scale(&self) -> f64 {
        self.r_scale
    }

    pub fn a_radius(&self) -> usize {
        self.a_radius
    }

    pub fn a_scale(&self) -> f64 {
        self.a_scale
    }

    pub fn attraction_tiers(&self) -> &[AttractionTier] {
        &self.attraction_tiers
    }

    pub fn fallback_multiplier(&self) -> f64 {
        self.fallback_multiplier
    }

    pub fn center_attractor_scale(&self) -> f64 {
        self.center_attractor_scale
    }

    pub fn initialize_coordinates(&self) -> InitialPlacement {
        self.initialize_coordinates
    }

    pub fn directed_flow(&self) -> DirectedFlow {
        self.directed_flow
    }

    pub fn directed_flow_bias(&self) -> f64 {
        self.directed_flow_bias
    }

    pub fn cell_width(&self) -> CellWidth {
        self.cell_width
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_sparsity(mut self, sparsity: f64) -> Self {
        self.sparsity = sparsity;
        self
    }

    pub fn with_repulsion(mut self, radius: usize, scale: f64) -> Self {
        self.r_radius = radius;
        self.r_scale = scale;
        self
    }

    pub fn with_attraction(mut self, radius: usize, scale: f64) -> Self {
        self.a_radius = radius;
        self.a_scale = scale;
        self
    }

    pub fn with_attraction_tiers(mut self, tiers: Vec<AttractionTier>, fallback: f64) -> Self {
        self.attraction_tiers = tiers;
        self.fallback_multiplier = fallback;
        self
    }

    pub fn with_center_attractor_scale(mut self, scale: f64) -> Self {
        self.center_attractor_scale = scale;
        self
    }

    pub fn with_initialize_coordinates(mut self, placement: InitialPlacement) -> Self {
        self.initialize_coordinates = placement;
        self
    }

    pub fn with_directed_flow(mut self, flow: DirectedFlow, bias: f64) -> Self {
        self.directed_flow = flow;
        self.directed_flow_bias = bias;
        self
    }

    pub fn with_cell_width(mut self, cell_width: CellWidth) -> Self {
        self.cell_width = cell_width;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Output formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Explicit coordinate scale; beats the hint found in the input.
    node_size: Option<f64>,
    /// Pretty-print the JSON output.
    pretty: bool,
}

impl OutputConfig {
    pub fn new(node_size: Option<f64>, pretty: bool) -> Self {
        Self { node_size, pretty }
    }

    pub fn node_size(&self) -> Option<f64> {
        self.node_size
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Resolves the coordinate scale: the configured size, then `hint`, then
    /// [`DEFAULT_NODE_SIZE`].
    pub fn resolve_node_size(&self, hint: Option<f64>) -> f64 {
        self.node_size.or(hint).unwrap_or(DEFAULT_NODE_SIZE)
    }
}
