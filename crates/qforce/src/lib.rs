//! QForce - Grid-quantized force-field graph layout.
//!
//! Nodes live on the cells of a square integer energy board. Each node emits
//! a repulsion kernel, neighbors pull each other with degree-tiered
//! attraction kernels, and relaxation repeatedly moves every node to the
//! lowest-energy cell. Input networks are read from CX documents.

pub mod config;
pub mod engine;
pub mod graph;
pub mod placement;

mod error;

pub use qforce_core::{cell, compositor, field, grid};
pub use qforce_cx::Network;

pub use error::{LayoutError, QforceError};

use std::io::Read;

use log::{debug, info};

use qforce_core::cell::CellWidth;

use config::AppConfig;
use engine::Engine;
use graph::{Graph, LayoutRecord};

/// Builder for reading networks and laying them out.
///
/// # Examples
///
/// ```rust
/// use qforce::{LayoutBuilder, config::AppConfig};
///
/// let source = r#"[{"edges": [{"s": 1, "t": 2}, {"s": 2, "t": 3}]}]"#;
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let network = builder.parse(source).expect("Failed to parse");
/// let records = builder.layout(&network).expect("Failed to lay out");
///
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[0].node, 1);
/// ```
#[derive(Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder lays out with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a CX document.
    ///
    /// # Errors
    ///
    /// Returns `QforceError::Network` for malformed documents.
    pub fn parse(&self, source: &str) -> Result<Network, QforceError> {
        info!("Parsing network");
        let network = qforce_cx::parse(source)?;
        debug!(name:? = network.name(); "Network parsed successfully");
        Ok(network)
    }

    /// Parse a CX document from a reader.
    ///
    /// # Errors
    ///
    /// Returns `QforceError::Network` for malformed or unreadable documents.
    pub fn read(&self, reader: impl Read) -> Result<Network, QforceError> {
        info!("Reading network");
        Ok(qforce_cx::from_reader(reader)?)
    }

    /// Build the layout graph of a network.
    ///
    /// Edges come first, in document order; declared nodes without edges are
    /// appended afterwards as isolated nodes.
    pub fn graph(&self, network: &Network) -> Graph {
        let mut graph = Graph::from_edges(network.edges().iter().copied());
        let connected = graph.node_count();
        for id in network.node_ids() {
            graph.add_node(*id);
        }
        debug!(
            nodes = graph.node_count(),
            isolated = graph.node_count() - connected;
            "Layout graph built"
        );
        graph
    }

    /// Coordinate scale for `network`: configured size, then the network's
    /// own hint, then [`config::DEFAULT_NODE_SIZE`].
    pub fn node_size(&self, network: &Network) -> f64 {
        self.config.output().resolve_node_size(network.node_size())
    }

    /// Lay out a parsed network.
    ///
    /// # Errors
    ///
    /// Returns `QforceError::Layout` if the nodes cannot be placed.
    pub fn layout(&self, network: &Network) -> Result<Vec<LayoutRecord>, QforceError> {
        self.layout_graph(self.graph(network), self.node_size(network))
    }

    /// Lay out a graph, scaling grid cells by `node_size`.
    ///
    /// # Errors
    ///
    /// Returns `QforceError::Layout` if the nodes cannot be placed.
    pub fn layout_graph(
        &self,
        graph: Graph,
        node_size: f64,
    ) -> Result<Vec<LayoutRecord>, QforceError> {
        let layout = self.config.layout();
        info!(
            nodes = graph.node_count(),
            rounds = layout.rounds(),
            cell_width:% = layout.cell_width(),
            node_size;
            "Computing layout"
        );

        let records = match layout.cell_width() {
            CellWidth::I16 => Engine::<i16>::new(graph, layout)?.run(layout.rounds(), node_size),
            CellWidth::I32 => Engine::<i32>::new(graph, layout)?.run(layout.rounds(), node_size),
            CellWidth::I64 => Engine::<i64>::new(graph, layout)?.run(layout.rounds(), node_size),
        }?;

        info!(records = records.len(); "Layout computed");
        Ok(records)
    }
}
