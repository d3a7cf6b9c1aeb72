//! Graph model for layout.
//!
//! Node records live in an arena addressed by [`NodeIndex`]; adjacency,
//! incoming and outgoing sets store arena indices. The arena keeps encounter
//! order: a node is appended the first time an edge (or [`Graph::add_node`])
//! mentions it.
//!
//! # Directions
//!
//! Edges are directed for the in/out statistics used by directed-flow
//! layouts, but adjacency and degree are undirected. Duplicate edges are
//! idempotent and a self-loop makes a node its own neighbor.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap},
};

use log::debug;
use serde::Serialize;

use crate::error::LayoutError;

/// External node identifier, as found in the input network.
pub type NodeId = i64;

/// Index of a node record in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

/// A cell on the energy board: `x` is the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    x: usize,
    y: usize,
}

impl GridPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> usize {
        self.x
    }

    pub fn y(self) -> usize {
        self.y
    }
}

/// Per-node adjacency, direction statistics and grid position.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    id: NodeId,
    adjacent: BTreeSet<NodeIndex>,
    incoming: BTreeSet<NodeIndex>,
    outgoing: BTreeSet<NodeIndex>,
    position: Option<GridPoint>,
}

impl NodeRecord {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            adjacent: BTreeSet::new(),
            incoming: BTreeSet::new(),
            outgoing: BTreeSet::new(),
            position: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Number of distinct neighbors, ignoring direction.
    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    /// Number of distinct nodes with an edge into this one.
    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    /// Number of distinct nodes this one has an edge to.
    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.adjacent.iter().copied()
    }

    /// Current grid position, `None` until a placement strategy has run.
    pub fn position(&self) -> Option<GridPoint> {
        self.position
    }
}

/// Sort direction for [`Graph::sorted_nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeOrder {
    Ascending,
    Descending,
}

/// One output coordinate record.
///
/// Serializes as `{"node": id, "x": x, "y": y}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRecord {
    pub node: NodeId,
    pub x: i64,
    pub y: i64,
}

/// Node arena built from an edge list.
///
/// # Examples
///
/// ```
/// # use qforce::graph::{DegreeOrder, Graph};
/// let graph = Graph::from_edges([(1, 2), (1, 3), (2, 3), (3, 4)]);
///
/// assert_eq!(graph.node_count(), 4);
/// let degrees: Vec<usize> = graph
///     .sorted_nodes(DegreeOrder::Descending)
///     .into_iter()
///     .map(|index| graph.node(index).degree())
///     .collect();
/// assert_eq!(degrees, vec![3, 2, 2, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<NodeRecord>,
    indices: HashMap<NodeId, NodeIndex>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(source, target)` pairs, in order.
    pub fn from_edges(edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut graph = Self::new();
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        debug!(nodes = graph.node_count(); "Graph built from edges");
        graph
    }

    /// Adds a directed edge, registering unseen endpoints (source first).
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) {
        let source_index = self.add_node(source);
        let target_index = self.add_node(target);

        let source_node = &mut self.nodes[source_index.0];
        source_node.adjacent.insert(target_index);
        source_node.outgoing.insert(target_index);

        let target_node = &mut self.nodes[target_index.0];
        target_node.adjacent.insert(source_index);
        target_node.incoming.insert(source_index);
    }

    /// Registers a node if it is not known yet and returns its index.
    ///
    /// Nodes only added this way have degree zero.
    pub fn add_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&index) = self.indices.get(&id) {
            return index;
        }
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(NodeRecord::new(id));
        self.indices.insert(id, index);
        index
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this graph.
    pub fn node(&self, index: NodeIndex) -> &NodeRecord {
        &self.nodes[index.0]
    }

    /// Looks up the arena index of an external node id.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.indices.get(&id).copied()
    }

    /// All nodes in encounter order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NodeRecord)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeIndex(index), node))
    }

    /// All node indices ordered by degree.
    ///
    /// The sort is stable: nodes of equal degree keep encounter order in
    /// both directions.
    pub fn sorted_nodes(&self, order: DegreeOrder) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = (0..self.nodes.len()).map(NodeIndex).collect();
        match order {
            DegreeOrder::Ascending => indices.sort_by_key(|index| self.nodes[index.0].degree()),
            DegreeOrder::Descending => {
                indices.sort_by_key(|index| Reverse(self.nodes[index.0].degree()))
            }
        }
        indices
    }

    pub(crate) fn set_position(&mut self, index: NodeIndex, point: GridPoint) {
        self.nodes[index.0].position = Some(point);
    }

    /// Produces one output record per node, in encounter order.
    ///
    /// Grid positions are scaled by `node_size` and truncated. The output `x`
    /// comes from the grid column and the output `y` from the grid row.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unplaced`] if a node was never positioned.
    pub fn layout_records(&self, node_size: f64) -> Result<Vec<LayoutRecord>, LayoutError> {
        self.nodes
            .iter()
            .map(|node| {
                let position = node
                    .position
                    .ok_or(LayoutError::Unplaced { node: node.id })?;
                Ok(LayoutRecord {
                    node: node.id,
                    x: (position.y as f64 * node_size) as i64,
                    y: (position.x as f64 * node_size) as i64,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    fn degrees(graph: &Graph, order: DegreeOrder) -> Vec<(NodeId, usize)> {
        graph
            .sorted_nodes(order)
            .into_iter()
            .map(|index| (graph.node(index).id(), graph.node(index).degree()))
            .collect()
    }

    #[test]
    fn test_degrees_and_directions() {
        let graph = Graph::from_edges([(1, 2), (1, 3), (3, 1), (4, 1)]);
        let one = graph.node(graph.index_of(1).unwrap());
        assert_eq!(one.degree(), 3);
        assert_eq!(one.out_degree(), 2);
        assert_eq!(one.in_degree(), 2);

        let two = graph.node(graph.index_of(2).unwrap());
        assert_eq!((two.degree(), two.in_degree(), two.out_degree()), (1, 1, 0));

        let four = graph.node(graph.index_of(4).unwrap());
        assert_eq!((four.degree(), four.in_degree(), four.out_degree()), (1, 0, 1));
    }

    #[test]
    fn test_duplicate_edges_are_idempotent() {
        let graph = Graph::from_edges([(1, 2), (1, 2), (2, 1)]);
        let one = graph.node(graph.index_of(1).unwrap());
        assert_eq!(one.degree(), 1);
        assert_eq!(one.out_degree(), 1);
        assert_eq!(one.in_degree(), 1);
    }

    #[test]
    fn test_self_loop() {
        let graph = Graph::from_edges([(7, 7)]);
        let seven = graph.node(graph.index_of(7).unwrap());
        assert_eq!(seven.degree(), 1);
        assert_eq!(seven.neighbors().collect::<Vec<_>>(), vec![NodeIndex(0)]);
    }

    #[test]
    fn test_encounter_order() {
        let mut graph = Graph::from_edges([(5, 3), (3, 9)]);
        graph.add_node(11);
        graph.add_node(5);
        let ids: Vec<NodeId> = graph.nodes().map(|(_, node)| node.id()).collect();
        assert_eq!(ids, vec![5, 3, 9, 11]);
        assert_eq!(graph.node(graph.index_of(11).unwrap()).degree(), 0);
    }

    #[test]
    fn test_sorted_nodes_is_stable() {
        let graph = Graph::from_edges([(1, 2), (3, 4), (2, 3)]);
        // degrees: 1 -> 1, 2 -> 2, 3 -> 2, 4 -> 1
        assert_eq!(
            degrees(&graph, DegreeOrder::Descending),
            vec![(2, 2), (3, 2), (1, 1), (4, 1)]
        );
        assert_eq!(
            degrees(&graph, DegreeOrder::Ascending),
            vec![(1, 1), (4, 1), (2, 2), (3, 2)]
        );
    }

    #[test]
    fn test_sorted_degrees_match_raw_adjacency() {
        let edges = [(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 3), (6, 3), (2, 1)];
        let graph = Graph::from_edges(edges);

        let mut adjacency: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
        for (s, t) in edges {
            adjacency.entry(s).or_default().insert(t);
            adjacency.entry(t).or_default().insert(s);
        }
        let mut expected: Vec<usize> = adjacency.values().map(HashSet::len).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let sorted: Vec<usize> = degrees(&graph, DegreeOrder::Descending)
            .into_iter()
            .map(|(_, degree)| degree)
            .collect();
        assert!(sorted.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_layout_records_swap_axes() {
        let mut graph = Graph::from_edges([(1, 2)]);
        graph.set_position(NodeIndex(0), GridPoint::new(3, 7));
        graph.set_position(NodeIndex(1), GridPoint::new(0, 2));

        let records = graph.layout_records(40.0).unwrap();
        assert_eq!(
            records,
            vec![
                LayoutRecord { node: 1, x: 280, y: 120 },
                LayoutRecord { node: 2, x: 80, y: 0 },
            ]
        );
    }

    #[test]
    fn test_layout_records_truncate() {
        let mut graph = Graph::from_edges([(1, 2)]);
        graph.set_position(NodeIndex(0), GridPoint::new(3, 3));
        graph.set_position(NodeIndex(1), GridPoint::new(1, 1));

        let records = graph.layout_records(2.7).unwrap();
        assert_eq!(records[0], LayoutRecord { node: 1, x: 8, y: 8 });
        assert_eq!(records[1], LayoutRecord { node: 2, x: 2, y: 2 });
    }

    #[test]
    fn test_layout_records_unplaced() {
        let graph = Graph::from_edges([(1, 2)]);
        let err = graph.layout_records(40.0).unwrap_err();
        assert!(matches!(err, LayoutError::Unplaced { node: 1 }));
    }

    #[test]
    fn test_layout_record_json() {
        let record = LayoutRecord { node: 4, x: -40, y: 80 };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"node":4,"x":-40,"y":80}"#);
    }
}

#[cfg(test)]
mod proptest_tests {
    use std::collections::{HashMap, HashSet};

    use proptest::prelude::*;

    use super::*;
    use crate::placement::spiral;

    // ===================
    // Strategies
    // ===================

    fn edges_strategy() -> impl Strategy<Value = Vec<(NodeId, NodeId)>> {
        prop::collection::vec((0i64..25, 0i64..25), 0..80)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Descending order yields non-increasing degrees equal to the raw adjacency sizes.
    fn check_sorted_degrees(edges: Vec<(NodeId, NodeId)>) -> Result<(), TestCaseError> {
        let graph = Graph::from_edges(edges.iter().copied());

        let mut adjacency: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
        for (s, t) in &edges {
            adjacency.entry(*s).or_default().insert(*t);
            adjacency.entry(*t).or_default().insert(*s);
        }
        prop_assert_eq!(graph.node_count(), adjacency.len());

        let sorted = graph.sorted_nodes(DegreeOrder::Descending);
        for pair in sorted.windows(2) {
            prop_assert!(graph.node(pair[0]).degree() >= graph.node(pair[1]).degree());
        }
        for index in sorted {
            let node = graph.node(index);
            prop_assert_eq!(node.degree(), adjacency[&node.id()].len());
        }
        Ok(())
    }

    /// Every spiral prefix is made of pairwise distinct cells.
    fn check_spiral_distinct(start: (isize, isize), count: usize) -> Result<(), TestCaseError> {
        let cells = spiral(start, count);
        prop_assert_eq!(cells.len(), count);
        let unique: HashSet<_> = cells.iter().collect();
        prop_assert_eq!(unique.len(), count);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn sorted_degrees(edges in edges_strategy()) {
            check_sorted_degrees(edges)?;
        }

        #[test]
        fn spiral_distinct(x in -50isize..50, y in -50isize..50, count in 0usize..400) {
            check_spiral_distinct((x, y), count)?;
        }
    }
}
