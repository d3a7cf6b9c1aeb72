//! Error types for qforce operations.
//!
//! This module provides the main error type [`QforceError`] and the
//! [`LayoutError`] raised by the layout engine on contract violations.

use std::io;

use thiserror::Error;

use qforce_cx::CxError;

use crate::graph::NodeId;

/// Errors raised by the layout engine.
///
/// None of these occur for a graph laid out through [`crate::LayoutBuilder`]
/// with a sane configuration; they signal misuse of the lower-level API or a
/// board too small for the requested placement.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("node {node} has no grid position")]
    Unplaced { node: NodeId },

    #[error("cannot place {nodes} nodes randomly in a central region of {cells} cells")]
    PlacementCapacity { nodes: usize, cells: usize },

    #[error("cell ({x}, {y}) for node {node} lies outside the {dimension}x{dimension} board")]
    OffBoard {
        node: NodeId,
        x: isize,
        y: isize,
        dimension: usize,
    },

    #[error("energy board has no cells")]
    EmptyBoard,
}

/// The main error type for qforce operations.
#[derive(Debug, Error)]
pub enum QforceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Network error: {0}")]
    Network(#[from] CxError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}
