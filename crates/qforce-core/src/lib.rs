//! QForce Core Types and Primitives
//!
//! This crate provides the numeric building blocks of the qforce layout
//! engine. It includes:
//!
//! - **Cells**: The integer cell types every grid is made of ([`cell::Cell`])
//! - **Grids**: Square row-major grids used as energy boards ([`grid::Grid`])
//! - **Fields**: Attraction, repulsion and directional bias kernels ([`field`] module)
//! - **Compositor**: Boundary-clipped kernel overlay ([`compositor::merge`])

pub mod cell;
pub mod compositor;
pub mod field;
pub mod grid;
