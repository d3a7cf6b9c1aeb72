//! Command-line argument definitions for the qforce CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Besides the input path, configuration file and logging
//! verbosity, every layout option can be overridden here; flags beat values
//! from the configuration file.

use clap::Parser;

use qforce::{cell::CellWidth, field::DirectedFlow, placement::InitialPlacement};

/// Command-line arguments for the qforce layout tool
///
/// Lays out the network in a CX file and writes the node coordinates as a
/// JSON array to standard output.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CX file
    #[arg(help = "Path to the input CX file")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Number of relaxation rounds
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Board cells per node
    #[arg(long)]
    pub sparsity: Option<f64>,

    /// Radius of the attraction kernels
    #[arg(long)]
    pub a_radius: Option<usize>,

    /// Base scale of the attraction kernels
    #[arg(long)]
    pub a_scale: Option<f64>,

    /// Radius of the repulsion kernel
    #[arg(long)]
    pub r_radius: Option<usize>,

    /// Scale of the repulsion kernel
    #[arg(long)]
    pub r_scale: Option<f64>,

    /// Scale of the static attractor on the board center
    #[arg(long)]
    pub center_attractor_scale: Option<f64>,

    /// Initial placement (center, random, spiral)
    #[arg(long)]
    pub initialize_coordinates: Option<InitialPlacement>,

    /// Board edge that directed flow runs toward (none, top, bottom, left, right)
    #[arg(long)]
    pub directed_flow: Option<DirectedFlow>,

    /// Strength of the directed-flow bias
    #[arg(long)]
    pub directed_flow_bias: Option<f64>,

    /// Integer width of board cells (i16, i32, i64)
    #[arg(long)]
    pub cell_width: Option<CellWidth>,

    /// Seed for random placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Coordinate scale; overrides the node size found in the input
    #[arg(long)]
    pub node_size: Option<f64>,

    /// Pretty-print the JSON output (`--pretty=false` turns it off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub pretty: Option<bool>,
}
