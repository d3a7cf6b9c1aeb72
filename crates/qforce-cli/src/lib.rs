//! CLI logic for the qforce layout tool.
//!
//! This module contains the core CLI logic: input validation, configuration
//! layering, running the layout and writing the JSON result.

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::info;
use miette::Diagnostic;
use thiserror::Error;

use qforce::{LayoutBuilder, QforceError};

/// Errors surfaced by the CLI, each mapped to a process exit code.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("{path} is not a file")]
    #[diagnostic(code(qforce::input), help("pass the path of a CX file"))]
    InputMissing { path: String },

    #[error("{path} is an empty file")]
    #[diagnostic(code(qforce::input))]
    InputEmpty { path: String },

    #[error(transparent)]
    #[diagnostic(code(qforce::config))]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(code(qforce::layout))]
    Processing(#[from] QforceError),

    #[error("failed to serialize layout: {0}")]
    #[diagnostic(code(qforce::output))]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write layout: {0}")]
    #[diagnostic(code(qforce::output))]
    Output(#[from] io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InputMissing { .. } => 3,
            CliError::InputEmpty { .. } => 4,
            CliError::Processing(_) | CliError::Serialize(_) | CliError::Output(_) => 5,
            CliError::Config(_) => 2,
        }
    }
}

/// Run the qforce CLI application
///
/// Reads the CX file named by `args`, lays it out and writes the coordinate
/// records to `out` as a JSON array followed by a newline.
///
/// # Errors
///
/// Returns `CliError` for:
/// - A missing or empty input file
/// - Configuration loading errors
/// - CX parsing and layout errors
/// - Output write errors
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    info!(input_path = args.input; "Processing network");

    let input = Path::new(&args.input);
    if !input.is_file() {
        return Err(CliError::InputMissing {
            path: args.input.clone(),
        });
    }
    let size = fs::metadata(input).map_err(QforceError::from)?.len();
    if size == 0 {
        return Err(CliError::InputEmpty {
            path: args.input.clone(),
        });
    }

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args);
    let pretty = app_config.output().pretty();

    let source = fs::read_to_string(input).map_err(QforceError::from)?;

    let builder = LayoutBuilder::new(app_config);
    let network = builder.parse(&source)?;
    let records = builder.layout(&network)?;

    let json = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    writeln!(out, "{json}")?;
    out.flush()?;

    info!(records = records.len(); "Layout written");

    Ok(())
}
