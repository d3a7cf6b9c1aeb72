//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML configuration file from various
//! locations (explicit path, local directory, system directory) and layers
//! command-line overrides on top of it.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use qforce::config::{AppConfig, LayoutConfig, OutputConfig};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (qforce/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("qforce/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "qforce", "qforce") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Layers the command-line overrides in `args` over `config`.
pub fn apply_overrides(config: AppConfig, args: &Args) -> AppConfig {
    let layout = config.layout();
    let output = config.output();

    let mut overridden: LayoutConfig = layout
        .clone()
        .with_rounds(args.rounds.unwrap_or(layout.rounds()))
        .with_sparsity(args.sparsity.unwrap_or(layout.sparsity()))
        .with_repulsion(
            args.r_radius.unwrap_or(layout.r_radius()),
            args.r_scale.unwrap_or(layout.r_scale()),
        )
        .with_attraction(
            args.a_radius.unwrap_or(layout.a_radius()),
            args.a_scale.unwrap_or(layout.a_scale()),
        )
        .with_center_attractor_scale(
            args.center_attractor_scale
                .unwrap_or(layout.center_attractor_scale()),
        )
        .with_directed_flow(
            args.directed_flow.unwrap_or(layout.directed_flow()),
            args.directed_flow_bias
                .unwrap_or(layout.directed_flow_bias()),
        );

    if let Some(placement) = args.initialize_coordinates {
        overridden = overridden.with_initialize_coordinates(placement);
    }
    if let Some(cell_width) = args.cell_width {
        overridden = overridden.with_cell_width(cell_width);
    }
    if args.seed.is_some() {
        overridden = overridden.with_seed(args.seed);
    }

    let output = OutputConfig::new(
        args.node_size.or(output.node_size()),
        args.pretty.unwrap_or(output.pretty()),
    );

    debug!(layout:? = overridden, output:?; "Effective configuration");
    AppConfig::new(overridden, output)
}
