//! qforce CLI entry point.

use std::{io, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use qforce_cli::Args;

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting qforce");
    debug!(args:?; "Parsed arguments");

    let stdout = io::stdout();
    if let Err(err) = qforce_cli::run(&args, &mut stdout.lock()) {
        let reporter = miette::GraphicalReportHandler::new();
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &err).is_err() {
            writer = err.to_string();
        }

        error!("Failed\n{writer}");
        process::exit(err.exit_code());
    }

    info!("Completed successfully");
}
