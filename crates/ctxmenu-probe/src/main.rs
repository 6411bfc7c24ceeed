#![warn(missing_docs)]

//! Entry point for the `ctxmenu-probe` binary.

mod cli;
mod error;
mod probe;

use std::process;

use clap::Parser;
use menu_config::{ModeConfig, load_from_path};
use tracing::{debug, error};

use crate::{cli::Cli, error::Result};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, load the configuration and run the
/// scenario.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = cli.log.spec();
    logging::init(&log_spec);
    debug!(filter = %log_spec, "logging initialised");

    let config = match &cli.config {
        Some(path) => load_from_path(path)?,
        None => ModeConfig::builtin()?,
    };
    if cli.list {
        probe::list(&config);
        return Ok(());
    }
    probe::run(&cli, config)
}
