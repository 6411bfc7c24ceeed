//! Command-line interface definitions for ctxmenu-probe.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `ctxmenu-probe` binary.
#[derive(Parser, Debug)]
#[command(
    name = "ctxmenu-probe",
    about = "Simulate a right click against a mode configuration",
    version
)]
pub struct Cli {
    /// Logging controls shared across ctxmenu binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Mode configuration (RON). Defaults to the built-in configuration.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Place an annotation made with this tool under the pointer.
    #[arg(long, value_name = "TOOL")]
    pub tool: Option<String>,

    /// Pointer x coordinate.
    #[arg(long, default_value_t = 400.0)]
    pub x: f64,

    /// Pointer y coordinate.
    #[arg(long, default_value_t = 300.0)]
    pub y: f64,

    /// Activate the item with this label; repeat to walk into sub-menus.
    #[arg(long, value_name = "LABEL")]
    pub activate: Vec<String>,

    /// List the configuration's customizations and exit.
    #[arg(long)]
    pub list: bool,
}
