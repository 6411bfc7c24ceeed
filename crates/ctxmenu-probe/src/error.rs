//! Error handling for the ctxmenu-probe crate.

use std::result;

use thiserror::Error;

/// Convenient result type for probe operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while probing.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration could not be loaded.
    #[error("{}", .0.pretty())]
    Config(#[from] menu_config::Error),
    /// A command or panel operation failed.
    #[error("Engine error: {0}")]
    Engine(#[from] ctxmenu_engine::Error),
    /// `--activate` named a label that is not on the open menu.
    #[error("No item labelled '{label}' on the open menu (have: {available:?})")]
    NoSuchItem {
        /// Requested label.
        label: String,
        /// Labels on display.
        available: Vec<String>,
    },
}
