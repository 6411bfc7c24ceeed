use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Failures surfaced to callers of the command registry and controller.
///
/// Menu resolution anomalies are not represented here; they are logged and
/// degrade to showing less.
#[derive(Debug, Error)]
pub enum Error {
    /// No command is registered under this name.
    #[error("Unknown command: {name}")]
    UnknownCommand {
        /// Requested command name.
        name: String,
    },

    /// The command exists but may not run in the requested context.
    #[error("Command '{name}' not allowed in context '{context}' (allowed: {allowed:?})")]
    ContextMismatch {
        /// Command name.
        name: String,
        /// Context tag supplied by the caller.
        context: String,
        /// Contexts the command accepts, sorted.
        allowed: Vec<String>,
    },

    /// A command handler reported a failure.
    #[error("Command '{name}' failed: {message}")]
    Command {
        /// Command name.
        name: String,
        /// Handler-provided description.
        message: String,
    },

    /// A required collaborator was not provided.
    #[error("Service unavailable: {0}")]
    MissingService(&'static str),

    /// The UI side of the panel channel has gone away.
    #[error("Panel channel closed")]
    ChannelClosed,

    /// Configuration could not be loaded or validated.
    #[error("Config error: {0}")]
    Config(#[from] menu_config::Error),
}

impl Error {
    /// Shorthand for a handler failure.
    pub fn command(name: &str, message: impl Into<String>) -> Self {
        Self::Command {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
