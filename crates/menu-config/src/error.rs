//! Error types for configuration loading and validation.

use std::{
    cmp::{max, min},
    fmt::Write as _,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while loading, parsing, or validating menu configuration.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON parse error with a concrete line/column location and excerpt.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
        /// Rendered excerpt including a caret at the error location.
        excerpt: String,
    },
    #[error("{message}")]
    /// Semantic validation error in an otherwise well-formed file.
    Validation {
        /// Optional path associated with the validation error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    /// Two menu definitions share the same id.
    #[error("Duplicate menu id '{id}'")]
    DuplicateMenu {
        /// The repeated id.
        id: String,
    },
    /// Delegating items form a cycle between menu definitions.
    #[error("Cyclic menu definition: {}", cycle.join(" -> "))]
    CyclicMenuDefinition {
        /// Menu ids along the cycle, starting and ending with the same id.
        cycle: Vec<String>,
    },
}

impl Error {
    /// Render a human-friendly error message including location and an excerpt when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
                excerpt,
            } => match path {
                Some(p) => format!(
                    "Config parse error at {}:{}:{}\n{}\n{}",
                    p.display(),
                    line,
                    col,
                    message,
                    excerpt
                ),
                None => format!(
                    "Config parse error at line {}, column {}\n{}\n{}",
                    line, col, message, excerpt
                ),
            },
            Self::Validation { path, message } => match path {
                Some(p) => format!("Config validation error at {}\n{}", p.display(), message),
                None => format!("Config validation error\n{}", message),
            },
            Self::DuplicateMenu { .. } | Self::CyclicMenuDefinition { .. } => {
                format!("Config validation error\n{}", self)
            }
        }
    }

    /// Attach a source path. Menu-set rejections become [`Error::Validation`]
    /// so the path travels with them.
    pub fn with_path(self, p: &Path) -> Self {
        match self {
            Self::Read { message, .. } => Self::Read {
                path: Some(p.to_path_buf()),
                message,
            },
            Self::Parse {
                line,
                col,
                message,
                excerpt,
                ..
            } => Self::Parse {
                path: Some(p.to_path_buf()),
                line,
                col,
                message,
                excerpt,
            },
            Self::Validation { message, .. } => Self::Validation {
                path: Some(p.to_path_buf()),
                message,
            },
            other @ (Self::DuplicateMenu { .. } | Self::CyclicMenuDefinition { .. }) => {
                Self::Validation {
                    path: Some(p.to_path_buf()),
                    message: other.to_string(),
                }
            }
        }
    }

    /// Build a parse error from source text and a 1-based location.
    pub(crate) fn parse(
        source: &str,
        path: Option<&Path>,
        line: usize,
        col: usize,
        message: String,
    ) -> Self {
        Self::Parse {
            path: path.map(Path::to_path_buf),
            line,
            col,
            message,
            excerpt: excerpt_at(source, line, col),
        }
    }
}

/// Render up to two lines of context before the error line, the line itself,
/// and a caret under the offending column.
pub(crate) fn excerpt_at(source: &str, line: usize, col: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() || line == 0 {
        return String::new();
    }
    let idx = min(line, lines.len()) - 1;
    let start = idx.saturating_sub(2);
    let width = (idx + 1).to_string().len();
    let mut out = String::new();
    for (i, text) in lines.iter().enumerate().take(idx + 1).skip(start) {
        let _ignored = writeln!(out, "{:>width$} | {}", i + 1, text, width = width);
    }
    let caret_col = max(col, 1) - 1;
    let _ignored = write!(
        out,
        "{:>width$} | {}^",
        "",
        " ".repeat(caret_col),
        width = width
    );
    out
}
