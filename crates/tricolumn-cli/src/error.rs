//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;
use tricolumn_app::ShellError;

/// Errors while running a script.
#[derive(Debug, Error)]
pub enum CliError {
    /// The shell rejected an event.
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// The line is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command had missing or invalid arguments.
    #[error("/{command}: {error}")]
    InvalidArgs {
        /// Command name.
        command: String,
        /// What was wrong.
        error: String,
    },

    /// The configuration file could not be parsed.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parse error.
        source: serde_json::Error,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding output failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Whether the script cannot continue after this error.
    ///
    /// Rejected commands and shell errors only affect their own line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Io(_) | Self::Json(_))
    }
}
