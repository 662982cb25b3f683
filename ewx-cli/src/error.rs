//! Error types for the EWX command-line tool.

use std::path::PathBuf;

/// Errors that can occur while running the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A configuration or request file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration or request file is not valid TOML for its type.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment override holds an unknown value.
    #[error("invalid value in {var}: {source}")]
    Override {
        /// The environment variable name.
        var: &'static str,
        /// The rejected value.
        #[source]
        source: ewx::ConfigError,
    },

    /// The EWX call failed.
    #[error(transparent)]
    Client(#[from] ewx_http::ClientError),

    /// The decoded response could not be printed as JSON.
    #[error("failed to format response: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
