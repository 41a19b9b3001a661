//! Top-level error types.

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, JarpackError>;

/// Main error type for the CLI.
#[derive(Error, Debug)]
pub enum JarpackError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task file parsing errors
    #[error("task file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging pipeline errors
    #[error("{0}")]
    Packager(#[from] crate::packager::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}
