//! Error types for packaging operations.
//!
//! Provides contextual error chaining in the spirit of anyhow, filesystem
//! errors that carry the offending path, and dedicated variants for external
//! tool failures.

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the packager.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation being performed (e.g., "creating app directory")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Invalid or contradictory task settings.
    ///
    /// Raised during initialization, before any destructive file-system work.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// External tool could not be located on the PATH.
    #[error("required tool not found: {tool}")]
    ToolNotFound {
        /// Tool executable name
        tool: String,
    },

    /// External tool could not be launched.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to launch
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// External tool ran but exited with a non-zero status.
    #[error("command {command} exited with status {code:?}: {stderr}")]
    CommandExit {
        /// Command that failed
        command: String,
        /// Exit code, if the process terminated normally
        code: Option<i32>,
        /// Captured standard error output
        stderr: String,
    },

    /// An external tool reported success but the expected output is missing.
    #[error("{artifact} generation failed: expected output {path} does not exist")]
    MissingArtifact {
        /// Human-readable artifact name
        artifact: String,
        /// Path that should have been produced
        path: PathBuf,
    },

    /// Handlebars template parsing error.
    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    /// Handlebars template rendering error.
    #[error("{0}")]
    Render(#[from] handlebars::RenderError),

    /// JSON serialization error (template data contexts).
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error (license download).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic I/O error.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Error walking a directory tree.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefix(#[from] path::StripPrefixError),

    /// ZIP archive creation error.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Generic error with a custom message.
    #[error("{0}")]
    Generic(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Works with both `Result<T>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::Generic(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::Generic(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the
    /// operation, e.g., "reading file", "creating directory".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with an error.
///
/// Converts the message into a [`Error::Generic`] and returns immediately.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::packager::error::Error::Generic($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::packager::error::Error::Generic($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::packager::error::Error::Generic(format!($fmt, $($arg)*)))
    };
}
