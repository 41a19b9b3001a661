//! Native packaging pipeline for Java applications
//!
//! This library turns a runnable JAR plus a Java runtime into OS-native
//! distributables:
//! - Linux packages (.deb, .rpm)
//! - macOS bundles and installers (.app, .dmg, .pkg)
//! - Windows installers (.msm, .msi, setup .exe)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use error::{CliError, JarpackError, Result};
