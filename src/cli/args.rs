//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Native packaging for Java applications
#[derive(Parser, Debug)]
#[command(
    name = "jarpack",
    version,
    about = "Packages runnable Java applications as native bundles and installers",
    long_about = "Reads a packaging task from a TOML file and produces an OS-native app bundle \
plus the configured installer artifacts (.deb/.rpm on Linux, .app/.dmg/.pkg on macOS, \
.msm/.msi/setup .exe on Windows).

Usage:
  jarpack package
  jarpack --task my-task.toml app
  jarpack installers"
)]
pub struct Args {
    /// Path to the packaging task file
    #[arg(short, long, value_name = "FILE", default_value = "jarpack.toml")]
    pub task: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline entry points.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the app bundle, archives and installers
    Package,
    /// Create only the app bundle
    App,
    /// Generate only the installer artifacts
    Installers,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_task_file() {
        let args = Args::parse_from(["jarpack", "package"]);
        assert_eq!(args.task, PathBuf::from("jarpack.toml"));
        assert_eq!(args.command, Command::Package);
    }

    #[test]
    fn parses_explicit_task_file() {
        let args = Args::parse_from(["jarpack", "--task", "demo.toml", "installers"]);
        assert_eq!(args.task, PathBuf::from("demo.toml"));
        assert_eq!(args.command, Command::Installers);
    }
}
