//! External tool invocation.
//!
//! All pipeline subprocesses go through [`execute`]: the call blocks until
//! the tool exits, captures stdout and stderr, and fails on non-zero exit
//! with the captured stderr attached. There is no retry and no timeout.

use crate::packager::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Captured output of a finished tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Resolves a tool to an absolute path.
///
/// Absolute and relative paths that exist are used as-is; bare names are
/// looked up on the PATH.
fn locate(tool: &OsStr) -> Result<PathBuf> {
    let as_path = Path::new(tool);
    if as_path.components().count() > 1 {
        if as_path.exists() {
            return Ok(as_path.to_path_buf());
        }
        return Err(Error::ToolNotFound {
            tool: as_path.display().to_string(),
        });
    }
    which::which(tool).map_err(|_| Error::ToolNotFound {
        tool: tool.to_string_lossy().into_owned(),
    })
}

/// Runs an external tool, waiting for it to exit.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] when the tool cannot be located
/// - [`Error::CommandFailed`] when the process cannot be launched
/// - [`Error::CommandExit`] when the process exits non-zero; stderr is
///   attached to the error
pub async fn run<S, I, A>(tool: S, args: I) -> Result<ToolOutput>
where
    S: AsRef<OsStr>,
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let tool_path = locate(tool.as_ref())?;
    let args: Vec<_> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();

    log::debug!(
        "Executing {} {}",
        tool_path.display(),
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(&tool_path)
        .args(&args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: tool_path.display().to_string(),
            error,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(Error::CommandExit {
            command: tool_path.display().to_string(),
            code: output.status.code(),
            stderr: if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            },
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

/// Runs an external tool and returns its captured stdout.
pub async fn execute<S, I, A>(tool: S, args: I) -> Result<String>
where
    S: AsRef<OsStr>,
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    Ok(run(tool, args).await?.stdout)
}
