//! Command line interface.

mod args;

pub use args::{Args, Command};

use crate::error::{CliError, Result};
use crate::packager::Packager;
use crate::packager::task::PackageTask;
use std::path::Path;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let task = load_task(&args.task)?;
    let mut packager = Packager::new(task);

    match args.command {
        Command::App => {
            packager.create_app().await?;
        }
        Command::Installers => {
            packager.generate_installers().await?;
        }
        Command::Package => {
            packager.create_app().await?;
            packager.create_bundles().await?;
            packager.generate_installers().await?;
        }
    }

    Ok(0)
}

/// Loads and parses the packaging task file.
pub fn load_task(path: &Path) -> Result<PackageTask> {
    if !path.is_file() {
        return Err(CliError::InvalidArguments {
            reason: format!("task file {} does not exist", path.display()),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::Platform;

    #[test]
    fn loads_a_minimal_task_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("jarpack.toml");
        std::fs::write(
            &file,
            r#"
name = "demo"
version = "1.2.3"
platform = "windows"

[windows]
generate_msm = true
"#,
        )
        .unwrap();

        let task = load_task(&file).unwrap();
        assert_eq!(task.name, "demo");
        assert_eq!(task.version, "1.2.3");
        assert_eq!(task.platform, Platform::Windows);
        assert!(task.windows.unwrap().generate_msm);
    }

    #[test]
    fn missing_task_file_is_a_cli_error() {
        assert!(load_task(Path::new("definitely-missing.toml")).is_err());
    }
}
