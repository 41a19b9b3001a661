//! Builder for constructing packaging tasks programmatically.

use super::{LinuxSettings, MacSettings, PackageTask, Platform, WindowsSettings};
use crate::packager::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Fluent builder for [`PackageTask`].
///
/// The task file path (`jarpack.toml`) covers the common case; this builder
/// serves library users and tests.
///
/// # Examples
///
/// ```no_run
/// use jarpack::packager::task::{Platform, TaskBuilder};
///
/// # fn example() -> jarpack::packager::Result<()> {
/// let task = TaskBuilder::new("myapp")
///     .version("1.2.0")
///     .platform(Platform::Linux)
///     .output_directory("target/package")
///     .runnable_jar("target/myapp-1.2.0.jar")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TaskBuilder {
    task: PackageTask,
}

impl TaskBuilder {
    /// Creates a builder for an application with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            task: PackageTask {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Sets the application version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.task.version = version.into();
        self
    }

    /// Sets the human-readable display name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.task.display_name = display_name.into();
        self
    }

    /// Sets the application description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    /// Sets the organization name.
    pub fn organization_name(mut self, organization: impl Into<String>) -> Self {
        self.task.organization_name = organization.into();
        self
    }

    /// Sets the target platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.task.platform = platform;
        self
    }

    /// Sets the output directory.
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.task.output_directory = path.as_ref().to_path_buf();
        self
    }

    /// Sets the project root directory.
    pub fn project_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.task.project_directory = path.as_ref().to_path_buf();
        self
    }

    /// Sets the JDK used for jlink/jdeps.
    pub fn jdk_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.task.jdk_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the pre-built runnable JAR.
    pub fn runnable_jar<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.task.runnable_jar = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets a pre-built JRE to embed verbatim.
    pub fn jre_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.task.jre_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables or disables runtime embedding.
    pub fn bundle_jre(mut self, bundle: bool) -> Self {
        self.task.bundle_jre = bundle;
        self
    }

    /// Enables or disables runtime trimming.
    pub fn customized_jre(mut self, customized: bool) -> Self {
        self.task.customized_jre = customized;
        self
    }

    /// Sets the dependency jars copied next to the runnable JAR.
    pub fn libs(mut self, libs: Vec<PathBuf>) -> Self {
        self.task.libs = libs;
        self
    }

    /// Enables or disables installer generation.
    pub fn generate_installer(mut self, generate: bool) -> Self {
        self.task.generate_installer = generate;
        self
    }

    /// Forces installer generation on a foreign execution platform.
    pub fn force_installer(mut self, force: bool) -> Self {
        self.task.force_installer = force;
        self
    }

    /// Adds additional resources copied into the bundle.
    pub fn additional_resources(mut self, resources: Vec<PathBuf>) -> Self {
        self.task.additional_resources = resources;
        self
    }

    /// Sets the Linux-specific settings block.
    pub fn linux(mut self, settings: LinuxSettings) -> Self {
        self.task.linux = Some(settings);
        self
    }

    /// Sets the macOS-specific settings block.
    pub fn mac(mut self, settings: MacSettings) -> Self {
        self.task.mac = Some(settings);
        self
    }

    /// Sets the Windows-specific settings block.
    pub fn windows(mut self, settings: WindowsSettings) -> Self {
        self.task.windows = Some(settings);
        self
    }

    /// Builds the task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the application name is empty.
    /// Full validation happens during packager initialization.
    pub fn build(self) -> Result<PackageTask> {
        if self.task.name.trim().is_empty() {
            return Err(Error::InvalidConfig("application name is required".into()));
        }
        Ok(self.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_name() {
        assert!(TaskBuilder::new("").build().is_err());
        assert!(TaskBuilder::new("demo").build().is_ok());
    }

    #[test]
    fn builder_applies_defaults() {
        let task = TaskBuilder::new("demo").build().unwrap();
        assert_eq!(task.platform, Platform::Auto);
        assert!(task.bundle_jre);
        assert!(task.generate_installer);
        assert_eq!(task.jre_directory_name, "jre");
    }
}
