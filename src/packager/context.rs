//! Per-run build state threaded through the pipeline stages.

use crate::packager::error::{Error, Result};
use crate::packager::task::PackageTask;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mutable state accumulated across one packaging run.
///
/// Owns the [`PackageTask`] plus the derived locations discovered while the
/// pipeline advances. Each derived field is written once by the stage that
/// produces it and read by later stages; reading a field before its stage
/// ran is an error, not a panic.
#[derive(Debug)]
pub struct BuildContext {
    /// The task driving this run.
    pub task: PackageTask,

    app_folder: Option<PathBuf>,
    assets_folder: Option<PathBuf>,
    executable: Option<PathBuf>,
    jar_file: Option<PathBuf>,

    executable_dest: Option<PathBuf>,
    jar_dest: Option<PathBuf>,
    jre_dest: Option<PathBuf>,
    resources_dest: Option<PathBuf>,

    license_file: Option<PathBuf>,
    icon_file: Option<PathBuf>,

    msm_file: Option<PathBuf>,
    artifacts: BTreeMap<String, PathBuf>,
}

fn read(field: &Option<PathBuf>, name: &'static str) -> Result<&Path> {
    field
        .as_deref()
        .ok_or_else(|| Error::Generic(format!("{name} is not set yet")))
}

fn write(field: &mut Option<PathBuf>, name: &'static str, value: PathBuf) {
    debug_assert!(field.is_none(), "{name} written twice");
    *field = Some(value);
}

impl BuildContext {
    /// Creates a fresh context for the given task.
    pub fn new(task: PackageTask) -> Self {
        Self {
            task,
            app_folder: None,
            assets_folder: None,
            executable: None,
            jar_file: None,
            executable_dest: None,
            jar_dest: None,
            jre_dest: None,
            resources_dest: None,
            license_file: None,
            icon_file: None,
            msm_file: None,
            artifacts: BTreeMap::new(),
        }
    }

    /// The created application folder (`<output>/<name>`).
    pub fn app_folder(&self) -> Result<&Path> {
        read(&self.app_folder, "app folder")
    }

    pub fn set_app_folder(&mut self, path: PathBuf) {
        write(&mut self.app_folder, "app folder", path);
    }

    /// Folder for intermediate assets (`<output>/assets`).
    pub fn assets_folder(&self) -> Result<&Path> {
        read(&self.assets_folder, "assets folder")
    }

    pub fn set_assets_folder(&mut self, path: PathBuf) {
        write(&mut self.assets_folder, "assets folder", path);
    }

    /// True once the assets folder has been recorded.
    pub fn has_assets_folder(&self) -> bool {
        self.assets_folder.is_some()
    }

    /// The startup launcher produced during assembly.
    pub fn executable(&self) -> Result<&Path> {
        read(&self.executable, "startup executable")
    }

    pub fn set_executable(&mut self, path: PathBuf) {
        write(&mut self.executable, "startup executable", path);
    }

    /// The resolved runnable JAR.
    pub fn jar_file(&self) -> Result<&Path> {
        read(&self.jar_file, "runnable jar")
    }

    pub fn set_jar_file(&mut self, path: PathBuf) {
        write(&mut self.jar_file, "runnable jar", path);
    }

    /// Where the launcher must be placed for this platform.
    pub fn executable_dest(&self) -> Result<&Path> {
        read(&self.executable_dest, "executable destination")
    }

    pub fn set_executable_dest(&mut self, path: PathBuf) {
        write(&mut self.executable_dest, "executable destination", path);
    }

    /// Where the runnable JAR and its libs must be placed.
    pub fn jar_dest(&self) -> Result<&Path> {
        read(&self.jar_dest, "jar destination")
    }

    pub fn set_jar_dest(&mut self, path: PathBuf) {
        write(&mut self.jar_dest, "jar destination", path);
    }

    /// Where the bundled runtime must be placed.
    pub fn jre_dest(&self) -> Result<&Path> {
        read(&self.jre_dest, "jre destination")
    }

    pub fn set_jre_dest(&mut self, path: PathBuf) {
        write(&mut self.jre_dest, "jre destination", path);
    }

    /// Where general resources must be placed.
    pub fn resources_dest(&self) -> Result<&Path> {
        read(&self.resources_dest, "resources destination")
    }

    pub fn set_resources_dest(&mut self, path: PathBuf) {
        write(&mut self.resources_dest, "resources destination", path);
    }

    /// Resolved license file, if any resolution step succeeded.
    pub fn license_file(&self) -> Option<&Path> {
        self.license_file.as_deref()
    }

    pub fn set_license_file(&mut self, path: Option<PathBuf>) {
        self.license_file = path;
    }

    /// Resolved icon file. Resolution always produces one.
    pub fn icon_file(&self) -> Result<&Path> {
        read(&self.icon_file, "icon file")
    }

    pub fn set_icon_file(&mut self, path: PathBuf) {
        write(&mut self.icon_file, "icon file", path);
    }

    /// Merge module produced earlier in the generator sweep, consumed by
    /// the MSI generator.
    pub fn msm_file(&self) -> Option<&Path> {
        self.msm_file.as_deref()
    }

    pub fn set_msm_file(&mut self, path: PathBuf) {
        write(&mut self.msm_file, "merge module", path);
    }

    /// Memoized artifact for a generator, if it already ran.
    ///
    /// The cache is trusted as-is; a file deleted externally after a
    /// successful run is not detected.
    pub fn artifact(&self, generator: &str) -> Option<&Path> {
        self.artifacts.get(generator).map(PathBuf::as_path)
    }

    /// Records a generator's output file.
    pub fn record_artifact(&mut self, generator: &str, file: PathBuf) {
        self.artifacts.insert(generator.to_string(), file);
    }

    /// All artifacts recorded so far, in generator-name order.
    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.artifacts
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    fn context() -> BuildContext {
        BuildContext::new(TaskBuilder::new("demo").build().unwrap())
    }

    #[test]
    fn unset_fields_error_instead_of_panicking() {
        let ctx = context();
        assert!(ctx.app_folder().is_err());
        assert!(ctx.jar_file().is_err());
        assert!(ctx.license_file().is_none());
    }

    #[test]
    fn fields_read_back_after_write() {
        let mut ctx = context();
        ctx.set_app_folder(PathBuf::from("/tmp/demo"));
        assert_eq!(ctx.app_folder().unwrap(), Path::new("/tmp/demo"));
    }

    #[test]
    fn artifact_cache_round_trips() {
        let mut ctx = context();
        assert!(ctx.artifact("MSI installer").is_none());
        ctx.record_artifact("MSI installer", PathBuf::from("demo_1.0.msi"));
        assert_eq!(
            ctx.artifact("MSI installer").unwrap(),
            Path::new("demo_1.0.msi")
        );
        assert_eq!(ctx.artifacts().count(), 1);
    }
}
