//! The packaging task: full configuration for one packaging run.

use super::{LinuxSettings, MacSettings, Platform, WindowsSettings};
use std::path::PathBuf;

/// Complete configuration for one packaging run.
///
/// Usually deserialized from a `jarpack.toml` file or constructed through
/// [`TaskBuilder`](super::TaskBuilder). Validated and defaulted once during
/// initialization; read-mostly afterwards.
///
/// Exactly one of the per-platform blocks ([`linux`](Self::linux),
/// [`mac`](Self::mac), [`windows`](Self::windows)) survives initialization:
/// the target platform's block is materialized with defaults and the others
/// are discarded.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct PackageTask {
    /// Application name, used for file names. Must be a valid single path
    /// component.
    pub name: String,

    /// Human-readable name. Defaults to [`name`](Self::name).
    pub display_name: String,

    /// Application version.
    pub version: String,

    /// Short description. Defaults to [`display_name`](Self::display_name).
    pub description: String,

    /// Application homepage.
    pub url: Option<String>,

    /// Organization name. Defaults to "ACME".
    pub organization_name: String,

    /// Organization homepage. Defaults to the empty string.
    pub organization_url: String,

    /// Organization contact address, used as package maintainer.
    pub organization_email: Option<String>,

    /// Target platform. `Auto` resolves to the execution platform.
    pub platform: Platform,

    /// Directory receiving the app folder, intermediate assets and all
    /// installer artifacts.
    pub output_directory: PathBuf,

    /// Project root, used for convention-based resource lookup (LICENSE).
    pub project_directory: PathBuf,

    /// Directory holding custom assets (templates, icons) organized per
    /// platform.
    pub assets_dir: PathBuf,

    /// JDK used for jlink/jdeps. Defaults to `JAVA_HOME`.
    pub jdk_path: Option<PathBuf>,

    /// Pre-built runnable JAR. When absent, the configured build hook is
    /// invoked instead.
    pub runnable_jar: Option<PathBuf>,

    /// Dependency jars copied next to the runnable JAR.
    pub libs: Vec<PathBuf>,

    /// Copy [`libs`](Self::libs) into the bundle.
    pub copy_dependencies: bool,

    /// Pre-built JRE folder embedded verbatim instead of running jlink.
    pub jre_path: Option<PathBuf>,

    /// Embed a Java runtime in the bundle.
    pub bundle_jre: bool,

    /// Trim the bundled runtime to the required modules with jlink.
    pub customized_jre: bool,

    /// Modules included verbatim in the trimmed runtime, bypassing jdeps.
    pub modules: Vec<String>,

    /// Modules appended to whatever module list was resolved.
    pub additional_modules: Vec<String>,

    /// Name of the runtime folder inside the bundle.
    pub jre_directory_name: String,

    /// Extra files and folders copied into the bundle's resources area.
    pub additional_resources: Vec<PathBuf>,

    /// Explicit license file override.
    pub license_file: Option<PathBuf>,

    /// Declared project license URL, downloaded when no file is available.
    pub license_url: Option<String>,

    /// Explicit icon file override.
    pub icon_file: Option<PathBuf>,

    /// Main class launched by the startup scripts. Launches `-jar` when
    /// unset.
    pub main_class: Option<String>,

    /// Extra classpath entries for the launcher.
    pub classpath: Option<String>,

    /// PATH prefix exported by the generated launchers.
    pub env_path: Option<String>,

    /// JVM arguments passed by the generated launchers.
    pub vm_args: Vec<String>,

    /// Generate installer artifacts in addition to the app folder.
    pub generate_installer: bool,

    /// Attempt installer generation even when the target platform differs
    /// from the execution platform.
    pub force_installer: bool,

    /// Launchers elevate to administrator privileges.
    pub administrator_required: bool,

    /// Launchers switch the working directory to the bundle's resources
    /// area before starting the JVM.
    pub use_resources_as_working_dir: bool,

    /// Archive the app folder as a gzipped tarball.
    pub create_tarball: bool,

    /// Archive the app folder as a zipball.
    pub create_zipball: bool,

    /// Linux-specific settings.
    pub linux: Option<LinuxSettings>,

    /// macOS-specific settings.
    pub mac: Option<MacSettings>,

    /// Windows-specific settings.
    pub windows: Option<WindowsSettings>,
}

impl Default for PackageTask {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            version: "1.0.0".into(),
            description: String::new(),
            url: None,
            organization_name: String::new(),
            organization_url: String::new(),
            organization_email: None,
            platform: Platform::Auto,
            output_directory: PathBuf::from("target/package"),
            project_directory: PathBuf::from("."),
            assets_dir: PathBuf::from("assets"),
            jdk_path: None,
            runnable_jar: None,
            libs: Vec::new(),
            copy_dependencies: true,
            jre_path: None,
            bundle_jre: true,
            customized_jre: true,
            modules: Vec::new(),
            additional_modules: Vec::new(),
            jre_directory_name: "jre".into(),
            additional_resources: Vec::new(),
            license_file: None,
            license_url: None,
            icon_file: None,
            main_class: None,
            classpath: None,
            env_path: None,
            vm_args: Vec::new(),
            generate_installer: true,
            force_installer: false,
            administrator_required: false,
            use_resources_as_working_dir: true,
            create_tarball: false,
            create_zipball: false,
            linux: None,
            mac: None,
            windows: None,
        }
    }
}

impl PackageTask {
    /// Linux settings, materialized with defaults.
    ///
    /// Only meaningful after initialization fixed the target platform.
    pub fn linux(&self) -> LinuxSettings {
        self.linux.clone().unwrap_or_default()
    }

    /// macOS settings, materialized with defaults.
    pub fn mac(&self) -> MacSettings {
        self.mac.clone().unwrap_or_default()
    }

    /// Windows settings, materialized with defaults.
    pub fn windows(&self) -> WindowsSettings {
        self.windows.clone().unwrap_or_default()
    }

    /// Maintainer string for package metadata.
    pub fn maintainer(&self) -> String {
        match &self.organization_email {
            Some(email) => format!("{} <{}>", self.organization_name, email),
            None => self.organization_name.clone(),
        }
    }
}
