//! Linux platform-specific settings.

use std::path::PathBuf;

/// Linux packaging configuration.
///
/// Controls which installer artifacts are produced and how the generated
/// desktop entry is categorized.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct LinuxSettings {
    /// Produce a Debian package (.deb) with dpkg-deb.
    ///
    /// Default: true
    pub generate_deb: bool,

    /// Produce an RPM package (.rpm) with rpmbuild.
    ///
    /// Default: true
    pub generate_rpm: bool,

    /// Freedesktop menu categories for the generated .desktop entry.
    ///
    /// Default: `["Utility"]`
    pub categories: Vec<String>,

    /// User-supplied launcher copied verbatim instead of the rendered
    /// startup script.
    pub custom_launcher: Option<PathBuf>,

    /// User-supplied .desktop file copied instead of the rendered one.
    pub custom_desktop_file: Option<PathBuf>,
}

impl Default for LinuxSettings {
    fn default() -> Self {
        Self {
            generate_deb: true,
            generate_rpm: true,
            categories: vec!["Utility".into()],
            custom_launcher: None,
            custom_desktop_file: None,
        }
    }
}
