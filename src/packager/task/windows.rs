//! Windows platform-specific settings.

use std::path::PathBuf;

/// Windows installer configuration.
///
/// Controls which installer artifacts are produced (WiX merge module, WiX
/// MSI, Inno Setup EXE) and optional Authenticode signing of the launcher.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct WindowsSettings {
    /// Produce a standalone WiX merge module (.msm).
    ///
    /// The merge module is also built implicitly when an MSI is requested,
    /// since the MSI embeds it.
    ///
    /// Default: false
    pub generate_msm: bool,

    /// Produce a WiX MSI installer embedding the merge module.
    ///
    /// Default: true
    pub generate_msi: bool,

    /// Produce an Inno Setup self-extracting installer (.exe).
    ///
    /// Default: true
    pub generate_setup: bool,

    /// User-supplied launcher copied verbatim instead of the rendered one.
    pub custom_launcher: Option<PathBuf>,

    /// User-supplied application manifest copied instead of the rendered one.
    pub custom_manifest: Option<PathBuf>,

    /// Installer languages for Inno Setup.
    ///
    /// Default: `["english"]`
    pub setup_languages: Vec<String>,

    /// WiX upgrade code. Derived deterministically from the application
    /// name when unset, so upgrades of the same app share a code.
    pub upgrade_code: Option<String>,

    // === Signing Configuration ===
    /// Path to the Authenticode certificate (.pfx).
    ///
    /// Default: None (unsigned)
    pub cert_path: Option<PathBuf>,

    /// Password for the certificate file.
    pub cert_password: Option<String>,

    /// Timestamp server URL for signature timestamping.
    ///
    /// Recommended: "http://timestamp.digicert.com"
    pub timestamp_url: Option<String>,
}

impl Default for WindowsSettings {
    fn default() -> Self {
        Self {
            generate_msm: false,
            generate_msi: true,
            generate_setup: true,
            custom_launcher: None,
            custom_manifest: None,
            setup_languages: vec!["english".into()],
            upgrade_code: None,
            cert_path: None,
            cert_password: None,
            timestamp_url: None,
        }
    }
}

impl WindowsSettings {
    /// Returns true when launcher signing is configured.
    pub fn signing_configured(&self) -> bool {
        self.cert_path.is_some()
    }
}
