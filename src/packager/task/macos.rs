//! macOS platform-specific settings.

use std::path::PathBuf;

/// Launcher stub variant placed in `Contents/MacOS`.
///
/// Selects which bundled launcher resource is used when no custom launcher
/// is supplied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacStartup {
    /// Launcher suitable for both Intel and Apple Silicon.
    #[default]
    Universal,
    /// Intel-only launcher.
    X86_64,
    /// Apple Silicon-only launcher.
    Arm64,
    /// Plain shell script launcher (newlines normalized on copy).
    Script,
}

impl MacStartup {
    /// Bundled launcher resource name for this variant.
    pub fn stub_name(self) -> &'static str {
        match self {
            MacStartup::Universal => "universalJavaApplicationStub",
            MacStartup::X86_64 => "universalJavaApplicationStub.x86_64",
            MacStartup::Arm64 => "universalJavaApplicationStub.arm64",
            MacStartup::Script => "universalJavaApplicationStub.sh",
        }
    }
}

/// macOS application bundle (.app) configuration.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct MacSettings {
    /// Bundle identifier (CFBundleIdentifier).
    ///
    /// Defaults to the application name during initialization.
    pub app_id: Option<String>,

    /// Place the runnable JAR under `Contents/Resources/Java` instead of
    /// directly in `Contents/Resources`.
    ///
    /// Default: true
    pub relocate_jar: bool,

    /// Launcher stub variant.
    pub startup: MacStartup,

    /// User-supplied launcher copied verbatim into `Contents/MacOS`.
    pub custom_launcher: Option<PathBuf>,

    /// User-supplied Info.plist copied instead of the rendered one.
    pub custom_info_plist: Option<PathBuf>,

    /// Provisioning profile installed as `embedded.provisionprofile`.
    pub provision_profile: Option<PathBuf>,

    /// Sign the generated bundle with codesign.
    ///
    /// Default: true
    pub codesign_app: bool,

    /// Signing identity, e.g. "Developer ID Application: Name (TEAMID)".
    ///
    /// "-" requests an ad-hoc signature.
    ///
    /// Default: "-"
    pub developer_id: String,

    /// Entitlements plist applied while signing.
    pub entitlements: Option<PathBuf>,

    /// Submit the signed bundle to Apple's notarization service.
    ///
    /// Default: false
    pub notarize_app: bool,

    /// App Store Connect API key id for notarization.
    pub api_key: Option<String>,

    /// App Store Connect API issuer id for notarization.
    pub api_issuer: Option<String>,

    /// Produce a DMG disk image artifact.
    ///
    /// Default: true
    pub generate_dmg: bool,

    /// Produce a PKG installer artifact.
    ///
    /// Default: true
    pub generate_pkg: bool,
}

impl Default for MacSettings {
    fn default() -> Self {
        Self {
            app_id: None,
            relocate_jar: true,
            startup: MacStartup::default(),
            custom_launcher: None,
            custom_info_plist: None,
            provision_profile: None,
            codesign_app: true,
            developer_id: "-".into(),
            entitlements: None,
            notarize_app: false,
            api_key: None,
            api_issuer: None,
            generate_dmg: true,
            generate_pkg: true,
        }
    }
}
