//! Target platform selection and detection.

use std::fmt;

/// Target operating system for a packaging run.
///
/// `Auto` is a sentinel that resolves to the platform the packager is
/// currently executing on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Resolve to the execution platform.
    #[default]
    Auto,
    /// GNU/Linux distributions (.deb, .rpm).
    Linux,
    /// macOS (.app, .dmg, .pkg).
    Mac,
    /// Windows (.msm, .msi, setup .exe).
    Windows,
}

impl Platform {
    /// Detects the platform the packager is executing on.
    ///
    /// Non-Windows, non-macOS unixes are treated as Linux.
    pub fn current() -> Platform {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Returns true if this platform equals the execution platform.
    ///
    /// `Auto` is always current by definition.
    pub fn is_current(self) -> bool {
        self.resolve() == Platform::current()
    }

    /// Maps the `Auto` sentinel to the execution platform.
    ///
    /// Concrete platforms are returned unchanged.
    pub fn resolve(self) -> Platform {
        match self {
            Platform::Auto => Platform::current(),
            other => other,
        }
    }

    /// Icon file extension conventionally used on this platform.
    pub fn icon_extension(self) -> &'static str {
        match self.resolve() {
            Platform::Mac => ".icns",
            Platform::Windows => ".ico",
            _ => ".png",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Auto => "auto",
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "windows",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_resolves_to_current() {
        assert_eq!(Platform::Auto.resolve(), Platform::current());
        assert!(Platform::Auto.is_current());
    }

    #[test]
    fn concrete_platform_resolves_to_itself() {
        assert_eq!(Platform::Windows.resolve(), Platform::Windows);
        assert_eq!(Platform::Linux.resolve(), Platform::Linux);
        assert_eq!(Platform::Mac.resolve(), Platform::Mac);
    }

    #[test]
    fn exactly_one_concrete_platform_is_current() {
        let all = [Platform::Linux, Platform::Mac, Platform::Windows];
        assert_eq!(all.iter().filter(|p| p.is_current()).count(), 1);
    }

    #[test]
    fn icon_extensions_follow_platform_conventions() {
        assert_eq!(Platform::Linux.icon_extension(), ".png");
        assert_eq!(Platform::Mac.icon_extension(), ".icns");
        assert_eq!(Platform::Windows.icon_extension(), ".ico");
    }
}
