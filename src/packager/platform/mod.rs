//! Per-OS platform packagers.
//!
//! Each target OS has one [`PlatformPackager`] implementation selected once
//! at initialization. The four-stage sequencing (init, structure creation,
//! assembly, installer generation) lives in the driver; the variants only
//! supply the platform-specific behavior of each stage.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::packager::context::BuildContext;
use crate::packager::error::Result;
use crate::packager::generator::ArtifactGenerator;
use crate::packager::task::{PackageTask, Platform};
use async_trait::async_trait;
use std::path::PathBuf;

/// Platform-specific half of the packaging pipeline.
#[async_trait]
pub trait PlatformPackager: Send + Sync {
    /// The platform this packager targets.
    fn platform(&self) -> Platform;

    /// Applies platform defaults to the task and enforces platform-mandated
    /// overrides of otherwise-configurable flags. Overrides warn, they do
    /// not fail.
    fn init(&self, task: &mut PackageTask) -> Result<()>;

    /// Creates the platform's canonical directory layout inside the app
    /// folder and records the destination folders consumed by later stages.
    async fn create_structure(&self, ctx: &mut BuildContext) -> Result<()>;

    /// Platform-specific assembly: places the runnable JAR, produces the
    /// startup launcher, generates descriptors, and signs when applicable.
    /// Returns the produced application container.
    async fn assemble(&self, ctx: &mut BuildContext) -> Result<PathBuf>;

    /// The ordered installer artifact generators for this platform.
    fn generators(&self) -> Vec<Box<dyn ArtifactGenerator>>;
}

/// Selects the packager implementation for a platform.
pub fn packager_for(platform: Platform) -> Box<dyn PlatformPackager> {
    match platform.resolve() {
        Platform::Mac => Box::new(macos::MacPackager),
        Platform::Windows => Box::new(windows::WindowsPackager),
        _ => Box::new(linux::LinuxPackager),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_matches_platform() {
        assert_eq!(
            packager_for(Platform::Linux).platform(),
            Platform::Linux
        );
        assert_eq!(packager_for(Platform::Mac).platform(), Platform::Mac);
        assert_eq!(
            packager_for(Platform::Windows).platform(),
            Platform::Windows
        );
        assert_eq!(
            packager_for(Platform::Auto).platform(),
            Platform::current()
        );
    }
}
