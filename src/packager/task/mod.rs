//! Packaging task configuration.
//!
//! A [`PackageTask`] holds everything one packaging run needs: application
//! identity, target platform, paths, behavioral flags and the per-platform
//! settings blocks. Tasks are deserialized from `jarpack.toml` or built
//! through [`TaskBuilder`].

mod builder;
mod core;
mod linux;
mod macos;
mod platform;
mod windows;

pub use builder::TaskBuilder;
pub use core::PackageTask;
pub use linux::LinuxSettings;
pub use macos::{MacSettings, MacStartup};
pub use platform::Platform;
pub use windows::WindowsSettings;
