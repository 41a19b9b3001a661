//! Packaging pipeline.
//!
//! The pipeline turns a runnable Java application into OS-native
//! distributables:
//!
//! 1. [`task`] holds the run configuration
//! 2. [`driver::Packager`] sequences the stages
//! 3. [`platform`] supplies the per-OS behavior
//! 4. [`generator`] produces the installer artifacts
//!
//! # Example
//!
//! ```no_run
//! use jarpack::packager::driver::Packager;
//! use jarpack::packager::task::TaskBuilder;
//!
//! # async fn example() -> jarpack::packager::Result<()> {
//! let task = TaskBuilder::new("myapp")
//!     .version("1.0.0")
//!     .runnable_jar("target/myapp-1.0.0.jar")
//!     .build()?;
//!
//! let mut packager = Packager::new(task);
//! let app = packager.create_app().await?;
//! let installers = packager.generate_installers().await?;
//! println!("created {} and {} installers", app.display(), installers.len());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod driver;
pub mod error;
pub mod generator;
pub mod platform;
pub mod task;
pub mod utils;

pub use context::BuildContext;
pub use driver::Packager;
pub use error::{Error, Result};
pub use generator::ArtifactGenerator;
