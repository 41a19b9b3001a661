//! Installer artifact generators.
//!
//! Each distributable artifact kind (merge module, MSI, setup EXE, DEB,
//! RPM, DMG, PKG) is produced by one [`ArtifactGenerator`]. Generators are
//! registered per platform as an ordered list; order matters because later
//! generators may consume the file produced by an earlier one (the MSI
//! embeds the merge module).

use crate::packager::context::BuildContext;
use crate::packager::error::Result;
use crate::packager::task::Platform;
use async_trait::async_trait;
use std::path::PathBuf;

/// A single installer artifact kind.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// Descriptive artifact label used in skip and progress messages.
    fn name(&self) -> &'static str;

    /// Decides whether this generator runs.
    ///
    /// Pure predicate over the task and upstream state. Returns true when
    /// the feature is disabled or a precondition is unmet; a skipped
    /// generator surfaces a warning, never an error.
    fn skip(&self, ctx: &BuildContext) -> bool;

    /// Produces the artifact. Invoked at most once per run; memoization is
    /// handled by [`apply`].
    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf>;
}

/// Skip check shared by every generator: when the target platform differs
/// from the execution platform and no force flag is set, generation is not
/// attempted. Signing and installer toolchains do not work cross-platform.
pub fn foreign_platform_skip(ctx: &BuildContext, artifact: &str) -> bool {
    let platform = ctx.task.platform.resolve();
    if !platform.is_current() && !ctx.task.force_installer {
        log::warn!(
            "{artifact} cannot be generated: the target platform ({platform}) is different from the execution platform ({})",
            Platform::current()
        );
        return true;
    }
    false
}

/// Runs one generator, consulting the per-run memo cache first.
///
/// A second call for the same generator returns the recorded file without
/// re-running any side effects. The cache is trusted without re-checking
/// that the file still exists on disk.
pub async fn apply(generator: &dyn ArtifactGenerator, ctx: &mut BuildContext) -> Result<PathBuf> {
    if let Some(done) = ctx.artifact(generator.name()) {
        return Ok(done.to_path_buf());
    }
    let file = generator.generate(ctx).await?;
    ctx.record_artifact(generator.name(), file.clone());
    Ok(file)
}

/// Runs the ordered generator list.
///
/// Skipped generators are logged and passed over; the first failing
/// generator aborts the whole sweep. Artifacts already produced are kept,
/// not rolled back.
pub async fn generate_all(
    generators: &[Box<dyn ArtifactGenerator>],
    ctx: &mut BuildContext,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for generator in generators {
        if generator.skip(ctx) {
            log::info!("Skipping {}", generator.name());
            continue;
        }
        log::info!("Generating {} ...", generator.name());
        let file = apply(generator.as_ref(), ctx).await?;
        log::info!("{} generated in {}", generator.name(), file.display());
        files.push(file);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::error::Error;
    use crate::packager::task::TaskBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        output: PathBuf,
    }

    #[async_trait]
    impl ArtifactGenerator for CountingGenerator {
        fn name(&self) -> &'static str {
            "counting artifact"
        }

        fn skip(&self, _ctx: &BuildContext) -> bool {
            false
        }

        async fn generate(&self, _ctx: &mut BuildContext) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ArtifactGenerator for FailingGenerator {
        fn name(&self) -> &'static str {
            "failing artifact"
        }

        fn skip(&self, _ctx: &BuildContext) -> bool {
            false
        }

        async fn generate(&self, _ctx: &mut BuildContext) -> Result<PathBuf> {
            Err(Error::Generic("tool exploded".into()))
        }
    }

    fn context() -> BuildContext {
        BuildContext::new(TaskBuilder::new("demo").build().unwrap())
    }

    #[tokio::test]
    async fn apply_memoizes_the_first_result() {
        let mut ctx = context();
        let generator = CountingGenerator {
            calls: AtomicUsize::new(0),
            output: PathBuf::from("demo_1.0.0.msi"),
        };

        let first = apply(&generator, &mut ctx).await.unwrap();
        let second = apply(&generator, &mut ctx).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sweep_aborts_on_first_failure_and_keeps_prior_artifacts() {
        let mut ctx = context();
        let generators: Vec<Box<dyn ArtifactGenerator>> = vec![
            Box::new(CountingGenerator {
                calls: AtomicUsize::new(0),
                output: PathBuf::from("demo_1.0.0.msm"),
            }),
            Box::new(FailingGenerator),
        ];

        let err = generate_all(&generators, &mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("tool exploded"));
        assert!(ctx.artifact("counting artifact").is_some());
    }

    #[tokio::test]
    async fn foreign_platform_without_force_skips() {
        let mut ctx = context();
        // pick a platform that is guaranteed not to be the execution platform
        ctx.task.platform = if Platform::current() == Platform::Windows {
            Platform::Linux
        } else {
            Platform::Windows
        };
        assert!(foreign_platform_skip(&ctx, "MSI installer"));

        ctx.task.force_installer = true;
        assert!(!foreign_platform_skip(&ctx, "MSI installer"));
    }
}
