//! End-to-end pipeline tests: app creation, installer sweep behavior and
//! generator memoization, using a stub generator in place of the external
//! installer toolchains.

use async_trait::async_trait;
use jarpack::packager::context::BuildContext;
use jarpack::packager::driver::Packager;
use jarpack::packager::error::Result;
use jarpack::packager::generator::{self, ArtifactGenerator, foreign_platform_skip};
use jarpack::packager::task::{MacSettings, PackageTask, Platform, TaskBuilder};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator that writes its artifact directly instead of invoking an
/// external toolchain.
struct StubInstaller {
    calls: AtomicUsize,
}

impl StubInstaller {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ArtifactGenerator for StubInstaller {
    fn name(&self) -> &'static str {
        "stub installer"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let file = ctx.task.output_directory.join(format!(
            "{}_{}.installer",
            ctx.task.name, ctx.task.version
        ));
        tokio::fs::write(&file, "installer payload").await?;
        Ok(file)
    }
}

fn minimal_task(tmp: &Path) -> PackageTask {
    let jar = tmp.join("Demo-1.0.jar");
    std::fs::write(&jar, "fake jar content").unwrap();

    TaskBuilder::new("Demo")
        .version("1.0")
        .platform(Platform::current())
        .output_directory(tmp.join("output"))
        .project_directory(tmp)
        .jdk_path(tmp)
        .runnable_jar(jar)
        .bundle_jre(false)
        .mac(MacSettings {
            codesign_app: false,
            ..Default::default()
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn create_app_produces_the_application_container() {
    let tmp = tempfile::tempdir().unwrap();
    let task = minimal_task(tmp.path());

    let mut packager = Packager::new(task);
    let app = packager.create_app().await.unwrap();

    assert!(app.exists());
    // the app folder carries the runnable jar and a launcher
    let app_folder = tmp.path().join("output/Demo");
    assert!(app_folder.is_dir());
    let jar = packager.context().jar_file().unwrap();
    assert!(jar.exists());
    assert!(packager.context().executable().unwrap().exists());
}

#[tokio::test]
async fn create_app_then_one_generator_yields_exactly_one_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let task = minimal_task(tmp.path());

    let mut packager = Packager::new(task);
    packager.create_app().await.unwrap();

    // run a single registered generator with no skip conditions
    let mut ctx = BuildContext::new(minimal_task(tmp.path()));
    ctx.set_app_folder(tmp.path().join("output/Demo"));
    ctx.set_assets_folder(tmp.path().join("output/assets"));

    let generators: Vec<Box<dyn ArtifactGenerator>> = vec![Box::new(StubInstaller::new())];
    let artifacts = generator::generate_all(&generators, &mut ctx).await.unwrap();

    assert_eq!(artifacts.len(), 1);
    let name = artifacts[0].file_name().unwrap().to_string_lossy();
    assert!(name.contains("Demo"));
    assert!(name.contains("1.0"));
    assert!(artifacts[0].exists());
}

#[tokio::test]
async fn disabled_installer_generation_returns_empty_without_side_effects() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.generate_installer = false;

    let mut packager = Packager::new(task);
    let installers = packager.generate_installers().await.unwrap();

    assert!(installers.is_empty());
    // nothing was generated into the output directory
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn foreign_target_platform_returns_empty_without_force() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.platform = if Platform::current() == Platform::Windows {
        Platform::Linux
    } else {
        Platform::Windows
    };

    let mut packager = Packager::new(task);
    let installers = packager.generate_installers().await.unwrap();
    assert!(installers.is_empty());
}

#[tokio::test]
async fn foreign_platform_generators_skip_and_never_apply() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.platform = if Platform::current() == Platform::Windows {
        Platform::Linux
    } else {
        Platform::Windows
    };

    let mut ctx = BuildContext::new(task);
    let stub = StubInstaller::new();
    assert!(stub.skip(&ctx));

    let generators: Vec<Box<dyn ArtifactGenerator>> = vec![Box::new(StubInstaller::new())];
    let artifacts = generator::generate_all(&generators, &mut ctx).await.unwrap();
    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn generator_apply_is_idempotent_across_calls() {
    let tmp = tempfile::tempdir().unwrap();
    let task = minimal_task(tmp.path());
    std::fs::create_dir_all(tmp.path().join("output")).unwrap();

    let mut ctx = BuildContext::new(task);
    let stub = StubInstaller::new();

    let first = generator::apply(&stub, &mut ctx).await.unwrap();
    let second = generator::apply(&stub, &mut ctx).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_jar_falls_back_to_the_build_hook() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.runnable_jar = Some(tmp.path().join("not-built-yet.jar"));

    let built = tmp.path().join("built-by-hook.jar");
    std::fs::write(&built, "built jar").unwrap();
    let hook_jar = built.clone();

    let mut packager = Packager::new(task)
        .with_jar_builder(Box::new(move |_ctx| Ok(hook_jar.clone())));
    packager.create_app().await.unwrap();

    assert_eq!(packager.context().jar_file().unwrap(), built);
}

#[tokio::test]
async fn missing_jar_without_hook_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.runnable_jar = Some(tmp.path().join("not-built-yet.jar"));

    let mut packager = Packager::new(task);
    let err = packager.create_app().await.unwrap_err();
    assert!(err.to_string().contains("runnable JAR"));
}

#[tokio::test]
async fn invalid_application_name_aborts_before_any_output() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.name = "bad/name".into();

    let mut packager = Packager::new(task);
    let err = packager.create_app().await.unwrap_err();
    assert!(err.to_string().contains("invalid"));
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn old_app_folder_is_replaced_on_rerun() {
    let tmp = tempfile::tempdir().unwrap();
    let task = minimal_task(tmp.path());

    let stale = tmp.path().join("output/Demo/stale.txt");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old run").unwrap();

    let mut packager = Packager::new(task);
    packager.create_app().await.unwrap();

    assert!(!stale.exists());
}

#[tokio::test]
async fn tarball_and_zipball_are_created_on_request() {
    let tmp = tempfile::tempdir().unwrap();
    let mut task = minimal_task(tmp.path());
    task.create_tarball = true;
    task.create_zipball = true;

    let mut packager = Packager::new(task);
    packager.create_app().await.unwrap();
    let bundles = packager.create_bundles().await.unwrap();

    assert_eq!(bundles.len(), 2);
    for bundle in bundles {
        assert!(bundle.exists());
    }
}
