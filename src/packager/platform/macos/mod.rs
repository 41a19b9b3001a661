//! macOS platform packager.
//!
//! Produces a `.app` bundle with the canonical Contents layout, a launcher
//! stub, a rendered Info.plist, and optional code signing and notarization.
//! Installer generation is delegated to the DMG and PKG generators.

mod dmg;
mod pkg;
mod templates;

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::ArtifactGenerator;
use crate::packager::platform::PlatformPackager;
use crate::packager::task::{MacSettings, MacStartup, PackageTask, Platform};
use crate::packager::utils::{exec, fs, render, xml};
use async_trait::async_trait;
use serde_json::json;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub struct MacPackager;

/// The produced bundle: `<app folder>/<name>.app`.
fn app_file(ctx: &BuildContext) -> Result<PathBuf> {
    Ok(ctx.app_folder()?.join(format!("{}.app", ctx.task.name)))
}

#[async_trait]
impl PlatformPackager for MacPackager {
    fn platform(&self) -> Platform {
        Platform::Mac
    }

    fn init(&self, task: &mut PackageTask) -> Result<()> {
        let mut settings = task.mac();
        if settings.app_id.is_none() {
            settings.app_id = Some(task.name.clone());
        }
        task.mac = Some(settings);

        // relative working directories don't resolve inside .app bundles
        if !task.use_resources_as_working_dir {
            task.use_resources_as_working_dir = true;
            log::warn!(
                "'use_resources_as_working_dir' disabled on macOS (always true)"
            );
        }
        Ok(())
    }

    async fn create_structure(&self, ctx: &mut BuildContext) -> Result<()> {
        let settings = ctx.task.mac();
        let app_file = app_file(ctx)?;
        let contents_folder = app_file.join("Contents");
        let resources_folder = contents_folder.join("Resources");
        let java_folder = if settings.relocate_jar {
            resources_folder.join("Java")
        } else {
            resources_folder.clone()
        };
        let macos_folder = contents_folder.join("MacOS");
        let jre_folder = contents_folder
            .join("PlugIns")
            .join(&ctx.task.jre_directory_name)
            .join("Contents/Home");

        for folder in [&macos_folder, &java_folder, &resources_folder] {
            fs::create_dir_all(folder, false).await?;
        }
        log::info!("App bundle structure created: {}", app_file.display());

        ctx.set_executable_dest(macos_folder);
        ctx.set_jar_dest(java_folder);
        ctx.set_jre_dest(jre_folder);
        ctx.set_resources_dest(resources_folder);
        Ok(())
    }

    async fn assemble(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let app_file = app_file(ctx)?;

        let jar_file = ctx.jar_file()?.to_path_buf();
        fs::copy_file_to_folder(&jar_file, ctx.jar_dest()?).await?;

        process_startup(ctx).await?;
        process_classpath(ctx)?;
        process_info_plist(ctx).await?;
        process_provision_profile(ctx).await?;
        codesign(ctx, &app_file).await?;
        notarize(ctx, &app_file).await?;

        Ok(app_file)
    }

    fn generators(&self) -> Vec<Box<dyn ArtifactGenerator>> {
        vec![Box::new(dmg::DmgGenerator), Box::new(pkg::PkgGenerator)]
    }
}

/// Places the launcher stub selected by the configured startup variant.
async fn place_stub(macos_folder: &Path, settings: &MacSettings) -> Result<PathBuf> {
    let stub_file = macos_folder.join("universalJavaApplicationStub");
    let normalize = settings.startup == MacStartup::Script;
    fs::copy_resource_to_file(templates::LAUNCHER_STUB, &stub_file, normalize).await?;
    fs::set_executable(&stub_file).await?;
    log::debug!("Using launcher stub resource {}", settings.startup.stub_name());
    Ok(stub_file)
}

/// Produces the startup executable with one of three strategies: an
/// elevation helper wrapping the stub, a user-supplied custom launcher, or
/// the stub itself.
async fn process_startup(ctx: &mut BuildContext) -> Result<()> {
    let macos_folder = ctx.executable_dest()?.to_path_buf();
    let settings = ctx.task.mac();

    let executable = if ctx.task.administrator_required {
        let stub = place_stub(&macos_folder, &settings).await?;
        let stub_name = stub
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let startup = macos_folder.join("startup");
        let data = render::extend(render::base_context(ctx), json!({ "stub_name": stub_name }));
        render::render_to_file("mac/startup", templates::STARTUP_SCRIPT, &data, &startup).await?;
        startup
    } else if let Some(launcher) = settings.custom_launcher.as_ref().filter(|l| l.is_file()) {
        fs::copy_file_to_folder(launcher, &macos_folder).await?
    } else {
        place_stub(&macos_folder, &settings).await?
    };

    fs::set_executable(&executable).await?;
    log::info!("Startup file created in {}", executable.display());
    ctx.set_executable(executable);
    Ok(())
}

/// Rewrites the classpath so entries resolve from inside the bundle.
fn process_classpath(ctx: &mut BuildContext) -> Result<()> {
    let settings = ctx.task.mac();
    let jar_name = ctx
        .jar_file()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prefix = if settings.relocate_jar { "Java/" } else { "" };
    let mut classpath = format!("{prefix}{jar_name}");
    if let Some(existing) = &ctx.task.classpath {
        classpath = format!("{classpath}:{existing}");
    }

    let mut entries: Vec<String> = classpath
        .split([':', ';'])
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();
    if !ctx.task.use_resources_as_working_dir {
        entries = entries
            .into_iter()
            .map(|entry| {
                if Path::new(&entry).is_absolute() {
                    entry
                } else {
                    format!("$ResourcesFolder/{entry}")
                }
            })
            .collect();
    }

    ctx.task.classpath = Some(entries.join(":"));
    Ok(())
}

/// Creates `Contents/Info.plist`, preferring a custom file over the
/// rendered template.
async fn process_info_plist(ctx: &BuildContext) -> Result<()> {
    let settings = ctx.task.mac();
    let contents_folder = ctx
        .resources_dest()?
        .parent()
        .ok_or_else(|| Error::Generic("resources folder has no parent".into()))?
        .to_path_buf();
    let plist_file = contents_folder.join("Info.plist");

    match settings.custom_info_plist.as_ref().filter(|p| p.is_file()) {
        Some(custom) => fs::copy_file(custom, &plist_file).await?,
        None => {
            let executable_name = ctx
                .executable()?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = render::extend(
                render::base_context(ctx),
                json!({
                    "app_id": settings.app_id,
                    "executable_name": executable_name,
                }),
            );
            render::render_to_file("mac/Info.plist", templates::INFO_PLIST, &data, &plist_file)
                .await?;
            xml::prettify(&plist_file).await?;
        }
    }

    log::info!("Info.plist file created in {}", plist_file.display());
    Ok(())
}

/// Installs the provisioning profile as `embedded.provisionprofile`.
async fn process_provision_profile(ctx: &BuildContext) -> Result<()> {
    let settings = ctx.task.mac();
    let Some(profile) = settings.provision_profile.as_ref().filter(|p| p.is_file()) else {
        return Ok(());
    };

    let contents_folder = ctx
        .resources_dest()?
        .parent()
        .ok_or_else(|| Error::Generic("resources folder has no parent".into()))?
        .to_path_buf();
    // the file name inside the bundle is fixed
    let destination = contents_folder.join("embedded.provisionprofile");
    fs::copy_file(profile, &destination).await?;
    log::info!(
        "Provision profile copied from {} to {}",
        profile.display(),
        destination.display()
    );
    Ok(())
}

/// Signs the bundle when enabled and executing on macOS; a platform
/// mismatch degrades to a warning.
async fn codesign(ctx: &BuildContext, app_file: &Path) -> Result<()> {
    let settings = ctx.task.mac();
    if !Platform::Mac.is_current() {
        log::warn!(
            "Generated app could not be signed: the current platform is {}",
            Platform::current()
        );
        return Ok(());
    }
    if !settings.codesign_app {
        log::warn!("App codesigning disabled");
        return Ok(());
    }

    let mut args: Vec<OsString> = vec![
        "--force".into(),
        "--deep".into(),
        "--options".into(),
        "runtime".into(),
        "--sign".into(),
        settings.developer_id.clone().into(),
    ];
    if let Some(entitlements) = &settings.entitlements {
        log::info!("Using provided entitlements {}", entitlements.display());
        args.push("--entitlements".into());
        args.push(entitlements.into());
    }
    args.push(app_file.into());

    exec::execute("codesign", args).await?;
    log::info!("App signed: {}", app_file.display());
    Ok(())
}

/// Submits the bundle for notarization when enabled and executing on
/// macOS. Submission is fire-and-forget: an inconclusive response is
/// logged as a warning, only a failed invocation is fatal.
async fn notarize(ctx: &BuildContext, app_file: &Path) -> Result<()> {
    let settings = ctx.task.mac();
    if !Platform::Mac.is_current() {
        log::warn!(
            "Generated app could not be notarized: the current platform is {}",
            Platform::current()
        );
        return Ok(());
    }
    if !settings.notarize_app {
        log::info!("App notarization disabled");
        return Ok(());
    }

    let (api_key, api_issuer) = match (&settings.api_key, &settings.api_issuer) {
        (Some(key), Some(issuer)) => (key.clone(), issuer.clone()),
        _ => {
            return Err(Error::InvalidConfig(
                "notarization requires 'api_key' and 'api_issuer' in the mac settings".into(),
            ));
        }
    };
    let app_id = settings.app_id.clone().unwrap_or_else(|| ctx.task.name.clone());

    // altool consumes a zip of the bundle
    let zip_file = ctx
        .assets_folder()?
        .join(format!("{}-notarization.zip", ctx.task.name));
    exec::execute(
        "ditto",
        [
            "-c".as_ref(),
            "-k".as_ref(),
            "--keepParent".as_ref(),
            app_file.as_os_str(),
            zip_file.as_os_str(),
        ],
    )
    .await?;

    let output = exec::execute(
        "xcrun",
        [
            "altool".as_ref(),
            "--notarize-app".as_ref(),
            "--primary-bundle-id".as_ref(),
            app_id.as_ref(),
            "--apiKey".as_ref(),
            api_key.as_ref(),
            "--apiIssuer".as_ref(),
            api_issuer.as_ref(),
            "--file".as_ref(),
            zip_file.as_os_str(),
        ],
    )
    .await?;

    if output.contains("RequestUUID") {
        log::info!("Notarization success!");
    } else {
        log::warn!(
            "Notarization result not as expected. That does not necessarily mean it failed; \
             the service may still be processing the upload."
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    #[test]
    fn init_forces_resources_working_dir() {
        let mut task = TaskBuilder::new("demo").build().unwrap();
        task.use_resources_as_working_dir = false;
        MacPackager.init(&mut task).unwrap();
        assert!(task.use_resources_as_working_dir);
    }

    #[test]
    fn init_defaults_app_id_to_name() {
        let mut task = TaskBuilder::new("demo").build().unwrap();
        MacPackager.init(&mut task).unwrap();
        assert_eq!(task.mac().app_id.as_deref(), Some("demo"));
    }

    #[test]
    fn classpath_is_prefixed_for_relocated_jar() {
        let task = TaskBuilder::new("demo").build().unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.set_jar_file(PathBuf::from("demo-1.0.jar"));
        process_classpath(&mut ctx).unwrap();
        assert_eq!(ctx.task.classpath.as_deref(), Some("Java/demo-1.0.jar"));
    }

    #[test]
    fn classpath_keeps_existing_entries() {
        let task = TaskBuilder::new("demo").build().unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.task.classpath = Some("libs/extra.jar".into());
        ctx.set_jar_file(PathBuf::from("demo-1.0.jar"));
        process_classpath(&mut ctx).unwrap();
        assert_eq!(
            ctx.task.classpath.as_deref(),
            Some("Java/demo-1.0.jar:libs/extra.jar")
        );
    }
}
