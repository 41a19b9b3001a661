//! Linux platform packager.
//!
//! Produces a flat app folder with a shell launcher and a freedesktop menu
//! entry, then delegates installer generation to the DEB and RPM
//! generators.

mod deb;
mod rpm;
mod templates;

use crate::packager::context::BuildContext;
use crate::packager::error::Result;
use crate::packager::generator::ArtifactGenerator;
use crate::packager::platform::PlatformPackager;
use crate::packager::task::{PackageTask, Platform};
use crate::packager::utils::{fs, render};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

/// Debian-style package name: lowercase, no underscores.
pub(crate) fn package_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "-")
}

pub struct LinuxPackager;

#[async_trait]
impl PlatformPackager for LinuxPackager {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn init(&self, task: &mut PackageTask) -> Result<()> {
        task.linux = Some(task.linux());
        Ok(())
    }

    async fn create_structure(&self, ctx: &mut BuildContext) -> Result<()> {
        let app_folder = ctx.app_folder()?.to_path_buf();
        let jre_folder = app_folder.join(&ctx.task.jre_directory_name);

        ctx.set_executable_dest(app_folder.clone());
        ctx.set_jar_dest(app_folder.clone());
        ctx.set_jre_dest(jre_folder);
        ctx.set_resources_dest(app_folder);
        Ok(())
    }

    async fn assemble(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let app_folder = ctx.app_folder()?.to_path_buf();

        let jar_file = ctx.jar_file()?.to_path_buf();
        fs::copy_file_to_folder(&jar_file, ctx.jar_dest()?).await?;

        process_startup_script(ctx).await?;
        process_desktop_file(ctx).await?;

        Ok(app_folder)
    }

    fn generators(&self) -> Vec<Box<dyn ArtifactGenerator>> {
        vec![Box::new(deb::DebGenerator), Box::new(rpm::RpmGenerator)]
    }
}

/// Produces the startup launcher: a user-supplied one is copied verbatim,
/// otherwise the shell script is rendered (with an elevation preamble when
/// administrator privileges are required).
async fn process_startup_script(ctx: &mut BuildContext) -> Result<()> {
    let destination = ctx.executable_dest()?.to_path_buf();
    let settings = ctx.task.linux();

    let executable = match settings.custom_launcher.as_ref().filter(|l| l.is_file()) {
        Some(launcher) => fs::copy_file_to_folder(launcher, &destination).await?,
        None => {
            let script = destination.join(&ctx.task.name);
            let jar_name = ctx
                .jar_file()?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let classpath = ctx
                .task
                .classpath
                .clone()
                .unwrap_or_else(|| format!("$APP_DIR/{jar_name}:$APP_DIR/libs/*"));
            let data = render::extend(
                render::base_context(ctx),
                json!({ "classpath": classpath }),
            );
            render::render_to_file("linux/startup.sh", templates::STARTUP_SH, &data, &script)
                .await?;
            script
        }
    };

    fs::set_executable(&executable).await?;
    log::info!("Startup script created in {}", executable.display());
    ctx.set_executable(executable);
    Ok(())
}

/// Renders the freedesktop menu entry into the assets folder, where the
/// DEB/RPM generators pick it up. A custom .desktop file wins over the
/// rendered one.
async fn process_desktop_file(ctx: &mut BuildContext) -> Result<()> {
    let settings = ctx.task.linux();
    let desktop_file = ctx
        .assets_folder()?
        .join(format!("{}.desktop", ctx.task.name));

    match settings.custom_desktop_file.as_ref().filter(|f| f.is_file()) {
        Some(custom) => fs::copy_file(custom, &desktop_file).await?,
        None => {
            let data = render::extend(
                render::base_context(ctx),
                json!({ "categories": settings.categories.join(";") }),
            );
            render::render_to_file(
                "linux/app.desktop",
                templates::DESKTOP_ENTRY,
                &data,
                &desktop_file,
            )
            .await?;
        }
    }

    log::info!("Desktop file created in {}", desktop_file.display());
    Ok(())
}
