//! Inno Setup self-extracting installer generation.

use super::templates;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, render};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

pub struct SetupGenerator;

#[async_trait]
impl ArtifactGenerator for SetupGenerator {
    fn name(&self) -> &'static str {
        "Setup installer"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.windows().generate_setup {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let task = &ctx.task;
        let name = task.name.clone();
        let version = task.version.clone();
        let output_directory = task.output_directory.clone();
        let assets_folder = ctx.assets_folder()?.to_path_buf();
        let settings = task.windows();

        let executable_name = ctx
            .executable()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{name}.bat"));

        let iss_file = assets_folder.join(format!("{name}.iss"));
        let data = render::extend(
            render::base_context(ctx),
            json!({
                "app_id": super::app_guid(task, "setup"),
                "app_folder": ctx.app_folder()?.display().to_string(),
                "output_dir": output_directory.display().to_string(),
                "executable_name": executable_name,
                "icon_file": ctx.icon_file()?.display().to_string(),
                "license_file": ctx.license_file().map(|l| l.display().to_string()),
                "languages": settings.setup_languages,
            }),
        );
        render::render_to_file("windows/setup.iss", templates::ISS_SETUP, &data, &iss_file)
            .await?;

        log::info!("Compiling file {}", iss_file.display());
        exec::execute("iscc", [iss_file.as_os_str()]).await?;

        let setup_file = output_directory.join(format!("{name}_{version}.exe"));
        if !setup_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: setup_file,
            });
        }

        Ok(setup_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{Platform, TaskBuilder, WindowsSettings};

    #[test]
    fn skips_when_setup_generation_is_disabled() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .windows(WindowsSettings {
                generate_setup: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(SetupGenerator.skip(&ctx));
    }
}
