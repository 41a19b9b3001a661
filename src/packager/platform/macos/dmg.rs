//! DMG disk image generation with hdiutil.

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, ErrorExt, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, fs};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct DmgGenerator;

#[async_trait]
impl ArtifactGenerator for DmgGenerator {
    fn name(&self) -> &'static str {
        "DMG disk image"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.mac().generate_dmg {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let task = &ctx.task;
        let app_file = ctx.app_folder()?.join(format!("{}.app", task.name));
        if !app_file.is_dir() {
            return Err(Error::Generic(format!(
                "app bundle {} does not exist; the app must be created before the DMG",
                app_file.display()
            )));
        }

        // stage the bundle with a drag-to-install Applications link
        let staging = ctx.assets_folder()?.join("dmg");
        fs::create_dir_all(&staging, true).await?;
        fs::copy_folder_content_to_folder(&app_file, &staging.join(format!("{}.app", task.name)))
            .await?;

        #[cfg(unix)]
        {
            let applications_link = staging.join("Applications");
            std::os::unix::fs::symlink("/Applications", &applications_link)
                .fs_context("creating Applications symlink", &applications_link)?;
        }

        let dmg_file = task
            .output_directory
            .join(format!("{}_{}.dmg", task.name, task.version));
        exec::execute(
            "hdiutil",
            [
                "create".as_ref(),
                "-volname".as_ref(),
                task.display_name.as_ref(),
                "-srcfolder".as_ref(),
                staging.as_os_str(),
                "-ov".as_ref(),
                "-format".as_ref(),
                "UDZO".as_ref(),
                dmg_file.as_os_str(),
            ],
        )
        .await?;

        if !dmg_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: dmg_file,
            });
        }

        Ok(dmg_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{MacSettings, Platform, TaskBuilder};

    #[test]
    fn disabled_dmg_generation_skips() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .mac(MacSettings {
                generate_dmg: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(DmgGenerator.skip(&ctx));
    }

    #[tokio::test]
    async fn missing_app_bundle_is_a_generation_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .output_directory(tmp.path())
            .build()
            .unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.set_app_folder(tmp.path().join("demo"));
        ctx.set_assets_folder(tmp.path().join("assets"));

        let err = DmgGenerator.generate(&mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
