//! WiX MSI installer generation.

use super::templates;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, render, xml};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

pub struct MsiGenerator;

#[async_trait]
impl ArtifactGenerator for MsiGenerator {
    fn name(&self) -> &'static str {
        "MSI installer"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.windows().generate_msi {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        // the merge module is produced by the preceding generator
        let msm_file = ctx.msm_file().map(PathBuf::from).ok_or_else(|| {
            Error::Generic("MSI installer requires the merge module, which was not generated".into())
        })?;

        let task = &ctx.task;
        let name = task.name.clone();
        let version = task.version.clone();
        let output_directory = task.output_directory.clone();
        let assets_folder = ctx.assets_folder()?.to_path_buf();
        let settings = task.windows();

        let upgrade_code = settings
            .upgrade_code
            .clone()
            .unwrap_or_else(|| super::app_guid(task, "upgrade"));

        let wxs_file = assets_folder.join(format!("{name}.wxs"));
        let data = render::extend(
            render::base_context(ctx),
            json!({
                "version_win": super::windows_version(&version),
                "upgrade_code": upgrade_code,
                "msm_file": msm_file.display().to_string(),
            }),
        );
        render::render_to_file("windows/msi.wxs", templates::MSI_WXS, &data, &wxs_file).await?;
        log::info!("WXS file generated in {}!", wxs_file.display());

        xml::prettify(&wxs_file).await?;

        log::info!("Compiling file {}", wxs_file.display());
        let wixobj_file = assets_folder.join(format!("{name}.wixobj"));
        exec::execute(
            "candle",
            [
                "-out".as_ref(),
                wixobj_file.as_os_str(),
                wxs_file.as_os_str(),
            ],
        )
        .await?;
        log::info!("WIXOBJ file generated in {}!", wixobj_file.display());

        log::info!("Linking file {}", wixobj_file.display());
        let msi_file = output_directory.join(format!("{name}_{version}.msi"));
        exec::execute(
            "light",
            [
                "-spdb".as_ref(),
                "-out".as_ref(),
                msi_file.as_os_str(),
                wixobj_file.as_os_str(),
            ],
        )
        .await?;

        if !msi_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: msi_file,
            });
        }

        Ok(msi_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{Platform, TaskBuilder, WindowsSettings};

    #[test]
    fn skips_when_msi_generation_is_disabled() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .windows(WindowsSettings {
                generate_msi: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(MsiGenerator.skip(&ctx));
    }

    #[tokio::test]
    async fn missing_merge_module_is_a_generation_failure() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .build()
            .unwrap();
        let mut ctx = BuildContext::new(task);
        let err = MsiGenerator.generate(&mut ctx).await.unwrap_err();
        assert!(err.to_string().contains("merge module"));
    }
}
