//! WiX merge module (.msm) generation.
//!
//! The merge module carries the whole app folder and is the unit the MSI
//! generator embeds, so it is built whenever either artifact is requested.

use super::templates;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, render, xml};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

pub struct MsmGenerator;

#[async_trait]
impl ArtifactGenerator for MsmGenerator {
    fn name(&self) -> &'static str {
        "MSI merge module"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        let settings = ctx.task.windows();
        if !settings.generate_msm && !settings.generate_msi {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        if let Some(msm) = ctx.msm_file() {
            return Ok(msm.to_path_buf());
        }

        let task = &ctx.task;
        let name = task.name.clone();
        let version = task.version.clone();
        let output_directory = task.output_directory.clone();
        let assets_folder = ctx.assets_folder()?.to_path_buf();

        // render the WXS descriptor from the app folder content
        let wxs_file = assets_folder.join(format!("{name}.msm.wxs"));
        let harvest = super::harvest_fragment(ctx.app_folder()?)?;
        let data = render::extend(
            render::base_context(ctx),
            json!({
                "module_id": ctx.task.name.replace(['-', ' '], "_"),
                "version_win": super::windows_version(&version),
                "package_guid": super::app_guid(&ctx.task, "msm-package"),
                "harvest": harvest,
            }),
        );
        render::render_to_file("windows/msm.wxs", templates::MSM_WXS, &data, &wxs_file).await?;
        log::info!("WXS file generated in {}!", wxs_file.display());

        xml::prettify(&wxs_file).await?;

        // candle wxs file
        log::info!("Compiling file {}", wxs_file.display());
        let wixobj_file = assets_folder.join(format!("{name}.msm.wixobj"));
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

        // light wixobj file
        log::info!("Linking file {}", wixobj_file.display());
        let msm_file = output_directory.join(format!("{name}_{version}.msm"));
        exec::execute(
            "light",
            [
                "-spdb".as_ref(),
                "-out".as_ref(),
                msm_file.as_os_str(),
                wixobj_file.as_os_str(),
            ],
        )
        .await?;

        if !msm_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: msm_file,
            });
        }

        ctx.set_msm_file(msm_file.clone());

        Ok(msm_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{Platform, TaskBuilder, WindowsSettings};

    fn context(settings: WindowsSettings) -> BuildContext {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .windows(settings)
            .build()
            .unwrap();
        BuildContext::new(task)
    }

    #[test]
    fn skips_when_neither_msm_nor_msi_is_requested() {
        let ctx = context(WindowsSettings {
            generate_msm: false,
            generate_msi: false,
            ..Default::default()
        });
        assert!(MsmGenerator.skip(&ctx));
    }

    #[test]
    fn runs_when_only_msi_is_requested() {
        let ctx = context(WindowsSettings {
            generate_msm: false,
            generate_msi: true,
            ..Default::default()
        });
        assert!(!MsmGenerator.skip(&ctx));
    }

    #[tokio::test]
    async fn chained_msm_file_short_circuits_generation() {
        let mut ctx = context(WindowsSettings::default());
        ctx.set_msm_file(PathBuf::from("demo_1.0.0.msm"));
        let file = MsmGenerator.generate(&mut ctx).await.unwrap();
        assert_eq!(file, PathBuf::from("demo_1.0.0.msm"));
    }
}
