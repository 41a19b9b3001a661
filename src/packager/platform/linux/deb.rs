//! Debian package generation with dpkg-deb.

use super::templates;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, fs, render};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

/// dpkg architecture string for the execution host.
fn dpkg_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "i386",
        "aarch64" => "arm64",
        "arm" => "armhf",
        "riscv64" => "riscv64",
        _ => "all",
    }
}

pub struct DebGenerator;

#[async_trait]
impl ArtifactGenerator for DebGenerator {
    fn name(&self) -> &'static str {
        "DEB package"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.linux().generate_deb {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let task = &ctx.task;
        let app_folder = ctx.app_folder()?.to_path_buf();
        let assets_folder = ctx.assets_folder()?.to_path_buf();

        // stage the dpkg file system tree under the assets folder
        let staging = assets_folder.join(format!("{}-deb", task.name));
        fs::create_dir_all(&staging, true).await?;

        let data = render::extend(
            render::base_context(ctx),
            json!({
                "package_name": super::package_name(&task.name),
                "arch": dpkg_arch(),
                "maintainer": task.maintainer(),
            }),
        );
        render::render_to_file(
            "linux/control",
            templates::DEB_CONTROL,
            &data,
            &staging.join("DEBIAN/control"),
        )
        .await?;

        fs::copy_folder_content_to_folder(&app_folder, &staging.join("opt").join(&task.name))
            .await?;

        let desktop_file = assets_folder.join(format!("{}.desktop", task.name));
        if desktop_file.is_file() {
            fs::copy_file_to_folder(&desktop_file, &staging.join("usr/share/applications"))
                .await?;
        }

        let deb_file = task
            .output_directory
            .join(format!("{}_{}.deb", task.name, task.version));
        exec::execute(
            "dpkg-deb",
            [
                "--build".as_ref(),
                "--root-owner-group".as_ref(),
                staging.as_os_str(),
                deb_file.as_os_str(),
            ],
        )
        .await?;

        if !deb_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: deb_file,
            });
        }

        Ok(deb_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{LinuxSettings, Platform, TaskBuilder};

    #[test]
    fn disabled_deb_generation_skips() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .linux(LinuxSettings {
                generate_deb: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(DebGenerator.skip(&ctx));
    }

    #[test]
    fn current_platform_with_flag_enabled_runs() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .build()
            .unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.task.linux = Some(LinuxSettings::default());
        assert!(!DebGenerator.skip(&ctx));
    }
}
