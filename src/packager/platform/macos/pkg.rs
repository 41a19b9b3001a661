//! PKG installer generation with pkgbuild.

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::exec;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct PkgGenerator;

#[async_trait]
impl ArtifactGenerator for PkgGenerator {
    fn name(&self) -> &'static str {
        "PKG installer"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.mac().generate_pkg {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let task = &ctx.task;
        let app_file = ctx.app_folder()?.join(format!("{}.app", task.name));
        if !app_file.is_dir() {
            return Err(Error::Generic(format!(
                "app bundle {} does not exist; the app must be created before the PKG",
                app_file.display()
            )));
        }

        let identifier = task
            .mac()
            .app_id
            .unwrap_or_else(|| task.name.clone());
        let pkg_file = task
            .output_directory
            .join(format!("{}_{}.pkg", task.name, task.version));

        exec::execute(
            "pkgbuild",
            [
                "--install-location".as_ref(),
                "/Applications".as_ref(),
                "--component".as_ref(),
                app_file.as_os_str(),
                "--identifier".as_ref(),
                identifier.as_ref(),
                "--version".as_ref(),
                task.version.as_ref(),
                pkg_file.as_os_str(),
            ],
        )
        .await?;

        if !pkg_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: pkg_file,
            });
        }

        Ok(pkg_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{MacSettings, Platform, TaskBuilder};

    #[test]
    fn disabled_pkg_generation_skips() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .mac(MacSettings {
                generate_pkg: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(PkgGenerator.skip(&ctx));
    }
}
