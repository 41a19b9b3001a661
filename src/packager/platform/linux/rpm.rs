//! RPM package generation with rpmbuild.

use super::templates;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::generator::{ArtifactGenerator, foreign_platform_skip};
use crate::packager::utils::{exec, fs, render};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

/// RPM forbids dashes in the version field.
fn rpm_version(version: &str) -> String {
    version.replace('-', ".")
}

pub struct RpmGenerator;

#[async_trait]
impl ArtifactGenerator for RpmGenerator {
    fn name(&self) -> &'static str {
        "RPM package"
    }

    fn skip(&self, ctx: &BuildContext) -> bool {
        if !ctx.task.linux().generate_rpm {
            return true;
        }
        foreign_platform_skip(ctx, self.name())
    }

    async fn generate(&self, ctx: &mut BuildContext) -> Result<PathBuf> {
        let task = &ctx.task;
        let app_folder = ctx.app_folder()?.to_path_buf();
        let assets_folder = ctx.assets_folder()?.to_path_buf();

        let topdir = assets_folder.join("rpm");
        fs::create_dir_all(&topdir, true).await?;

        let package = super::package_name(&task.name);
        let version = rpm_version(&task.version);
        let desktop_file = assets_folder.join(format!("{}.desktop", task.name));
        let license_name = ctx
            .license_file()
            .map(|_| "See bundled LICENSE")
            .unwrap_or("Proprietary");

        let spec_file = assets_folder.join(format!("{}.spec", task.name));
        let data = render::extend(
            render::base_context(ctx),
            json!({
                "package_name": package,
                "rpm_version": version,
                "license_name": license_name,
                "app_folder": app_folder.display().to_string(),
                "desktop_file": desktop_file.display().to_string(),
            }),
        );
        render::render_to_file("linux/app.spec", templates::RPM_SPEC, &data, &spec_file).await?;

        exec::execute(
            "rpmbuild",
            [
                "-bb".as_ref(),
                "--define".as_ref(),
                format!("_topdir {}", topdir.display()).as_ref(),
                spec_file.as_os_str(),
            ],
        )
        .await?;

        // rpmbuild writes under RPMS/<arch>; locate the produced file
        let built = find_built_rpm(&topdir.join("RPMS"), &package)?;
        let rpm_file = task
            .output_directory
            .join(format!("{}_{}.rpm", task.name, task.version));
        fs::copy_file(&built, &rpm_file).await?;

        if !rpm_file.exists() {
            return Err(Error::MissingArtifact {
                artifact: self.name().into(),
                path: rpm_file,
            });
        }

        Ok(rpm_file)
    }
}

fn find_built_rpm(rpms_dir: &PathBuf, package: &str) -> Result<PathBuf> {
    for entry in walkdir::WalkDir::new(rpms_dir).into_iter().flatten() {
        let path = entry.path();
        let matches = path.extension().is_some_and(|ext| ext == "rpm")
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(package));
        if matches {
            return Ok(path.to_path_buf());
        }
    }
    Err(Error::MissingArtifact {
        artifact: "RPM package".into(),
        path: rpms_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::{LinuxSettings, Platform, TaskBuilder};

    #[test]
    fn rpm_version_replaces_dashes() {
        assert_eq!(rpm_version("1.0.0-beta.1"), "1.0.0.beta.1");
        assert_eq!(rpm_version("2.3.1"), "2.3.1");
    }

    #[test]
    fn disabled_rpm_generation_skips() {
        let task = TaskBuilder::new("demo")
            .platform(Platform::current())
            .linux(LinuxSettings {
                generate_rpm: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let ctx = BuildContext::new(task);
        assert!(RpmGenerator.skip(&ctx));
    }
}
