//! Windows platform packager.
//!
//! Produces a flat app folder with a batch launcher and an application
//! manifest, then delegates installer generation to the WiX merge module,
//! WiX MSI and Inno Setup generators (in that order; the MSI embeds the
//! merge module).

mod msi;
mod msm;
mod setup;
mod templates;

use crate::packager::context::BuildContext;
use crate::packager::error::Result;
use crate::packager::generator::ArtifactGenerator;
use crate::packager::platform::PlatformPackager;
use crate::packager::task::{PackageTask, Platform};
use crate::packager::utils::{exec, fs, render, xml};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct WindowsPackager;

#[async_trait]
impl PlatformPackager for WindowsPackager {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn init(&self, task: &mut PackageTask) -> Result<()> {
        task.windows = Some(task.windows());
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

        process_launcher(ctx).await?;
        process_manifest(ctx).await?;
        sign_launcher(ctx).await?;

        Ok(app_folder)
    }

    fn generators(&self) -> Vec<Box<dyn ArtifactGenerator>> {
        vec![
            Box::new(msm::MsmGenerator),
            Box::new(msi::MsiGenerator),
            Box::new(setup::SetupGenerator),
        ]
    }
}

/// Four-part numeric version required by WiX and the manifest schema.
pub(crate) fn windows_version(version: &str) -> String {
    let mut parts: Vec<u32> = version
        .split('.')
        .take(3)
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect();
    parts.resize(3, 0);
    format!("{}.{}.{}.0", parts[0], parts[1], parts[2])
}

/// Deterministic GUID derived from the application name, so rebuilt
/// installers of the same app keep their identity.
pub(crate) fn app_guid(task: &PackageTask, discriminator: &str) -> String {
    let seed = format!("{}/{}/{discriminator}", task.organization_name, task.name);
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, seed.as_bytes())
        .to_string()
        .to_uppercase()
}

/// Produces the startup launcher: a user-supplied binary is copied
/// verbatim, otherwise the batch launcher is rendered (elevating itself
/// when administrator privileges are required).
async fn process_launcher(ctx: &mut BuildContext) -> Result<()> {
    let destination = ctx.executable_dest()?.to_path_buf();
    let settings = ctx.task.windows();

    let executable = match settings.custom_launcher.as_ref().filter(|l| l.is_file()) {
        Some(launcher) => fs::copy_file_to_folder(launcher, &destination).await?,
        None => {
            let script = destination.join(format!("{}.bat", ctx.task.name));
            let classpath = ctx
                .task
                .classpath
                .clone()
                .unwrap_or_else(|| "%DIR%*;%DIR%libs\\*".into());
            let data = render::extend(
                render::base_context(ctx),
                json!({ "classpath": classpath }),
            );
            render::render_to_file("windows/launcher.bat", templates::LAUNCHER_BAT, &data, &script)
                .await?;
            script
        }
    };

    log::info!("Launcher created in {}", executable.display());
    ctx.set_executable(executable);
    Ok(())
}

/// Generates the application manifest, or copies the custom one.
async fn process_manifest(ctx: &BuildContext) -> Result<()> {
    let settings = ctx.task.windows();
    let manifest_file = ctx
        .app_folder()?
        .join(format!("{}.exe.manifest", ctx.task.name));

    match settings.custom_manifest.as_ref().filter(|m| m.is_file()) {
        Some(custom) => fs::copy_file(custom, &manifest_file).await?,
        None => {
            let data = render::extend(
                render::base_context(ctx),
                json!({ "version_win": windows_version(&ctx.task.version) }),
            );
            render::render_to_file(
                "windows/exe.manifest",
                templates::EXE_MANIFEST,
                &data,
                &manifest_file,
            )
            .await?;
            xml::prettify(&manifest_file).await?;
        }
    }

    log::info!("Manifest file created in {}", manifest_file.display());
    Ok(())
}

/// Authenticode-signs the launcher when signing is configured.
///
/// Requires executing on Windows; on any other platform the step degrades
/// to a warning. Rendered batch launchers are not PE files and cannot carry
/// a signature, so only custom launcher binaries are signed.
async fn sign_launcher(ctx: &BuildContext) -> Result<()> {
    let settings = ctx.task.windows();
    if !settings.signing_configured() {
        return Ok(());
    }
    if !Platform::Windows.is_current() {
        log::warn!(
            "Launcher could not be signed: the current platform is {}",
            Platform::current()
        );
        return Ok(());
    }

    let executable = ctx.executable()?;
    if executable.extension().is_none_or(|ext| ext != "exe") {
        log::warn!(
            "Launcher {} is not a PE binary and will not be signed",
            executable.display()
        );
        return Ok(());
    }

    let Some(cert) = settings.cert_path.as_ref() else {
        return Ok(());
    };

    let mut args: Vec<std::ffi::OsString> = vec![
        "sign".into(),
        "/fd".into(),
        "sha256".into(),
        "/f".into(),
        cert.into(),
    ];
    if let Some(password) = &settings.cert_password {
        args.push("/p".into());
        args.push(password.into());
    }
    if let Some(timestamp) = &settings.timestamp_url {
        args.push("/tr".into());
        args.push(timestamp.into());
        args.push("/td".into());
        args.push("sha256".into());
    }
    args.push(executable.into());

    exec::execute("signtool", args).await?;
    log::info!("Launcher signed: {}", executable.display());
    Ok(())
}

/// Recursively renders the app folder as nested WiX Directory/Component
/// elements, used by the merge module source.
pub(crate) fn harvest_fragment(root: &Path) -> Result<String> {
    fn visit(dir: &Path, counter: &mut u32, out: &mut String) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for path in entries {
            *counter += 1;
            let id = *counter;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if path.is_dir() {
                out.push_str(&format!("<Directory Id=\"d{id}\" Name=\"{name}\">\n"));
                visit(&path, counter, out)?;
                out.push_str("</Directory>\n");
            } else {
                let guid = Uuid::new_v5(
                    &Uuid::NAMESPACE_URL,
                    path.display().to_string().as_bytes(),
                )
                .to_string()
                .to_uppercase();
                out.push_str(&format!(
                    "<Component Id=\"c{id}\" Guid=\"{guid}\">\n<File Id=\"f{id}\" Source=\"{}\" Name=\"{name}\"/>\n</Component>\n",
                    path.display()
                ));
            }
        }
        Ok(())
    }

    let mut out = String::new();
    let mut counter = 0;
    visit(root, &mut counter, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    #[test]
    fn windows_version_is_always_four_numeric_parts() {
        assert_eq!(windows_version("1.2.3"), "1.2.3.0");
        assert_eq!(windows_version("1.0"), "1.0.0.0");
        assert_eq!(windows_version("2.0.1-beta"), "2.0.1.0");
        assert_eq!(windows_version("garbage"), "0.0.0.0");
    }

    #[test]
    fn guids_are_stable_per_app_and_discriminator() {
        let task = TaskBuilder::new("demo").build().unwrap();
        assert_eq!(app_guid(&task, "upgrade"), app_guid(&task, "upgrade"));
        assert_ne!(app_guid(&task, "upgrade"), app_guid(&task, "package"));
    }

    #[test]
    fn harvest_renders_components_for_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("app.jar"), "jar").unwrap();
        std::fs::write(tmp.path().join("sub/lib.jar"), "lib").unwrap();

        let fragment = harvest_fragment(tmp.path()).unwrap();
        assert!(fragment.contains("Name=\"app.jar\""));
        assert!(fragment.contains("<Directory"));
        assert!(fragment.contains("Name=\"lib.jar\""));
    }
}
