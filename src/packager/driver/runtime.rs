//! Java runtime bundling.
//!
//! Either embeds a user-supplied JRE verbatim or synthesizes a trimmed
//! runtime with jlink from the configured JDK.

use super::modules::resolve_modules;
use crate::bail;
use crate::packager::context::BuildContext;
use crate::packager::error::{Error, ErrorExt, Result};
use crate::packager::utils::{exec, fs};
use std::path::{Path, PathBuf};

/// Last JDK generation without jlink. Trimming needs something newer.
const LEGACY_JDK_MAJOR: u32 = 8;

/// The toolchain active in this environment, from `JAVA_HOME`.
pub fn current_jdk() -> Result<PathBuf> {
    std::env::var_os("JAVA_HOME")
        .map(PathBuf::from)
        .ok_or_else(|| {
            Error::InvalidConfig(
                "JAVA_HOME is not set; set it or configure 'jdk_path' explicitly".into(),
            )
        })
}

/// Extracts the major version from a JDK `release` file's contents.
fn major_version_from_release(text: &str) -> Option<u32> {
    let line = text
        .lines()
        .find(|line| line.trim_start().starts_with("JAVA_VERSION="))?;
    let version = line.split('=').nth(1)?.trim().trim_matches('"');
    parse_major_version(version)
}

/// Parses a Java version string ("1.8.0_292", "11.0.2", "17") into its
/// major version number.
fn parse_major_version(version: &str) -> Option<u32> {
    let mut parts = version.split(['.', '_', '-', '+']);
    let first = parts.next()?.parse::<u32>().ok()?;
    if first == 1 {
        parts.next()?.parse::<u32>().ok()
    } else {
        Some(first)
    }
}

/// Determines the major version of a JDK installation.
///
/// Reads the `release` file next to the JDK's `bin` folder; when that file
/// is missing, falls back to running `java -version`.
pub async fn jdk_major_version(jdk: &Path) -> Result<u32> {
    let release = jdk.join("release");
    if release.is_file() {
        let text = tokio::fs::read_to_string(&release)
            .await
            .fs_context("reading JDK release file", &release)?;
        if let Some(major) = major_version_from_release(&text) {
            return Ok(major);
        }
    }

    let java = jdk.join("bin").join("java");
    let output = exec::run(&java, ["-version"]).await?;
    // `java -version` prints to stderr
    let text = format!("{}\n{}", output.stderr, output.stdout);
    text.lines()
        .find_map(|line| {
            let (_, rest) = line.split_once('"')?;
            let (version, _) = rest.split_once('"')?;
            parse_major_version(version)
        })
        .ok_or_else(|| {
            Error::Generic(format!(
                "could not determine Java version of JDK at {}",
                jdk.display()
            ))
        })
}

/// Bundles a Java runtime into the destination recorded by the platform
/// packager, following the configured strategy.
pub async fn bundle_jre(ctx: &mut BuildContext) -> Result<()> {
    if !ctx.task.bundle_jre {
        log::warn!("Bundling JRE disabled by property 'bundle_jre'!");
        return Ok(());
    }
    let current = current_jdk()?;
    bundle_jre_with(ctx, &current).await
}

pub(crate) async fn bundle_jre_with(ctx: &mut BuildContext, current_jdk: &Path) -> Result<()> {
    let destination = ctx.jre_dest()?.to_path_buf();
    let jre_path = ctx.task.jre_path.clone();

    log::info!("Bundling JRE ... with {}", current_jdk.display());

    if let Some(jre) = jre_path {
        embed_specific_jre(&jre, &destination).await?;
    } else {
        let major = jdk_major_version(current_jdk).await?;

        if major <= LEGACY_JDK_MAJOR {
            return Err(Error::Generic(format!(
                "could not create a customized JRE because the active JDK version is {major}. \
                 Use the 'jre_path' property to specify the JRE location to be embedded"
            )));
        }

        let platform = ctx.task.platform.resolve();
        let jdk_path = ctx.task.jdk_path.clone().unwrap_or_else(|| current_jdk.to_path_buf());

        if !platform.is_current() && jdk_path.as_path() == current_jdk {
            log::warn!(
                "Cannot create a customized JRE: target platform ({platform}) is different from \
                 the execution platform. Use the 'jdk_path' property."
            );
            ctx.task.bundle_jre = false;
        } else {
            link_customized_jre(ctx, current_jdk, &jdk_path, major, &destination).await?;
        }
    }

    // drop the bundled legal notices, they only add size
    fs::remove_folder(&destination.join("legal")).await?;

    if ctx.task.bundle_jre {
        log::info!("JRE bundled in {}!", destination.display());
    } else {
        log::info!("JRE bundling skipped!");
    }

    Ok(())
}

/// Copies a user-supplied JRE into the bundle.
async fn embed_specific_jre(jre: &Path, destination: &Path) -> Result<()> {
    log::info!("Embedding JRE from {}", jre.display());

    if !jre.exists() {
        return Err(Error::InvalidConfig(format!(
            "JRE path specified does not exist: {}",
            jre.display()
        )));
    }
    if !jre.is_dir() {
        return Err(Error::InvalidConfig(format!(
            "JRE path specified is not a folder: {}",
            jre.display()
        )));
    }

    fs::remove_folder(destination).await?;
    fs::copy_folder_content_to_folder(jre, destination).await?;

    let bin_folder = destination.join("bin");
    if !bin_folder.exists() {
        bail!(
            "could not embed JRE from {}: {} doesn't exist",
            jre.display(),
            bin_folder.display()
        );
    }
    fs::set_dir_files_executable(&bin_folder).await
}

/// Synthesizes a trimmed runtime with jlink.
async fn link_customized_jre(
    ctx: &BuildContext,
    current_jdk: &Path,
    jdk_path: &Path,
    major: u32,
    destination: &Path,
) -> Result<()> {
    let libs_folder = ctx.jar_dest()?.join("libs");
    let modules = resolve_modules(
        current_jdk,
        major,
        &libs_folder,
        ctx.jar_file()?,
        ctx.task.customized_jre,
        &ctx.task.modules,
        &ctx.task.additional_modules,
    )
    .await?;

    log::info!("Creating JRE with next modules included: {modules}");

    let modules_dir = jdk_path.join("jmods");
    if !modules_dir.exists() {
        bail!("jmods folder doesn't exist: {}", modules_dir.display());
    }
    log::info!("Using {} modules directory", modules_dir.display());

    let jlink = current_jdk.join("bin").join("jlink");

    fs::remove_folder(destination).await?;

    exec::execute(
        &jlink,
        [
            "--module-path".as_ref(),
            modules_dir.as_os_str(),
            "--add-modules".as_ref(),
            modules.as_ref(),
            "--output".as_ref(),
            destination.as_os_str(),
            "--no-header-files".as_ref(),
            "--no-man-pages".as_ref(),
            "--strip-debug".as_ref(),
            "--compress=2".as_ref(),
        ],
    )
    .await?;

    fs::set_dir_files_executable(&destination.join("bin")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    fn fake_jdk(dir: &Path, java_version: &str) -> PathBuf {
        let jdk = dir.join("jdk");
        std::fs::create_dir_all(jdk.join("bin")).unwrap();
        std::fs::write(
            jdk.join("release"),
            format!("IMPLEMENTOR=\"Test\"\nJAVA_VERSION=\"{java_version}\"\n"),
        )
        .unwrap();
        jdk
    }

    fn context_with_dest(dest: PathBuf) -> BuildContext {
        let task = TaskBuilder::new("demo").build().unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.set_jre_dest(dest);
        ctx
    }

    #[test]
    fn major_version_parsing_handles_legacy_and_modern_schemes() {
        assert_eq!(parse_major_version("1.8.0_292"), Some(8));
        assert_eq!(parse_major_version("11.0.2"), Some(11));
        assert_eq!(parse_major_version("17"), Some(17));
        assert_eq!(parse_major_version("21.0.1+12"), Some(21));
        assert_eq!(parse_major_version("garbage"), None);
    }

    #[test]
    fn release_file_parsing() {
        let text = "IMPLEMENTOR=\"Eclipse Adoptium\"\nJAVA_VERSION=\"17.0.8\"\nOS_ARCH=\"x86_64\"\n";
        assert_eq!(major_version_from_release(text), Some(17));
    }

    #[tokio::test]
    async fn missing_explicit_jre_fails_without_touching_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("bundle/jre");
        let mut ctx = context_with_dest(dest.clone());
        ctx.task.jre_path = Some(tmp.path().join("no-such-jre"));

        let err = bundle_jre_with(&mut ctx, tmp.path()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn explicit_jre_without_bin_folder_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let jre = tmp.path().join("jre");
        std::fs::create_dir_all(jre.join("lib")).unwrap();
        let dest = tmp.path().join("bundle/jre");
        let mut ctx = context_with_dest(dest.clone());
        ctx.task.jre_path = Some(jre);

        let err = bundle_jre_with(&mut ctx, tmp.path()).await.unwrap_err();
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[tokio::test]
    async fn explicit_jre_is_copied_and_marked_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let jre = tmp.path().join("jre");
        std::fs::create_dir_all(jre.join("bin")).unwrap();
        std::fs::write(jre.join("bin/java"), "#!/bin/sh\n").unwrap();
        std::fs::create_dir_all(jre.join("legal")).unwrap();
        std::fs::write(jre.join("legal/NOTICE"), "notice").unwrap();

        let dest = tmp.path().join("bundle/jre");
        let mut ctx = context_with_dest(dest.clone());
        ctx.task.jre_path = Some(jre);

        bundle_jre_with(&mut ctx, tmp.path()).await.unwrap();

        assert!(dest.join("bin/java").is_file());
        // legal notices are stripped from the bundled runtime
        assert!(!dest.join("legal").exists());
    }

    #[tokio::test]
    async fn trimming_on_legacy_toolchain_always_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let jdk = fake_jdk(tmp.path(), "1.8.0_292");
        let mut ctx = context_with_dest(tmp.path().join("bundle/jre"));
        ctx.set_jar_dest(tmp.path().to_path_buf());
        ctx.set_jar_file(tmp.path().join("app.jar"));

        let err = bundle_jre_with(&mut ctx, &jdk).await.unwrap_err();
        assert!(err.to_string().contains("customized JRE"));
    }

    #[tokio::test]
    async fn disabled_bundling_is_a_warning_not_an_error() {
        let task = TaskBuilder::new("demo").bundle_jre(false).build().unwrap();
        let mut ctx = BuildContext::new(task);
        bundle_jre(&mut ctx).await.unwrap();
    }
}
