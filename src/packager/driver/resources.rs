//! Shared resource resolution: license and icon.
//!
//! Resolution walks a priority chain and always terminates with either a
//! usable file or an explicit absent state. "Not found" is never an error;
//! only malformed sources (an invalid declared license URL) are.

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, Result};
use crate::packager::task::Platform;
use crate::packager::utils::{fs, http};
use std::path::PathBuf;

/// 1x1 transparent PNG, used to synthesize the default icons.
const DEFAULT_ICON_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Default icon bytes in the container format conventional on the platform.
///
/// ICO and ICNS both accept PNG payloads, so the default PNG is wrapped in
/// the corresponding container header.
pub fn default_icon(platform: Platform) -> Vec<u8> {
    match platform.resolve() {
        Platform::Windows => {
            let png = DEFAULT_ICON_PNG;
            let mut ico = Vec::with_capacity(22 + png.len());
            // ICONDIR: reserved, type 1 (icon), one image
            ico.extend_from_slice(&[0, 0, 1, 0, 1, 0]);
            // ICONDIRENTRY: 1x1, no palette, 1 plane, 32 bpp
            ico.extend_from_slice(&[1, 1, 0, 0, 1, 0, 32, 0]);
            ico.extend_from_slice(&(png.len() as u32).to_le_bytes());
            ico.extend_from_slice(&22u32.to_le_bytes());
            ico.extend_from_slice(png);
            ico
        }
        Platform::Mac => {
            let png = DEFAULT_ICON_PNG;
            let chunk_len = (png.len() + 8) as u32;
            let total_len = chunk_len + 8;
            let mut icns = Vec::with_capacity(total_len as usize);
            icns.extend_from_slice(b"icns");
            icns.extend_from_slice(&total_len.to_be_bytes());
            icns.extend_from_slice(b"ic07");
            icns.extend_from_slice(&chunk_len.to_be_bytes());
            icns.extend_from_slice(png);
            icns
        }
        _ => DEFAULT_ICON_PNG.to_vec(),
    }
}

/// Resolves license and icon and records them in the context.
pub async fn resolve_resources(ctx: &mut BuildContext) -> Result<()> {
    log::info!("Resolving resources ...");

    let license = resolve_license(ctx).await?;
    ctx.set_license_file(license);

    let icon = resolve_icon(ctx).await?;
    ctx.set_icon_file(icon);

    log::info!("Resources resolved!");
    Ok(())
}

/// Locates the license file.
///
/// Chain: explicit override, declared license URL (downloaded into the
/// assets folder), conventional `LICENSE` at the project root. Resolves to
/// `None` when every step comes up empty.
pub async fn resolve_license(ctx: &BuildContext) -> Result<Option<PathBuf>> {
    let task = &ctx.task;

    let mut license = task.license_file.clone();
    if let Some(file) = &license
        && !file.exists()
    {
        log::warn!("Specified license file doesn't exist: {}", file.display());
        license = None;
    }

    if license.is_none()
        && let Some(url_str) = &task.license_url
    {
        url::Url::parse(url_str).map_err(|e| {
            Error::InvalidConfig(format!("invalid license URL specified: {url_str}: {e}"))
        })?;
        let dest = ctx.assets_folder()?.join("LICENSE");
        match http::download_to_file(url_str, &dest).await {
            Ok(()) => license = Some(dest),
            Err(e) => log::warn!("Cannot download license from {url_str}: {e}"),
        }
    }

    if license.is_none() {
        let conventional = task.project_directory.join("LICENSE");
        if conventional.exists() {
            license = Some(conventional);
        }
    }

    match &license {
        Some(file) => log::info!("License file found: {}", file.display()),
        None => log::warn!("No license file specified"),
    }

    Ok(license)
}

/// Locates the icon file.
///
/// Chain: explicit override, conventional per-platform location in the
/// assets dir, bundled default copied into the assets folder. Always
/// resolves to a file.
pub async fn resolve_icon(ctx: &BuildContext) -> Result<PathBuf> {
    let task = &ctx.task;
    let platform = task.platform.resolve();
    let extension = platform.icon_extension();

    let mut icon = task.icon_file.clone().unwrap_or_else(|| {
        task.assets_dir
            .join(platform.to_string())
            .join(format!("{}{extension}", task.name))
    });

    if !icon.exists() {
        let file_name = icon
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| format!("{}{extension}", task.name).into());
        let dest = ctx.assets_folder()?.join(file_name);
        fs::copy_resource_to_file(&default_icon(platform), &dest, false).await?;
        icon = dest;
    }

    log::info!("Icon file resolved: {}", icon.display());
    Ok(icon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    fn context(tmp: &std::path::Path) -> BuildContext {
        let task = TaskBuilder::new("demo")
            .project_directory(tmp.join("project"))
            .build()
            .unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.task.assets_dir = tmp.join("project/assets");
        ctx.set_assets_folder(tmp.join("out/assets"));
        ctx
    }

    #[tokio::test]
    async fn license_resolves_to_absent_when_nothing_matches() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("project")).unwrap();
        let ctx = context(tmp.path());
        assert!(resolve_license(&ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn license_falls_back_to_project_root() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("project")).unwrap();
        std::fs::write(tmp.path().join("project/LICENSE"), "MIT").unwrap();
        let ctx = context(tmp.path());
        let license = resolve_license(&ctx).await.unwrap().unwrap();
        assert!(license.ends_with("LICENSE"));
    }

    #[tokio::test]
    async fn malformed_license_url_is_a_configuration_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("project")).unwrap();
        let mut ctx = context(tmp.path());
        ctx.task.license_url = Some("not a url at all".into());
        let err = resolve_license(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn missing_icon_is_replaced_by_bundled_default() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("project")).unwrap();
        let ctx = context(tmp.path());

        let icon = resolve_icon(&ctx).await.unwrap();
        assert!(icon.exists());
        assert!(std::fs::metadata(&icon).unwrap().len() > 0);
    }

    #[tokio::test]
    async fn explicit_icon_wins_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("project")).unwrap();
        let explicit = tmp.path().join("custom.png");
        std::fs::write(&explicit, DEFAULT_ICON_PNG).unwrap();
        let mut ctx = context(tmp.path());
        ctx.task.icon_file = Some(explicit.clone());

        assert_eq!(resolve_icon(&ctx).await.unwrap(), explicit);
    }

    #[test]
    fn default_icons_are_nonempty_for_all_platforms() {
        for platform in [Platform::Linux, Platform::Mac, Platform::Windows] {
            assert!(!default_icon(platform).is_empty());
        }
    }
}
