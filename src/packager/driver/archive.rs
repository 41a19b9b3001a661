//! Tarball and zipball bundles of the app folder.

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, ErrorExt, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::{Path, PathBuf};

/// Archives the app folder as requested by the task flags.
///
/// Returns the created archive files, in tarball-then-zipball order. Does
/// nothing when neither flag is set.
pub async fn create_bundles(ctx: &BuildContext) -> Result<Vec<PathBuf>> {
    let task = &ctx.task;
    if !task.create_tarball && !task.create_zipball {
        return Ok(Vec::new());
    }

    log::info!("Bundling app in tarball/zipball ...");

    let app_folder = ctx.app_folder()?.to_path_buf();
    let base_name = format!(
        "{}-{}-{}",
        task.name,
        task.version,
        task.platform.resolve()
    );
    let mut bundles = Vec::new();

    if task.create_tarball {
        let tarball = task.output_directory.join(format!("{base_name}.tar.gz"));
        write_tarball(&app_folder, &tarball, &task.name).await?;
        log::info!("Tarball created in {}", tarball.display());
        bundles.push(tarball);
    }

    if task.create_zipball {
        let zipball = task.output_directory.join(format!("{base_name}.zip"));
        write_zipball(&app_folder, &zipball, &task.name).await?;
        log::info!("Zipball created in {}", zipball.display());
        bundles.push(zipball);
    }

    Ok(bundles)
}

async fn write_tarball(app_folder: &Path, dest: &Path, top_dir: &str) -> Result<()> {
    let app_folder = app_folder.to_path_buf();
    let dest = dest.to_path_buf();
    let top_dir = top_dir.to_string();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::create(&dest).fs_context("creating tarball", &dest)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.append_dir_all(&top_dir, &app_folder)?;
        builder.into_inner()?.finish()?;
        Ok(())
    })
    .await
    .map_err(|e| Error::Generic(format!("tarball task panicked: {e}")))?
}

async fn write_zipball(app_folder: &Path, dest: &Path, top_dir: &str) -> Result<()> {
    let app_folder = app_folder.to_path_buf();
    let dest = dest.to_path_buf();
    let top_dir = top_dir.to_string();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::create(&dest).fs_context("creating zipball", &dest)?;
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for entry in walkdir::WalkDir::new(&app_folder) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&app_folder)?;
            if rel_path.as_os_str().is_empty() {
                continue;
            }
            if entry.file_type().is_dir() {
                continue;
            }
            let archived = Path::new(&top_dir).join(rel_path);
            writer.start_file_from_path(&archived, options)?;
            let mut source = std::fs::File::open(entry.path())
                .fs_context("reading file for zipball", entry.path())?;
            std::io::copy(&mut source, &mut writer)
                .fs_context("writing zipball entry", entry.path())?;
        }

        writer.finish()?;
        Ok(())
    })
    .await
    .map_err(|e| Error::Generic(format!("zipball task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::task::TaskBuilder;

    #[tokio::test]
    async fn creates_requested_archives() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path().join("demo");
        std::fs::create_dir_all(app.join("sub")).unwrap();
        std::fs::write(app.join("demo.jar"), "jar").unwrap();
        std::fs::write(app.join("sub/readme.txt"), "hi").unwrap();

        let task = TaskBuilder::new("demo")
            .output_directory(tmp.path())
            .build()
            .unwrap();
        let mut ctx = BuildContext::new(task);
        ctx.task.create_tarball = true;
        ctx.task.create_zipball = true;
        ctx.set_app_folder(app);

        let bundles = create_bundles(&ctx).await.unwrap();
        assert_eq!(bundles.len(), 2);
        for bundle in &bundles {
            assert!(bundle.exists());
            assert!(std::fs::metadata(bundle).unwrap().len() > 0);
        }
    }

    #[tokio::test]
    async fn no_flags_means_no_archives() {
        let task = TaskBuilder::new("demo").build().unwrap();
        let ctx = BuildContext::new(task);
        assert!(create_bundles(&ctx).await.unwrap().is_empty());
    }
}
