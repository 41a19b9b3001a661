//! File system utilities for bundling.
//!
//! Safe file operations with automatic parent creation, symlink
//! preservation, and path-carrying errors.

use crate::packager::error::{Error, ErrorExt, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Creates a directory under `parent` and returns its path.
pub async fn mkdir(parent: &Path, name: &str) -> Result<PathBuf> {
    let dir = parent.join(name);
    fs::create_dir_all(&dir)
        .await
        .fs_context("creating directory", &dir)?;
    Ok(dir)
}

/// Creates all of the directories of the specified path, erasing it first
/// if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_folder(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_folder(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::Generic(format!(
            "{} does not exist or is not a file",
            from.display()
        )));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Copies a file into a folder, keeping its name. Returns the destination.
pub async fn copy_file_to_folder(file: &Path, folder: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .ok_or_else(|| Error::Generic(format!("{} has no file name", file.display())))?;
    let dest = folder.join(name);
    copy_file(file, &dest).await?;
    Ok(dest)
}

#[cfg(unix)]
fn symlink_any(target: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(windows)]
fn symlink_any(target: &Path, dst: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}

/// Recursively copies the *contents* of a directory into another directory,
/// creating it as necessary. Symlinks are preserved.
pub async fn copy_folder_content_to_folder(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::Generic(format!(
            "{} does not exist or is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&to)?;

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            if rel_path.as_os_str().is_empty() {
                continue;
            }
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                symlink_any(&target, &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::Generic(format!("directory copy task panicked: {e}")))?
}

/// Recursively copies a directory *into* another directory, keeping its
/// name. Returns the destination.
pub async fn copy_folder_to_folder(from: &Path, to: &Path) -> Result<PathBuf> {
    let name = from
        .file_name()
        .ok_or_else(|| Error::Generic(format!("{} has no directory name", from.display())))?;
    let dest = to.join(name);
    copy_folder_content_to_folder(from, &dest).await?;
    Ok(dest)
}

/// Writes an embedded resource to a file, optionally normalizing Windows
/// line endings to Unix ones (required for shell script resources).
pub async fn copy_resource_to_file(
    bytes: &[u8],
    dest: &Path,
    unix_style_newlines: bool,
) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    if unix_style_newlines {
        let text = String::from_utf8_lossy(bytes).replace("\r\n", "\n");
        fs::write(dest, text)
            .await
            .fs_context("writing resource", dest)?;
    } else {
        fs::write(dest, bytes)
            .await
            .fs_context("writing resource", dest)?;
    }
    Ok(())
}

/// Marks a single file as executable. No-op on non-unix hosts.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting executable permissions", path)?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Marks every regular file directly under `dir` as executable.
pub async fn set_dir_files_executable(dir: &Path) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .await
        .fs_context("reading directory", dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading directory", dir)?
    {
        if entry
            .file_type()
            .await
            .fs_context("reading file type", entry.path())?
            .is_file()
        {
            set_executable(&entry.path()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_file_rejects_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy_file(&tmp.path().join("nope.txt"), &tmp.path().join("out.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn copy_folder_content_preserves_nesting() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("sub")).unwrap();
        std::fs::write(src.join("a.txt"), "a").unwrap();
        std::fs::write(src.join("sub/b.txt"), "b").unwrap();

        let dst = tmp.path().join("dst");
        copy_folder_content_to_folder(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(dst.join("sub/b.txt")).unwrap(), "b");
    }

    #[tokio::test]
    async fn remove_folder_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("gone");
        remove_folder(&dir).await.unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        remove_folder(&dir).await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn resource_newline_normalization() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("script.sh");
        copy_resource_to_file(b"#!/bin/sh\r\necho hi\r\n", &dest, true)
            .await
            .unwrap();
        let text = std::fs::read_to_string(&dest).unwrap();
        assert!(!text.contains('\r'));
    }
}
