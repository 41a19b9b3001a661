//! Required-module resolution for runtime trimming.
//!
//! Determines which Java modules the trimmed runtime must contain, either
//! from an explicit list or by running jdeps against the application jars.

use crate::packager::error::Result;
use crate::packager::utils::exec;
use std::path::{Path, PathBuf};

/// Sentinel meaning "include every module on the module path".
pub const ALL_MODULE_PATH: &str = "ALL-MODULE-PATH";

/// jdeps gained `--print-module-deps` output suitable for jlink in JDK 13.
const MODERN_JDEPS_VERSION: u32 = 13;

/// jdeps exists with `--list-deps` from JDK 9.
const LEGACY_JDEPS_VERSION: u32 = 9;

/// Resolves the comma-separated module list for jlink.
///
/// Priority order:
/// 1. explicit default module list, when trimming is requested
/// 2. jdeps `--print-module-deps` on modern toolchains
/// 3. jdeps `--list-deps` on legacy toolchains, post-processed
/// 4. the [`ALL_MODULE_PATH`] sentinel
///
/// The configured additional modules are always appended. An empty combined
/// list falls back to the sentinel with a warning.
pub async fn resolve_modules(
    jdk_path: &Path,
    jdk_major: u32,
    libs_folder: &Path,
    jar_file: &Path,
    customized_jre: bool,
    default_modules: &[String],
    additional_modules: &[String],
) -> Result<String> {
    log::info!("Getting required modules ...");

    let mut modules = if customized_jre && !default_modules.is_empty() {
        default_modules.iter().map(|m| m.trim().to_string()).collect()
    } else if customized_jre && jdk_major >= MODERN_JDEPS_VERSION {
        let output = run_jdeps(jdk_path, jdk_major, libs_folder, jar_file, "--print-module-deps")
            .await?;
        parse_modern_deps(&output)
    } else if customized_jre && jdk_major >= LEGACY_JDEPS_VERSION {
        let output = run_jdeps(jdk_path, jdk_major, libs_folder, jar_file, "--list-deps").await?;
        parse_legacy_deps(&output)
    } else {
        vec![ALL_MODULE_PATH.to_string()]
    };

    modules.extend(additional_modules.iter().cloned());

    if modules.is_empty() {
        log::warn!("It was not possible to determine the necessary modules. All modules will be included");
        modules.push(ALL_MODULE_PATH.to_string());
    }

    log::info!("Required modules found: {modules:?}");

    Ok(modules.join(","))
}

async fn run_jdeps(
    jdk_path: &Path,
    jdk_major: u32,
    libs_folder: &Path,
    jar_file: &Path,
    mode: &str,
) -> Result<String> {
    let jdeps = jdk_path.join("bin").join("jdeps");

    let mut args: Vec<PathBuf> = vec![
        "-q".into(),
        "--multi-release".into(),
        jdk_major.to_string().into(),
    ];
    if mode == "--print-module-deps" {
        args.push("--ignore-missing-deps".into());
    }
    args.push(mode.into());

    if libs_folder.is_dir() {
        let mut jars: Vec<PathBuf> = std::fs::read_dir(libs_folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "jar"))
            .collect();
        jars.sort();
        args.extend(jars);
    } else {
        log::warn!("No dependencies found!");
    }

    args.push(jar_file.to_path_buf());

    exec::execute(&jdeps, args).await
}

/// Parses `--print-module-deps` output: one comma-separated line.
fn parse_modern_deps(output: &str) -> Vec<String> {
    output
        .split(',')
        .map(|module| module.trim().to_string())
        .filter(|module| !module.is_empty())
        .collect()
}

/// Parses `--list-deps` output: one module per line, possibly with a
/// trailing `/package` detail, blank lines and removed-module markers.
fn parse_legacy_deps(output: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for line in output.lines() {
        let module = line.trim();
        let module = match module.split_once('/') {
            Some((name, _)) => name,
            None => module,
        };
        if module.is_empty() || module.starts_with("JDK removed internal") {
            continue;
        }
        if !seen.iter().any(|m: &String| m == module) {
            seen.push(module.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_module_list_is_used_verbatim_and_trimmed() {
        let defaults = vec![" java.base ".to_string(), "java.desktop".to_string()];
        let additional = vec!["jdk.crypto.ec".to_string()];
        let modules = resolve_modules(
            Path::new("/nonexistent-jdk"),
            17,
            Path::new("/nonexistent-libs"),
            Path::new("app.jar"),
            true,
            &defaults,
            &additional,
        )
        .await
        .unwrap();
        assert_eq!(modules, "java.base,java.desktop,jdk.crypto.ec");
    }

    #[tokio::test]
    async fn trimming_disabled_falls_back_to_sentinel() {
        let additional = vec!["java.sql".to_string()];
        let modules = resolve_modules(
            Path::new("/nonexistent-jdk"),
            17,
            Path::new("/nonexistent-libs"),
            Path::new("app.jar"),
            false,
            &[],
            &additional,
        )
        .await
        .unwrap();
        assert_eq!(modules, "ALL-MODULE-PATH,java.sql");
    }

    #[tokio::test]
    async fn pre_jdeps_toolchain_falls_back_to_sentinel() {
        let modules = resolve_modules(
            Path::new("/nonexistent-jdk"),
            8,
            Path::new("/nonexistent-libs"),
            Path::new("app.jar"),
            true,
            &[],
            &[],
        )
        .await
        .unwrap();
        assert_eq!(modules, "ALL-MODULE-PATH");
    }

    #[test]
    fn legacy_output_is_cleaned_and_deduplicated() {
        let output = "\
java.base
java.logging/java.util.logging
java.base

JDK removed internal API/sun.misc
java.desktop";
        assert_eq!(
            parse_legacy_deps(output),
            vec!["java.base", "java.logging", "java.desktop"]
        );
    }

    #[test]
    fn modern_output_is_comma_separated() {
        assert_eq!(
            parse_modern_deps("java.base, java.desktop,java.net.http\n"),
            vec!["java.base", "java.desktop", "java.net.http"]
        );
    }
}
