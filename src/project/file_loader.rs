//! Filesystem helpers for project loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::ProjectError;

/// Recursively collect files with one of `extensions`, sorted by path.
///
/// Hidden directories and symlinked directories are skipped; symlinked
/// files are collected.
pub fn collect_file_paths(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ProjectError> {
    let mut paths = Vec::new();
    collect_recursive(dir, extensions, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_recursive(
    dir: &Path,
    extensions: &[&str],
    paths: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    let entries = fs::read_dir(dir).map_err(|source| ProjectError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ProjectError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;
        // symlinked directories are not followed, so link cycles cannot recurse
        if file_type.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if !hidden {
                collect_recursive(&path, extensions, paths)?;
            }
        } else if has_extension(&path, extensions) && path.is_file() {
            paths.push(path);
        }
    }
    Ok(())
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Whether a file name looks like a settings layer, e.g. `Settings.Fusion.yaml`
pub fn is_settings_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("Settings") && has_extension(path, &["yaml", "yml"]))
}
