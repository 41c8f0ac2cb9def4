// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

use crate::types::is_project_input;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        let s = rel.to_string_lossy().replace('\\', "/");
        return Some(s);
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            let s = rel.to_string_lossy().replace('\\', "/");
            return Some(s);
        }
    }

    None
}

/// `dir` itself, if it lies strictly below `root`.
///
/// The watched root is never a project: relocating it would mean moving the
/// watched tree itself.
pub fn dir_below_root(root: &Path, dir: &Path) -> Option<PathBuf> {
    let rel = relative_str(root, dir)?;
    if rel.is_empty() {
        return None;
    }
    Some(dir.to_path_buf())
}

/// Project directory implied by an arrived file, if the file is one of the
/// two project inputs and lives in a subdirectory of `root`.
pub fn project_dir_for(root: &Path, path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if !is_project_input(name) {
        return None;
    }

    dir_below_root(root, path.parent()?)
}
