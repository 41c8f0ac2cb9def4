// src/watch/event_handler.rs

//! Filtering of raw `notify` events.

use std::fs;
use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::debug;

use crate::watch::path_utils::{dir_below_root, project_dir_for};

/// Paths of an event that newly appeared in the tree: created entries and
/// rename destinations.
fn arrived_paths(event: &Event) -> Vec<&Path> {
    match event.kind {
        EventKind::Create(_) => event.paths.iter().map(PathBuf::as_path).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().map(PathBuf::as_path).collect()
        }
        // Both = [from, to].
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().map(PathBuf::as_path).into_iter().collect()
        }
        // Backends that cannot tell source from destination.
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => event
            .paths
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| p.exists())
            .collect(),
        _ => Vec::new(),
    }
}

/// Project directories implied by a single `notify` event.
///
/// Removals, data changes and rename sources never start a run. An input
/// file that is created or renamed into place names its parent directory.
/// A directory that is created or moved in names itself and its direct
/// subdirectories, since files that arrive with it may never produce events
/// of their own. Whether a candidate is complete is decided later by the
/// settle check.
pub fn input_candidates(root: &Path, event: &Event) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut push = |dir: PathBuf| {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    };

    for path in arrived_paths(event) {
        if let Some(dir) = project_dir_for(root, path) {
            debug!(path = ?path, dir = ?dir, "project input arrived");
            push(dir);
            continue;
        }

        if !path.is_dir() {
            continue;
        }

        if let Some(dir) = dir_below_root(root, path) {
            debug!(dir = ?dir, "directory arrived");
            push(dir);
        }

        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                let sub = entry.path();
                if sub.is_dir() {
                    if let Some(dir) = dir_below_root(root, &sub) {
                        push(dir);
                    }
                }
            }
        }
    }

    dirs
}
