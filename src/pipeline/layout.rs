// src/pipeline/layout.rs

//! Naming rules for everything the pipeline writes or moves.
//!
//! ```text
//! <output_root>/<project>_<unix-ts>/prompts.json
//! <output_root>/<project>_<unix-ts>/scene_01.png
//! <output_root>/<project>_<unix-ts>/scene_01.svg
//! <processed_root>/<project>_<unix-ts>/story.txt
//! ```
//!
//! When a stamped name is already taken, `-1`, `-2`, ... is appended.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Name of the prompt list persisted in every output folder.
pub const PROMPTS_FILE: &str = "prompts.json";

/// Current time as whole seconds since the Unix epoch.
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `<name>_<timestamp>`.
pub fn stamped_name(name: &str, timestamp: i64) -> String {
    format!("{name}_{timestamp}")
}

/// `scene_NN` for a 1-based scene index.
pub fn scene_stem(index: usize) -> String {
    format!("scene_{index:02}")
}

pub fn raster_file_name(index: usize) -> String {
    format!("{}.png", scene_stem(index))
}

pub fn vector_file_name(index: usize) -> String {
    format!("{}.svg", scene_stem(index))
}

fn candidate(root: &Path, base: &str, attempt: u32) -> PathBuf {
    if attempt == 0 {
        root.join(base)
    } else {
        root.join(format!("{base}-{attempt}"))
    }
}

/// Create a fresh directory `root/base` (or `root/base-N`) and return it.
///
/// `create_dir` fails on existing entries, so two callers can never claim
/// the same directory.
pub async fn create_unique_dir(root: &Path, base: &str) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(root).await?;

    let mut attempt = 0;
    loop {
        let path = candidate(root, base, attempt);
        match tokio::fs::create_dir(&path).await {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = ?path, "directory exists; trying next suffix");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Recursively copy the contents of `src` into `dest`, creating `dest` if
/// needed.
pub fn copy_dir_all(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Move `src` to `dest` by copying its tree and then deleting the source.
/// Used when a plain rename would cross filesystems.
pub async fn move_by_copy(src: &Path, dest: &Path) -> io::Result<()> {
    let (from, to) = (src.to_path_buf(), dest.to_path_buf());
    tokio::task::spawn_blocking(move || copy_dir_all(&from, &to))
        .await
        .map_err(io::Error::other)??;
    tokio::fs::remove_dir_all(src).await
}

/// Move a consumed project directory into `processed_root` as
/// `<name>_<timestamp>[-N]` and return its new location.
///
/// The destination is claimed as an empty directory first, so concurrent
/// relocations never pick the same name; the rename then replaces it.
pub async fn relocate_project(
    dir: &Path,
    processed_root: &Path,
    name: &str,
    timestamp: i64,
) -> io::Result<PathBuf> {
    let dest = create_unique_dir(processed_root, &stamped_name(name, timestamp)).await?;

    match tokio::fs::rename(dir, &dest).await {
        Ok(()) => Ok(dest),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = ?dir, to = ?dest, "rename crosses filesystems; copying");
            move_by_copy(dir, &dest).await?;
            Ok(dest)
        }
        Err(e) => {
            let _ = tokio::fs::remove_dir(&dest).await;
            Err(e)
        }
    }
}
