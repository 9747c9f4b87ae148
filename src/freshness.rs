//! Staleness check for a directory's artifact.
//!
//! An artifact is up to date when it exists and its modification time is at
//! least the newest input image's modification time. Equal timestamps count
//! as fresh.
//!
//! Only the images currently in the directory are considered. Removing or
//! renaming an image does not make the artifact stale as long as the
//! remaining images are older than it; the next real change picks it up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Returns `Ok(true)` when `artifact` does not need rebuilding.
///
/// `images` is expected to be non-empty; an empty list is never fresh.
pub fn is_up_to_date(images: &[PathBuf], artifact: &Path) -> io::Result<bool> {
    if !artifact.exists() {
        return Ok(false);
    }
    let Some(newest_input) = newest_mtime(images)? else {
        return Ok(false);
    };
    let artifact_mtime = fs::metadata(artifact)?.modified()?;
    Ok(artifact_mtime >= newest_input)
}

fn newest_mtime(paths: &[PathBuf]) -> io::Result<Option<SystemTime>> {
    let mut newest = None;
    for path in paths {
        let mtime = fs::metadata(path)?.modified()?;
        newest = Some(newest.map_or(mtime, |n: SystemTime| n.max(mtime)));
    }
    Ok(newest)
}
