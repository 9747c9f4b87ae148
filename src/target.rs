//! Artifact path resolution.
//!
//! Every directory maps to exactly one PDF path, computed purely from the
//! directory and the [`Config`]:
//!
//! ```text
//! root = /photos, no out_root:
//!   /photos            → /photos/photos.pdf
//!   /photos/2020/trip  → /photos/2020/trip/trip.pdf
//!
//! root = /photos, out_root = /pdfs:
//!   /photos            → /pdfs/photos.pdf
//!   /photos/2020/trip  → /pdfs/2020_trip.pdf
//! ```
//!
//! Mirrored names flatten the relative path with `_`, so `a_b/c` and `a/b_c`
//! collide. Nothing disambiguates them; the later directory wins.

use crate::config::Config;
use std::path::{Component, Path, PathBuf};

/// Used when neither the directory nor the root yields a usable name,
/// e.g. when walking a filesystem root.
const FALLBACK_NAME: &str = "root";

/// Compute the PDF path for `dir`.
pub fn resolve_artifact(dir: &Path, config: &Config) -> PathBuf {
    match &config.out_root {
        Some(out_root) => out_root.join(format!("{}.pdf", mirrored_name(dir, config))),
        None => {
            let base = base_name(dir).unwrap_or_else(|| root_name(&config.root));
            dir.join(format!("{base}.pdf"))
        }
    }
}

/// Flattened name for the mirrored output tree.
fn mirrored_name(dir: &Path, config: &Config) -> String {
    let name = match dir.strip_prefix(&config.root) {
        Ok(rel) if rel.as_os_str().is_empty() => root_name(&config.root),
        Ok(rel) => rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_"),
        Err(_) => base_name(dir).unwrap_or_default(),
    };
    if name.is_empty() {
        base_name(dir).unwrap_or_else(|| root_name(&config.root))
    } else {
        name
    }
}

/// Final path component, or `None` for anchors like `/` or `C:\`.
fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty() && n != "." && n != "/")
}

/// Name of the root, retrying with its canonical form before giving up.
fn root_name(root: &Path) -> String {
    base_name(root)
        .or_else(|| root.canonicalize().ok().and_then(|p| base_name(&p)))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}
