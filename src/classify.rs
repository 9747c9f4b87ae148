//! Image classification and per-directory image listing.
//!
//! A file is an image when it is a regular file whose extension, compared
//! case-insensitively, is one of [`IMAGE_EXTENSIONS`]. Everything else is
//! silently ignored: unreadable entries, files without an extension, and
//! already-generated PDFs.
//!
//! HEIC/HEIF are accepted here so that such directories are attempted and
//! reported; whether they decode is the normalizer's business.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Recognized image extensions, lowercase, without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "heic", "heif",
];

/// Returns true if `path` is a regular file with an allow-listed extension.
pub fn is_image(path: &Path) -> bool {
    path.is_file() && has_image_extension(path)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// List the images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Entries that cannot be read are
/// skipped rather than reported.
pub fn find_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_image(p))
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}
