//! Shared test utilities: synthetic fixture images, mtime control, and PDF
//! inspection.
//!
//! Fixtures are generated on the fly so tests never depend on binary files
//! checked into the repository.

use lopdf::{Document, Object};
use std::path::Path;
use std::time::SystemTime;

// =========================================================================
// Fixture images
// =========================================================================

fn gradient(width: u32, height: u32) -> image::RgbImage {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write an RGB JPEG (format chosen by extension).
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// Write an RGB PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// Write an RGBA PNG with a varying alpha channel.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([x as u8, y as u8, 200, ((x + y) % 256) as u8])
    })
    .save(path)
    .unwrap();
}

/// Write a JPEG that carries an EXIF Orientation tag.
///
/// The APP1 segment is spliced in right after SOI: a little-endian TIFF
/// header with a single IFD entry, tag 0x0112 (SHORT) = `orientation`.
pub fn write_exif_rotated_jpeg(path: &Path, width: u32, height: u32, orientation: u16) {
    let mut encoded = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut encoded)
        .encode_image(&gradient(width, height))
        .unwrap();

    let mut app1 = Vec::new();
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(b"II\x2a\x00\x08\x00\x00\x00");
    app1.extend_from_slice(&1u16.to_le_bytes());
    app1.extend_from_slice(&0x0112u16.to_le_bytes());
    app1.extend_from_slice(&3u16.to_le_bytes());
    app1.extend_from_slice(&1u32.to_le_bytes());
    app1.extend_from_slice(&orientation.to_le_bytes());
    app1.extend_from_slice(&[0, 0]);
    app1.extend_from_slice(&0u32.to_le_bytes());

    let mut jpeg = Vec::with_capacity(encoded.len() + app1.len() + 4);
    jpeg.extend_from_slice(&encoded[..2]);
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&encoded[2..]);
    std::fs::write(path, jpeg).unwrap();
}

/// Keep only the first `num/den` of a file's bytes.
pub fn truncate_to(path: &Path, num: usize, den: usize) {
    let bytes = std::fs::read(path).unwrap();
    std::fs::write(path, &bytes[..bytes.len() * num / den]).unwrap();
}

// =========================================================================
// Timestamps
// =========================================================================

pub fn set_mtime(path: &Path, mtime: SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

// =========================================================================
// PDF inspection
// =========================================================================

/// MediaBox width of every page, in page order.
pub fn page_widths(doc: &Document) -> Vec<f32> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let media_box = match page.get(b"MediaBox") {
                Ok(obj) => obj,
                Err(_) => {
                    let parent = page.get(b"Parent").unwrap().as_reference().unwrap();
                    doc.get_dictionary(parent).unwrap().get(b"MediaBox").unwrap()
                }
            };
            let (_, resolved) = doc.dereference(media_box).unwrap();
            let values: Vec<f32> = match resolved {
                Object::Array(items) => items.iter().map(|o| o.as_float().unwrap()).collect(),
                other => panic!("MediaBox is not an array: {other:?}"),
            };
            values[2] - values[0]
        })
        .collect()
}
