//! Fixed encoding parameters shared by page normalization and PDF layout.
//!
//! - [`PAGE_QUALITY`]: JPEG quality of staged pages.
//! - [`PAGE_DPI`]: resolution used to turn pixel sizes into page sizes.
//!   Both PDF strategies use it, so they agree on page geometry.

/// Resolution assumed when laying a page out. Normalized JPEGs carry no
/// physical density, so every pixel maps to 1/96 inch.
pub const PAGE_DPI: f32 = 96.0;

/// Prefix of the per-directory staging directory.
pub const STAGING_PREFIX: &str = "mkpdfs_";

/// JPEG quality of staged pages. High enough that scanned text and line
/// art survive re-encoding.
pub const PAGE_QUALITY: u8 = 95;

/// Page extent in PDF points for a pixel extent at [`PAGE_DPI`].
pub fn pixels_to_points(pixels: u32) -> f32 {
    pixels as f32 * 72.0 / PAGE_DPI
}

/// Page extent in millimetres for a pixel extent at [`PAGE_DPI`].
pub fn pixels_to_mm(pixels: u32) -> f32 {
    pixels as f32 * 25.4 / PAGE_DPI
}
