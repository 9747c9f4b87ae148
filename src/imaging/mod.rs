//! Image handling: decoding, orientation, color coercion, JPEG staging.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with format sniffing, limits lifted |
//! | **Orientation** | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | **Color coercion** | `DynamicImage::to_rgb8` / `to_luma8` |
//! | **Encode** | `jpeg-encoder`, quality 95, 4:4:4 |
//!
//! The module is split into:
//! - **Parameters**: fixed quality and page-geometry constants
//! - **Normalize**: one source image → one staged page

pub mod normalize;
pub mod params;

pub use normalize::{NormalizeError, normalize_page, page_file_name};
pub use params::{PAGE_DPI, PAGE_QUALITY, STAGING_PREFIX};
