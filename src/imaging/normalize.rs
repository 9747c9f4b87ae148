//! Page normalization: source image → staged JPEG page.
//!
//! Each source image goes through the same steps before it reaches the PDF
//! assembler:
//!
//! 1. Decode with format sniffing (extensions lie) and no pixel limits.
//!    A truncated file still yields a page: JPEG decoding already keeps
//!    what it could read, and a PNG that fails to decode is re-read row by
//!    row, with the missing rows left black.
//! 2. Apply the embedded EXIF orientation, so pixels are stored upright.
//!    The staged JPEG carries no EXIF, which keeps the rotation from being
//!    applied a second time downstream.
//! 3. Keep 8-bit grayscale and 8-bit RGB as they are; coerce everything else
//!    (alpha, palette-expanded, 16-bit, float) to 8-bit RGB. 16-bit
//!    grayscale is narrowed to 8-bit grayscale.
//! 4. Encode as JPEG at [`PAGE_QUALITY`] with 4:4:4 sampling into the
//!    staging directory as `NNNNN.jpg`, where `NNNNN` is the zero-padded
//!    page index.

use super::params::PAGE_QUALITY;
use image::metadata::Orientation;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageDecoder, ImageError, ImageFormat, ImageReader,
    RgbImage, RgbaImage,
};
use jpeg_encoder::{ColorType, Encoder, EncodingError, SamplingFactor};
use png::Transformations;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("image {path} is {width}x{height}, larger than a JPEG page can hold")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("cannot write page {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },
}

/// File name of the staged page at `index`.
pub fn page_file_name(index: usize) -> String {
    format!("{index:05}.jpg")
}

/// Normalize `source` into `staging_dir` as page number `index`.
///
/// Returns the path of the written page.
pub fn normalize_page(
    source: &Path,
    staging_dir: &Path,
    index: usize,
) -> Result<PathBuf, NormalizeError> {
    let decode_err = |source_err| NormalizeError::Decode {
        path: source.to_path_buf(),
        source: source_err,
    };

    let img = load_upright(source).map_err(decode_err)?;
    let (width, height) = (img.width(), img.height());
    let (pixels, color) = coerce(img);

    let page = staging_dir.join(page_file_name(index));
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(NormalizeError::TooLarge {
            path: source.to_path_buf(),
            width,
            height,
        });
    };
    write_jpeg(&page, &pixels, w, h, color).map_err(|source| NormalizeError::Encode {
        path: page.clone(),
        source,
    })?;

    debug!(
        source = %source.display(),
        page = %page.display(),
        width,
        height,
        "normalized page"
    );
    Ok(page)
}

/// Decode an image and rotate/flip it according to its EXIF orientation.
fn load_upright(path: &Path) -> Result<DynamicImage, ImageError> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    let format = reader.format();
    match decode_oriented(reader) {
        Ok(img) => Ok(img),
        Err(err) if format == Some(ImageFormat::Png) => match load_partial_png(path) {
            Some((img, rows)) => {
                warn!(
                    path = %path.display(),
                    rows,
                    height = img.height(),
                    error = %err,
                    "PNG is truncated, keeping the rows that decoded"
                );
                Ok(img)
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

fn decode_oriented(reader: ImageReader<BufReader<File>>) -> Result<DynamicImage, ImageError> {
    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Decode a non-interlaced PNG as far as its data goes.
///
/// Returns the image with undecoded rows zeroed and the number of rows that
/// decoded, or `None` when not even the header and one row can be read.
fn load_partial_png(path: &Path) -> Option<(DynamicImage, u32)> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path).ok()?));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info().ok()?;

    let info = reader.info();
    if info.interlaced {
        return None;
    }
    let (width, height) = (info.width, info.height);
    let orientation = info
        .exif_metadata
        .as_deref()
        .and_then(Orientation::from_exif_chunk)
        .unwrap_or(Orientation::NoTransforms);
    let (color, _) = reader.output_color_type();
    let stride = reader.output_line_size(width);

    let mut pixels = vec![0u8; stride * height as usize];
    let mut rows = 0;
    for line in pixels.chunks_exact_mut(stride) {
        let Ok(Some(row)) = reader.next_row() else {
            break;
        };
        let data = row.data();
        let n = data.len().min(stride);
        line[..n].copy_from_slice(&data[..n]);
        rows += 1;
    }
    if rows == 0 {
        return None;
    }

    let mut img = match color {
        png::ColorType::Grayscale => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels)?)
        }
        png::ColorType::GrayscaleAlpha => {
            DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(width, height, pixels)?)
        }
        png::ColorType::Rgb => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, pixels)?),
        png::ColorType::Rgba => {
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, pixels)?)
        }
        png::ColorType::Indexed => return None,
    };
    img.apply_orientation(orientation);
    Some((img, rows))
}

/// Reduce an image to the two color layouts a page may use.
fn coerce(img: DynamicImage) -> (Vec<u8>, ColorType) {
    match img {
        DynamicImage::ImageLuma8(gray) => (gray.into_raw(), ColorType::Luma),
        wide @ DynamicImage::ImageLuma16(_) => (wide.to_luma8().into_raw(), ColorType::Luma),
        DynamicImage::ImageRgb8(rgb) => (rgb.into_raw(), ColorType::Rgb),
        other => (other.to_rgb8().into_raw(), ColorType::Rgb),
    }
}

fn write_jpeg(
    path: &Path,
    pixels: &[u8],
    width: u16,
    height: u16,
    color: ColorType,
) -> Result<(), EncodingError> {
    let mut encoder = Encoder::new_file(path, PAGE_QUALITY)?;
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder.encode(pixels, width, height, color)
}
