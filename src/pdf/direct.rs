//! Primary strategy: embed JPEG pages without re-encoding.
//!
//! Every staged page is already a baseline JPEG, which PDF can carry verbatim
//! as a `DCTDecode` image XObject. Only the JPEG header is parsed (size,
//! component count, EXIF orientation); pixel data is never decoded.
//!
//! Each page's MediaBox is the image's pixel size at
//! [`PAGE_DPI`](crate::imaging::PAGE_DPI), with the image drawn edge to edge.
//! When the JPEG declares a pure rotation (EXIF 90/180/270) the page gets the
//! matching `/Rotate`; mirrored orientations cannot be expressed that way and
//! are ignored.

use super::backend::{AssemblyError, PdfBackend, Strategy, page_error};
use crate::imaging::params::pixels_to_points;
use image::codecs::jpeg::JpegDecoder;
use image::metadata::Orientation;
use image::{ColorType, ImageDecoder};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What the PDF needs to know about a JPEG stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegInfo {
    width: u32,
    height: u32,
    color_space: &'static str,
    rotate: i64,
}

impl JpegInfo {
    fn read(path: &Path, bytes: &[u8]) -> Result<Self, AssemblyError> {
        let mut decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(|e| page_error(path, e))?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 => "DeviceGray",
            ColorType::Rgb8 => "DeviceRGB",
            color => {
                return Err(AssemblyError::UnsupportedColor {
                    path: path.to_path_buf(),
                    color,
                });
            }
        };
        let orientation = decoder.orientation().map_err(|e| page_error(path, e))?;
        Ok(Self {
            width,
            height,
            color_space,
            rotate: page_rotation(orientation),
        })
    }
}

/// `/Rotate` value for an EXIF orientation; 0 when it is not a pure rotation.
fn page_rotation(orientation: Orientation) -> i64 {
    match orientation {
        Orientation::Rotate90 => 90,
        Orientation::Rotate180 => 180,
        Orientation::Rotate270 => 270,
        _ => 0,
    }
}

/// Lossless JPEG repackaging via `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectBackend;

impl DirectBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for DirectBackend {
    fn strategy(&self) -> Strategy {
        Strategy::Direct
    }

    fn encode(&self, pages: &[PathBuf], title: &str) -> Result<Vec<u8>, AssemblyError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for path in pages {
            let jpeg = std::fs::read(path)?;
            let info = JpegInfo::read(path, &jpeg)?;
            let (width_pt, height_pt) = (pixels_to_points(info.width), pixels_to_points(info.height));

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(info.width),
                    "Height" => i64::from(info.height),
                    "ColorSpace" => info.color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            ));

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Real(width_pt),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Real(height_pt),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width_pt),
                    Object::Real(height_pt),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            };
            if info.rotate != 0 {
                page.set("Rotate", info.rotate);
            }
            kids.push(doc.add_object(page).into());

            debug!(
                page = %path.display(),
                width = info.width,
                height = info.height,
                color_space = info.color_space,
                rotate = info.rotate,
                "embedded JPEG page"
            );
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("mkpdfs ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
