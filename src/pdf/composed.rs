//! Fallback strategy: decode every page and compose a new document.
//!
//! Slower and lossier than [`DirectBackend`](super::direct::DirectBackend),
//! but it accepts anything the `image` crate can decode. Each page is
//! decoded, converted to 8-bit RGB and handed to `printpdf`; the first page
//! opens the document and the rest are appended in order. Page geometry
//! matches the direct strategy: pixel size at
//! [`PAGE_DPI`](crate::imaging::PAGE_DPI), image drawn edge to edge.

use super::backend::{AssemblyError, PdfBackend, Strategy, page_error};
use crate::imaging::params::{PAGE_DPI, pixels_to_mm};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Decode-and-compose PDF writer via `printpdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposedBackend;

impl ComposedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for ComposedBackend {
    fn strategy(&self) -> Strategy {
        Strategy::Composed
    }

    fn encode(&self, pages: &[PathBuf], title: &str) -> Result<Vec<u8>, AssemblyError> {
        let mut doc = PdfDocument::new(title);
        let mut composed: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for path in pages {
            let rgb = image::open(path)
                .map_err(|e| page_error(path, e))?
                .to_rgb8();
            let (width, height) = rgb.dimensions();

            let xobject_id = doc.add_image(&RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            });

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];
            composed.push(PdfPage::new(
                Mm(pixels_to_mm(width)),
                Mm(pixels_to_mm(height)),
                ops,
            ));

            debug!(page = %path.display(), width, height, "composed page");
        }

        doc.with_pages(composed);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), title, "printpdf reported warnings");
        }
        Ok(bytes)
    }
}
