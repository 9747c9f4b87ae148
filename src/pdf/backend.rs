//! PDF encoding backend trait and shared types.
//!
//! A [`PdfBackend`] turns an ordered list of staged JPEG pages into the bytes
//! of one PDF document. There are exactly two strategies:
//!
//! | Strategy | Backend | Pixel data |
//! |---|---|---|
//! | [`Strategy::Direct`] | [`DirectBackend`](super::direct::DirectBackend) | JPEG streams embedded as-is (lopdf) |
//! | [`Strategy::Composed`] | [`ComposedBackend`](super::composed::ComposedBackend) | decoded to RGB, recomposed (printpdf) |
//!
//! Backends only produce bytes. Writing the artifact, and deciding which
//! backend runs, belongs to the [`Assembler`](super::assemble::Assembler).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which encoding strategy produced (or failed to produce) a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Repackage the JPEG streams without touching pixels.
    Direct,
    /// Decode every page and compose a fresh document.
    Composed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => f.write_str("direct"),
            Strategy::Composed => f.write_str("composed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot read page {path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("page {path} has unsupported color layout {color:?}")]
    UnsupportedColor {
        path: PathBuf,
        color: image::ColorType,
    },
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("{strategy} encoding failed: {message}")]
    Backend { strategy: Strategy, message: String },
    #[error("direct encoding failed ({primary}); composed fallback failed too: {fallback}")]
    Exhausted {
        primary: Box<AssemblyError>,
        fallback: Box<AssemblyError>,
    },
}

/// Trait for PDF encoding strategies.
///
/// `pages` is ordered and non-empty; the document must contain one page per
/// entry, in the same order. `title` goes into the document metadata.
pub trait PdfBackend {
    fn strategy(&self) -> Strategy;

    fn encode(&self, pages: &[PathBuf], title: &str) -> Result<Vec<u8>, AssemblyError>;
}

pub(crate) fn page_error(path: &Path, source: image::ImageError) -> AssemblyError {
    AssemblyError::Page {
        path: path.to_path_buf(),
        source,
    }
}
