//! # mkpdfs
//!
//! Turn every directory of images into one PDF, and keep those PDFs current.
//!
//! Think of it as a tiny build system whose targets are directories: the
//! inputs of a directory are the images it directly contains, the output is
//! a PDF, and a PDF is rebuilt only when one of its images is newer than it.
//!
//! # Pipeline
//!
//! ```text
//! walk      root/…           →  directories, depth-first, sorted
//! classify  directory        →  images, sorted by file name
//! target    directory        →  artifact path (in place or under out_root)
//! fresh?    images, artifact →  skip | rebuild
//! normalize image × N        →  staged JPEG pages (upright, L8 or RGB8)
//! assemble  pages            →  artifact (direct, else composed)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Run configuration: canonical root, created output root |
//! | [`classify`] | Image extension allow-list and per-directory listing |
//! | [`target`] | Artifact path resolution (in place or mirrored/flattened) |
//! | [`freshness`] | mtime-based staleness check |
//! | [`imaging`] | Page normalization: decode, orient, coerce color, re-encode |
//! | [`pdf`] | PDF strategies and the assembler that picks between them |
//! | [`walk`] | Traversal, per-directory build, failure isolation |
//! | [`output`] | The reporter interface and message formatting |
//!
//! # Design Decisions
//!
//! ## Best-Effort Runs
//!
//! A run always finishes the walk. A directory that fails (corrupt image,
//! unreadable folder, unwritable output) is reported and skipped; its
//! previous PDF, if any, is left untouched. The process exit status stays
//! successful. Only problems with the root or output root, found before the
//! walk starts, are fatal.
//!
//! ## Two PDF Strategies
//!
//! Staged pages are JPEGs, and PDF can hold JPEG streams as they are. The
//! direct strategy does exactly that, which is fast and adds no generation
//! loss. If it fails for any reason, the composed strategy decodes each page
//! and builds the document from pixels. The choice is made in one place,
//! [`pdf::Assembler`], never by the callers.
//!
//! ## Sequential by Design
//!
//! Directories are processed one after another, each to completion. Staging
//! space is one temporary directory per rebuild, removed as soon as that
//! rebuild ends.
//!
//! ## Known Limitation
//!
//! Freshness compares modification times only. Deleting or renaming an image
//! inside a directory does not by itself trigger a rebuild.

pub mod classify;
pub mod config;
pub mod freshness;
pub mod imaging;
pub mod output;
pub mod pdf;
pub mod target;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
