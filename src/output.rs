//! User-facing progress reporting.
//!
//! The walker never prints. It talks to a [`Reporter`], which has exactly two
//! channels: `info` for progress and skip/rebuild decisions, `error` for
//! directory failures. The binary plugs in [`StdoutReporter`]; tests plug in
//! a recorder.
//!
//! # Output Format
//!
//! ```text
//! skip: /photos/2019/2019.pdf up to date
//! making: /photos/2020/trip/trip.pdf
//! fallback: /photos/2020/trip/trip.pdf composed after direct encoding failed: ...
//! error: failed to process /photos/broken: cannot decode image ...
//! Done: 1 built, 1 skipped, 1 failed
//! ```
//!
//! Message text comes from the pure `format_*` functions below so it can be
//! tested without capturing stdout.

use crate::pdf::{AssemblyError, Strategy};
use std::fmt::Display;
use std::path::Path;

/// Sink for progress and failure messages.
pub trait Reporter {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes every message, failures included, to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        println!("{message}");
    }
}

pub fn format_making(artifact: &Path) -> String {
    format!("making: {}", artifact.display())
}

pub fn format_skip(artifact: &Path) -> String {
    format!("skip: {} up to date", artifact.display())
}

pub fn format_fallback(artifact: &Path, used: Strategy, cause: &AssemblyError) -> String {
    format!(
        "fallback: {} {used} after direct encoding failed: {cause}",
        artifact.display()
    )
}

pub fn format_failure(dir: &Path, cause: &dyn Display) -> String {
    format!("error: failed to process {}: {cause}", dir.display())
}
