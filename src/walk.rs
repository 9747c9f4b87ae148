//! Directory traversal and the per-directory build.
//!
//! The walker visits `root` and every directory below it, depth-first, with
//! siblings in file-name order, so two runs over the same tree do the same
//! work in the same order. Each directory goes through:
//!
//! ```text
//! discovered → classified ─┬─ no images ──────────────────────→ done
//!                          └─ images → resolve target → fresh? ─┬─ yes → skip → done
//!                                                               └─ no → stage pages → assemble → done | failed
//! ```
//!
//! Directories are processed one at a time. A failure anywhere inside one
//! directory (unreadable listing, undecodable image, both PDF strategies
//! failing) is reported with the directory path and counted; the walk then
//! moves on to the next directory. Nothing a single directory does can stop
//! the run.
//!
//! An unreadable directory fails once. walkdir reports the same directory
//! again when it tries to descend into it; that repeat is dropped.
//!
//! Staged pages live in a fresh temporary directory per rebuild, created
//! under the system temp dir or [`Walker::with_staging_root`]. It is a
//! [`tempfile::TempDir`], so it is removed when the rebuild returns, on
//! every path.

use crate::classify::find_images;
use crate::config::Config;
use crate::freshness::is_up_to_date;
use crate::imaging::{NormalizeError, STAGING_PREFIX, normalize_page};
use crate::output::{self, Reporter};
use crate::pdf::{Assembler, AssemblyError, Strategy};
use crate::target::resolve_artifact;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Any failure scoped to a single directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] NormalizeError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error("cannot read directory: {0}")]
    Traverse(#[from] walkdir::Error),
}

/// What happened to one directory that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryOutcome {
    /// No eligible images; nothing was written or allocated.
    Empty,
    /// The artifact was newer than every image.
    UpToDate(PathBuf),
    /// The artifact was (re)written from `pages` staged pages.
    Built {
        artifact: PathBuf,
        pages: usize,
        strategy: Strategy,
    },
}

/// Per-run tally.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub built: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Directories without images. Not part of the printed line.
    pub empty: u32,
}

impl RunSummary {
    fn record(&mut self, outcome: &DirectoryOutcome) {
        match outcome {
            DirectoryOutcome::Empty => self.empty += 1,
            DirectoryOutcome::UpToDate(_) => self.skipped += 1,
            DirectoryOutcome::Built { .. } => self.built += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done: {} built, {} skipped, {} failed",
            self.built, self.skipped, self.failed
        )
    }
}

/// All directories under `root` (inclusive), depth-first, siblings sorted.
///
/// Symlinked directories are not followed.
pub fn directories(root: &Path) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_dir() => Some(Ok(e.into_path())),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
}

pub struct Walker<'a> {
    config: &'a Config,
    assembler: Assembler,
    reporter: &'a dyn Reporter,
    staging_root: Option<PathBuf>,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a Config, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            assembler: Assembler::new(),
            reporter,
            staging_root: None,
        }
    }

    /// Replace the default direct-then-composed assembler.
    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Create staging directories under `dir` instead of the system temp dir.
    pub fn with_staging_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(dir.into());
        self
    }

    /// Walk the whole tree. Never fails; per-directory failures are reported
    /// and counted in the summary.
    pub fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut last_failed: Option<PathBuf> = None;
        for dir in directories(&self.config.root) {
            let result = match dir {
                Ok(dir) => self
                    .process_directory(&dir)
                    .map_err(|err| (dir, err)),
                Err(err) => {
                    let dir = err.path().unwrap_or(&self.config.root).to_path_buf();
                    if last_failed.as_ref() == Some(&dir) {
                        debug!(dir = %dir.display(), error = %err, "already reported");
                        continue;
                    }
                    Err((dir, DirectoryError::Traverse(err)))
                }
            };
            match result {
                Ok(outcome) => summary.record(&outcome),
                Err((dir, err)) => {
                    summary.failed += 1;
                    self.reporter.error(&output::format_failure(&dir, &err));
                    last_failed = Some(dir);
                }
            }
        }
        summary
    }

    /// Build (or skip) the artifact for a single directory.
    pub fn process_directory(&self, dir: &Path) -> Result<DirectoryOutcome, DirectoryError> {
        let images = find_images(dir)?;
        if images.is_empty() {
            return Ok(DirectoryOutcome::Empty);
        }

        let artifact = resolve_artifact(dir, self.config);
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent)?;
        }

        if is_up_to_date(&images, &artifact)? {
            self.reporter.info(&output::format_skip(&artifact));
            return Ok(DirectoryOutcome::UpToDate(artifact));
        }

        self.reporter.info(&output::format_making(&artifact));
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        let staging = match &self.staging_root {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        debug!(dir = %dir.display(), staging = %staging.path().display(), images = images.len(), "staging pages");

        let pages = images
            .iter()
            .enumerate()
            .map(|(index, image)| normalize_page(image, staging.path(), index))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(assembled) = self.assembler.assemble(&pages, &artifact)? else {
            return Ok(DirectoryOutcome::Empty);
        };
        if let Some(cause) = &assembled.primary_failure {
            self.reporter.info(&output::format_fallback(
                &artifact,
                assembled.strategy,
                cause,
            ));
        }

        Ok(DirectoryOutcome::Built {
            artifact,
            pages: assembled.pages,
            strategy: assembled.strategy,
        })
    }
}
