//! Strategy selection and artifact writing.
//!
//! The [`Assembler`] owns an optional primary backend and a mandatory
//! fallback. Selection is a two-step rule with no other triggers:
//!
//! 1. Primary configured → run it. If it returns an error, log the cause and
//!    run the fallback on the same pages.
//! 2. Primary not configured → run the fallback directly.
//!
//! Only when both fail does the caller see an error
//! ([`AssemblyError::Exhausted`]). The winning document is written to a
//! temporary file next to the artifact and renamed over it, so the artifact
//! is replaced whole or not at all.

use super::backend::{AssemblyError, PdfBackend, Strategy};
use super::composed::ComposedBackend;
use super::direct::DirectBackend;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a document was produced.
#[derive(Debug)]
pub struct Assembled {
    pub strategy: Strategy,
    /// Why the primary strategy was abandoned, if it was tried and failed.
    pub primary_failure: Option<AssemblyError>,
    pub pages: usize,
}

pub struct Assembler {
    primary: Option<Box<dyn PdfBackend>>,
    fallback: Box<dyn PdfBackend>,
}

impl Assembler {
    /// Direct JPEG repackaging, falling back to decode-and-compose.
    pub fn new() -> Self {
        Self::with_backends(
            Some(Box::new(DirectBackend::new())),
            Box::new(ComposedBackend::new()),
        )
    }

    /// Only the decode-and-compose strategy, as if the primary were missing.
    pub fn fallback_only() -> Self {
        Self::with_backends(None, Box::new(ComposedBackend::new()))
    }

    pub fn with_backends(
        primary: Option<Box<dyn PdfBackend>>,
        fallback: Box<dyn PdfBackend>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Write `pages`, in order, as one PDF at `artifact`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when `pages` is
    /// empty.
    pub fn assemble(
        &self,
        pages: &[PathBuf],
        artifact: &Path,
    ) -> Result<Option<Assembled>, AssemblyError> {
        if pages.is_empty() {
            return Ok(None);
        }
        let title = artifact
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (bytes, strategy, primary_failure) = match &self.primary {
            Some(primary) => match primary.encode(pages, &title) {
                Ok(bytes) => (bytes, primary.strategy(), None),
                Err(primary_err) => {
                    warn!(
                        artifact = %artifact.display(),
                        error = %primary_err,
                        "{} encoding failed, retrying with {}",
                        primary.strategy(),
                        self.fallback.strategy()
                    );
                    match self.fallback.encode(pages, &title) {
                        Ok(bytes) => (bytes, self.fallback.strategy(), Some(primary_err)),
                        Err(fallback_err) => {
                            return Err(AssemblyError::Exhausted {
                                primary: Box::new(primary_err),
                                fallback: Box::new(fallback_err),
                            });
                        }
                    }
                }
            },
            None => (
                self.fallback.encode(pages, &title)?,
                self.fallback.strategy(),
                None,
            ),
        };

        write_atomically(artifact, &bytes)?;
        debug!(
            artifact = %artifact.display(),
            %strategy,
            pages = pages.len(),
            bytes = bytes.len(),
            "wrote PDF"
        );

        Ok(Some(Assembled {
            strategy,
            primary_failure,
            pages: pages.len(),
        }))
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `bytes` to a sibling temp file, then rename it onto `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut builder = tempfile::Builder::new();
    builder.prefix(".mkpdfs-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::backend::tests::FailingBackend;
    use crate::test_helpers::{page_widths, write_jpeg};
    use lopdf::Document;
    use tempfile::TempDir;

    fn staged_pages(dir: &Path, widths: &[u32]) -> Vec<PathBuf> {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let path = dir.join(format!("{i:05}.jpg"));
                write_jpeg(&path, *w, 40);
                path
            })
            .collect()
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("out.pdf");

        let result = Assembler::new().assemble(&[], &artifact).unwrap();
        assert!(result.is_none());
        assert!(!artifact.exists());
    }

    #[test]
    fn primary_is_used_when_it_succeeds() {
        let tmp = TempDir::new().unwrap();
        let pages = staged_pages(tmp.path(), &[96, 48]);
        let artifact = tmp.path().join("out.pdf");

        let assembled = Assembler::new().assemble(&pages, &artifact).unwrap().unwrap();
        assert_eq!(assembled.strategy, Strategy::Direct);
        assert!(assembled.primary_failure.is_none());
        assert_eq!(assembled.pages, 2);
        assert_eq!(Document::load(&artifact).unwrap().get_pages().len(), 2);
    }

    #[test]
    fn failing_primary_falls_back_with_same_pages_in_order() {
        let tmp = TempDir::new().unwrap();
        let pages = staged_pages(tmp.path(), &[96, 192, 48]);
        let artifact = tmp.path().join("out.pdf");
        let primary = FailingBackend::new(Strategy::Direct);

        let assembler = Assembler::with_backends(
            Some(Box::new(primary.clone())),
            Box::new(ComposedBackend::new()),
        );
        let assembled = assembler.assemble(&pages, &artifact).unwrap().unwrap();

        assert_eq!(primary.call_count(), 1);
        assert_eq!(assembled.strategy, Strategy::Composed);
        assert!(assembled.primary_failure.is_some());

        let doc = Document::load(&artifact).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        let widths = page_widths(&doc);
        assert!(widths[0] > widths[2] && widths[1] > widths[0]);
    }

    #[test]
    fn missing_primary_goes_straight_to_fallback() {
        let tmp = TempDir::new().unwrap();
        let pages = staged_pages(tmp.path(), &[50]);
        let artifact = tmp.path().join("out.pdf");

        let assembled = Assembler::fallback_only()
            .assemble(&pages, &artifact)
            .unwrap()
            .unwrap();
        assert_eq!(assembled.strategy, Strategy::Composed);
        assert!(assembled.primary_failure.is_none());
        assert!(artifact.exists());
    }

    #[test]
    fn both_failing_is_exhausted_and_leaves_old_artifact() {
        let tmp = TempDir::new().unwrap();
        let pages = staged_pages(tmp.path(), &[50]);
        let artifact = tmp.path().join("out.pdf");
        std::fs::write(&artifact, b"previous").unwrap();

        let fallback = FailingBackend::new(Strategy::Composed);
        let assembler = Assembler::with_backends(
            Some(Box::new(FailingBackend::new(Strategy::Direct))),
            Box::new(fallback.clone()),
        );
        let err = assembler.assemble(&pages, &artifact).unwrap_err();

        assert!(matches!(err, AssemblyError::Exhausted { .. }));
        assert_eq!(fallback.call_count(), 1);
        assert_eq!(std::fs::read(&artifact).unwrap(), b"previous");
    }

    #[test]
    fn rebuild_replaces_artifact_whole() {
        let tmp = TempDir::new().unwrap();
        let pages = staged_pages(tmp.path(), &[50]);
        let artifact = tmp.path().join("out.pdf");
        std::fs::write(&artifact, vec![b'x'; 1 << 20]).unwrap();

        Assembler::new().assemble(&pages, &artifact).unwrap();
        let bytes = std::fs::read(&artifact).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.ends_with(b"xxxx"));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let stage = TempDir::new().unwrap();
        let pages = staged_pages(stage.path(), &[50]);
        let artifact = tmp.path().join("out.pdf");

        Assembler::new().assemble(&pages, &artifact).unwrap();
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.pdf")]);
    }
}
