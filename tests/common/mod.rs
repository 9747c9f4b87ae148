//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use lopdf::{Document, Object};
use mkpdfs::output::Reporter;
use mkpdfs::pdf::{AssemblyError, PdfBackend, Strategy};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Write a solid-ish RGB image; the format follows the file extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 90])
    })
    .save(path)
    .unwrap();
}

pub fn set_mtime(path: &Path, mtime: SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path).unwrap().modified().unwrap()
}

/// MediaBox width of every page, in page order.
pub fn page_widths(path: &Path) -> Vec<f32> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = match page.get(b"MediaBox") {
                Ok(obj) => obj,
                Err(_) => {
                    let parent = page.get(b"Parent").unwrap().as_reference().unwrap();
                    doc.get_dictionary(parent).unwrap().get(b"MediaBox").unwrap()
                }
            };
            match doc.dereference(media_box).unwrap().1 {
                Object::Array(items) => {
                    items[2].as_float().unwrap() - items[0].as_float().unwrap()
                }
                other => panic!("MediaBox is not an array: {other:?}"),
            }
        })
        .collect()
}

#[derive(Default)]
pub struct RecordingReporter {
    pub infos: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// Primary backend that always fails, to force the fallback path.
pub struct BrokenDirect;

impl PdfBackend for BrokenDirect {
    fn strategy(&self) -> Strategy {
        Strategy::Direct
    }

    fn encode(&self, _pages: &[PathBuf], _title: &str) -> Result<Vec<u8>, AssemblyError> {
        Err(AssemblyError::Backend {
            strategy: Strategy::Direct,
            message: "forced failure".into(),
        })
    }
}
