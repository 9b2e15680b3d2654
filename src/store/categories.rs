//! Category store: the raw category membership edge list.

use crate::domain::CategoryLink;
use crate::error::Result;
use crate::progress::{ProgressSink, Stage};
use crate::store::records::{parse_category_link, scan_file, ScanStats};
use std::path::{Path, PathBuf};

/// A re-iterable sequence of category links in arbitrary order.
pub trait CategorySource {
    fn scan(&self, visit: &mut dyn FnMut(&CategoryLink)) -> Result<ScanStats>;
}

/// Category links read from a parsed categories file on every scan.
#[derive(Clone)]
pub struct CategoryFile<'p> {
    path: PathBuf,
    progress: Option<&'p dyn ProgressSink>,
}

impl<'p> CategoryFile<'p> {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf(), progress: None }
    }

    pub fn with_progress(mut self, progress: &'p dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CategorySource for CategoryFile<'_> {
    fn scan(&self, visit: &mut dyn FnMut(&CategoryLink)) -> Result<ScanStats> {
        scan_file(
            &self.path,
            "category",
            parse_category_link,
            visit,
            self.progress.map(|sink| (sink, Stage::GraphBuild)),
        )
    }
}

impl CategorySource for [CategoryLink] {
    fn scan(&self, visit: &mut dyn FnMut(&CategoryLink)) -> Result<ScanStats> {
        self.iter().for_each(|link| visit(link));
        Ok(ScanStats { records: self.len() as u64, skipped: 0 })
    }
}

impl CategorySource for Vec<CategoryLink> {
    fn scan(&self, visit: &mut dyn FnMut(&CategoryLink)) -> Result<ScanStats> {
        self.as_slice().scan(visit)
    }
}
