//! Redirect store.

use crate::domain::RedirectEdge;
use crate::error::Result;
use crate::progress::{ProgressSink, Stage};
use crate::store::records::{parse_redirect, scan_file, ScanStats};
use std::path::{Path, PathBuf};

pub trait RedirectSource {
    fn scan(&self, visit: &mut dyn FnMut(&RedirectEdge)) -> Result<ScanStats>;
}

#[derive(Clone)]
pub struct RedirectFile<'p> {
    path: PathBuf,
    progress: Option<&'p dyn ProgressSink>,
}

impl<'p> RedirectFile<'p> {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf(), progress: None }
    }

    pub fn with_progress(mut self, progress: &'p dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl RedirectSource for RedirectFile<'_> {
    fn scan(&self, visit: &mut dyn FnMut(&RedirectEdge)) -> Result<ScanStats> {
        scan_file(
            &self.path,
            "redirect",
            parse_redirect,
            visit,
            self.progress.map(|sink| (sink, Stage::Redirects)),
        )
    }
}

impl RedirectSource for [RedirectEdge] {
    fn scan(&self, visit: &mut dyn FnMut(&RedirectEdge)) -> Result<ScanStats> {
        self.iter().for_each(|edge| visit(edge));
        Ok(ScanStats { records: self.len() as u64, skipped: 0 })
    }
}

impl RedirectSource for Vec<RedirectEdge> {
    fn scan(&self, visit: &mut dyn FnMut(&RedirectEdge)) -> Result<ScanStats> {
        self.as_slice().scan(visit)
    }
}
