//! Stub store: page id ↔ (namespace, title) translation.

use crate::domain::{Namespace, PageId, Stub};
use crate::error::{FilterError, Result};
use crate::progress::{ProgressSink, Stage};
use crate::store::records::{parse_stub, scan_file, ScanStats};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct StubStore {
    by_id: HashMap<PageId, (Namespace, String)>,
    by_title: HashMap<Namespace, HashMap<String, PageId>>,
}

/// Outcome of translating category titles to ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleResolution {
    pub ids: Vec<PageId>,
    pub unresolved: Vec<String>,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path, progress: &dyn ProgressSink) -> Result<(Self, ScanStats)> {
        Self::load_filtered(path, |_| true, progress)
    }

    /// Load only stubs in `ns`. Seed translation needs nothing else, which
    /// keeps small-memory runs small.
    pub fn load_namespace(
        path: &Path,
        ns: Namespace,
        progress: &dyn ProgressSink,
    ) -> Result<(Self, ScanStats)> {
        Self::load_filtered(path, |stub| stub.ns == ns, progress)
    }

    fn load_filtered(
        path: &Path,
        keep: impl Fn(&Stub) -> bool,
        progress: &dyn ProgressSink,
    ) -> Result<(Self, ScanStats)> {
        let mut store = Self::new();
        let stats = scan_file(
            path,
            "stub",
            parse_stub,
            &mut |stub: &Stub| {
                if keep(stub) {
                    store.insert(stub.clone());
                }
            },
            Some((progress, Stage::Stubs)),
        )?;
        progress.finish(Stage::Stubs, stats.records);
        Ok((store, stats))
    }

    pub fn insert(&mut self, stub: Stub) {
        let bare = stub.ns.bare_title(&stub.title).to_string();
        self.by_title.entry(stub.ns).or_default().insert(bare, stub.id);
        self.by_id.insert(stub.id, (stub.ns, stub.title));
    }

    /// Look up a title with or without its namespace display prefix.
    pub fn id_of(&self, title: &str, ns: Namespace) -> Result<PageId> {
        let wanted = normalize_title(ns.bare_title(title.trim()));
        self.by_title
            .get(&ns)
            .and_then(|titles| titles.get(&wanted))
            .copied()
            .ok_or_else(|| FilterError::not_found("page title", format!("{wanted} (namespace {ns})")))
    }

    pub fn title_of(&self, id: PageId) -> Result<(Namespace, &str)> {
        self.by_id
            .get(&id)
            .map(|(ns, title)| (*ns, title.as_str()))
            .ok_or_else(|| FilterError::not_found("page id", id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Translate category titles, collecting the ones that have no page.
    pub fn resolve_categories<S: AsRef<str>>(&self, titles: &[S]) -> TitleResolution {
        let mut resolution = TitleResolution::default();
        for title in titles {
            match self.id_of(title.as_ref(), Namespace::CATEGORY) {
                Ok(id) => resolution.ids.push(id),
                Err(_) => resolution.unresolved.push(title.as_ref().to_string()),
            }
        }
        resolution
    }
}

/// Dump titles use spaces where URLs use underscores.
fn normalize_title(title: &str) -> String {
    title.replace('_', " ")
}
