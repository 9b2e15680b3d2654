//! Materialized category graph.

use crate::domain::{CategoryLink, PageId};
use crate::error::Result;
use crate::progress::{ProgressSink, Stage};
use crate::store::{CategorySource, ScanStats};
use std::collections::{HashMap, HashSet};

/// Direct members of one category, split by namespace tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMembers {
    pub subcats: HashSet<PageId>,
    pub pages: HashSet<PageId>,
}

/// `cat_id -> members`, plus the titles of every content page seen.
///
/// Only ids observed as the category side of a link are keys. Lookups for
/// anything else return `None`, which traversal treats as "no members".
#[derive(Debug, Default)]
pub struct CategoryGraph {
    members: HashMap<PageId, CategoryMembers>,
    titles: HashMap<PageId, Box<str>>,
}

impl CategoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one full scan of `source`.
    pub fn build(source: &dyn CategorySource, progress: &dyn ProgressSink) -> Result<(Self, ScanStats)> {
        let mut graph = Self::new();
        let stats = source.scan(&mut |link| graph.insert(link))?;
        progress.finish(Stage::GraphBuild, stats.records);
        tracing::debug!(
            categories = graph.category_count(),
            pages = graph.titles.len(),
            "category graph built"
        );
        Ok((graph, stats))
    }

    pub fn insert(&mut self, link: &CategoryLink) {
        let members = self.members.entry(link.cat_id).or_default();
        if link.is_subcategory() {
            members.subcats.insert(link.page_id);
        } else {
            members.pages.insert(link.page_id);
            self.titles
                .entry(link.page_id)
                .or_insert_with(|| link.page_title.as_str().into());
        }
    }

    pub fn members(&self, cat_id: PageId) -> Option<&CategoryMembers> {
        self.members.get(&cat_id)
    }

    /// Title of a content page, as recorded on its category links.
    pub fn title(&self, page_id: PageId) -> Option<&str> {
        self.titles.get(&page_id).map(|title| &**title)
    }

    pub fn category_count(&self) -> usize {
        self.members.len()
    }

    pub fn edge_count(&self) -> usize {
        self.members
            .values()
            .map(|members| members.subcats.len() + members.pages.len())
            .sum()
    }
}
