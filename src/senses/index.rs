//! Per-term sense data built from the page dump.

use crate::domain::Namespace;
use crate::error::Result;
use crate::progress::{ProgressSink, Stage};
use crate::senses::template::Sense;
use crate::senses::wikitext::parse_templates;
use crate::store::{PageDump, ScanStats};
use std::collections::HashMap;
use std::path::Path;

/// Gloss lines start with `# `; `#:`, `#*` and friends are examples and
/// quotations.
const SENSE_LINE_PREFIX: &str = "# ";

/// Ordered senses of a term, or `None` when the term was never seen.
pub trait SenseProvider: Sync {
    fn senses(&self, term: &str) -> Option<&[Sense]>;
}

impl SenseProvider for HashMap<String, Vec<Sense>> {
    fn senses(&self, term: &str) -> Option<&[Sense]> {
        self.get(term).map(Vec::as_slice)
    }
}

#[derive(Debug, Default)]
pub struct SenseIndex {
    entries: HashMap<String, Vec<Sense>>,
}

impl SenseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every page of the dump, or only those in `namespace`. Pages
    /// whose namespace is not recorded are always kept.
    pub fn load(path: &Path, namespace: Option<Namespace>, progress: &dyn ProgressSink) -> Result<(Self, ScanStats)> {
        let mut index = Self::new();
        let stats = PageDump::new(path).for_each_page(
            &mut |page| {
                if in_namespace(namespace, page.ns) {
                    index.insert_wikitext(page.title, &page.text);
                }
            },
            progress,
        )?;
        progress.finish(Stage::Pages, stats.records);
        tracing::info!(terms = index.len(), pages = stats.records, "sense index loaded");
        Ok((index, stats))
    }

    /// Record the gloss lines of a page. A page without any sense line still
    /// gets an (empty) entry: it is known, just never admissible.
    pub fn insert_wikitext(&mut self, title: String, text: &str) {
        let senses = text
            .lines()
            .filter(|line| line.starts_with(SENSE_LINE_PREFIX))
            .map(|line| Sense::new(parse_templates(line)))
            .collect();
        self.entries.insert(title, senses);
    }

    pub fn insert(&mut self, term: impl Into<String>, senses: Vec<Sense>) {
        self.entries.insert(term.into(), senses);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn in_namespace(wanted: Option<Namespace>, actual: Option<Namespace>) -> bool {
    match (wanted, actual) {
        (Some(wanted), Some(actual)) => wanted == actual,
        _ => true,
    }
}

impl SenseProvider for SenseIndex {
    fn senses(&self, term: &str) -> Option<&[Sense]> {
        self.entries.get(term).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_gloss_lines() {
        let mut index = SenseIndex::new();
        index.insert_wikitext(
            "cats".to_string(),
            "==English==\n# {{plural of|en|cat}}\n#: {{ux|en|Two cats.}}\n#* quote\n# a second sense",
        );
        let senses = index.senses("cats").expect("indexed");
        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].templates[0].name, "plural of");
        assert!(senses[1].templates.is_empty());
        assert!(index.senses("dogs").is_none());
    }

    #[test]
    fn namespace_filter_keeps_pages_without_namespace() {
        assert!(in_namespace(Some(Namespace::MAIN), Some(Namespace::MAIN)));
        assert!(in_namespace(Some(Namespace::MAIN), None));
        assert!(!in_namespace(Some(Namespace::MAIN), Some(Namespace::TEMPLATE)));
        assert!(in_namespace(None, Some(Namespace::TEMPLATE)));
    }
}
