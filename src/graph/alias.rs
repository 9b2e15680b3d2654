//! Alias expansion over the redirect store.
//!
//! A canonical set is widened with every title that redirects straight to
//! one of its members. Expansion is a single hop: membership is tested
//! against the canonical set only, so with `C -> B -> A` and canonical `{A}`
//! the result is `{A, B}` whatever order the edges come in. The optional
//! chain check reports such edges without following them.

use crate::domain::{Namespace, PageId, RedirectEdge};
use crate::error::Result;
use crate::senses::normalize_template_name;
use crate::store::{RedirectSource, ScanStats};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasExpansion {
    /// Canonical titles plus their direct aliases.
    pub titles: BTreeSet<String>,
    /// How many aliases were added.
    pub added: usize,
    /// Redirects pointing at an alias rather than a canonical title. Only
    /// filled when the chain check is on.
    pub chained: Vec<RedirectEdge>,
    pub stats: ScanStats,
}

pub struct AliasExpander<'a> {
    redirects: &'a dyn RedirectSource,
    check_chains: bool,
}

impl<'a> AliasExpander<'a> {
    pub fn new(redirects: &'a dyn RedirectSource) -> Self {
        Self { redirects, check_chains: false }
    }

    pub fn with_chain_check(mut self, enabled: bool) -> Self {
        self.check_chains = enabled;
        self
    }

    /// Expand titles compared exactly as stored.
    pub fn expand<I, S>(&self, titles: I) -> Result<AliasExpansion>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let canonical = titles.into_iter().map(Into::into).collect();
        self.run(canonical, &|edge| Some((edge.src_title.clone(), edge.dst_title.clone())))
    }

    /// Expand template names. Both sides are normalized, and only redirects
    /// landing in the template namespace count.
    pub fn expand_templates<I, S>(&self, names: I) -> Result<AliasExpansion>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let canonical = names
            .into_iter()
            .map(|name| normalize_template_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();
        self.run(canonical, &|edge| {
            edge.targets_namespace(Namespace::TEMPLATE).then(|| {
                (normalize_template_name(&edge.src_title), normalize_template_name(&edge.dst_title))
            })
        })
    }

    fn run(
        &self,
        canonical: BTreeSet<String>,
        key: &dyn Fn(&RedirectEdge) -> Option<(String, String)>,
    ) -> Result<AliasExpansion> {
        let mut aliases = BTreeSet::new();
        let stats = self.redirects.scan(&mut |edge| {
            if let Some((src, dst)) = key(edge) {
                if canonical.contains(&dst) && !canonical.contains(&src) {
                    aliases.insert(src);
                }
            }
        })?;

        let mut chained = Vec::new();
        if self.check_chains && !aliases.is_empty() {
            self.redirects.scan(&mut |edge| {
                if let Some((src, dst)) = key(edge) {
                    if aliases.contains(&dst) && !canonical.contains(&src) && !aliases.contains(&src) {
                        chained.push(edge.clone());
                    }
                }
            })?;
            if !chained.is_empty() {
                tracing::warn!(
                    "{} redirect(s) point at an alias instead of a canonical title and were not expanded",
                    chained.len()
                );
                for edge in chained.iter().take(5) {
                    tracing::debug!("chained redirect: {} -> {}", edge.src_title, edge.dst_title);
                }
            }
        }

        let added = aliases.len();
        let mut titles = canonical;
        titles.extend(aliases);
        Ok(AliasExpansion { titles, added, chained, stats })
    }
}

/// Redirects whose destination is itself a redirect source.
pub fn find_double_redirects(redirects: &dyn RedirectSource) -> Result<Vec<RedirectEdge>> {
    let mut sources: HashSet<PageId> = HashSet::new();
    redirects.scan(&mut |edge| {
        sources.insert(edge.src_id);
    })?;

    let mut doubles = Vec::new();
    redirects.scan(&mut |edge| {
        if sources.contains(&edge.dst_id) {
            doubles.push(edge.clone());
        }
    })?;
    doubles.sort_by_key(|edge| (edge.src_id, edge.dst_id));
    Ok(doubles)
}

/// Follow a double redirect to its final target, for reporting. Stops on
/// cycles and after `max_hops`.
pub fn final_target<'r>(
    by_source: &'r HashMap<PageId, &'r RedirectEdge>,
    start: &'r RedirectEdge,
    max_hops: usize,
) -> &'r RedirectEdge {
    let mut current = start;
    let mut seen = HashSet::from([start.src_id]);
    for _ in 0..max_hops {
        match by_source.get(&current.dst_id) {
            Some(&next) if seen.insert(next.src_id) => current = next,
            _ => break,
        }
    }
    current
}
