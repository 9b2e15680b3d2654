//! Category closure: transitive content-page membership of category seeds.
//!
//! A breadth-first walk over subcategory edges. Each seed set keeps its own
//! visited set, so a category is expanded at most once per traversal and
//! cycles in the category graph terminate. The exclude traversal never
//! shares state with the include traversal; the result is the plain set
//! difference of the two.

use crate::domain::{CategoryLink, PageId};
use crate::error::Result;
use crate::graph::category_graph::CategoryGraph;
use crate::progress::{ProgressSink, Stage};
use crate::store::CategorySource;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// How closure members are reported: by id or by title.
pub trait MemberKey: Clone + Eq + Hash + Ord + Send + Sync {
    fn from_member(id: PageId, title: &str) -> Self;
}

impl MemberKey for PageId {
    fn from_member(id: PageId, _title: &str) -> Self {
        id
    }
}

impl MemberKey for String {
    fn from_member(_id: PageId, title: &str) -> Self {
        title.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureRequest {
    pub include: Vec<PageId>,
    pub exclude: Vec<PageId>,
    /// `Some(0)` collects only the direct members of the seeds.
    pub max_depth: Option<u32>,
}

impl ClosureRequest {
    pub fn new(include: Vec<PageId>) -> Self {
        Self { include, ..Self::default() }
    }

    pub fn excluding(mut self, exclude: Vec<PageId>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn round_allowed(&self, round: u32) -> bool {
        self.max_depth.map_or(true, |depth| round <= depth)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClosureStats {
    pub rounds: u32,
    /// Passes over the category store; zero for a materialized graph.
    pub scans: u32,
    pub categories_expanded: u64,
    /// Malformed links seen per streaming scan.
    pub records_skipped: u64,
    pub include_pages: usize,
    pub exclude_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureOutcome<K> {
    /// Include closure minus exclude closure.
    pub pages: BTreeSet<K>,
    /// The exclude closure on its own.
    pub excluded: BTreeSet<K>,
    pub stats: ClosureStats,
}

struct Traversal<K> {
    frontier: HashSet<PageId>,
    next: HashSet<PageId>,
    visited: HashSet<PageId>,
    found: BTreeSet<K>,
    expanded: u64,
}

impl<K: MemberKey> Traversal<K> {
    fn new(seeds: &[PageId]) -> Self {
        let frontier: HashSet<PageId> = seeds.iter().copied().collect();
        Self {
            visited: frontier.clone(),
            frontier,
            next: HashSet::new(),
            found: BTreeSet::new(),
            expanded: 0,
        }
    }

    fn is_active(&self) -> bool {
        !self.frontier.is_empty()
    }

    fn take_frontier(&mut self) -> HashSet<PageId> {
        let frontier = std::mem::take(&mut self.frontier);
        self.expanded += frontier.len() as u64;
        frontier
    }

    fn absorb_subcat(&mut self, id: PageId) {
        if self.visited.insert(id) {
            self.next.insert(id);
        }
    }

    fn absorb_page(&mut self, id: PageId, title: &str) {
        self.found.insert(K::from_member(id, title));
    }

    fn absorb_link(&mut self, link: &CategoryLink) {
        if link.is_subcategory() {
            self.absorb_subcat(link.page_id);
        } else {
            self.absorb_page(link.page_id, &link.page_title);
        }
    }

    fn end_round(&mut self) {
        self.frontier = std::mem::take(&mut self.next);
    }
}

/// Where category membership comes from.
pub enum CategoryBackend<'a> {
    /// Traverse a graph built once up front.
    Materialized(&'a CategoryGraph),
    /// Re-scan the store once per round. Memory stays proportional to the
    /// frontier and the result.
    Streaming(&'a dyn CategorySource),
}

impl CategoryBackend<'_> {
    pub fn closure<K: MemberKey>(
        &self,
        request: &ClosureRequest,
        progress: &dyn ProgressSink,
    ) -> Result<ClosureOutcome<K>> {
        let mut include = Traversal::<K>::new(&request.include);
        let mut exclude = Traversal::<K>::new(&request.exclude);
        let mut stats = ClosureStats::default();

        match self {
            CategoryBackend::Materialized(graph) => {
                let include_rounds = walk_graph(graph, request, &mut include, progress);
                let exclude_rounds = walk_graph(graph, request, &mut exclude, progress);
                stats.rounds = include_rounds.max(exclude_rounds);
            }
            CategoryBackend::Streaming(source) => {
                let mut round = 0;
                while (include.is_active() || exclude.is_active()) && request.round_allowed(round) {
                    let include_frontier = include.take_frontier();
                    let exclude_frontier = exclude.take_frontier();
                    let scan = source.scan(&mut |link| {
                        if include_frontier.contains(&link.cat_id) {
                            include.absorb_link(link);
                        }
                        if exclude_frontier.contains(&link.cat_id) {
                            exclude.absorb_link(link);
                        }
                    })?;
                    include.end_round();
                    exclude.end_round();
                    stats.scans += 1;
                    stats.records_skipped = stats.records_skipped.max(scan.skipped);
                    round += 1;
                    tracing::debug!(round, records = scan.records, "closure scan finished");
                    progress.advance(Stage::ClosureRound, u64::from(round));
                }
                stats.rounds = round;
            }
        }

        stats.categories_expanded = include.expanded + exclude.expanded;
        stats.include_pages = include.found.len();
        stats.exclude_pages = exclude.found.len();
        progress.finish(Stage::ClosureRound, u64::from(stats.rounds));

        let excluded = exclude.found;
        let mut pages = include.found;
        pages.retain(|key| !excluded.contains(key));
        Ok(ClosureOutcome { pages, excluded, stats })
    }
}

fn walk_graph<K: MemberKey>(
    graph: &CategoryGraph,
    request: &ClosureRequest,
    traversal: &mut Traversal<K>,
    progress: &dyn ProgressSink,
) -> u32 {
    let mut round = 0;
    while traversal.is_active() && request.round_allowed(round) {
        for cat_id in traversal.take_frontier() {
            let Some(members) = graph.members(cat_id) else {
                continue;
            };
            for &subcat in &members.subcats {
                traversal.absorb_subcat(subcat);
            }
            for &page in &members.pages {
                traversal.absorb_page(page, graph.title(page).unwrap_or_default());
            }
        }
        traversal.end_round();
        round += 1;
        progress.advance(Stage::ClosureRound, u64::from(round));
    }
    round
}
