//! Property tests for the category closure over small random graphs.

use proptest::prelude::*;
use std::collections::BTreeSet;
use wikt_filter::domain::{CategoryLink, Namespace, PageId};
use wikt_filter::graph::{CategoryBackend, CategoryGraph, ClosureOutcome, ClosureRequest};
use wikt_filter::progress::NoProgress;

const CATEGORIES: u64 = 8;

fn link(cat: u64, member: u64, subcat: bool) -> CategoryLink {
    let (page_id, page_ns, page_title) = if subcat {
        (member, Namespace::CATEGORY, format!("Category:C{member}"))
    } else {
        (100 + member, Namespace::MAIN, format!("p{member}"))
    };
    CategoryLink {
        cat_id: PageId(cat),
        cat_title: format!("C{cat}"),
        page_id: PageId(page_id),
        page_ns,
        page_title,
    }
}

fn links_strategy() -> impl Strategy<Value = Vec<CategoryLink>> {
    prop::collection::vec((1..=CATEGORIES, 0..20u64, any::<bool>()), 0..60).prop_map(|edges| {
        edges
            .into_iter()
            .map(|(cat, member, subcat)| {
                let member = if subcat { member % CATEGORIES + 1 } else { member };
                link(cat, member, subcat)
            })
            .collect()
    })
}

fn seeds_strategy() -> impl Strategy<Value = Vec<PageId>> {
    prop::collection::vec((1..=CATEGORIES).prop_map(PageId), 0..3)
}

fn depth_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(0..5u32)
}

fn materialized(links: &Vec<CategoryLink>, request: &ClosureRequest) -> ClosureOutcome<PageId> {
    let (graph, _) = CategoryGraph::build(links, &NoProgress).expect("build graph");
    CategoryBackend::Materialized(&graph).closure(request, &NoProgress).expect("closure")
}

fn streaming(links: &Vec<CategoryLink>, request: &ClosureRequest) -> ClosureOutcome<PageId> {
    CategoryBackend::Streaming(links).closure(request, &NoProgress).expect("closure")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn streaming_agrees_with_materialized(
        links in links_strategy(),
        include in seeds_strategy(),
        exclude in seeds_strategy(),
        depth in depth_strategy(),
    ) {
        let request = ClosureRequest::new(include).excluding(exclude).with_max_depth(depth);
        let a = materialized(&links, &request);
        let b = streaming(&links, &request);
        prop_assert_eq!(a.pages, b.pages);
        prop_assert_eq!(a.excluded, b.excluded);
    }

    #[test]
    fn repeated_runs_give_the_same_pages(
        links in links_strategy(),
        include in seeds_strategy(),
        exclude in seeds_strategy(),
    ) {
        let request = ClosureRequest::new(include).excluding(exclude);
        let first = streaming(&links, &request);
        let mut shuffled = links.clone();
        shuffled.reverse();
        let second = streaming(&shuffled, &request);
        prop_assert_eq!(first.pages, second.pages);
    }

    #[test]
    fn result_is_include_closure_minus_exclude_closure(
        links in links_strategy(),
        include in seeds_strategy(),
        exclude in seeds_strategy(),
        depth in depth_strategy(),
    ) {
        let combined = materialized(
            &links,
            &ClosureRequest::new(include.clone()).excluding(exclude.clone()).with_max_depth(depth),
        );
        let included = materialized(&links, &ClosureRequest::new(include).with_max_depth(depth));
        let excluded = materialized(&links, &ClosureRequest::new(exclude).with_max_depth(depth));

        let expected: BTreeSet<PageId> = included.pages.difference(&excluded.pages).copied().collect();
        prop_assert_eq!(combined.pages, expected);
        prop_assert_eq!(combined.excluded, excluded.pages);
    }

    #[test]
    fn deeper_limits_never_lose_pages(
        links in links_strategy(),
        include in seeds_strategy(),
        depth in 0..5u32,
    ) {
        let shallow = streaming(&links, &ClosureRequest::new(include.clone()).with_max_depth(Some(depth)));
        let deep = streaming(&links, &ClosureRequest::new(include).with_max_depth(Some(depth + 1)));
        prop_assert!(shallow.pages.is_subset(&deep.pages));
    }

    #[test]
    fn unlimited_depth_terminates_on_cycles(
        links in links_strategy(),
        include in seeds_strategy(),
    ) {
        // Every category is reachable within CATEGORIES rounds, so a deeper
        // limit cannot change the unlimited result.
        let unlimited = streaming(&links, &ClosureRequest::new(include.clone()));
        let bounded = streaming(
            &links,
            &ClosureRequest::new(include).with_max_depth(Some(CATEGORIES as u32)),
        );
        prop_assert!(unlimited.stats.rounds <= CATEGORIES as u32 + 1);
        prop_assert_eq!(unlimited.pages, bounded.pages);
    }
}
