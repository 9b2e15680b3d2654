//! End-to-end term filtering run.
//!
//! Seeds are resolved, the category closure is computed, and when a page dump
//! is configured every candidate term goes through the admissibility
//! resolver. Nothing here prints; the caller gets the terms and a report.

use crate::domain::{Config, Namespace, PageId};
use crate::error::{FilterError, Result};
use crate::graph::{AliasExpander, CategoryBackend, CategoryGraph, ClosureOutcome, ClosureRequest, ClosureStats};
use crate::progress::{ProgressSink, Stage, REPORT_INTERVAL};
use crate::resolve::{load_or_compute, AdmissibilityResolver, FormOfSource, ResolverStats, TemplateRules};
use crate::senses::{normalize_template_name, SenseIndex};
use crate::store::{CategoryFile, RedirectFile, RedirectSource, ScanStats, StubStore};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Terms per parallel work unit. Each unit owns a resolver cache.
const PARALLEL_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureMode {
    Materialized,
    Streaming,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub include: Vec<PageId>,
    pub exclude: Vec<PageId>,
    pub unresolved_include: Vec<String>,
    pub unresolved_exclude: Vec<String>,
    /// Category stubs read when seeds are titles.
    pub stubs: Option<ScanStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOfReport {
    pub source: FormOfSource,
    pub templates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenseReport {
    pub form_of: FormOfReport,
    pub excluded_templates: usize,
    pub chained_redirects: usize,
    /// Redirect records read for alias expansion; `None` when nothing was
    /// expanded.
    pub redirects: Option<ScanStats>,
    pub pages: ScanStats,
    pub preseeded: usize,
    pub rejected: usize,
    pub resolver: ResolverStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: ClosureMode,
    pub seeds: SeedReport,
    /// Category links read while building the graph. Streaming runs report
    /// skipped links in `closure` instead.
    pub category_records: Option<ScanStats>,
    pub closure: ClosureStats,
    pub candidates: usize,
    pub senses: Option<SenseReport>,
    pub output: usize,
}

impl RunReport {
    /// Malformed records dropped anywhere in the run.
    pub fn skipped_records(&self) -> u64 {
        let categories = self.category_records.map_or(self.closure.records_skipped, |stats| stats.skipped);
        let stubs = self.seeds.stubs.map_or(0, |stats| stats.skipped);
        let senses = self.senses.as_ref().map_or(0, |senses| {
            senses.pages.skipped + senses.redirects.map_or(0, |stats| stats.skipped)
        });
        categories + stubs + senses
    }
}

#[derive(Debug, Clone)]
pub struct FilterRun {
    /// Sorted.
    pub terms: Vec<String>,
    pub report: RunReport,
}

pub fn run(config: &Config, progress: &dyn ProgressSink) -> Result<FilterRun> {
    config.validate()?;
    let categories = config
        .categories
        .as_deref()
        .ok_or_else(|| FilterError::config("a categories file is required"))?;

    let seeds = resolve_seeds(config, progress)?;
    let request = ClosureRequest::new(seeds.include.clone())
        .excluding(seeds.exclude.clone())
        .with_max_depth(config.depth_limit());

    let file = CategoryFile::new(categories).with_progress(progress);
    let graph;
    let (backend, mode, category_records) = if config.small_memory {
        (CategoryBackend::Streaming(&file), ClosureMode::Streaming, None)
    } else {
        let (built, stats) = CategoryGraph::build(&file, progress)?;
        graph = built;
        (CategoryBackend::Materialized(&graph), ClosureMode::Materialized, Some(stats))
    };
    tracing::info!(?mode, include = seeds.include.len(), exclude = seeds.exclude.len(), "computing closure");

    if config.output_ids {
        let outcome = backend.closure::<PageId>(&request, progress)?;
        let terms: Vec<String> = outcome.pages.iter().map(PageId::to_string).collect();
        let report = RunReport {
            mode,
            seeds,
            category_records,
            closure: outcome.stats,
            candidates: outcome.pages.len(),
            senses: None,
            output: terms.len(),
        };
        return Ok(FilterRun { terms, report });
    }

    let outcome = backend.closure::<String>(&request, progress)?;
    let candidates = outcome.pages.len();
    let (terms, senses) = match config.pages.as_deref() {
        Some(pages) => {
            let (terms, report) = filter_senses(config, &backend, &outcome, pages, progress)?;
            (terms, Some(report))
        }
        None => (outcome.pages.iter().cloned().collect(), None),
    };

    let report = RunReport {
        mode,
        seeds,
        category_records,
        closure: outcome.stats,
        candidates,
        senses,
        output: terms.len(),
    };
    Ok(FilterRun { terms, report })
}

/// Translate configured seeds into category ids.
///
/// Unresolved titles are logged and dropped. Only an include set that
/// resolves to nothing at all is an error.
pub fn resolve_seeds(config: &Config, progress: &dyn ProgressSink) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    match config.stubs.as_deref() {
        Some(stubs) => {
            let (store, stats) = StubStore::load_namespace(stubs, Namespace::CATEGORY, progress)?;
            report.stubs = Some(stats);
            let include = store.resolve_categories(&config.include);
            let exclude = store.resolve_categories(&config.exclude);
            report.include = include.ids;
            report.exclude = exclude.ids;
            report.unresolved_include = include.unresolved;
            report.unresolved_exclude = exclude.unresolved;
        }
        None => {
            report.include = parse_ids(&config.include)?;
            report.exclude = parse_ids(&config.exclude)?;
        }
    }

    if !report.unresolved_include.is_empty() {
        tracing::warn!("unresolved include categories: {}", report.unresolved_include.join(", "));
    }
    if !report.unresolved_exclude.is_empty() {
        tracing::warn!("unresolved exclude categories: {}", report.unresolved_exclude.join(", "));
    }
    if report.include.is_empty() {
        return Err(FilterError::UnresolvedSeeds { role: "include", names: report.unresolved_include });
    }
    Ok(report)
}

fn parse_ids(raw: &[String]) -> Result<Vec<PageId>> {
    raw.iter()
        .map(|value| {
            value.parse().map_err(|_| {
                FilterError::config(format!("{value:?} is not a category id; give a stubs file to use titles"))
            })
        })
        .collect()
}

fn filter_senses(
    config: &Config,
    backend: &CategoryBackend<'_>,
    outcome: &ClosureOutcome<String>,
    pages: &Path,
    progress: &dyn ProgressSink,
) -> Result<(Vec<String>, SenseReport)> {
    let redirect_file = config.redirects.as_deref().map(|path| RedirectFile::new(path).with_progress(progress));
    let redirects = redirect_file.as_ref().map(|file| file as &dyn RedirectSource);
    let mut chained_redirects = 0;
    // Every expansion scans the same file, so one set of counts covers them.
    let mut redirect_stats: Option<ScanStats> = None;

    let (form_of, source) = load_or_compute(config.form_of_cache.as_deref(), || {
        let Some(redirects) = redirects else {
            return Err(FilterError::config("form-of templates need a redirects file when no cache file exists"));
        };
        let request = ClosureRequest::new(vec![config.form_of_category]);
        let templates = backend.closure::<String>(&request, progress)?;
        if templates.pages.is_empty() {
            tracing::warn!("form-of template category {} has no members", config.form_of_category);
        }
        let expansion = AliasExpander::new(redirects)
            .with_chain_check(config.verify_redirect_chains)
            .expand_templates(&templates.pages)?;
        chained_redirects += expansion.chained.len();
        redirect_stats = Some(expansion.stats);
        tracing::info!(templates = expansion.titles.len(), aliases = expansion.added, "form-of templates found");
        Ok(expansion.titles)
    })?;

    let excluded: BTreeSet<String> = match redirects {
        Some(redirects) if !config.exclude_templates.is_empty() => {
            let expansion = AliasExpander::new(redirects)
                .with_chain_check(config.verify_redirect_chains)
                .expand_templates(&config.exclude_templates)?;
            chained_redirects += expansion.chained.len();
            redirect_stats = Some(expansion.stats);
            expansion.titles
        }
        _ => config.exclude_templates.iter().map(|name| normalize_template_name(name)).collect(),
    };

    let rules = TemplateRules::build(
        &form_of,
        &excluded,
        &config.label_templates,
        config.label_lang.as_deref(),
        &config.exclude_labels,
    )?;
    let (index, page_stats) = SenseIndex::load(pages, config.page_namespace, progress)?;

    let mut resolver = AdmissibilityResolver::new(&index, &rules).with_time_to_live(config.time_to_live);
    let preseeded = if config.preseed_excluded {
        resolver.preseed_rejected(outcome.excluded.iter().cloned())
    } else {
        0
    };

    let candidates: Vec<&str> = outcome.pages.iter().map(String::as_str).collect();
    let (terms, resolver_stats) = if config.parallel {
        check_parallel(&resolver, &candidates, progress)
    } else {
        check_sequential(&mut resolver, &candidates, progress)
    };
    let rejected = candidates.len() - terms.len();
    tracing::info!(kept = terms.len(), rejected, "sense filtering finished");

    let report = SenseReport {
        form_of: FormOfReport { source, templates: form_of.len() },
        excluded_templates: excluded.len(),
        chained_redirects,
        redirects: redirect_stats,
        pages: page_stats,
        preseeded,
        rejected,
        resolver: resolver_stats,
    };
    Ok((terms, report))
}

fn check_sequential(
    resolver: &mut AdmissibilityResolver<'_, SenseIndex>,
    candidates: &[&str],
    progress: &dyn ProgressSink,
) -> (Vec<String>, ResolverStats) {
    let mut kept = Vec::new();
    for (done, term) in candidates.iter().enumerate() {
        if resolver.admissible(term) {
            kept.push(term.to_string());
        }
        let done = done as u64 + 1;
        if done % REPORT_INTERVAL == 0 {
            progress.advance(Stage::Terms, done);
        }
    }
    progress.finish(Stage::Terms, candidates.len() as u64);
    (kept, *resolver.stats())
}

/// Check chunks of candidates on the rayon pool. Every chunk works on a fork
/// of `resolver`, so caches are per chunk and never shared.
fn check_parallel(
    resolver: &AdmissibilityResolver<'_, SenseIndex>,
    candidates: &[&str],
    progress: &dyn ProgressSink,
) -> (Vec<String>, ResolverStats) {
    let chunks: Vec<(Vec<String>, ResolverStats)> = candidates
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| {
            let mut worker = resolver.fork();
            let kept = chunk
                .iter()
                .filter(|term| worker.admissible(term))
                .map(|term| term.to_string())
                .collect();
            (kept, worker.into_stats())
        })
        .collect();

    let mut kept = Vec::new();
    let mut stats = ResolverStats::default();
    for (chunk_kept, chunk_stats) in chunks {
        kept.extend(chunk_kept);
        stats.merge(&chunk_stats);
    }
    progress.finish(Stage::Terms, candidates.len() as u64);
    (kept, stats)
}
