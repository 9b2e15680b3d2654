//! Terms command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::cache::default_form_of_cache_path;
use super::utils::{non_empty, print_summary, progress_sink, write_lines, write_report};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{Config, Namespace, PageId};
use crate::pipeline;

#[derive(Args)]
pub struct TermsArgs {
    /// Category links file (cat_id|cat_title|page_id|page_ns|page_title)
    #[arg(long, value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Categories whose trees to collect (ids, or titles with --stubs)
    #[arg(short, long, value_name = "CATEGORY", num_args = 1..)]
    pub include: Vec<String>,

    /// Categories whose trees to subtract
    #[arg(short, long, value_name = "CATEGORY", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Stubs file (id|ns|title); makes seeds category titles
    #[arg(short, long, value_name = "FILE")]
    pub stubs: Option<PathBuf>,

    /// Maximum subcategory depth (0 = direct members only, negative = unlimited)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Re-read the categories file every round instead of building the graph
    #[arg(long)]
    pub small_memory: bool,

    /// Write page ids instead of titles
    #[arg(long)]
    pub output_ids: bool,

    /// MediaWiki XML page dump; enables sense filtering
    #[arg(short, long, value_name = "FILE")]
    pub pages: Option<PathBuf>,

    /// Redirects file (src_id|src_title|dst_id|dst_title)
    #[arg(short, long, value_name = "FILE")]
    pub redirects: Option<PathBuf>,

    /// File caching the form-of template names between runs
    #[arg(short = 't', long, value_name = "FILE")]
    pub form_of_cache: Option<PathBuf>,

    /// Neither read nor write a form-of template cache
    #[arg(long, conflicts_with = "form_of_cache")]
    pub no_form_of_cache: bool,

    /// Page id of the category holding all form-of templates
    #[arg(long, value_name = "ID")]
    pub form_of_category: Option<u64>,

    /// Label template names (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub label_templates: Vec<String>,

    /// Language code whose labels --exclude-labels applies to
    #[arg(short, long, value_name = "CODE")]
    pub label_lang: Option<String>,

    /// Labels that disqualify a sense
    #[arg(short = 'x', long, value_name = "LABEL", num_args = 1.., value_delimiter = ',')]
    pub exclude_labels: Vec<String>,

    /// Templates that disqualify a sense
    #[arg(short = 'm', long, value_name = "TEMPLATE", num_args = 1.., value_delimiter = ',')]
    pub exclude_templates: Vec<String>,

    /// Form-of links to follow before accepting a term
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub ttl: Option<i32>,

    /// Only read senses from pages in this namespace
    #[arg(long, value_name = "NS")]
    pub namespace: Option<i32>,

    /// Skip the scan for redirects that point at other redirects
    #[arg(long)]
    pub no_chain_check: bool,

    /// Reject terms of the excluded trees without reading their senses
    #[arg(long)]
    pub preseed_excluded: bool,

    /// Check terms on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write a JSON run report here
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Path to config file (wikt-filter.toml or .wikt-filter.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl TermsArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            categories: self.categories.clone(),
            stubs: self.stubs.clone(),
            redirects: self.redirects.clone(),
            pages: self.pages.clone(),
            form_of_cache: self.form_of_cache.clone(),
            no_form_of_cache: self.no_form_of_cache.then_some(true),
            include: non_empty(self.include.clone()),
            exclude: non_empty(self.exclude.clone()),
            max_depth: self.depth,
            small_memory: self.small_memory.then_some(true),
            output_ids: self.output_ids.then_some(true),
            form_of_category: self.form_of_category.map(PageId),
            label_templates: non_empty(self.label_templates.clone()),
            label_lang: self.label_lang.clone(),
            exclude_labels: non_empty(self.exclude_labels.clone()),
            exclude_templates: non_empty(self.exclude_templates.clone()),
            time_to_live: self.ttl,
            page_namespace: self.namespace.map(Namespace),
            verify_redirect_chains: self.no_chain_check.then_some(false),
            preseed_excluded: self.preseed_excluded.then_some(true),
            parallel: self.parallel.then_some(true),
        }
    }
}

pub fn run(args: TermsArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let mut config = merge_cli_with_config(file_config, args.overrides());
    apply_form_of_cache_default(&mut config);

    let progress = progress_sink();
    let run = pipeline::run(&config, progress.as_ref()).context("Term filtering failed")?;
    drop(progress);

    write_lines(args.output.as_deref(), &run.terms)?;
    if let Some(report_path) = args.report.as_deref() {
        write_report(report_path, &run.report)?;
    }
    print_summary(&run.report, args.output.as_deref());
    Ok(())
}

/// Sense filtering reuses a cached form-of template list unless told not to.
fn apply_form_of_cache_default(config: &mut Config) {
    if config.no_form_of_cache {
        config.form_of_cache = None;
        return;
    }
    if config.form_of_cache.is_some() || !config.sense_filtering() {
        return;
    }
    if let Some(categories) = config.categories.as_deref() {
        config.form_of_cache =
            default_form_of_cache_path(categories, config.redirects.as_deref(), config.form_of_category);
        if let Some(path) = &config.form_of_cache {
            tracing::debug!("using default form-of cache {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_the_cache_clears_an_explicit_path() {
        let mut config = Config {
            form_of_cache: Some(PathBuf::from("form-of.txt")),
            no_form_of_cache: true,
            ..Config::default()
        };
        apply_form_of_cache_default(&mut config);
        assert!(config.form_of_cache.is_none());
    }

    #[test]
    fn no_default_cache_without_sense_filtering() {
        let mut config = Config { categories: Some(PathBuf::from("cats.csv")), ..Config::default() };
        apply_form_of_cache_default(&mut config);
        assert!(config.form_of_cache.is_none());
    }
}
