//! Closure command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{non_empty, print_summary, progress_sink, write_lines, write_report};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;
use crate::pipeline;

#[derive(Args)]
pub struct ClosureArgs {
    /// Category links file (cat_id|cat_title|page_id|page_ns|page_title)
    #[arg(long, value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Categories whose trees to collect (ids, or titles with --stubs)
    #[arg(short, long, value_name = "CATEGORY", num_args = 1.., required = true)]
    pub include: Vec<String>,

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

pub fn run(args: ClosureArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let overrides = CliOverrides {
        categories: args.categories.clone(),
        stubs: args.stubs.clone(),
        include: non_empty(args.include.clone()),
        max_depth: args.depth,
        small_memory: args.small_memory.then_some(true),
        output_ids: args.output_ids.then_some(true),
        ..CliOverrides::default()
    };
    let config = closure_only(merge_cli_with_config(file_config, overrides));

    let progress = progress_sink();
    let run = pipeline::run(&config, progress.as_ref()).context("Category closure failed")?;
    drop(progress);

    write_lines(args.output.as_deref(), &run.terms)?;
    if let Some(report_path) = args.report.as_deref() {
        write_report(report_path, &run.report)?;
    }
    print_summary(&run.report, args.output.as_deref());
    Ok(())
}

/// Drop every setting that would go beyond the plain include closure.
fn closure_only(config: Config) -> Config {
    Config {
        exclude: Vec::new(),
        pages: None,
        exclude_labels: Vec::new(),
        exclude_templates: Vec::new(),
        ..config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_ignores_exclusions_and_sense_settings_from_config() {
        let config = Config {
            exclude: vec!["102".to_string()],
            pages: Some(PathBuf::from("pages.xml")),
            exclude_templates: vec!["rfd".to_string()],
            ..Config::default()
        };
        let config = closure_only(config);
        assert!(config.exclude.is_empty());
        assert!(!config.sense_filtering());
        assert!(config.exclude_templates.is_empty());
    }
}
