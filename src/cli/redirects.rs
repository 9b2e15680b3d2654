//! Redirects command implementation

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::utils::write_lines;
use crate::domain::{PageId, RedirectEdge};
use crate::graph::alias::final_target;
use crate::graph::{find_double_redirects, AliasExpander};
use crate::store::{RedirectFile, RedirectSource};

/// Hops followed when reporting where a redirect chain ends.
const MAX_REPORTED_HOPS: usize = 16;

#[derive(Args)]
pub struct RedirectsArgs {
    #[command(subcommand)]
    command: RedirectsCommand,
}

#[derive(Subcommand)]
enum RedirectsCommand {
    /// List redirects that point at another redirect
    Check {
        /// Redirects file
        redirects: PathBuf,

        /// Print at most this many chains
        #[arg(long, value_name = "N", default_value_t = 50)]
        limit: usize,
    },

    /// Print titles together with every title redirecting to them
    Expand {
        /// Redirects file
        redirects: PathBuf,

        /// Canonical titles
        #[arg(required = true)]
        titles: Vec<String>,

        /// Treat titles as template names
        #[arg(long)]
        templates: bool,

        /// Also report redirects to the added aliases
        #[arg(long)]
        check_chains: bool,
    },
}

pub fn run(args: RedirectsArgs) -> Result<()> {
    match args.command {
        RedirectsCommand::Check { redirects, limit } => check(redirects, limit),
        RedirectsCommand::Expand { redirects, titles, templates, check_chains } => {
            expand(redirects, &titles, templates, check_chains)
        }
    }
}

fn check(path: PathBuf, limit: usize) -> Result<()> {
    let source = RedirectFile::new(&path);
    let doubles = find_double_redirects(&source)
        .with_context(|| format!("Failed scanning redirects {}", path.display()))?;
    if doubles.is_empty() {
        println!("No double redirects found.");
        return Ok(());
    }

    // Only edges taking part in a chain are needed to walk it.
    let mut edges: Vec<RedirectEdge> = doubles.clone();
    let wanted: HashSet<PageId> = doubles.iter().map(|edge| edge.dst_id).collect();
    source.scan(&mut |edge| {
        if wanted.contains(&edge.src_id) {
            edges.push(edge.clone());
        }
    })?;
    let by_source: HashMap<PageId, &RedirectEdge> = edges.iter().map(|edge| (edge.src_id, edge)).collect();

    let lines: Vec<String> = doubles
        .iter()
        .take(limit)
        .map(|edge| {
            let end = final_target(&by_source, edge, MAX_REPORTED_HOPS);
            format!("{} -> {} -> ... -> {}", edge.src_title, edge.dst_title, end.dst_title)
        })
        .collect();
    write_lines(None, &lines)?;
    if doubles.len() > limit {
        println!("... and {} more", doubles.len() - limit);
    }
    eprintln!("warning: {} double redirect(s) found", doubles.len());
    Ok(())
}

fn expand(path: PathBuf, titles: &[String], templates: bool, check_chains: bool) -> Result<()> {
    let source = RedirectFile::new(&path);
    let expander = AliasExpander::new(&source).with_chain_check(check_chains);
    let expansion = if templates {
        expander.expand_templates(titles)?
    } else {
        expander.expand(titles.iter().cloned())?
    };

    let lines: Vec<&str> = expansion.titles.iter().map(String::as_str).collect();
    write_lines(None, &lines)?;
    for edge in &expansion.chained {
        eprintln!("warning: chained redirect {} -> {} not expanded", edge.src_title, edge.dst_title);
    }
    eprintln!("info: {} alias(es) added", expansion.added);
    Ok(())
}
