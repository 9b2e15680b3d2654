//! Command-line interface for wikt-filter
//!
//! `terms` runs the full filter, `closure` only walks categories, and
//! `redirects` inspects a redirect store.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod closure;
mod redirects;
mod terms;
mod utils;

/// Derive filtered term lists from MediaWiki category graphs and sense lines
#[derive(Parser)]
#[command(name = "wikt-filter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the pages of category trees, minus excluded trees, optionally
    /// dropping terms without a valid sense
    Terms(Box<terms::TermsArgs>),

    /// Collect every page below the given categories
    Closure(closure::ClosureArgs),

    /// Inspect a redirect store
    Redirects(redirects::RedirectsArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Terms(args) => terms::run(*args),
        Commands::Closure(args) => closure::run(args),
        Commands::Redirects(args) => redirects::run(args),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            clap_complete::generate(args.shell, &mut command, "wikt-filter", &mut std::io::stdout());
            Ok(())
        }
    }
}
