//! wikt-filter command-line entry point.

use anyhow::Result;

fn main() -> Result<()> {
    wikt_filter::cli::run()
}
