//! Configuration loading and merging
//!
//! Config files are discovered in the working directory; CLI arguments
//! override file values, which override defaults.

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
