//! wikt-filter: derive filtered term lists from MediaWiki dumps
//!
//! Pages are collected from category trees, with excluded trees subtracted,
//! and can then be pruned to terms that have at least one valid dictionary
//! sense.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod progress;
pub mod resolve;
pub mod senses;
pub mod store;

pub use error::{FilterError, Result};
