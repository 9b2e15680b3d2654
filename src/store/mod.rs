//! Record stores produced by dump ingestion.
//!
//! Stubs, category links and redirects are pipe-delimited text files; page
//! text comes straight from the XML export.

pub mod categories;
pub mod pages;
pub mod records;
pub mod redirects;
pub mod stubs;

pub use categories::{CategoryFile, CategorySource};
pub use pages::{PageDump, PageText};
pub use records::ScanStats;
pub use redirects::{RedirectFile, RedirectSource};
pub use stubs::{StubStore, TitleResolution};
