//! Sense lines: template parsing and the per-term sense index.

pub mod index;
pub mod template;
pub mod wikitext;

pub use index::{SenseIndex, SenseProvider};
pub use template::{normalize_template_name, Sense, TemplateArg, TemplateInvocation};
pub use wikitext::parse_templates;
