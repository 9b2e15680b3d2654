//! Term admissibility: template rules, the resolver and the form-of
//! template cache.

pub mod form_of_cache;
pub mod resolver;
pub mod rules;

pub use form_of_cache::{load_or_compute, read_form_of_cache, write_form_of_cache, FormOfSource};
pub use resolver::{AdmissibilityResolver, ResolverStats};
pub use rules::{RoleSet, SenseVerdict, SkipReason, TemplateRole, TemplateRules};
