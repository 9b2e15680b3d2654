//! Category closure and redirect alias expansion.

pub mod alias;
pub mod category_graph;
pub mod closure;

pub use alias::{find_double_redirects, AliasExpander, AliasExpansion};
pub use category_graph::{CategoryGraph, CategoryMembers};
pub use closure::{CategoryBackend, ClosureOutcome, ClosureRequest, ClosureStats, MemberKey};
