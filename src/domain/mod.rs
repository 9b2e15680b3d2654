//! Core data model shared by the stores, the closure engine and the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

pub mod config;

pub use config::Config;

/// Page identifier, unique across all namespaces of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PageId)
    }
}

/// MediaWiki namespace tag.
///
/// Category membership is decided by this tag alone. The `Category:` prefix
/// seen in titles is a display convention and may or may not be present
/// depending on how the stub file was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(pub i32);

impl Namespace {
    pub const MAIN: Namespace = Namespace(0);
    pub const TEMPLATE: Namespace = Namespace(10);
    pub const CATEGORY: Namespace = Namespace(14);

    pub fn is_category(self) -> bool {
        self == Namespace::CATEGORY
    }

    pub fn display_prefix(self) -> Option<&'static str> {
        match self {
            Namespace::TEMPLATE => Some("Template:"),
            Namespace::CATEGORY => Some("Category:"),
            _ => None,
        }
    }

    /// Strip this namespace's display prefix from `title`, if present.
    pub fn bare_title(self, title: &str) -> &str {
        match self.display_prefix() {
            Some(prefix) => title.strip_prefix(prefix).unwrap_or(title),
            None => title,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Namespace {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Namespace)
    }
}

/// One row of the stub table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    pub id: PageId,
    pub ns: Namespace,
    pub title: String,
}

/// `page_id` is a member of `cat_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub cat_id: PageId,
    pub cat_title: String,
    pub page_id: PageId,
    pub page_ns: Namespace,
    pub page_title: String,
}

impl CategoryLink {
    pub fn is_subcategory(&self) -> bool {
        self.page_ns.is_category()
    }
}

/// `src` redirects to `dst`.
///
/// Namespaces are only known for redirect files written in the 6-field
/// layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEdge {
    pub src_id: PageId,
    pub src_ns: Option<Namespace>,
    pub src_title: String,
    pub dst_id: PageId,
    pub dst_ns: Option<Namespace>,
    pub dst_title: String,
}

impl RedirectEdge {
    /// Whether the destination lies in `ns`. Without a namespace field the
    /// display prefix of the destination title is the only evidence left.
    pub fn targets_namespace(&self, ns: Namespace) -> bool {
        match self.dst_ns {
            Some(dst_ns) => dst_ns == ns,
            None => ns.display_prefix().is_some_and(|prefix| self.dst_title.starts_with(prefix)),
        }
    }
}

/// How category seeds were given on input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSpec {
    Ids(Vec<PageId>),
    Titles(Vec<String>),
}

impl SeedSpec {
    pub fn is_empty(&self) -> bool {
        match self {
            SeedSpec::Ids(ids) => ids.is_empty(),
            SeedSpec::Titles(titles) => titles.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_title_strips_only_own_prefix() {
        assert_eq!(Namespace::CATEGORY.bare_title("Category:English lemmas"), "English lemmas");
        assert_eq!(Namespace::CATEGORY.bare_title("en:Cats"), "en:Cats");
        assert_eq!(Namespace::TEMPLATE.bare_title("Template:plural of"), "plural of");
        assert_eq!(Namespace::MAIN.bare_title("Category:foo"), "Category:foo");
    }

    #[test]
    fn page_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<PageId>().expect("id"), PageId(42));
        assert!("x".parse::<PageId>().is_err());
    }
}
