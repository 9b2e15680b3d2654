//! Template invocations found on sense lines.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static SPACING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").expect("valid regex"));

const TEMPLATE_PREFIX: &str = "template:";

/// Canonical form of a template name as written in wikitext or in a title.
///
/// Comments are dropped, runs of underscores and whitespace collapse to one
/// space, and a leading `Template:` (any case) is removed. Case is otherwise
/// kept.
pub fn normalize_template_name(raw: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(raw, "");
    let spaced = SPACING_RE.replace_all(&without_comments, " ");
    let trimmed = spaced.trim();
    let bare = match trimmed.get(..TEMPLATE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(TEMPLATE_PREFIX) => trimmed[TEMPLATE_PREFIX.len()..].trim_start(),
        _ => trimmed,
    };
    bare.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateArg {
    /// `None` for positional arguments.
    pub name: Option<String>,
    pub value: String,
}

impl TemplateArg {
    pub fn positional(value: impl Into<String>) -> Self {
        Self { name: None, value: value.into() }
    }

    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: Some(name.into()), value: value.into() }
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInvocation {
    /// Normalized with [`normalize_template_name`].
    pub name: String,
    pub args: Vec<TemplateArg>,
}

impl TemplateInvocation {
    pub fn new(name: &str, args: Vec<TemplateArg>) -> Self {
        Self { name: normalize_template_name(name), args }
    }

    pub fn positional(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter(|arg| arg.is_positional()).map(|arg| arg.value.as_str())
    }

    pub fn first_positional(&self) -> Option<&str> {
        self.positional().next()
    }

    /// Argument `key` the way MediaWiki resolves it: positional arguments are
    /// numbered from 1, an explicit `2=` counts as argument 2, and the last
    /// definition wins.
    pub fn arg(&self, key: &str) -> Option<&str> {
        let mut position = 0usize;
        let mut found = None;
        for arg in &self.args {
            let matches = match &arg.name {
                Some(name) => name == key,
                None => {
                    position += 1;
                    key.parse::<usize>().is_ok_and(|wanted| wanted == position)
                }
            };
            if matches {
                found = Some(arg.value.as_str());
            }
        }
        found
    }
}

/// One gloss line: the templates it invokes, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sense {
    pub templates: Vec<TemplateInvocation>,
}

impl Sense {
    pub fn new(templates: Vec<TemplateInvocation>) -> Self {
        Self { templates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_prefix_spacing_and_comments() {
        assert_eq!(normalize_template_name("Template:plural_of"), "plural of");
        assert_eq!(normalize_template_name("  template: en-past  of <!-- x -->"), "en-past of");
        assert_eq!(normalize_template_name("Lb"), "Lb");
    }

    #[test]
    fn named_numeric_argument_overrides_position() {
        let invocation = TemplateInvocation::new(
            "inflection of",
            vec![
                TemplateArg::positional("en"),
                TemplateArg::named("2", "run"),
                TemplateArg::positional("running"),
            ],
        );
        // The positional "running" is argument 2 and comes last.
        assert_eq!(invocation.arg("2"), Some("running"));
        assert_eq!(invocation.arg("1"), Some("en"));
        assert_eq!(invocation.arg("3"), None);
        assert_eq!(invocation.first_positional(), Some("en"));
    }
}
