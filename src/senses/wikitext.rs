//! Minimal wikitext template extraction.
//!
//! Only what sense filtering needs: template names and their arguments.
//! Links, formatting and everything else on the line are left alone.

use crate::senses::template::{TemplateArg, TemplateInvocation};

/// Every template invoked on `line`, outer templates before the templates
/// nested in their arguments. An unmatched `{{` is skipped and the scan goes
/// on after it.
pub fn parse_templates(line: &str) -> Vec<TemplateInvocation> {
    let mut found = Vec::new();
    // (text, offset to resume from); a template body is pushed above the
    // rest of its parent so nested templates come right after their parent.
    let mut pending: Vec<(&str, usize)> = vec![(line, 0)];
    'texts: while let Some((text, start)) = pending.pop() {
        let bytes = text.as_bytes();
        let mut i = start;
        while i + 1 < bytes.len() {
            if bytes[i] != b'{' || bytes[i + 1] != b'{' {
                i += 1;
                continue;
            }
            let Some(end) = closing_braces(bytes, i) else {
                i += 2;
                continue;
            };
            let body = &text[i + 2..end];
            if let Some(invocation) = parse_body(body) {
                found.push(invocation);
            }
            pending.push((text, end + 2));
            pending.push((body, 0));
            continue 'texts;
        }
    }
    found
}

/// Index of the `}}` closing the `{{` at `start`.
fn closing_braces(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                depth += 1;
                i += 2;
            }
            (b'}', b'}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

fn parse_body(body: &str) -> Option<TemplateInvocation> {
    let mut parts = split_top_level(body, b'|').into_iter();
    let name = parts.next()?.trim();
    // Parser functions and variables are not templates.
    if name.is_empty() || name.starts_with('#') {
        return None;
    }
    let args = parts
        .map(|part| match split_top_level(part, b'=').as_slice() {
            [value] => TemplateArg::positional(value.trim()),
            [key, ..] => TemplateArg::named(key.trim(), part[key.len() + 1..].trim()),
            [] => TemplateArg::positional(""),
        })
        .collect();
    Some(TemplateInvocation::new(name, args))
}

/// Split on `separator` outside nested templates and links.
fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut braces = 0usize;
    let mut brackets = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let pair = bytes.get(i + 1).map(|&next| (bytes[i], next));
        match pair {
            Some((b'{', b'{')) => {
                braces += 1;
                i += 2;
                continue;
            }
            Some((b'}', b'}')) if braces > 0 => {
                braces -= 1;
                i += 2;
                continue;
            }
            Some((b'[', b'[')) => {
                brackets += 1;
                i += 2;
                continue;
            }
            Some((b']', b']')) if brackets > 0 => {
                brackets -= 1;
                i += 2;
                continue;
            }
            _ => {}
        }
        if bytes[i] == separator && braces == 0 && brackets == 0 {
            pieces.push(&text[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    pieces.push(&text[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_and_named_arguments() {
        let templates = parse_templates("# {{plural of|en|cat|t=feline}} and more");
        assert_eq!(templates.len(), 1);
        let plural = &templates[0];
        assert_eq!(plural.name, "plural of");
        assert_eq!(plural.positional().collect::<Vec<_>>(), vec!["en", "cat"]);
        assert_eq!(plural.arg("t"), Some("feline"));
    }

    #[test]
    fn nested_templates_follow_their_parent() {
        let templates = parse_templates("# {{lb|en|archaic}} {{inflection of|en|{{l|en|run}}|[[a|b]]}}");
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["lb", "inflection of", "l"]);
        let inflection = &templates[1];
        assert_eq!(inflection.arg("2"), Some("{{l|en|run}}"));
        assert_eq!(inflection.arg("3"), Some("[[a|b]]"));
    }

    #[test]
    fn skips_parser_functions_and_unterminated_templates() {
        assert!(parse_templates("# {{#if:x|y}}").is_empty());
        let templates = parse_templates("# {{gloss|ok}} {{broken|");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "gloss");
    }

    #[test]
    fn unmatched_braces_do_not_hide_later_templates() {
        let templates = parse_templates("# {{broken {{plural of|en|cat}}");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "plural of");
        assert_eq!(templates[0].arg("2"), Some("cat"));

        let names: Vec<String> =
            parse_templates("# {{ {{lb|en|x}} and {{gloss|y}}").into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["lb", "gloss"]);
    }

    #[test]
    fn deep_nesting_is_walked_without_recursion() {
        let depth = 2_000;
        let line = format!("# {}{}", "{{t|".repeat(depth), "}}".repeat(depth));
        assert_eq!(parse_templates(&line).len(), depth);
    }

    #[test]
    fn equals_inside_nested_template_stays_positional() {
        let templates = parse_templates("{{form of|en|{{x|a=b}}}}");
        assert_eq!(templates[0].arg("2"), Some("{{x|a=b}}"));
    }
}
