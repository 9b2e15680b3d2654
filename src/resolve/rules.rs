//! Template role table and the per-sense verdict.

use crate::error::{FilterError, Result};
use crate::senses::{normalize_template_name, Sense, TemplateInvocation};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    /// Marks the sense as a form of another term.
    FormOf,
    /// Carries usage labels; the first positional argument is a language.
    Label,
    /// Any sense using it is skipped.
    Excluded,
}

impl TemplateRole {
    fn bit(self) -> u8 {
        match self {
            TemplateRole::FormOf => 1,
            TemplateRole::Label => 1 << 1,
            TemplateRole::Excluded => 1 << 2,
        }
    }
}

/// A template name may hold several roles at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub fn contains(self, role: TemplateRole) -> bool {
        self.0 & role.bit() != 0
    }

    fn insert(&mut self, role: TemplateRole) {
        self.0 |= role.bit();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ExcludedTemplate,
    ExcludedLabel,
    /// A form-of template without a target argument.
    MissingLemma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenseVerdict<'s> {
    Skip(SkipReason),
    /// Valid only if this lemma is admissible.
    Lemma(&'s str),
    Accept,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRules {
    roles: HashMap<String, RoleSet>,
    label_lang: Option<String>,
    excluded_labels: HashSet<String>,
}

impl TemplateRules {
    /// Names are normalized on the way in. Excluded labels need a label
    /// language to know which label templates to look at.
    pub fn build<F, E, L, X>(
        form_of: F,
        excluded: E,
        label_templates: L,
        label_lang: Option<&str>,
        excluded_labels: X,
    ) -> Result<Self>
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        let excluded_labels: HashSet<String> = excluded_labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        if !excluded_labels.is_empty() && label_lang.is_none() {
            return Err(FilterError::config("excluded labels were given without a label language"));
        }

        let mut rules = Self {
            roles: HashMap::new(),
            label_lang: label_lang.map(str::to_string),
            excluded_labels,
        };
        rules.assign(form_of, TemplateRole::FormOf);
        rules.assign(excluded, TemplateRole::Excluded);
        rules.assign(label_templates, TemplateRole::Label);
        Ok(rules)
    }

    fn assign<I>(&mut self, names: I, role: TemplateRole)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            let name = normalize_template_name(name.as_ref());
            if !name.is_empty() {
                self.roles.entry(name).or_default().insert(role);
            }
        }
    }

    pub fn roles_of(&self, name: &str) -> RoleSet {
        self.roles.get(name).copied().unwrap_or_default()
    }

    fn has_role(&self, template: &TemplateInvocation, role: TemplateRole) -> bool {
        self.roles_of(&template.name).contains(role)
    }

    pub fn form_of_count(&self) -> usize {
        self.roles.values().filter(|roles| roles.contains(TemplateRole::FormOf)).count()
    }

    /// Decide what a single sense says about its term.
    ///
    /// Checks run in order: excluded templates, then the first label
    /// template for the label language, then the first form-of template.
    pub fn judge<'s>(&self, sense: &'s Sense) -> SenseVerdict<'s> {
        let templates = &sense.templates;

        if templates.iter().any(|t| self.has_role(t, TemplateRole::Excluded)) {
            return SenseVerdict::Skip(SkipReason::ExcludedTemplate);
        }

        if let Some(lang) = self.label_lang.as_deref() {
            let label = templates
                .iter()
                .find(|t| self.has_role(t, TemplateRole::Label) && t.first_positional() == Some(lang));
            if let Some(label) = label {
                if label.positional().skip(1).any(|value| self.excluded_labels.contains(value)) {
                    return SenseVerdict::Skip(SkipReason::ExcludedLabel);
                }
            }
        }

        if let Some(form_of) = templates.iter().find(|t| self.has_role(t, TemplateRole::FormOf)) {
            return match lemma_of(form_of) {
                Some(lemma) => SenseVerdict::Lemma(lemma),
                None => SenseVerdict::Skip(SkipReason::MissingLemma),
            };
        }

        SenseVerdict::Accept
    }
}

/// Argument 2 when present, otherwise argument 1. A present but blank
/// argument 2 names no lemma at all.
fn lemma_of(template: &TemplateInvocation) -> Option<&str> {
    template
        .arg("2")
        .or_else(|| template.arg("1"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::senses::parse_templates;

    fn sense(line: &str) -> Sense {
        Sense::new(parse_templates(line))
    }

    fn rules() -> TemplateRules {
        TemplateRules::build(
            ["plural of", "Template:alternative_form_of"],
            ["rfd"],
            ["lb", "label"],
            Some("en"),
            ["obsolete", "archaic"],
        )
        .expect("rules")
    }

    #[test]
    fn lemma_prefers_second_argument() {
        let rules = rules();
        assert_eq!(rules.judge(&sense("# {{plural of|en|cat}}")), SenseVerdict::Lemma("cat"));
        assert_eq!(rules.judge(&sense("# {{alternative form of|colour}}")), SenseVerdict::Lemma("colour"));
        assert_eq!(rules.judge(&sense("# {{plural of}}")), SenseVerdict::Skip(SkipReason::MissingLemma));
    }

    #[test]
    fn blank_second_argument_is_not_replaced_by_the_first() {
        let rules = rules();
        let blank = sense("# {{plural of|en|}}");
        assert_eq!(rules.judge(&blank), SenseVerdict::Skip(SkipReason::MissingLemma));
        let spaces = sense("# {{plural of|en|  }}");
        assert_eq!(rules.judge(&spaces), SenseVerdict::Skip(SkipReason::MissingLemma));
        let named = sense("# {{plural of|en|2=cat}}");
        assert_eq!(rules.judge(&named), SenseVerdict::Lemma("cat"));
    }

    #[test]
    fn excluded_template_wins_over_everything() {
        let sense = sense("# {{rfd|en}} {{plural of|en|cat}}");
        let verdict = rules().judge(&sense);
        assert_eq!(verdict, SenseVerdict::Skip(SkipReason::ExcludedTemplate));
    }

    #[test]
    fn labels_only_count_for_the_label_language() {
        let rules = rules();
        assert_eq!(
            rules.judge(&sense("# {{lb|en|informal|archaic}} a word")),
            SenseVerdict::Skip(SkipReason::ExcludedLabel)
        );
        assert_eq!(rules.judge(&sense("# {{lb|fr|archaic}} a word")), SenseVerdict::Accept);
        // The language code itself is not a label.
        let lang_named = TemplateRules::build(Vec::<&str>::new(), Vec::<&str>::new(), ["lb"], Some("en"), ["en"])
            .expect("rules");
        assert_eq!(lang_named.judge(&sense("# {{lb|en|formal}}")), SenseVerdict::Accept);
    }

    #[test]
    fn only_first_matching_label_template_is_checked() {
        let sense = sense("# {{lb|en|informal}} {{lb|en|obsolete}}");
        let verdict = rules().judge(&sense);
        assert_eq!(verdict, SenseVerdict::Accept);
    }

    #[test]
    fn labels_without_language_are_a_configuration_error() {
        let err = TemplateRules::build(Vec::<&str>::new(), Vec::<&str>::new(), ["lb"], None, ["archaic"])
            .expect_err("must reject");
        assert!(matches!(err, FilterError::Configuration(_)));
    }

    #[test]
    fn roles_can_overlap() {
        let rules = TemplateRules::build(["lb"], ["lb"], ["lb"], None, Vec::<&str>::new()).expect("rules");
        let roles = rules.roles_of("lb");
        assert!(roles.contains(TemplateRole::FormOf));
        assert!(roles.contains(TemplateRole::Excluded));
        assert!(roles.contains(TemplateRole::Label));
        assert_eq!(rules.form_of_count(), 1);
    }
}
