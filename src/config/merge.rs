//! CLI-over-file precedence.

use crate::domain::{Config, Namespace, PageId};
use std::path::PathBuf;

/// Values given on the command line. `None` keeps the file (or default)
/// value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub categories: Option<PathBuf>,
    pub stubs: Option<PathBuf>,
    pub redirects: Option<PathBuf>,
    pub pages: Option<PathBuf>,
    pub form_of_cache: Option<PathBuf>,
    pub no_form_of_cache: Option<bool>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<i64>,
    pub small_memory: Option<bool>,
    pub output_ids: Option<bool>,
    pub form_of_category: Option<PageId>,
    pub label_templates: Option<Vec<String>>,
    pub label_lang: Option<String>,
    pub exclude_labels: Option<Vec<String>>,
    pub exclude_templates: Option<Vec<String>>,
    pub time_to_live: Option<i32>,
    pub page_namespace: Option<Namespace>,
    pub verify_redirect_chains: Option<bool>,
    pub preseed_excluded: Option<bool>,
    pub parallel: Option<bool>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    set_opt(&mut config.categories, cli.categories);
    set_opt(&mut config.stubs, cli.stubs);
    set_opt(&mut config.redirects, cli.redirects);
    set_opt(&mut config.pages, cli.pages);
    set_opt(&mut config.form_of_cache, cli.form_of_cache);
    set(&mut config.no_form_of_cache, cli.no_form_of_cache);
    set(&mut config.include, cli.include);
    set(&mut config.exclude, cli.exclude);
    set(&mut config.max_depth, cli.max_depth);
    set(&mut config.small_memory, cli.small_memory);
    set(&mut config.output_ids, cli.output_ids);
    set(&mut config.form_of_category, cli.form_of_category);
    set(&mut config.label_templates, cli.label_templates);
    set_opt(&mut config.label_lang, cli.label_lang);
    set(&mut config.exclude_labels, cli.exclude_labels);
    set(&mut config.exclude_templates, cli.exclude_templates);
    set(&mut config.time_to_live, cli.time_to_live);
    set_opt(&mut config.page_namespace, cli.page_namespace);
    set(&mut config.verify_redirect_chains, cli.verify_redirect_chains);
    set(&mut config.preseed_excluded, cli.preseed_excluded);
    set(&mut config.parallel, cli.parallel);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_win_and_missing_ones_keep_file_values() {
        let file = Config {
            categories: Some(PathBuf::from("file-cats.csv")),
            include: vec!["1".to_string()],
            label_lang: Some("de".to_string()),
            time_to_live: 7,
            ..Config::default()
        };
        let cli = CliOverrides {
            include: Some(vec!["2".to_string(), "3".to_string()]),
            label_lang: Some("en".to_string()),
            parallel: Some(true),
            ..CliOverrides::default()
        };

        let merged = merge_cli_with_config(file, cli);
        assert_eq!(merged.categories, Some(PathBuf::from("file-cats.csv")));
        assert_eq!(merged.include, vec!["2", "3"]);
        assert_eq!(merged.label_lang.as_deref(), Some("en"));
        assert_eq!(merged.time_to_live, 7);
        assert!(merged.parallel);
    }

    #[test]
    fn empty_overrides_are_identity() {
        let merged = merge_cli_with_config(Config::default(), CliOverrides::default());
        assert_eq!(merged, Config::default());
    }
}
