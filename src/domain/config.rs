//! Run configuration.
//!
//! Every field has a default so a config file only needs the keys it wants
//! to change. List fields accept either an array or a comma-separated string.

use crate::domain::{Namespace, PageId};
use crate::error::{FilterError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Page id of `Category:Form-of templates` on the English Wiktionary.
pub const DEFAULT_FORM_OF_CATEGORY: PageId = PageId(3_991_887);
pub const DEFAULT_TIME_TO_LIVE: i32 = 4;

pub fn default_label_templates() -> Vec<String> {
    vec!["label".to_string(), "lb".to_string(), "lbl".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parsed category links file.
    pub categories: Option<PathBuf>,
    /// Parsed stubs file. When set, seeds are category titles.
    pub stubs: Option<PathBuf>,
    /// Parsed redirects file.
    pub redirects: Option<PathBuf>,
    /// XML page dump. Enables sense filtering.
    pub pages: Option<PathBuf>,
    /// Explicit location of the form-of template cache file.
    pub form_of_cache: Option<PathBuf>,
    /// Skip the form-of template cache entirely.
    pub no_form_of_cache: bool,

    #[serde(deserialize_with = "string_or_list")]
    pub include: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub exclude: Vec<String>,
    /// Negative means unlimited.
    pub max_depth: i64,
    pub small_memory: bool,
    pub output_ids: bool,

    pub form_of_category: PageId,
    #[serde(deserialize_with = "string_or_list")]
    pub label_templates: Vec<String>,
    pub label_lang: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_labels: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_templates: Vec<String>,
    pub time_to_live: i32,
    /// Only load sense lines from pages in this namespace.
    pub page_namespace: Option<Namespace>,

    pub verify_redirect_chains: bool,
    pub preseed_excluded: bool,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: None,
            stubs: None,
            redirects: None,
            pages: None,
            form_of_cache: None,
            no_form_of_cache: false,
            include: Vec::new(),
            exclude: Vec::new(),
            max_depth: -1,
            small_memory: false,
            output_ids: false,
            form_of_category: DEFAULT_FORM_OF_CATEGORY,
            label_templates: default_label_templates(),
            label_lang: None,
            exclude_labels: Vec::new(),
            exclude_templates: Vec::new(),
            time_to_live: DEFAULT_TIME_TO_LIVE,
            page_namespace: Some(Namespace::MAIN),
            verify_redirect_chains: true,
            preseed_excluded: false,
            parallel: false,
        }
    }
}

impl Config {
    pub fn sense_filtering(&self) -> bool {
        self.pages.is_some()
    }

    /// `None` when the traversal depth is unbounded.
    pub fn depth_limit(&self) -> Option<u32> {
        u32::try_from(self.max_depth).ok()
    }

    /// Reject inconsistent settings before any expensive work starts.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_none() {
            return Err(FilterError::config("a categories file is required"));
        }
        if self.include.is_empty() {
            return Err(FilterError::config("at least one include category is required"));
        }
        if !self.exclude_labels.is_empty() && self.label_lang.is_none() {
            return Err(FilterError::config("exclude_labels requires label_lang"));
        }
        if !self.sense_filtering() {
            if !self.exclude_labels.is_empty() || !self.exclude_templates.is_empty() {
                return Err(FilterError::config(
                    "exclude_labels and exclude_templates require a pages dump",
                ));
            }
            return Ok(());
        }
        if self.output_ids {
            return Err(FilterError::config(
                "output_ids cannot be combined with sense filtering, which works on titles",
            ));
        }
        let cache_available = self.form_of_cache.as_ref().is_some_and(|path| path.is_file());
        if self.redirects.is_none() && !cache_available {
            return Err(FilterError::config(
                "sense filtering needs a redirects file or an existing form_of_cache file",
            ));
        }
        Ok(())
    }
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        Csv(String),
        List(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::Csv(raw) => raw.split(',').map(str::to_string).collect::<Vec<_>>(),
        StringOrList::List(items) => items,
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
