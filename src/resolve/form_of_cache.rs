//! Persisted set of form-of template names.
//!
//! Plain text, one normalized name per line. The file only saves the
//! category walk and redirect scan that produce the set; any failure to read
//! or write it falls back to computing the set.

use crate::error::Result;
use crate::senses::normalize_template_name;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormOfSource {
    CacheFile,
    Computed,
}

/// `None` when the file is missing or unreadable.
pub fn read_form_of_cache(path: &Path) -> Option<BTreeSet<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Some(
            content
                .lines()
                .map(normalize_template_name)
                .filter(|name| !name.is_empty())
                .collect(),
        ),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!("ignoring unreadable form-of cache {}: {}", path.display(), err);
            None
        }
    }
}

/// Write `names` unless the file already exists. Returns whether a file was
/// written.
pub fn write_form_of_cache(path: &Path, names: &BTreeSet<String>) -> io::Result<bool> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(err),
    };
    let mut content = String::new();
    for name in names {
        content.push_str(name);
        content.push('\n');
    }
    file.write_all(content.as_bytes())?;
    Ok(true)
}

/// Read the cache at `path` if there is one, otherwise `compute` the set and
/// try to persist it.
pub fn load_or_compute<F>(path: Option<&Path>, compute: F) -> Result<(BTreeSet<String>, FormOfSource)>
where
    F: FnOnce() -> Result<BTreeSet<String>>,
{
    if let Some(names) = path.and_then(read_form_of_cache) {
        tracing::info!(templates = names.len(), "using cached form-of templates");
        return Ok((names, FormOfSource::CacheFile));
    }

    let names = compute()?;
    if let Some(path) = path {
        match write_form_of_cache(path, &names) {
            Ok(true) => tracing::info!("wrote form-of template cache {}", path.display()),
            Ok(false) => tracing::debug!("form-of template cache {} already exists", path.display()),
            Err(err) => tracing::warn!("could not write form-of template cache {}: {}", path.display(), err),
        }
    }
    Ok((names, FormOfSource::Computed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn computes_then_reuses_cache_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nested").join("form-of.txt");

        let (first, source) = load_or_compute(Some(path.as_path()), || Ok(names(&["plural of", "form of"]))).expect("compute");
        assert_eq!(source, FormOfSource::Computed);
        assert!(path.is_file());

        let (second, source) =
            load_or_compute(Some(path.as_path()), || panic!("cache should have been used")).expect("read");
        assert_eq!(source, FormOfSource::CacheFile);
        assert_eq!(first, second);
    }

    #[test]
    fn existing_file_is_never_overwritten() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("form-of.txt");
        fs::write(&path, "Template:plural_of\n\n").expect("seed");

        assert!(!write_form_of_cache(&path, &names(&["other"])).expect("write"));
        assert_eq!(read_form_of_cache(&path), Some(names(&["plural of"])));
    }

    #[test]
    fn compute_errors_propagate_without_a_cache() {
        let result = load_or_compute(None, || Err(crate::error::FilterError::config("no source")));
        assert!(result.is_err());
    }
}
