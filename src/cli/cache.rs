//! Default location of the form-of template cache.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::domain::PageId;

/// Cache file for the form-of templates derived from these inputs, under the
/// user cache directory. `None` when no cache directory is known.
pub fn default_form_of_cache_path(
    categories: &Path,
    redirects: Option<&Path>,
    form_of_category: PageId,
) -> Option<PathBuf> {
    let cache_base = cache_root_dir()?;
    let key = form_of_cache_key(categories, redirects, form_of_category);
    Some(cache_base.join("wikt-filter").join("form-of").join(format!("{key}.txt")))
}

/// Keyed on the input files' paths, sizes and modification times, so a new
/// dump gets a new cache file.
pub fn form_of_cache_key(categories: &Path, redirects: Option<&Path>, form_of_category: PageId) -> String {
    let mut hasher = Sha256::new();
    for path in std::iter::once(categories).chain(redirects) {
        hasher.update(file_fingerprint(path));
        hasher.update("\n");
    }
    hasher.update(form_of_category.to_string());
    format!("{:x}", hasher.finalize())
}

fn file_fingerprint(path: &Path) -> String {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let (len, modified) = match path.metadata() {
        Ok(meta) => {
            let modified = meta
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |age| age.as_secs());
            (meta.len(), modified)
        }
        Err(_) => (0, 0),
    };
    format!("{}|{}|{}", absolute.display(), len, modified)
}

pub fn cache_root_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache"))
    }
}
