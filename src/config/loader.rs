//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Nested table name accepted in shared config files.
const SECTION: &str = "wikt-filter";

const CANDIDATES: [&str; 6] = [
    "wikt-filter.toml",
    ".wikt-filter.toml",
    "wikt-filter.yml",
    ".wikt-filter.yml",
    "wikt-filter.yaml",
    ".wikt-filter.yaml",
];

/// Load `config_path`, or the first config file found in `anchor`.
///
/// Problems with an explicitly given file are errors. A broken
/// auto-discovered file only produces a warning and the defaults.
pub fn load_config(anchor: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(anchor),
    };
    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    match read_config(&config_file) {
        Ok(config) => {
            tracing::debug!("loaded config from {}", config_file.display());
            Ok(config)
        }
        Err(err) if !explicit => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", config_file.display(), err);
            Ok(Config::default())
        }
        Err(err) => Err(err),
    }
}

fn read_config(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => anyhow::bail!("Unsupported config extension '.{}' for file {}", other, config_file.display()),
    }
}

/// Parse TOML config, with or without a `[wikt-filter]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;
    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };
    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;
    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };
    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| anchor.join(candidate)).find(|path| path.is_file())
}
