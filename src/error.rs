//! Library error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("none of the {role} categories could be resolved: {}", names.join(", "))]
    UnresolvedSeeds { role: &'static str, names: Vec<String> },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    #[error("failed reading page dump {path}: {reason}")]
    PageDump { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FilterError {
    pub fn config(message: impl Into<String>) -> Self {
        FilterError::Configuration(message.into())
    }

    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        FilterError::NotFound { kind, key: key.into() }
    }
}
