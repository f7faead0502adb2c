//! Failures of the monitor config file: locating, reading, checking, saving.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Nothing at `path`; callers may fall back to defaults
    #[error("No monitor config at {path}")]
    Missing { path: String },

    /// The file exists but could not be read or is not a valid config document
    #[error("Unreadable monitor config at {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The document parsed but a value is unusable (range, duplicate chain,
    /// RPC URL, account or contract address)
    #[error("Invalid value in {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Could not save monitor config to {path}: {reason}")]
    Unwritable { path: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid { field: field.into(), reason: reason.into() }
    }

    pub fn unreadable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Unreadable { path: path.display().to_string(), reason: reason.to_string() }
    }

    pub fn unwritable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Unwritable { path: path.display().to_string(), reason: reason.to_string() }
    }

    /// Field that failed validation, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
