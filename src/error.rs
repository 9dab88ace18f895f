//! Error types.
//!
//! None of these ever escape [`ThemeController::init`] or
//! [`ThemeController::set_theme`]: the controller logs and degrades instead.
//! They surface only at the typed boundaries (token parsing, date parsing,
//! configuration loading) and from the store implementations themselves.
//!
//! [`ThemeController::init`]: crate::ThemeController::init
//! [`ThemeController::set_theme`]: crate::ThemeController::set_theme

use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a [`PreferenceStore`](crate::PreferenceStore) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached at all (disabled, no window, quota).
    #[error("preference store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the store file failed.
    #[error("failed to access preference file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a flat JSON object of strings.
    #[error("preference file '{path}' is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when a string is not a theme token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid theme '{token}' (expected one of: light, dark, system)")]
pub struct ParseThemeError {
    /// The rejected input, as given.
    pub token: String,
}

/// Error returned when a date string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date '{input}'")]
pub struct DateParseError {
    pub input: String,
}

/// Error returned when loading a [`ThemeConfig`](crate::ThemeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid theme config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds a value the controller cannot use.
    #[error("invalid theme config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
