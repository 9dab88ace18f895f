//! The user's theme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseThemeError;

/// The user's explicit or implicit theme choice.
///
/// `System` defers to the host's dark-mode signal. It is never written to
/// storage: an absent key means `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    /// All preferences, in toggle-menu order.
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::Light,
        ThemePreference::Dark,
        ThemePreference::System,
    ];

    /// Returns the lowercase token for this preference.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Returns the token to persist, or `None` when the key should be removed.
    pub(crate) fn stored_token(self) -> Option<&'static str> {
        match self {
            ThemePreference::System => None,
            explicit => Some(explicit.as_str()),
        }
    }

    /// Interprets a persisted value.
    ///
    /// Only the exact `light` and `dark` tokens are honored. Anything else,
    /// including a literal `system`, falls back to `System`.
    pub(crate) fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => ThemePreference::Light,
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::System,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    /// Parses `light`, `dark` or `system`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        ThemePreference::ALL
            .into_iter()
            .find(|pref| pref.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseThemeError {
                token: s.to_string(),
            })
    }
}
