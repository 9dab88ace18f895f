//! Controller configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Storage key the preference is persisted under by default.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Class toggled on the root node in dark mode by default.
pub const DEFAULT_DARK_CLASS: &str = "dark";

/// Media query evaluated for the system signal in browsers.
pub const DEFAULT_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";

/// Names the controller uses when talking to its collaborators.
///
/// Every field has a default, so a JSON config only needs the fields it
/// overrides:
///
/// ```rust
/// use themepref::ThemeConfig;
///
/// let config = ThemeConfig::from_json_str(r#"{ "storage_key": "site-theme" }"#).unwrap();
/// assert_eq!(config.storage_key, "site-theme");
/// assert_eq!(config.dark_class, "dark");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key in the preference store.
    pub storage_key: String,
    /// Class toggled on the presentation root.
    pub dark_class: String,
    /// Media query for the browser system signal.
    pub media_query: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
            media_query: DEFAULT_MEDIA_QUERY.to_string(),
        }
    }
}

impl ThemeConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ThemeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the storage key, returning the updated config for chaining.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the dark class, returning the updated config for chaining.
    pub fn dark_class(mut self, class: impl Into<String>) -> Self {
        self.dark_class = class.into();
        self
    }

    /// Checks that the names are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty",
            });
        }
        if self.dark_class.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "dark_class",
                reason: "must not be empty",
            });
        }
        if self.dark_class.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "dark_class",
                reason: "must be a single class name",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThemeConfig::default();
        assert_eq!(config.storage_key, "theme");
        assert_eq!(config.dark_class, "dark");
        assert_eq!(config.media_query, "(prefers-color-scheme: dark)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ThemeConfig::from_json_str(r#"{ "dark_class": "theme-dark" }"#).unwrap();
        assert_eq!(config.dark_class, "theme-dark");
        assert_eq!(config.storage_key, "theme");
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let result = ThemeConfig::from_json_str(r#"{ "storage": "x" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_key() {
        let result = ThemeConfig::from_json_str(r#"{ "storage_key": "  " }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "storage_key",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_multi_word_class() {
        let config = ThemeConfig::default().dark_class("dark mode");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = ThemeConfig::default()
            .storage_key("site-theme")
            .dark_class("night");
        assert_eq!(config.storage_key, "site-theme");
        assert_eq!(config.dark_class, "night");
    }
}
