//! The effective color mode.

use std::fmt;

use super::preference::ThemePreference;

/// The color mode the UI actually renders.
///
/// Derived from a [`ThemePreference`] and the live system signal every time
/// it is needed; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Resolves a preference against the system's dark-mode signal.
    ///
    /// # Example
    ///
    /// ```rust
    /// use themepref::{ColorMode, ThemePreference};
    ///
    /// assert_eq!(ColorMode::resolve(ThemePreference::System, true), ColorMode::Dark);
    /// assert_eq!(ColorMode::resolve(ThemePreference::Light, true), ColorMode::Light);
    /// ```
    pub fn resolve(preference: ThemePreference, system_prefers_dark: bool) -> Self {
        match preference {
            ThemePreference::Dark => ColorMode::Dark,
            ThemePreference::Light => ColorMode::Light,
            ThemePreference::System if system_prefers_dark => ColorMode::Dark,
            ThemePreference::System => ColorMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    /// The CSS `color-scheme` value matching this mode.
    pub fn color_scheme(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }

    /// The explicit preference that pins the opposite mode.
    pub fn opposite_preference(self) -> ThemePreference {
        match self {
            ColorMode::Light => ThemePreference::Dark,
            ColorMode::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color_scheme())
    }
}
