//! Theme preference and its resolution to a color mode.
//!
//! This module provides:
//!
//! - [`ThemePreference`]: the user's Light/Dark/System choice
//! - [`ColorMode`]: the light or dark mode actually rendered
//! - [`ThemeController`]: owns the preference, applies the mode, persists and broadcasts changes
//!
//! A preference is what the user asked for; a color mode is what they get
//! once `System` is resolved against the live system signal.

mod controller;
mod mode;
mod preference;

pub use controller::{ThemeController, ThemeControllerBuilder, WeakThemeController};
pub use mode::ColorMode;
pub use preference::ThemePreference;
