//! # themepref - light/dark theme preference controller
//!
//! `themepref` decides, at any instant, whether a UI should render light or
//! dark, from three inputs:
//!
//! - the user's explicit choice ([`ThemePreference`]: Light, Dark or System)
//! - what was persisted last time ([`PreferenceStore`])
//! - the host's live dark-mode setting ([`SystemSignal`])
//!
//! and pushes that decision to a [`PresentationSurface`] (a dark class plus a
//! `color-scheme` hint) and to any number of subscribers.
//!
//! ## Quick Start
//!
//! ```rust
//! use themepref::{ManualSignal, MemoryStore, RecordingSurface, ThemeController, ThemePreference};
//!
//! let system = ManualSignal::new(true);
//! let root = RecordingSurface::new();
//! let controller = ThemeController::init(MemoryStore::new(), system.clone(), root.clone());
//!
//! // Nothing stored yet: follow the system, which is dark
//! assert!(root.has_class("dark"));
//!
//! let _toggle_button = controller.subscribe(|pref| println!("theme is now {pref}"));
//! controller.set_theme(ThemePreference::Light);
//! assert!(!root.has_class("dark"));
//!
//! // An explicit choice ignores system changes
//! system.set(false);
//! system.set(true);
//! assert!(!root.has_class("dark"));
//! ```
//!
//! ## Persistence
//!
//! Only `"light"` and `"dark"` are ever written, under the key `"theme"`.
//! `System` removes the key. A missing, unrecognized or unreadable value
//! loads as `System`; store failures are logged with `tracing` and never
//! reach the caller.
//!
//! ## Backends
//!
//! - Native: [`FileStore`] + [`OsSignal`] (OS detection through `dark-light`)
//! - Browser (feature `web`): local storage, `matchMedia` and the `<html>` element
//! - Tests and headless hosts: [`MemoryStore`], [`ManualSignal`],
//!   [`RecordingSurface`], [`HeadlessSignal`], [`HeadlessSurface`]
//!
//! ## Date formatting
//!
//! [`format_date`] renders any reasonable date string as `"March 2024"`,
//! falling back to `"Unknown"`.

pub mod config;
pub mod error;
pub mod format;
pub mod observable;
pub mod signal;
pub mod store;
pub mod surface;
pub mod theme;

#[cfg(feature = "web")]
pub mod web;

pub use config::ThemeConfig;
pub use error::{ConfigError, DateParseError, ParseThemeError, StoreError};
pub use format::{format_date, parse_date, UNKNOWN_DATE};
pub use observable::{Observable, Subscription};
pub use signal::{HeadlessSignal, ManualSignal, OsSignal, SystemSignal, ThemeDetector};
pub use store::{DisabledStore, FileStore, MemoryStore, PreferenceStore};
pub use surface::{HeadlessSurface, PresentationSurface, RecordingSurface};
pub use theme::{
    ColorMode, ThemeController, ThemeControllerBuilder, ThemePreference, WeakThemeController,
};
