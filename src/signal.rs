//! Live system dark-mode signal.
//!
//! The host environment owns this boolean; the controller only reads it and
//! listens for changes. Hosts that cannot evaluate it report "not dark".

use std::cell::Cell;
use std::rc::Rc;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use crate::observable::{Observable, Subscription};

/// Host-provided dark-mode preference with change notifications.
pub trait SystemSignal {
    /// Current value, evaluated on demand.
    fn prefers_dark(&self) -> bool;

    /// Registers `on_change` to run whenever the value changes.
    ///
    /// The listener is not invoked on registration. Releasing the returned
    /// [`Subscription`] deregisters it.
    fn watch(&self, on_change: Box<dyn Fn()>) -> Subscription;
}

/// A signal driven by explicit calls to [`set`](Self::set).
///
/// Clones share state, so a host can keep one clone and hand another to the
/// controller. Also the natural fake for tests.
#[derive(Clone)]
pub struct ManualSignal {
    cell: Rc<Observable<bool>>,
}

impl ManualSignal {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            cell: Rc::new(Observable::new(prefers_dark)),
        }
    }

    /// Updates the value, notifying listeners only if it changed.
    pub fn set(&self, prefers_dark: bool) {
        self.cell.set(prefers_dark);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.cell.subscriber_count()
    }
}

impl Default for ManualSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for ManualSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualSignal")
            .field("prefers_dark", &self.cell.get())
            .field("listeners", &self.cell.subscriber_count())
            .finish()
    }
}

impl SystemSignal for ManualSignal {
    fn prefers_dark(&self) -> bool {
        self.cell.get()
    }

    fn watch(&self, on_change: Box<dyn Fn()>) -> Subscription {
        // Observable replays the current value on subscribe; listeners only want changes.
        let primed = Cell::new(false);
        self.cell.subscribe(move |_| {
            if primed.replace(true) {
                on_change();
            }
        })
    }
}

/// Function used to query the operating system's dark-mode setting.
pub type ThemeDetector = fn() -> bool;

/// The operating system's dark-mode setting, via `dark-light`.
///
/// Desktop platforms offer no portable change notification, so changes are
/// picked up when the host calls [`refresh`](Self::refresh) (e.g. on window
/// focus or a timer).
#[derive(Clone, Debug)]
pub struct OsSignal {
    detector: ThemeDetector,
    last: ManualSignal,
}

impl OsSignal {
    pub fn new() -> Self {
        Self::with_detector(os_theme_detector)
    }

    /// Uses a custom detector instead of querying the OS.
    ///
    /// This is useful for testing or when you want to force a specific mode.
    pub fn with_detector(detector: ThemeDetector) -> Self {
        Self {
            detector,
            last: ManualSignal::new(detector()),
        }
    }

    /// Re-queries the detector and notifies listeners if the value changed.
    ///
    /// Returns the fresh value.
    pub fn refresh(&self) -> bool {
        let now = (self.detector)();
        self.last.set(now);
        now
    }
}

impl Default for OsSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignal for OsSignal {
    fn prefers_dark(&self) -> bool {
        (self.detector)()
    }

    fn watch(&self, on_change: Box<dyn Fn()>) -> Subscription {
        self.last.watch(on_change)
    }
}

fn os_theme_detector() -> bool {
    matches!(detect_os_theme(), OsThemeMode::Dark)
}

/// The signal of a host that cannot evaluate dark mode: never dark, never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSignal;

impl SystemSignal for HeadlessSignal {
    fn prefers_dark(&self) -> bool {
        false
    }

    fn watch(&self, _on_change: Box<dyn Fn()>) -> Subscription {
        Subscription::inert()
    }
}
