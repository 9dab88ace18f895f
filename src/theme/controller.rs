//! The theme preference controller.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::mode::ColorMode;
use super::preference::ThemePreference;
use crate::config::ThemeConfig;
use crate::error::ParseThemeError;
use crate::observable::{Observable, Subscription};
use crate::signal::{HeadlessSignal, SystemSignal};
use crate::store::{MemoryStore, PreferenceStore};
use crate::surface::{HeadlessSurface, PresentationSurface};

struct Inner {
    preference: Observable<ThemePreference>,
    store: Box<dyn PreferenceStore>,
    signal: Box<dyn SystemSignal>,
    surface: Box<dyn PresentationSurface>,
    config: ThemeConfig,
    signal_watch: RefCell<Option<Subscription>>,
}

impl Inner {
    fn effective_mode(&self) -> ColorMode {
        ColorMode::resolve(self.preference.get(), self.signal.prefers_dark())
    }

    fn apply(&self) -> ColorMode {
        let mode = self.effective_mode();
        self.surface
            .toggle_class(&self.config.dark_class, mode.is_dark());
        self.surface.set_color_scheme(mode.color_scheme());
        debug!(%mode, "applied color mode");
        mode
    }

    fn persist(&self, preference: ThemePreference) {
        let key = self.config.storage_key.as_str();
        let result = match preference.stored_token() {
            Some(token) => self.store.set(key, token),
            None => self.store.remove(key),
        };
        if let Err(err) = result {
            warn!(
                error = %err,
                %preference,
                "failed to persist theme preference; it will not survive a reload"
            );
        }
    }

    fn on_system_change(&self) {
        let preference = self.preference.get();
        if preference == ThemePreference::System {
            self.apply();
        } else {
            trace!(%preference, "ignoring system color change under explicit preference");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Release the listener before the signal it is registered on.
        if let Some(watch) = self.signal_watch.get_mut().take() {
            watch.unsubscribe();
        }
    }
}

fn load_preference(store: &dyn PreferenceStore, key: &str) -> ThemePreference {
    match store.get(key) {
        Ok(value) => {
            let preference = ThemePreference::from_stored(value.as_deref());
            if let (Some(raw), ThemePreference::System) = (value.as_deref(), preference) {
                debug!(value = raw, "unrecognized stored theme; using system");
            }
            preference
        }
        Err(err) => {
            warn!(error = %err, "failed to read stored theme; using system");
            ThemePreference::System
        }
    }
}

/// Owns the theme preference and keeps the presentation surface in sync.
///
/// The controller resolves the effective [`ColorMode`] from the current
/// [`ThemePreference`] and the live [`SystemSignal`], applies it to a
/// [`PresentationSurface`], persists explicit choices to a
/// [`PreferenceStore`], and broadcasts preference changes to subscribers.
///
/// It is a cheap, clonable handle: clones share one controller. It is
/// single-threaded (`!Send`), like the UI event loop it serves. The
/// system-signal listener is released by [`teardown`](Self::teardown) or
/// when the last handle is dropped.
///
/// # Example
///
/// ```rust
/// use themepref::{
///     ColorMode, ManualSignal, MemoryStore, RecordingSurface, ThemeController, ThemePreference,
/// };
///
/// let system = ManualSignal::new(false);
/// let surface = RecordingSurface::new();
/// let controller = ThemeController::init(MemoryStore::new(), system.clone(), surface.clone());
///
/// assert_eq!(controller.preference(), ThemePreference::System);
/// assert!(!surface.has_class("dark"));
///
/// // Following the system while the preference is System
/// system.set(true);
/// assert!(surface.has_class("dark"));
///
/// controller.set_theme(ThemePreference::Light);
/// assert_eq!(controller.effective_mode(), ColorMode::Light);
/// assert_eq!(surface.color_scheme().as_deref(), Some("light"));
/// ```
#[derive(Clone)]
pub struct ThemeController {
    inner: Rc<Inner>,
}

impl ThemeController {
    /// Creates a builder with headless defaults.
    pub fn builder() -> ThemeControllerBuilder {
        ThemeControllerBuilder::new()
    }

    /// Initializes a controller with the default [`ThemeConfig`].
    ///
    /// Reads the stored preference, applies the resulting mode to `surface`
    /// immediately, and starts listening to `signal`. Never fails: store
    /// errors are logged and treated as "no stored preference".
    pub fn init(
        store: impl PreferenceStore + 'static,
        signal: impl SystemSignal + 'static,
        surface: impl PresentationSurface + 'static,
    ) -> Self {
        Self::builder()
            .store(store)
            .signal(signal)
            .surface(surface)
            .init()
    }

    fn start(
        store: Box<dyn PreferenceStore>,
        signal: Box<dyn SystemSignal>,
        surface: Box<dyn PresentationSurface>,
        config: ThemeConfig,
    ) -> Self {
        let initial = load_preference(store.as_ref(), &config.storage_key);
        debug!(preference = %initial, "theme controller starting");

        let inner = Rc::new(Inner {
            preference: Observable::new(initial),
            store,
            signal,
            surface,
            config,
            signal_watch: RefCell::new(None),
        });
        inner.apply();

        let weak = Rc::downgrade(&inner);
        let watch = inner.signal.watch(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_system_change();
            }
        }));
        *inner.signal_watch.borrow_mut() = Some(watch);

        Self { inner }
    }

    /// Returns the current preference.
    pub fn preference(&self) -> ThemePreference {
        self.inner.preference.get()
    }

    /// Returns the mode currently applied, from the preference and the live signal.
    pub fn effective_mode(&self) -> ColorMode {
        self.inner.effective_mode()
    }

    /// Sets the preference.
    ///
    /// In order: every subscriber observes `next` (unless it already was
    /// the preference), the choice is persisted (`System` removes the stored
    /// key), and the resulting mode is applied. All of it completes before
    /// this returns. A persistence failure is logged and otherwise ignored.
    ///
    /// If a subscriber sets a different preference from inside its
    /// callback, that nested call wins and this one stops after
    /// notification.
    pub fn set_theme(&self, next: ThemePreference) {
        let inner = &self.inner;
        debug!(preference = %next, "setting theme preference");

        inner.preference.set(next);
        if inner.preference.get() != next {
            return;
        }
        inner.persist(next);
        inner.apply();
    }

    /// Parses `token` and sets it as the preference.
    ///
    /// Invalid tokens are rejected and leave everything untouched.
    pub fn set_theme_token(&self, token: &str) -> Result<(), ParseThemeError> {
        let next: ThemePreference = token.parse()?;
        self.set_theme(next);
        Ok(())
    }

    /// Pins the mode opposite to the one currently shown and returns the new preference.
    pub fn toggle(&self) -> ThemePreference {
        let next = self.effective_mode().opposite_preference();
        self.set_theme(next);
        next
    }

    /// Attaches an observer.
    ///
    /// `callback` runs immediately with the current preference, then after
    /// every [`set_theme`](Self::set_theme), until the returned
    /// [`Subscription`] is released. A callback that needs the controller
    /// should capture a [`WeakThemeController`] so it does not keep the
    /// controller alive.
    pub fn subscribe(&self, callback: impl Fn(ThemePreference) + 'static) -> Subscription {
        self.inner.preference.subscribe(callback)
    }

    /// Stops listening to the system signal.
    ///
    /// Call this when the owning UI context is destroyed. The preference and
    /// subscribers keep working; only system changes are no longer followed.
    /// Calling it again does nothing.
    pub fn teardown(&self) {
        let watch = self.inner.signal_watch.borrow_mut().take();
        if let Some(watch) = watch {
            debug!("theme controller detached from system signal");
            watch.unsubscribe();
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ThemeConfig {
        &self.inner.config
    }

    /// Returns a handle that does not keep the controller alive.
    pub fn downgrade(&self) -> WeakThemeController {
        WeakThemeController {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("preference", &self.preference())
            .field("effective_mode", &self.effective_mode())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle to a [`ThemeController`].
#[derive(Clone)]
pub struct WeakThemeController {
    inner: Weak<Inner>,
}

impl WeakThemeController {
    /// Returns the controller if it is still alive.
    pub fn upgrade(&self) -> Option<ThemeController> {
        self.inner.upgrade().map(|inner| ThemeController { inner })
    }
}

impl fmt::Debug for WeakThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakThemeController")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Builder for [`ThemeController`].
///
/// Unset collaborators default to a [`MemoryStore`], a [`HeadlessSignal`]
/// and a [`HeadlessSurface`].
///
/// ```rust
/// use themepref::{RecordingSurface, ThemeConfig, ThemeController};
///
/// let surface = RecordingSurface::new();
/// let controller = ThemeController::builder()
///     .surface(surface.clone())
///     .config(ThemeConfig::default().dark_class("night"))
///     .init();
///
/// controller.toggle();
/// assert!(surface.has_class("night"));
/// ```
pub struct ThemeControllerBuilder {
    store: Box<dyn PreferenceStore>,
    signal: Box<dyn SystemSignal>,
    surface: Box<dyn PresentationSurface>,
    config: ThemeConfig,
}

impl ThemeControllerBuilder {
    pub fn new() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            signal: Box::new(HeadlessSignal),
            surface: Box::new(HeadlessSurface),
            config: ThemeConfig::default(),
        }
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn signal(mut self, signal: impl SystemSignal + 'static) -> Self {
        self.signal = Box::new(signal);
        self
    }

    pub fn surface(mut self, surface: impl PresentationSurface + 'static) -> Self {
        self.surface = Box::new(surface);
        self
    }

    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs initialization and returns the live controller.
    pub fn init(self) -> ThemeController {
        ThemeController::start(self.store, self.signal, self.surface, self.config)
    }
}

impl Default for ThemeControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ManualSignal;
    use crate::store::DisabledStore;
    use crate::surface::RecordingSurface;
    use std::cell::Cell;

    fn fixture(
        store: impl PreferenceStore + 'static,
        system_dark: bool,
    ) -> (ThemeController, ManualSignal, RecordingSurface) {
        let signal = ManualSignal::new(system_dark);
        let surface = RecordingSurface::new();
        let controller = ThemeController::init(store, signal.clone(), surface.clone());
        (controller, signal, surface)
    }

    #[test]
    fn test_init_defaults_to_system() {
        let (controller, _, surface) = fixture(MemoryStore::new(), true);
        assert_eq!(controller.preference(), ThemePreference::System);
        assert!(surface.has_class("dark"));
        assert_eq!(surface.color_scheme().as_deref(), Some("dark"));
    }

    #[test]
    fn test_init_reads_stored_preference() {
        let (controller, _, surface) = fixture(MemoryStore::with_entry("theme", "light"), true);
        assert_eq!(controller.preference(), ThemePreference::Light);
        assert!(!surface.has_class("dark"));
        assert_eq!(surface.color_scheme().as_deref(), Some("light"));
    }

    #[test]
    fn test_init_ignores_corrupt_value() {
        let (controller, _, _) = fixture(MemoryStore::with_entry("theme", "purple"), false);
        assert_eq!(controller.preference(), ThemePreference::System);
    }

    #[test]
    fn test_set_theme_persists_and_applies() {
        let store = Rc::new(MemoryStore::new());
        let (controller, _, surface) = fixture(Rc::clone(&store), false);

        controller.set_theme(ThemePreference::Dark);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(surface.has_class("dark"));

        controller.set_theme(ThemePreference::System);
        assert!(!store.contains("theme"));
        assert!(!surface.has_class("dark"));
    }

    #[test]
    fn test_set_theme_token_rejects_invalid() {
        let store = Rc::new(MemoryStore::with_entry("theme", "dark"));
        let (controller, _, _) = fixture(Rc::clone(&store), false);

        let err = controller.set_theme_token("system; rm -rf").unwrap_err();
        assert_eq!(err.token, "system; rm -rf");
        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        controller.set_theme_token("Light").unwrap();
        assert_eq!(controller.preference(), ThemePreference::Light);
    }

    #[test]
    fn test_system_change_ignored_under_explicit_preference() {
        let (controller, signal, surface) = fixture(MemoryStore::new(), false);
        controller.set_theme(ThemePreference::Light);
        let before = surface.change_count();

        signal.set(true);

        assert!(!surface.has_class("dark"));
        assert_eq!(surface.change_count(), before);
    }

    #[test]
    fn test_teardown_releases_signal_listener() {
        let (controller, signal, surface) = fixture(MemoryStore::new(), false);
        assert_eq!(signal.listener_count(), 1);

        controller.teardown();
        controller.teardown();
        assert_eq!(signal.listener_count(), 0);

        signal.set(true);
        assert!(!surface.has_class("dark"));
    }

    #[test]
    fn test_drop_releases_signal_listener() {
        let (controller, signal, _) = fixture(MemoryStore::new(), false);
        let weak = controller.downgrade();
        drop(controller);

        assert!(weak.upgrade().is_none());
        assert_eq!(signal.listener_count(), 0);
        signal.set(true);
    }

    #[test]
    fn test_toggle_pins_opposite_of_effective_mode() {
        let (controller, _, surface) = fixture(MemoryStore::new(), true);
        assert_eq!(controller.toggle(), ThemePreference::Light);
        assert!(!surface.has_class("dark"));
        assert_eq!(controller.toggle(), ThemePreference::Dark);
        assert!(surface.has_class("dark"));
    }

    #[test]
    fn test_disabled_store_still_applies() {
        let (controller, _, surface) = fixture(DisabledStore::new("quota exceeded"), false);
        assert_eq!(controller.preference(), ThemePreference::System);

        controller.set_theme(ThemePreference::Dark);
        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert!(surface.has_class("dark"));
    }

    #[test]
    fn test_reentrant_subscriber_wins() {
        let store = Rc::new(MemoryStore::new());
        let (controller, _, surface) = fixture(Rc::clone(&store), false);

        let weak = controller.downgrade();
        let _no_light = controller.subscribe(move |pref| {
            if pref == ThemePreference::Light {
                if let Some(controller) = weak.upgrade() {
                    controller.set_theme(ThemePreference::Dark);
                }
            }
        });

        controller.set_theme(ThemePreference::Light);

        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(surface.has_class("dark"));
    }

    #[test]
    fn test_repeated_set_theme_notifies_once() {
        let (controller, _, _) = fixture(MemoryStore::new(), false);
        controller.set_theme(ThemePreference::Dark);

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = controller.subscribe(move |_| counter.set(counter.get() + 1));
        controller.set_theme(ThemePreference::Dark);

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_mirroring_subscriber_terminates() {
        let store = Rc::new(MemoryStore::new());
        let (controller, _, surface) = fixture(Rc::clone(&store), false);

        let weak = controller.downgrade();
        let _mirror = controller.subscribe(move |pref| {
            if let Some(controller) = weak.upgrade() {
                controller.set_theme(pref);
            }
        });

        controller.set_theme(ThemePreference::Dark);

        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(surface.has_class("dark"));
    }

    #[test]
    fn test_subscribers_see_value_before_set_theme_returns() {
        let (controller, _, _) = fixture(MemoryStore::new(), false);
        let seen = Rc::new(Cell::new(ThemePreference::System));
        let sink = Rc::clone(&seen);
        let _sub = controller.subscribe(move |pref| sink.set(pref));

        controller.set_theme(ThemePreference::Dark);
        assert_eq!(seen.get(), ThemePreference::Dark);
    }

    #[test]
    fn test_custom_config_names() {
        let store = Rc::new(MemoryStore::new());
        let surface = RecordingSurface::new();
        let controller = ThemeController::builder()
            .store(Rc::clone(&store))
            .surface(surface.clone())
            .config(
                ThemeConfig::default()
                    .storage_key("site-theme")
                    .dark_class("night"),
            )
            .init();

        controller.set_theme(ThemePreference::Dark);
        assert_eq!(store.get("site-theme").unwrap().as_deref(), Some("dark"));
        assert!(!store.contains("theme"));
        assert!(surface.has_class("night"));
        assert_eq!(controller.config().dark_class, "night");
    }
}
