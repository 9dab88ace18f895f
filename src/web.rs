//! Browser backend built on `web-sys`.
//!
//! Provides local storage persistence, a `matchMedia` system signal and the
//! `<html>` element as presentation surface. Each piece degrades instead of
//! failing when there is no window (server rendering, workers) or when the
//! browser refuses access (storage disabled, sandboxed frames):
//!
//! - [`LocalStorageStore`] reports [`StoreError::Unavailable`], which the
//!   controller logs and treats as "nothing stored"
//! - [`MediaQuerySignal`] reads "not dark" and never fires
//! - [`DocumentSurface`] ignores writes

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, MediaQueryList, Storage};

use crate::config::ThemeConfig;
use crate::error::StoreError;
use crate::observable::Subscription;
use crate::signal::SystemSignal;
use crate::store::PreferenceStore;
use crate::surface::PresentationSurface;
use crate::theme::ThemeController;

fn js_unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}

/// The window's `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage(&self) -> Result<Storage, StoreError> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_unavailable)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(js_unavailable)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(js_unavailable)
    }
}

/// A `matchMedia` query, `(prefers-color-scheme: dark)` by default.
#[derive(Debug, Clone)]
pub struct MediaQuerySignal {
    query: Option<MediaQueryList>,
}

impl MediaQuerySignal {
    pub fn new(media_query: &str) -> Self {
        let query = web_sys::window().and_then(|w| w.match_media(media_query).ok().flatten());
        Self { query }
    }
}

impl SystemSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> bool {
        self.query.as_ref().map_or(false, MediaQueryList::matches)
    }

    fn watch(&self, on_change: Box<dyn Fn()>) -> Subscription {
        let Some(query) = self.query.clone() else {
            return Subscription::inert();
        };

        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            on_change();
        });
        if query
            .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
            .is_err()
        {
            return Subscription::inert();
        }

        Subscription::new(move || {
            let _ = query
                .remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
            drop(listener);
        })
    }
}

/// The document's root `<html>` element.
#[derive(Debug, Clone)]
pub struct DocumentSurface {
    root: Option<HtmlElement>,
}

impl DocumentSurface {
    pub fn new() -> Self {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Self { root }
    }
}

impl Default for DocumentSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSurface for DocumentSurface {
    fn toggle_class(&self, class: &str, enabled: bool) {
        if let Some(root) = &self.root {
            let _ = root.class_list().toggle_with_force(class, enabled);
        }
    }

    fn set_color_scheme(&self, scheme: &str) {
        if let Some(root) = &self.root {
            let _ = root.style().set_property("color-scheme", scheme);
        }
    }
}

impl ThemeController {
    /// Initializes a controller wired to the current page.
    ///
    /// Call once at application start and [`teardown`](Self::teardown) when
    /// the root component unmounts.
    pub fn for_browser(config: ThemeConfig) -> Self {
        let signal = MediaQuerySignal::new(&config.media_query);
        ThemeController::builder()
            .store(LocalStorageStore)
            .signal(signal)
            .surface(DocumentSurface::new())
            .config(config)
            .init()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MEDIA_QUERY;
    use crate::theme::ThemePreference;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const KEY: &str = "themepref-test-theme";

    fn root() -> HtmlElement {
        web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .document_element()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    fn color_scheme() -> String {
        root().style().get_property_value("color-scheme").unwrap()
    }

    #[wasm_bindgen_test]
    fn test_local_storage_roundtrip() {
        let store = LocalStorageStore;
        store.remove(KEY).unwrap();
        assert_eq!(store.get(KEY).unwrap(), None);

        store.set(KEY, "dark").unwrap();
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("dark"));

        store.remove(KEY).unwrap();
        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_document_surface_writes_class_and_scheme() {
        let surface = DocumentSurface::new();

        surface.toggle_class("dark", true);
        surface.set_color_scheme("dark");
        assert!(root().class_list().contains("dark"));
        assert_eq!(color_scheme(), "dark");

        surface.toggle_class("dark", false);
        surface.set_color_scheme("light");
        assert!(!root().class_list().contains("dark"));
        assert_eq!(color_scheme(), "light");
    }

    #[wasm_bindgen_test]
    fn test_media_query_unwatch_removes_listener() {
        let signal = MediaQuerySignal::new(DEFAULT_MEDIA_QUERY);
        let query = signal.query.clone().unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);

        let watch = signal.watch(Box::new(move || counter.set(counter.get() + 1)));
        query
            .dispatch_event(&web_sys::Event::new("change").unwrap())
            .unwrap();
        assert_eq!(hits.get(), 1);

        watch.unsubscribe();
        query
            .dispatch_event(&web_sys::Event::new("change").unwrap())
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[wasm_bindgen_test]
    fn test_for_browser_persists_and_applies() {
        let store = LocalStorageStore;
        store.remove(KEY).unwrap();
        let config = ThemeConfig::default().storage_key(KEY);

        let controller = ThemeController::for_browser(config.clone());
        controller.set_theme(ThemePreference::Dark);
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("dark"));
        assert!(root().class_list().contains("dark"));
        assert_eq!(color_scheme(), "dark");

        controller.set_theme(ThemePreference::System);
        assert_eq!(store.get(KEY).unwrap(), None);
        controller.teardown();

        let reloaded = ThemeController::for_browser(config);
        assert_eq!(reloaded.preference(), ThemePreference::System);
        reloaded.teardown();
    }
}
