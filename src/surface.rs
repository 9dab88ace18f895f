//! Presentation surfaces the effective mode is applied to.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// The visual root node whose attributes encode the color mode.
///
/// Both operations must be idempotent: repeating a write leaves the node
/// unchanged.
pub trait PresentationSurface {
    /// Adds `class` to the root node when `enabled`, removes it otherwise.
    fn toggle_class(&self, class: &str, enabled: bool);

    /// Sets the native color-scheme hint (`"dark"` or `"light"`).
    fn set_color_scheme(&self, scheme: &str);
}

/// No presentation surface at all (server-side or non-interactive contexts).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl PresentationSurface for HeadlessSurface {
    fn toggle_class(&self, _class: &str, _enabled: bool) {}

    fn set_color_scheme(&self, _scheme: &str) {}
}

#[derive(Debug, Default)]
struct RootNode {
    classes: BTreeSet<String>,
    color_scheme: Option<String>,
    changes: usize,
}

/// An in-memory root node that records its attributes.
///
/// Clones share the same node, so a test can keep one clone for inspection
/// while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    node: Rc<RefCell<RootNode>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.contains(class)
    }

    /// The last color-scheme hint written, if any.
    pub fn color_scheme(&self) -> Option<String> {
        self.node.borrow().color_scheme.clone()
    }

    /// Number of writes that actually changed the node.
    pub fn change_count(&self) -> usize {
        self.node.borrow().changes
    }
}

impl PresentationSurface for RecordingSurface {
    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut node = self.node.borrow_mut();
        let changed = if enabled {
            node.classes.insert(class.to_string())
        } else {
            node.classes.remove(class)
        };
        if changed {
            node.changes += 1;
        }
    }

    fn set_color_scheme(&self, scheme: &str) {
        let mut node = self.node.borrow_mut();
        if node.color_scheme.as_deref() != Some(scheme) {
            node.color_scheme = Some(scheme.to_string());
            node.changes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_toggle() {
        let surface = RecordingSurface::new();
        surface.toggle_class("dark", true);
        assert!(surface.has_class("dark"));

        surface.toggle_class("dark", false);
        assert!(!surface.has_class("dark"));
        assert_eq!(surface.change_count(), 2);
    }

    #[test]
    fn test_recording_surface_counts_only_changes() {
        let surface = RecordingSurface::new();
        surface.set_color_scheme("dark");
        surface.set_color_scheme("dark");
        surface.toggle_class("dark", false);

        assert_eq!(surface.color_scheme().as_deref(), Some("dark"));
        assert_eq!(surface.change_count(), 1);
    }

    #[test]
    fn test_clones_share_node() {
        let surface = RecordingSurface::new();
        let owned = surface.clone();
        owned.toggle_class("dark", true);
        assert!(surface.has_class("dark"));
    }
}
