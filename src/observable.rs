//! Single-threaded observable cell.
//!
//! [`Observable`] is a broadcast cell with one value and any number of
//! subscribers. Subscribers receive the current value when they attach and
//! every value written afterwards, until their [`Subscription`] is released.
//!
//! Broadcasts are re-entrant: a callback may write the cell, attach new
//! subscribers or detach any subscriber (itself included) without
//! panicking. A write from inside a callback supersedes the broadcast in
//! progress, so no subscriber sees a stale value after a newer one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(T)>;

struct Entry<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct Shared<T> {
    value: Cell<T>,
    version: Cell<u64>,
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry<T>>>,
}

/// A value cell that notifies subscribers whenever its value changes.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T: Copy + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: Cell::new(value),
                version: Cell::new(0),
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> T {
        self.shared.value.get()
    }

    /// Writes a value and, if it changed, notifies every attached subscriber before returning.
    ///
    /// Writing the current value again is a no-op.
    pub fn set(&self, value: T) {
        let shared = &self.shared;
        if shared.value.get() == value {
            return;
        }
        shared.value.set(value);
        let version = shared.version.get().wrapping_add(1);
        shared.version.set(version);

        let snapshot: Vec<(Rc<Cell<bool>>, Callback<T>)> = shared
            .entries
            .borrow()
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.callback)))
            .collect();

        for (active, callback) in snapshot {
            if shared.version.get() != version {
                // A callback wrote a newer value; that broadcast reached everyone.
                break;
            }
            if active.get() {
                callback(value);
            }
        }
    }

    /// Attaches a subscriber.
    ///
    /// The callback is invoked immediately with the current value, then on
    /// every subsequent [`set`](Self::set). Dropping the returned
    /// [`Subscription`] detaches it.
    pub fn subscribe(&self, callback: impl Fn(T) + 'static) -> Subscription {
        let shared = &self.shared;
        let id = shared.next_id.get();
        shared.next_id.set(id + 1);

        let active = Rc::new(Cell::new(true));
        let callback: Callback<T> = Rc::new(callback);
        shared.entries.borrow_mut().push(Entry {
            id,
            active: Rc::clone(&active),
            callback: Rc::clone(&callback),
        });

        let weak: Weak<Shared<T>> = Rc::downgrade(shared);
        let flag = Rc::clone(&active);
        let subscription = Subscription::new(move || {
            flag.set(false);
            if let Some(shared) = weak.upgrade() {
                let removed = {
                    let mut entries = shared.entries.borrow_mut();
                    entries
                        .iter()
                        .position(|entry| entry.id == id)
                        .map(|index| entries.remove(index))
                };
                // Dropped after the borrow ends: the callback may own other subscriptions.
                drop(removed);
            }
        });

        callback(shared.value.get());
        subscription
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.entries.borrow().len()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.shared.value.get())
            .field("subscribers", &self.shared.entries.borrow().len())
            .finish()
    }
}

/// Handle to an attached listener.
///
/// Releasing the handle, explicitly with [`unsubscribe`](Self::unsubscribe)
/// or by dropping it, stops notifications immediately and frees the
/// listener. Used both for [`Observable`] subscribers and for listeners
/// registered on a [`SystemSignal`](crate::SystemSignal).
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a subscription that runs `detach` once when released.
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to release.
    pub fn inert() -> Self {
        Self { detach: None }
    }

    /// Detaches the listener.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
