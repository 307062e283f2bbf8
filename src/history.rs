//! The navigation history contract
//!
//! A history is an interface to a location stack: the source of truth for
//! the current location plus the operations that change it. Two
//! implementations satisfy the contract -- [`MemoryHistory`](crate::MemoryHistory)
//! for tests and embedded hosts, and [`PlatformHistory`](crate::PlatformHistory)
//! backed by a native navigation stack through an injected adapter.
//!
//! Everything here is single-threaded and run-to-completion: every operation
//! succeeds or fails synchronously on the caller's thread, and listeners
//! observe transitions in the exact order they occurred.

use crate::location::{create_href, Location, To};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Why the current location changed.
///
/// Metadata about the most recent transition, never an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A change to an arbitrary index in the stack, such as back/forward
    /// navigation. Also the initial action of every freshly created history.
    Pop,
    /// A new entry added to the stack; any entries after the previous
    /// current one are lost.
    Push,
    /// The entry at the current index replaced by a new one.
    Replace,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pop => write!(f, "POP"),
            Action::Push => write!(f, "PUSH"),
            Action::Replace => write!(f, "REPLACE"),
        }
    }
}

/// A change to the current location, as delivered to listeners.
#[derive(Debug, Clone)]
pub struct Update {
    /// The action that triggered the change.
    pub action: Action,
    /// The new current location.
    pub location: Location,
}

/// A location-change callback.
pub type Listener = Box<dyn Fn(&Update)>;

struct ListenerSet {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    /// Ids unlistened while their entries were out on loan during a
    /// dispatch; reconciled when the dispatch finishes.
    removed: Vec<u64>,
}

impl ListenerSet {
    fn remove(&mut self, id: u64) {
        if let Some(pos) = self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            self.entries.remove(pos);
        } else if !self.removed.contains(&id) {
            self.removed.push(id);
        }
    }
}

/// Registry of location-change listeners.
///
/// Insertion order is preserved for dispatch but carries no semantic weight;
/// listeners must not depend on their position. A listener may unlisten
/// itself (or another) from inside a notification.
pub struct Listeners {
    inner: Rc<RefCell<ListenerSet>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerSet {
                next_id: 0,
                entries: Vec::new(),
                removed: Vec::new(),
            })),
        }
    }

    /// Register a callback; the returned [`Subscription`] detaches it.
    pub fn push(&self, listener: Listener) -> Subscription {
        let mut set = self.inner.borrow_mut();
        let id = set.next_id;
        set.next_id += 1;
        set.entries.push((id, listener));
        Subscription {
            id,
            set: Rc::downgrade(&self.inner),
        }
    }

    /// Invoke every registered callback with `update`.
    pub fn call(&self, update: &Update) {
        // Take the entries out so a callback can mutate the registry
        // (listen/unlisten) without re-entrant borrows.
        let entries = {
            let mut set = self.inner.borrow_mut();
            std::mem::take(&mut set.entries)
        };

        for (_, listener) in &entries {
            listener(update);
        }

        let mut set = self.inner.borrow_mut();
        let removed = std::mem::take(&mut set.removed);
        let mut merged: Vec<(u64, Listener)> = entries
            .into_iter()
            .filter(|(id, _)| !removed.contains(id))
            .collect();
        // Callbacks registered during dispatch landed in the fresh vec.
        merged.append(&mut set.entries);
        set.entries = merged;
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for Listeners {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

/// Detaches a listener registered via [`History::listen`].
///
/// `unlisten` is idempotent: the second and later calls are no-ops. Dropping
/// a subscription without calling `unlisten` leaves the listener attached.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    set: Weak<RefCell<ListenerSet>>,
}

impl Subscription {
    /// Deregister exactly the callback this subscription was returned for.
    pub fn unlisten(&self) {
        if let Some(set) = self.set.upgrade() {
            set.borrow_mut().remove(self.id);
        }
    }
}

/// An interface to the navigation stack.
///
/// Similar to a browser's `window.history`, but smaller and explicit: no
/// ambient instance exists, every consumer receives the history it should
/// use.
///
/// Listeners are dispatched synchronously from within `push`, `replace` and
/// `go`; a listener must not call back into the same history from inside a
/// notification.
pub trait History {
    /// The current location. A fresh snapshot per call.
    fn location(&self) -> Location;

    /// The action that produced the current location. `Action::Pop` on a
    /// freshly created history.
    fn action(&self) -> Action;

    /// Push a new location onto the stack, discarding any forward entries.
    fn push(&mut self, to: To, state: Option<Value>);

    /// Replace the entry at the current index in place.
    fn replace(&mut self, to: To, state: Option<Value>);

    /// Move `delta` entries through the stack. The resulting index is
    /// clamped to the stack bounds; when the clamp leaves the index
    /// unchanged, no notification is issued.
    fn go(&mut self, delta: isize);

    /// `go(-1)`.
    fn back(&mut self) {
        self.go(-1);
    }

    /// `go(1)`.
    fn forward(&mut self) {
        self.go(1);
    }

    /// A valid href for `to`, usable as a link target.
    fn create_href(&self, to: &To) -> String {
        create_href(to)
    }

    /// Register a location-change callback.
    fn listen(&self, listener: Listener) -> Subscription;
}

/// Clamp `n` into `[lower, upper]`.
pub(crate) fn clamp(n: isize, lower: isize, upper: isize) -> isize {
    n.max(lower).min(upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn update() -> Update {
        Update {
            action: Action::Push,
            location: Location::default(),
        }
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Pop.to_string(), "POP");
        assert_eq!(Action::Push.to_string(), "PUSH");
        assert_eq!(Action::Replace.to_string(), "REPLACE");
    }

    #[test]
    fn test_listeners_dispatch_in_order() {
        let listeners = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            let _sub = listeners.push(Box::new(move |_| seen.borrow_mut().push(label)));
        }

        listeners.call(&update());
        assert_eq!(*seen.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unlisten_removes_exactly_one() {
        let listeners = Listeners::new();
        let count = Rc::new(Cell::new(0));

        let keep = {
            let count = Rc::clone(&count);
            listeners.push(Box::new(move |_| count.set(count.get() + 1)))
        };
        let drop_me = {
            let count = Rc::clone(&count);
            listeners.push(Box::new(move |_| count.set(count.get() + 10)))
        };

        drop_me.unlisten();
        listeners.call(&update());

        assert_eq!(count.get(), 1);
        keep.unlisten();
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_unlisten_is_idempotent() {
        let listeners = Listeners::new();
        let sub = listeners.push(Box::new(|_| {}));

        sub.unlisten();
        sub.unlisten();
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_unlisten_from_inside_dispatch() {
        let listeners = Listeners::new();
        let count = Rc::new(Cell::new(0));

        let sub_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let sub = {
            let count = Rc::clone(&count);
            let sub_slot = Rc::clone(&sub_slot);
            listeners.push(Box::new(move |_| {
                count.set(count.get() + 1);
                if let Some(sub) = sub_slot.borrow().as_ref() {
                    sub.unlisten();
                }
            }))
        };
        *sub_slot.borrow_mut() = Some(sub);

        listeners.call(&update());
        listeners.call(&update());

        // Fired once, then removed itself.
        assert_eq!(count.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-2, 0, 3), 0);
        assert_eq!(clamp(2, 0, 3), 2);
    }
}
