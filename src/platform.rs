//! Platform-backed history
//!
//! A [`PlatformHistory`] fronts a native navigation stack (a browser window,
//! a webview, an OS shell) through an injected [`PlatformAdapter`]. The
//! adapter owns the platform specifics: reading the current URL, writing
//! entries, traversing, and surfacing changes that originate outside this
//! history, native back/forward included.
//!
//! The native stack only exposes a per-entry payload slot, not an index, so
//! each written entry carries an [`EntryState`] recording its position. An
//! external Pop hands that payload back and the history reconstructs where in
//! the stack it landed.

use crate::history::{clamp, Action, History, Listener, Listeners, Subscription, Update};
use crate::location::{create_path, next_key, next_location, parse_path, Location, PartialPath, To};
use crate::trace_log;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The payload stored in the platform's per-entry state slot.
///
/// `idx` is the entry's position in the stack; `user` is the caller's state
/// value. Serialized as `{ "idx": ..., "usr": ... }` for platforms that
/// persist the slot as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryState {
    pub idx: usize,
    #[serde(rename = "usr", default)]
    pub user: Option<Value>,
}

/// What kind of change the platform reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The platform moved to an existing entry: native back/forward or a
    /// completed `travel`.
    Pop,
    /// A new entry was written through the adapter.
    Push,
    /// The current entry was overwritten through the adapter.
    Replace,
}

/// A change reported by the platform, carrying everything the history needs
/// so the handler never has to read back through the adapter.
#[derive(Debug, Clone)]
pub struct PlatformChange {
    pub kind: ChangeKind,
    /// URL of the now-current entry.
    pub path: PartialPath,
    /// Payload of the now-current entry, if one was ever written.
    pub entry: Option<EntryState>,
}

/// Handler invoked by an adapter whenever its stack changes.
pub type ChangeHandler = Rc<dyn Fn(PlatformChange)>;

/// The surface a native navigation stack must provide.
///
/// `push_state` and `replace_state` must raise the change handler for every
/// write, including writes made by third parties through the same adapter;
/// [`PlatformHistory`] filters out the echo of its own calls. `travel` must
/// raise the handler with [`ChangeKind::Pop`] once the move completes, and
/// must not raise it when a clamped move leaves the current entry unchanged.
///
/// Handlers are invoked synchronously from inside the mutating call, so an
/// adapter method must never be re-entered from a handler.
pub trait PlatformAdapter {
    /// URL of the current entry.
    fn current_path(&self) -> PartialPath;

    /// Payload of the current entry, `None` when the slot was never written.
    fn entry_state(&self) -> Option<EntryState>;

    /// Append a new entry after the current one, discarding forward entries.
    fn push_state(&mut self, entry: EntryState, path: &PartialPath);

    /// Overwrite the current entry in place.
    fn replace_state(&mut self, entry: EntryState, path: &PartialPath);

    /// Move `delta` entries through the native stack.
    fn travel(&mut self, delta: isize);

    /// Install the change handler. Replaces any previous handler; the
    /// subscription lives as long as the adapter.
    fn set_change_handler(&mut self, handler: ChangeHandler);
}

struct Inner {
    action: Action,
    index: usize,
    location: Location,
    listeners: Listeners,
    key_counter: u64,
    /// Set around this history's own adapter writes so the change handler
    /// can tell them apart from third-party writes.
    in_flight: bool,
}

/// A history backed by a native navigation stack.
///
/// On construction the current platform entry becomes the initial location;
/// an entry whose state slot is empty is stamped with `idx = 0` via
/// `replace_state`. External changes, native back/forward included, flow in
/// through the adapter's change handler and notify listeners like any other
/// transition.
///
/// Listeners must not navigate this history from inside a notification.
pub struct PlatformHistory<A: PlatformAdapter> {
    adapter: Rc<RefCell<A>>,
    inner: Rc<RefCell<Inner>>,
}

impl<A: PlatformAdapter> PlatformHistory<A> {
    pub fn new(adapter: A) -> Self {
        let adapter = Rc::new(RefCell::new(adapter));

        let (path, entry) = {
            let adapter = adapter.borrow();
            (adapter.current_path(), adapter.entry_state())
        };

        let index = match &entry {
            Some(entry) => entry.idx,
            None => {
                // First sight of this stack: claim the slot so a later Pop
                // back to this entry can be placed.
                adapter
                    .borrow_mut()
                    .replace_state(EntryState { idx: 0, user: None }, &path);
                0
            }
        };

        let location = Location {
            pathname: path.pathname.unwrap_or_else(|| "/".to_string()),
            search: path.search.unwrap_or_default(),
            hash: path.hash.unwrap_or_default(),
            state: entry.and_then(|entry| entry.user),
            key: "default".to_string(),
        };

        let inner = Rc::new(RefCell::new(Inner {
            action: Action::Pop,
            index,
            location,
            listeners: Listeners::new(),
            key_counter: 0,
            in_flight: false,
        }));

        let weak = Rc::downgrade(&inner);
        let handler: ChangeHandler = Rc::new(move |change: PlatformChange| {
            let Some(inner) = weak.upgrade() else {
                return;
            };

            let (listeners, update) = {
                let mut inner = inner.borrow_mut();
                if inner.in_flight {
                    return;
                }

                let (action, index) = match change.kind {
                    ChangeKind::Pop => (
                        Action::Pop,
                        change.entry.as_ref().map(|entry| entry.idx).unwrap_or(0),
                    ),
                    ChangeKind::Push => (Action::Push, inner.index + 1),
                    ChangeKind::Replace => (Action::Replace, inner.index),
                };
                trace_log!("platform change {:?} -> index {}", change.kind, index);

                let location = Location {
                    pathname: change
                        .path
                        .pathname
                        .clone()
                        .unwrap_or_else(|| "/".to_string()),
                    search: change.path.search.clone().unwrap_or_default(),
                    hash: change.path.hash.clone().unwrap_or_default(),
                    state: change.entry.as_ref().and_then(|entry| entry.user.clone()),
                    key: "default".to_string(),
                };

                inner.action = action;
                inner.index = index;
                inner.location = location.clone();
                (inner.listeners.clone(), Update { action, location })
            };
            listeners.call(&update);
        });
        adapter.borrow_mut().set_change_handler(handler);

        Self { adapter, inner }
    }

    /// The underlying adapter, for host integration.
    pub fn adapter(&self) -> Rc<RefCell<A>> {
        Rc::clone(&self.adapter)
    }

    /// Index of the current entry within the native stack.
    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    fn navigate(&mut self, to: To, state: Option<Value>, action: Action) {
        let (location, entry, path) = {
            let mut inner = self.inner.borrow_mut();
            inner.in_flight = true;

            let key = next_key(&mut inner.key_counter);
            let location = next_location(&inner.location, &to, state, key);
            let index = match action {
                Action::Push => inner.index + 1,
                _ => inner.index,
            };
            let entry = EntryState {
                idx: index,
                user: location.state.clone(),
            };
            let path = PartialPath {
                pathname: Some(location.pathname.clone()),
                search: Some(location.search.clone()),
                hash: Some(location.hash.clone()),
            };
            (location, entry, path)
        };

        {
            let mut adapter = self.adapter.borrow_mut();
            match action {
                Action::Push => adapter.push_state(entry, &path),
                _ => adapter.replace_state(entry, &path),
            }
        }

        let (listeners, update) = {
            let mut inner = self.inner.borrow_mut();
            inner.in_flight = false;
            if action == Action::Push {
                inner.index += 1;
            }
            inner.action = action;
            inner.location = location.clone();
            (inner.listeners.clone(), Update { action, location })
        };
        listeners.call(&update);
    }
}

impl<A: PlatformAdapter> History for PlatformHistory<A> {
    fn location(&self) -> Location {
        self.inner.borrow().location.clone()
    }

    fn action(&self) -> Action {
        self.inner.borrow().action
    }

    fn push(&mut self, to: To, state: Option<Value>) {
        self.navigate(to, state, Action::Push);
    }

    fn replace(&mut self, to: To, state: Option<Value>) {
        self.navigate(to, state, Action::Replace);
    }

    fn go(&mut self, delta: isize) {
        // The move lands as a Pop through the change handler.
        self.adapter.borrow_mut().travel(delta);
    }

    fn listen(&self, listener: Listener) -> Subscription {
        self.inner.borrow().listeners.push(listener)
    }
}

impl<A: PlatformAdapter> fmt::Debug for PlatformHistory<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PlatformHistory")
            .field("index", &inner.index)
            .field("location", &inner.location)
            .field("action", &inner.action)
            .finish()
    }
}

/// An in-memory native stack, the crate's stand-in for a browser window.
///
/// Delivers change signals synchronously, exactly as the adapter contract
/// requires. Useful in tests and in embedded hosts that want platform-history
/// semantics without a platform.
pub struct FakePlatform {
    stack: Vec<(String, Option<EntryState>)>,
    index: usize,
    handler: Option<ChangeHandler>,
}

impl FakePlatform {
    /// A stack with a single `/` entry and an empty state slot.
    pub fn new() -> Self {
        Self::with_path("/")
    }

    /// A stack with a single entry at `path` and an empty state slot.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            stack: vec![(path.into(), None)],
            index: 0,
            handler: None,
        }
    }

    /// Number of entries in the native stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Index of the current native entry.
    pub fn index(&self) -> usize {
        self.index
    }

    fn emit(&self, kind: ChangeKind) {
        if let Some(handler) = self.handler.clone() {
            let (url, entry) = &self.stack[self.index];
            handler(PlatformChange {
                kind,
                path: parse_path(url),
                entry: entry.clone(),
            });
        }
    }
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for FakePlatform {
    fn current_path(&self) -> PartialPath {
        parse_path(&self.stack[self.index].0)
    }

    fn entry_state(&self) -> Option<EntryState> {
        self.stack[self.index].1.clone()
    }

    fn push_state(&mut self, entry: EntryState, path: &PartialPath) {
        self.index += 1;
        self.stack.truncate(self.index);
        self.stack.push((create_path(path), Some(entry)));
        self.emit(ChangeKind::Push);
    }

    fn replace_state(&mut self, entry: EntryState, path: &PartialPath) {
        self.stack[self.index] = (create_path(path), Some(entry));
        self.emit(ChangeKind::Replace);
    }

    fn travel(&mut self, delta: isize) {
        let next = clamp(
            self.index as isize + delta,
            0,
            self.stack.len() as isize - 1,
        ) as usize;

        if next == self.index {
            return;
        }

        self.index = next;
        self.emit(ChangeKind::Pop);
    }

    fn set_change_handler(&mut self, handler: ChangeHandler) {
        self.handler = Some(handler);
    }
}

impl fmt::Debug for FakePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakePlatform")
            .field("stack", &self.stack)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_construction_seeds_empty_state_slot() {
        let history = PlatformHistory::new(FakePlatform::with_path("/start?q=1"));

        assert_eq!(history.location().pathname, "/start");
        assert_eq!(history.location().search, "?q=1");
        assert_eq!(history.location().key, "default");
        assert_eq!(history.action(), Action::Pop);
        assert_eq!(
            history.adapter().borrow().entry_state(),
            Some(EntryState { idx: 0, user: None })
        );
    }

    #[test]
    fn test_construction_adopts_existing_index() {
        let mut platform = FakePlatform::new();
        platform.push_state(
            EntryState {
                idx: 1,
                user: Some(Value::from("restored")),
            },
            &parse_path("/deep"),
        );

        let history = PlatformHistory::new(platform);
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname, "/deep");
        assert_eq!(history.location().state, Some(Value::from("restored")));
    }

    #[test]
    fn test_push_writes_through_and_notifies_once() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let _sub = history.listen(Box::new(move |update| {
                seen.borrow_mut()
                    .push((update.action, update.location.pathname.clone()));
            }));
        }

        history.push("/a".into(), Some(Value::from(1)));

        // Exactly one notification; the adapter echo is suppressed.
        assert_eq!(*seen.borrow(), vec![(Action::Push, "/a".to_string())]);
        assert_eq!(history.index(), 1);
        assert_eq!(
            history.adapter().borrow().entry_state(),
            Some(EntryState {
                idx: 1,
                user: Some(Value::from(1)),
            })
        );
    }

    #[test]
    fn test_replace_keeps_index() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        history.push("/a".into(), None);
        history.replace("/b".into(), None);

        assert_eq!(history.index(), 1);
        assert_eq!(history.action(), Action::Replace);
        assert_eq!(history.adapter().borrow().len(), 2);
        assert_eq!(history.location().pathname, "/b");
    }

    #[test]
    fn test_go_arrives_as_pop_with_reconstructed_index() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        history.push("/a".into(), Some(Value::from("a-state")));
        history.push("/b".into(), None);

        history.go(-2);

        assert_eq!(history.action(), Action::Pop);
        assert_eq!(history.index(), 0);
        assert_eq!(history.location().pathname, "/");

        history.forward();
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname, "/a");
        assert_eq!(history.location().state, Some(Value::from("a-state")));
    }

    #[test]
    fn test_clamped_travel_does_not_notify() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        let count = Rc::new(RefCell::new(0));
        {
            let count = Rc::clone(&count);
            let _sub = history.listen(Box::new(move |_| *count.borrow_mut() += 1));
        }

        history.back();
        assert_eq!(*count.borrow(), 0);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_external_pop_reconciles_through_entry_state() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        history.push("/a".into(), None);
        history.push("/b".into(), None);

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let _sub = history.listen(Box::new(move |update| {
                seen.borrow_mut()
                    .push((update.action, update.location.pathname.clone()));
            }));
        }

        // The user hits native back; nothing goes through the history.
        history.adapter().borrow_mut().travel(-1);

        assert_eq!(*seen.borrow(), vec![(Action::Pop, "/a".to_string())]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_third_party_push_through_adapter_notifies() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        history.push("/a".into(), None);

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let _sub = history.listen(Box::new(move |update| {
                seen.borrow_mut()
                    .push((update.action, update.location.pathname.clone()));
            }));
        }

        history.adapter().borrow_mut().push_state(
            EntryState { idx: 2, user: None },
            &parse_path("/elsewhere"),
        );

        assert_eq!(*seen.borrow(), vec![(Action::Push, "/elsewhere".to_string())]);
        assert_eq!(history.index(), 2);
        assert_eq!(history.location().pathname, "/elsewhere");
    }

    #[test]
    fn test_push_discards_native_forward_entries() {
        let mut history = PlatformHistory::new(FakePlatform::new());
        history.push("/a".into(), None);
        history.push("/b".into(), None);
        history.go(-2);
        history.push("/c".into(), None);

        assert_eq!(history.adapter().borrow().len(), 2);
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname, "/c");
    }

    #[test]
    fn test_entry_state_json_shape() {
        let entry = EntryState {
            idx: 3,
            user: Some(Value::from("u")),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "idx": 3, "usr": "u" }));
    }
}
