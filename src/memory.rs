//! In-memory history
//!
//! A [`MemoryHistory`] keeps the whole location stack in an ordinary `Vec`.
//! It needs no platform integration, which makes it the history of choice in
//! tests and in embedded hosts that have no native navigation stack.

use crate::history::{clamp, Action, History, Listener, Listeners, Subscription, Update};
use crate::location::{next_key, next_location, parse_path, Location, To};
use crate::warn_log;
use serde_json::Value;

/// A history that stores its entries in memory.
///
/// Entries never leave the instance; dropping the history drops the stack.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    action: Action,
    listeners: Listeners,
    key_counter: u64,
}

impl MemoryHistory {
    /// A history with a single `/` entry.
    pub fn new() -> Self {
        Self::with_entries(vec![To::Path("/".to_string())], 0)
    }

    /// A history seeded with `initial_entries`, current at `initial_index`.
    ///
    /// An empty entry list falls back to a single `/` entry. The index is
    /// clamped into the seeded stack. Initial entries carry the key
    /// `"default"` and no state.
    pub fn with_entries(initial_entries: Vec<To>, initial_index: usize) -> Self {
        let mut entries: Vec<Location> = initial_entries
            .iter()
            .map(|to| {
                let partial = match to {
                    To::Path(path) => parse_path(path),
                    To::Partial(partial) => partial.clone(),
                };
                if let Some(pathname) = &partial.pathname {
                    if !pathname.starts_with('/') {
                        warn_log!(
                            "relative pathname '{}' in initial entry; memory history \
                             entries should be absolute",
                            pathname
                        );
                    }
                }
                Location {
                    pathname: partial.pathname.unwrap_or_else(|| "/".to_string()),
                    search: partial.search.unwrap_or_default(),
                    hash: partial.hash.unwrap_or_default(),
                    state: None,
                    key: "default".to_string(),
                }
            })
            .collect();

        if entries.is_empty() {
            entries.push(Location::default());
        }

        let index = initial_index.min(entries.len() - 1);

        Self {
            entries,
            index,
            action: Action::Pop,
            listeners: Listeners::new(),
            key_counter: 0,
        }
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full stack, oldest first. Locations serialize, so this pairs with
    /// [`restore`](Self::restore) to persist a session.
    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Replace the stack wholesale, e.g. from a persisted session.
    ///
    /// An empty list falls back to a single `/` entry and the index is
    /// clamped into the restored stack. Listeners are not notified.
    pub fn restore(&mut self, entries: Vec<Location>, index: usize) {
        self.entries = if entries.is_empty() {
            vec![Location::default()]
        } else {
            entries
        };
        self.index = index.min(self.entries.len() - 1);
        self.action = Action::Pop;
    }

    fn notify(&self) {
        self.listeners.call(&Update {
            action: self.action,
            location: self.location(),
        });
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn push(&mut self, to: To, state: Option<Value>) {
        let key = next_key(&mut self.key_counter);
        let location = next_location(&self.location(), &to, state, key);

        self.index += 1;
        // Forward entries are unreachable after a push.
        self.entries.truncate(self.index);
        self.entries.push(location);
        self.action = Action::Push;
        self.notify();
    }

    fn replace(&mut self, to: To, state: Option<Value>) {
        let key = next_key(&mut self.key_counter);
        let location = next_location(&self.location(), &to, state, key);

        self.entries[self.index] = location;
        self.action = Action::Replace;
        self.notify();
    }

    fn go(&mut self, delta: isize) {
        let next = clamp(
            self.index as isize + delta,
            0,
            self.entries.len() as isize - 1,
        ) as usize;

        if next == self.index {
            return;
        }

        self.index = next;
        self.action = Action::Pop;
        self.notify();
    }

    fn listen(&self, listener: Listener) -> Subscription {
        self.listeners.push(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_at_root_with_pop() {
        let history = MemoryHistory::new();
        assert_eq!(history.location().pathname, "/");
        assert_eq!(history.location().key, "default");
        assert_eq!(history.action(), Action::Pop);
    }

    #[test]
    fn test_with_entries_clamps_index() {
        let history =
            MemoryHistory::with_entries(vec!["/a".into(), "/b".into()], 9);
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname, "/b");
    }

    #[test]
    fn test_with_empty_entries_falls_back_to_root() {
        let history = MemoryHistory::with_entries(vec![], 0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().pathname, "/");
    }

    #[test]
    fn test_push_appends_and_notifies() {
        let mut history = MemoryHistory::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let _sub = history.listen(Box::new(move |update| {
                seen.borrow_mut()
                    .push((update.action, update.location.pathname.clone()));
            }));
        }

        history.push("/a".into(), None);
        history.push("/b?q=1".into(), None);

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.action(), Action::Push);
        assert_eq!(
            *seen.borrow(),
            vec![(Action::Push, "/a".to_string()), (Action::Push, "/b".to_string())]
        );
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), None);
        history.push("/b".into(), None);
        history.go(-2);
        history.push("/c".into(), None);

        assert_eq!(history.len(), 2);
        assert_eq!(history.location().pathname, "/c");
    }

    #[test]
    fn test_replace_keeps_stack_size() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), None);
        history.replace("/b".into(), Some(Value::from("state")));

        assert_eq!(history.len(), 2);
        assert_eq!(history.action(), Action::Replace);
        assert_eq!(history.location().pathname, "/b");
        assert_eq!(history.location().state, Some(Value::from("state")));
    }

    #[test]
    fn test_go_back_and_forward() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), None);
        history.push("/b".into(), None);

        history.back();
        assert_eq!(history.action(), Action::Pop);
        assert_eq!(history.location().pathname, "/a");

        history.forward();
        assert_eq!(history.location().pathname, "/b");
    }

    #[test]
    fn test_go_clamps_and_suppresses_noop_notification() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), None);

        let count = Rc::new(RefCell::new(0));
        {
            let count = Rc::clone(&count);
            let _sub = history.listen(Box::new(move |_| *count.borrow_mut() += 1));
        }

        // Clamped to index 0, a real move.
        history.go(-5);
        assert_eq!(history.index(), 0);
        assert_eq!(*count.borrow(), 1);

        // Already at the lower bound; no move, no notification.
        history.go(-1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(history.action(), Action::Pop);
    }

    #[test]
    fn test_push_without_pathname_inherits_current() {
        let mut history = MemoryHistory::with_entries(vec!["/a".into()], 0);
        history.push("?q=1".into(), None);

        assert_eq!(history.location().pathname, "/a");
        assert_eq!(history.location().search, "?q=1");
    }

    #[test]
    fn test_keys_are_unique_across_navigations() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), None);
        let a = history.location().key.clone();
        history.push("/b".into(), None);
        let b = history.location().key.clone();

        assert_ne!(a, b);
        assert_ne!(a, "default");
    }

    #[test]
    fn test_entries_serialize_and_restore() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), Some(Value::from(1)));
        history.push("/b".into(), None);

        let json = serde_json::to_string(history.entries()).unwrap();
        let entries: Vec<Location> = serde_json::from_str(&json).unwrap();

        let mut restored = MemoryHistory::new();
        restored.restore(entries, 1);

        assert_eq!(restored.len(), 3);
        assert_eq!(restored.location().pathname, "/a");
        assert_eq!(restored.location().state, Some(Value::from(1)));
        assert_eq!(restored.action(), Action::Pop);
    }

    #[test]
    fn test_state_round_trips_through_stack() {
        let mut history = MemoryHistory::new();
        history.push("/a".into(), Some(serde_json::json!({ "from": "test" })));
        history.push("/b".into(), None);
        history.back();

        assert_eq!(
            history.location().state,
            Some(serde_json::json!({ "from": "test" }))
        );
    }
}
