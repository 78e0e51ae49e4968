use std::fmt;
use std::rc::Rc;

use super::config::WindowConfig;

/// What a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub enum StateNotice<'a> {
    /// The observed window's state after a change.
    Changed(&'a WindowConfig),
    /// The observed window is closing; observers should tear themselves down.
    Closed,
}

impl<'a> StateNotice<'a> {
    pub fn state(&self) -> Option<&'a WindowConfig> {
        match *self {
            StateNotice::Changed(state) => Some(state),
            StateNotice::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, StateNotice::Closed)
    }
}

pub type StateCallback = Rc<dyn Fn(StateNotice<'_>)>;

/// Observers of one window, keyed by subscriber id.
///
/// Inserting an id that is already present replaces its callback in place,
/// so an id is notified at most once per change.
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: Vec<(String, StateCallback)>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an existing callback for `id` was replaced.
    pub fn insert(&mut self, id: impl Into<String>, callback: StateCallback) -> bool {
        let id = id.into();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = callback;
            return true;
        }
        self.entries.push((id, callback));
        false
    }

    /// Returns the callback that was registered under `id`, if any.
    pub fn remove(&mut self, id: &str) -> Option<StateCallback> {
        let pos = self.entries.iter().position(|(existing, _)| existing == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Callbacks to invoke for one notification round. Taken as a snapshot
    /// so callbacks may subscribe or unsubscribe while being notified.
    pub fn snapshot(&self) -> Vec<StateCallback> {
        self.entries.iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<usize>>, StateCallback) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        (hits, Rc::new(move |_: StateNotice<'_>| seen.set(seen.get() + 1)))
    }

    #[test]
    fn duplicate_id_replaces_instead_of_appending() {
        let mut registry = SubscriberRegistry::new();
        let (first_hits, first) = counter();
        let (second_hits, second) = counter();
        assert!(!registry.insert("inspector", first));
        assert!(registry.insert("inspector", second));
        assert_eq!(registry.len(), 1);

        for cb in registry.snapshot() {
            cb(StateNotice::Closed);
        }
        assert_eq!(first_hits.get(), 0);
        assert_eq!(second_hits.get(), 1);
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut registry = SubscriberRegistry::new();
        assert!(registry.remove("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn notice_exposes_state_or_closed() {
        let cfg = WindowConfig::default();
        assert!(StateNotice::Changed(&cfg).state().is_some());
        assert!(StateNotice::Closed.is_closed());
        assert!(StateNotice::Closed.state().is_none());
    }
}
