use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::WindowKey;
use super::config::WindowConfig;
use super::patch::WindowPatch;
use super::state::{Command, WindowState, reduce};
use super::subscribers::{StateCallback, StateNotice, SubscriberRegistry};
use crate::error::{RealmError, Result};
use crate::realm::RealmLink;

/// Result of [`WindowController::request_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Subscribers were told and the window left the pool.
    Closed,
    /// The window is not closeable and was hidden instead.
    Hidden,
}

/// Command surface of one window.
///
/// Cheap to clone; every clone drives the same window. Handed to the
/// window's own content at mount time and to anyone else through
/// `Realm::controller`.
#[derive(Clone)]
pub struct WindowController {
    inner: Rc<ControllerInner>,
}

struct ControllerInner {
    id: WindowKey,
    state: Rc<RefCell<WindowState>>,
    subscribers: RefCell<SubscriberRegistry>,
    realm: Weak<dyn RealmLink>,
}

impl WindowController {
    pub(crate) fn new(
        id: WindowKey,
        state: Rc<RefCell<WindowState>>,
        realm: Weak<dyn RealmLink>,
    ) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                id,
                state,
                subscribers: RefCell::new(SubscriberRegistry::new()),
                realm,
            }),
        }
    }

    pub fn id(&self) -> &WindowKey {
        &self.inner.id
    }

    pub fn ptr_eq(&self, other: &WindowController) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn toggle_is_minimized(&self) -> Result<()> {
        self.apply(Command::ToggleMinimized)
    }

    pub fn set_is_hidden(&self, hidden: bool) -> Result<()> {
        self.apply(Command::SetHidden(hidden))
    }

    pub fn update_state(&self, patch: WindowPatch) -> Result<()> {
        self.apply(Command::UpdateState(Some(patch)))
    }

    /// Parse and merge a JSON partial. A payload that does not parse is
    /// returned to the caller and the state is left untouched.
    pub fn update_state_json(&self, raw: &str) -> Result<()> {
        let patch: Option<WindowPatch> = serde_json::from_str(raw)?;
        self.apply(Command::UpdateState(patch))
    }

    /// Apply a string-tagged command. An unknown command type halts this
    /// window: every later command on it fails with
    /// [`RealmError::WindowFaulted`]. Other windows are unaffected.
    pub fn dispatch_json(&self, raw: &str) -> Result<()> {
        match Command::from_json(raw) {
            Ok(command) => self.apply(command),
            Err(RealmError::UnknownCommand(kind)) => {
                tracing::error!(window = %self.id(), command = %kind, "unknown command, halting window");
                self.inner.state.borrow_mut().fault = Some(format!("unknown command: {kind}"));
                Err(RealmError::UnknownCommand(kind))
            }
            Err(err) => Err(err),
        }
    }

    /// Run `read` against the current state.
    pub fn get_state<T>(&self, read: impl FnOnce(&WindowConfig) -> T) -> T {
        let snapshot = self.inner.state.borrow().config.clone();
        read(&snapshot)
    }

    pub fn is_faulted(&self) -> bool {
        self.inner.state.borrow().fault.is_some()
    }

    /// Tell the realm this window is focused. Local state is not touched.
    pub fn set_focused(&self) {
        if let Some(realm) = self.inner.realm.upgrade() {
            realm.focus(&self.inner.id);
        }
    }

    /// Notify every subscriber with [`StateNotice::Closed`], then remove the
    /// window from the realm's pool.
    ///
    /// Ignores `isCloseable`: programmatic callers can always close. The
    /// titlebar goes through [`WindowController::request_close`].
    pub fn close(&self) {
        tracing::debug!(
            window = %self.id(),
            subscribers = self.subscriber_count(),
            "closing window"
        );
        self.notify(StateNotice::Closed);
        if let Some(realm) = self.inner.realm.upgrade() {
            realm.remove(&self.inner.id);
        }
    }

    /// Close when `isCloseable`, otherwise hide.
    pub fn request_close(&self) -> Result<CloseOutcome> {
        if self.get_state(|state| state.is_closeable) {
            self.close();
            Ok(CloseOutcome::Closed)
        } else {
            self.set_is_hidden(true)?;
            Ok(CloseOutcome::Hidden)
        }
    }

    /// Observe future state changes. Pair with [`WindowController::get_state`]
    /// for the current snapshot. Re-subscribing with the same id replaces the
    /// previous callback; returns `true` in that case.
    pub fn subscribe_to_state<F>(&self, subscriber: impl Into<String>, callback: F) -> bool
    where
        F: Fn(StateNotice<'_>) + 'static,
    {
        let callback: StateCallback = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .insert(subscriber, callback)
    }

    /// Safe for ids that never subscribed.
    pub fn unsub_from_state(&self, subscriber: &str) -> bool {
        let removed = self.inner.subscribers.borrow_mut().remove(subscriber);
        removed.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn apply(&self, command: Command) -> Result<()> {
        let next = {
            let mut cell = self.inner.state.borrow_mut();
            if cell.fault.is_some() {
                return Err(RealmError::WindowFaulted(self.inner.id.clone()));
            }
            let next = reduce(&cell.config, &command);
            if next == cell.config {
                return Ok(());
            }
            cell.config = next.clone();
            next
        };
        self.notify(StateNotice::Changed(&next));
        Ok(())
    }

    fn notify(&self, notice: StateNotice<'_>) {
        let callbacks = self.inner.subscribers.borrow().snapshot();
        for callback in callbacks {
            callback(notice);
        }
    }
}

impl fmt::Debug for WindowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowController")
            .field("id", &self.inner.id)
            .field("subscribers", &self.inner.subscribers.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct NullRealm;

    impl RealmLink for NullRealm {
        fn focus(&self, _id: &WindowKey) {}
        fn remove(&self, _id: &WindowKey) -> bool {
            false
        }
        fn unregister(&self, _controller: &WindowController) {}
    }

    fn detached() -> WindowController {
        let link: Rc<dyn RealmLink> = Rc::new(NullRealm);
        let weak = Rc::downgrade(&link);
        // The link is dropped immediately; realm-facing calls become no-ops.
        WindowController::new(
            WindowKey::from("w"),
            Rc::new(RefCell::new(WindowState::default())),
            weak,
        )
    }

    fn counting(controller: &WindowController, id: &str) -> Rc<Cell<usize>> {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        controller.subscribe_to_state(id, move |_| seen.set(seen.get() + 1));
        hits
    }

    #[test]
    fn each_change_notifies_each_subscriber_once() {
        let w = detached();
        let a = counting(&w, "a");
        let b = counting(&w, "b");
        w.toggle_is_minimized().unwrap();
        assert_eq!((a.get(), b.get()), (1, 1));
    }

    #[test]
    fn unchanged_state_is_not_broadcast() {
        let w = detached();
        let a = counting(&w, "a");
        w.set_is_hidden(false).unwrap();
        w.update_state(WindowPatch::default()).unwrap();
        assert_eq!(a.get(), 0);
    }

    #[test]
    fn subscribers_see_the_new_state() {
        let w = detached();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        w.subscribe_to_state("watcher", move |notice| {
            *sink.borrow_mut() = notice.state().map(|s| s.size);
        });
        w.update_state(WindowPatch::new().geometry(800, 600)).unwrap();
        assert_eq!(*seen.borrow(), Some(crate::window::SizePreset::Lg));
    }

    #[test]
    fn subscribe_then_unsubscribe_delivers_nothing() {
        let w = detached();
        let a = counting(&w, "a");
        assert!(w.unsub_from_state("a"));
        w.toggle_is_minimized().unwrap();
        assert_eq!(a.get(), 0);
        assert!(!w.unsub_from_state("a"));
    }

    #[test]
    fn callback_may_reenter_the_same_controller() {
        let w = detached();
        let inner = w.clone();
        w.subscribe_to_state("reenter", move |notice| {
            if let Some(state) = notice.state()
                && state.is_minimized
            {
                let _ = inner.set_is_hidden(true);
            }
        });
        w.toggle_is_minimized().unwrap();
        assert!(w.get_state(|s| s.is_hidden));
    }

    #[test]
    fn malformed_json_patch_propagates_and_keeps_state() {
        let w = detached();
        let before = w.get_state(Clone::clone);
        let err = w.update_state_json("{ not json").unwrap_err();
        assert!(matches!(err, RealmError::MalformedPatch(_)));
        let err = w.update_state_json(r#"{"width": "wide"}"#).unwrap_err();
        assert!(matches!(err, RealmError::MalformedPatch(_)));
        assert_eq!(w.get_state(Clone::clone), before);
        assert!(!w.is_faulted());
    }

    #[test]
    fn unknown_command_halts_only_this_window() {
        let w = detached();
        let other = detached();
        assert!(matches!(
            w.dispatch_json(r#"{"type": "teleport"}"#),
            Err(RealmError::UnknownCommand(_))
        ));
        assert!(w.is_faulted());
        assert!(matches!(
            w.toggle_is_minimized(),
            Err(RealmError::WindowFaulted(_))
        ));
        other.toggle_is_minimized().unwrap();
        assert!(other.get_state(|s| s.is_minimized));
    }

    #[test]
    fn request_close_hides_uncloseable_window() {
        let w = detached();
        w.update_state(WindowPatch::new().closeable(false)).unwrap();
        assert_eq!(w.request_close().unwrap(), CloseOutcome::Hidden);
        assert!(w.get_state(|s| s.is_hidden));
    }

    #[test]
    fn close_sends_closed_sentinel_to_every_subscriber() {
        let w = detached();
        let closed = Rc::new(Cell::new(0));
        for id in ["a", "b", "c"] {
            let closed = Rc::clone(&closed);
            w.subscribe_to_state(id, move |notice| {
                if notice.is_closed() {
                    closed.set(closed.get() + 1);
                }
            });
        }
        w.close();
        assert_eq!(closed.get(), 3);
    }
}
