//! The realm: the pool of live windows and the cross-window coordination
//! state (controller table, focus, close counter).
//!
//! `Realm` is a cheap, cloneable handle. Hosts and window content receive it
//! explicitly; there is no ambient global realm.
//!
//! Creation is two-phase. [`Realm::add`] appends a record and returns its id
//! at once, but the window's controller only becomes queryable through
//! [`Realm::controller`] after the host mounts it with [`Realm::mount`].
//! Callers that need the controller of a freshly added window poll for it.

mod mount;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::focus::{self, ZLayer};
use crate::window::{WindowConfig, WindowController, WindowKey, WindowPatch, WindowState};

pub use mount::{MountChanges, MountGuard, MountSet};

/// Realm-side operations a controller may call back into.
pub(crate) trait RealmLink {
    fn focus(&self, id: &WindowKey);
    fn remove(&self, id: &WindowKey) -> bool;
    fn unregister(&self, controller: &WindowController);
}

/// Snapshot of one pool entry.
#[derive(Debug, Clone)]
pub struct WindowRecord<C> {
    pub id: WindowKey,
    pub state: WindowConfig,
    pub content: C,
}

struct WindowSlot<C> {
    id: WindowKey,
    state: Rc<RefCell<WindowState>>,
    content: C,
}

impl<C: Clone> WindowSlot<C> {
    fn record(&self) -> WindowRecord<C> {
        WindowRecord {
            id: self.id.clone(),
            state: self.state.borrow().config().clone(),
            content: self.content.clone(),
        }
    }
}

struct RealmInner<C> {
    pool: Vec<WindowSlot<C>>,
    controllers: BTreeMap<WindowKey, WindowController>,
    focused: Option<WindowKey>,
    close_count: usize,
}

impl<C> RealmInner<C> {
    fn position(&self, id: &WindowKey) -> Option<usize> {
        self.pool.iter().position(|slot| slot.id == *id)
    }

    fn take_window(&mut self, id: &WindowKey) -> Option<WindowSlot<C>> {
        let pos = self.position(id)?;
        let slot = self.pool.remove(pos);
        self.close_count += 1;
        tracing::debug!(window = %id, close_count = self.close_count, "removed window");
        Some(slot)
    }

    fn set_focused(&mut self, id: &WindowKey) {
        if self.focused.as_ref() != Some(id) {
            tracing::trace!(window = %id, "focus");
        }
        self.focused = Some(id.clone());
    }
}

impl<C> RealmLink for RefCell<RealmInner<C>> {
    fn focus(&self, id: &WindowKey) {
        self.borrow_mut().set_focused(id);
    }

    fn remove(&self, id: &WindowKey) -> bool {
        // The slot is dropped after the borrow ends.
        let removed = self.borrow_mut().take_window(id);
        removed.is_some()
    }

    fn unregister(&self, controller: &WindowController) {
        let removed = {
            let mut inner = self.borrow_mut();
            let registered = inner
                .controllers
                .get(controller.id())
                .is_some_and(|current| current.ptr_eq(controller));
            if registered {
                inner.controllers.remove(controller.id())
            } else {
                None
            }
        };
        if removed.is_some() {
            tracing::debug!(window = %controller.id(), "unregistered controller");
        }
    }
}

pub struct Realm<C: 'static> {
    inner: Rc<RefCell<RealmInner<C>>>,
}

impl<C: 'static> Clone for Realm<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: 'static> Default for Realm<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Realm<C> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RealmInner {
                pool: Vec::new(),
                controllers: BTreeMap::new(),
                focused: None,
                close_count: 0,
            })),
        }
    }

    /// Append a window built from `options` merged over the defaults.
    ///
    /// `id` defaults to a generated key. A caller-supplied id that is
    /// already in the pool leaves the pool untouched and is returned as is.
    pub fn add(&self, id: Option<WindowKey>, options: WindowPatch, content: C) -> WindowKey {
        let id = id.unwrap_or_else(WindowKey::generate);
        let mut inner = self.inner.borrow_mut();
        if inner.position(&id).is_some() {
            tracing::warn!(window = %id, "window id already in the pool, ignoring add");
            return id;
        }
        let config = WindowConfig::merged(None, Some(&options));
        tracing::debug!(window = %id, title = %config.title, "added window");
        inner.pool.push(WindowSlot {
            id: id.clone(),
            state: Rc::new(RefCell::new(WindowState::new(config))),
            content,
        });
        id
    }

    /// Drop the record for `id` and count it as closed. Unknown ids are a
    /// no-op. The controller stays registered until its mount is released.
    pub fn remove(&self, id: &WindowKey) -> bool {
        RealmLink::remove(&*self.inner, id)
    }

    /// Unvalidated: ids outside the pool are accepted.
    pub fn set_focused(&self, id: &WindowKey) {
        self.inner.borrow_mut().set_focused(id);
    }

    pub fn focused(&self) -> Option<WindowKey> {
        self.inner.borrow().focused.clone()
    }

    pub fn close_count(&self) -> usize {
        self.inner.borrow().close_count
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().pool.is_empty()
    }

    pub fn contains(&self, id: &WindowKey) -> bool {
        self.inner.borrow().position(id).is_some()
    }

    /// Pool ids in insertion (render) order.
    pub fn window_ids(&self) -> Vec<WindowKey> {
        self.inner
            .borrow()
            .pool
            .iter()
            .map(|slot| slot.id.clone())
            .collect()
    }

    pub fn controller(&self, id: &WindowKey) -> Option<WindowController> {
        self.inner.borrow().controllers.get(id).cloned()
    }

    pub fn controller_count(&self) -> usize {
        self.inner.borrow().controllers.len()
    }

    /// Current state of a pool member without going through its controller.
    pub fn window_state(&self, id: &WindowKey) -> Option<WindowConfig> {
        let inner = self.inner.borrow();
        let pos = inner.position(id)?;
        let state = inner.pool[pos].state.borrow().config().clone();
        Some(state)
    }

    pub fn z_layer(&self, id: &WindowKey) -> ZLayer {
        focus::z_layer(self.inner.borrow().focused.as_ref(), id)
    }

    /// Pool order with the focused window moved last (drawn on top).
    pub fn draw_order(&self) -> Vec<WindowKey> {
        let ids = self.window_ids();
        focus::draw_order(&ids, self.focused().as_ref())
    }

    /// Create and register the controller for a pool member, claiming focus
    /// for it. `None` when the id is not in the pool or is already mounted.
    ///
    /// The controller stays registered for as long as the returned guard
    /// lives.
    pub fn mount(&self, id: &WindowKey) -> Option<MountGuard> {
        let controller = {
            let mut inner = self.inner.borrow_mut();
            let pos = inner.position(id)?;
            if inner.controllers.contains_key(id) {
                tracing::warn!(window = %id, "window already mounted");
                return None;
            }
            let state = Rc::clone(&inner.pool[pos].state);
            let controller = WindowController::new(id.clone(), state, self.link());
            inner.controllers.insert(id.clone(), controller.clone());
            controller
        };
        tracing::debug!(window = %id, "mounted window");
        controller.set_focused();
        Some(MountGuard::new(controller, self.link()))
    }

    fn link(&self) -> Weak<dyn RealmLink> {
        let link: Rc<dyn RealmLink> = self.inner.clone();
        Rc::downgrade(&link)
    }
}

impl<C: Clone + 'static> Realm<C> {
    pub fn window_record(&self, id: &WindowKey) -> Option<WindowRecord<C>> {
        let inner = self.inner.borrow();
        let pos = inner.position(id)?;
        Some(inner.pool[pos].record())
    }

    pub fn records(&self) -> Vec<WindowRecord<C>> {
        self.inner.borrow().pool.iter().map(WindowSlot::record).collect()
    }
}

impl<C: 'static> fmt::Debug for Realm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Realm")
            .field("windows", &inner.pool.iter().map(|s| &s.id).collect::<Vec<_>>())
            .field("controllers", &inner.controllers.keys().collect::<Vec<_>>())
            .field("focused", &inner.focused)
            .field("close_count", &inner.close_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::SizePreset;

    #[test]
    fn add_appends_in_order_and_generates_ids() {
        let realm: Realm<()> = Realm::new();
        let a = realm.add(None, WindowPatch::new().title("A"), ());
        let b = realm.add(None, WindowPatch::new().title("B"), ());
        assert_ne!(a, b);
        assert_eq!(realm.window_ids(), vec![a, b]);
        assert_eq!(realm.close_count(), 0);
    }

    #[test]
    fn add_merges_options_over_defaults() {
        let realm: Realm<()> = Realm::new();
        let id = realm.add(None, WindowPatch::new().size(SizePreset::Sm), ());
        let state = realm.window_state(&id).unwrap();
        assert_eq!((state.width, state.height), (400, 200));
        assert_eq!(state.title, "Example Titlebar");
    }

    #[test]
    fn caller_supplied_duplicate_id_is_ignored() {
        let realm: Realm<&str> = Realm::new();
        let id = WindowKey::from("fixed");
        realm.add(Some(id.clone()), WindowPatch::new().title("first"), "one");
        realm.add(Some(id.clone()), WindowPatch::new().title("second"), "two");
        assert_eq!(realm.len(), 1);
        assert_eq!(realm.window_record(&id).unwrap().content, "one");
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let realm: Realm<()> = Realm::new();
        realm.add(None, WindowPatch::new(), ());
        assert!(!realm.remove(&WindowKey::from("missing")));
        assert_eq!(realm.len(), 1);
        assert_eq!(realm.close_count(), 0);
    }

    #[test]
    fn set_focused_accepts_unknown_ids() {
        let realm: Realm<()> = Realm::new();
        let ghost = WindowKey::from("ghost");
        realm.set_focused(&ghost);
        assert_eq!(realm.focused(), Some(ghost));
    }

    #[test]
    fn controller_appears_only_after_mount() {
        let realm: Realm<()> = Realm::new();
        let id = realm.add(None, WindowPatch::new(), ());
        assert!(realm.controller(&id).is_none());
        let guard = realm.mount(&id).unwrap();
        assert!(realm.controller(&id).unwrap().ptr_eq(guard.controller()));
        assert_eq!(realm.focused(), Some(id.clone()));
        assert!(realm.mount(&id).is_none());
        drop(guard);
        assert!(realm.controller(&id).is_none());
    }

    #[test]
    fn mount_of_unknown_id_fails() {
        let realm: Realm<()> = Realm::new();
        assert!(realm.mount(&WindowKey::from("nope")).is_none());
    }

    #[test]
    fn draw_order_puts_focused_last() {
        let realm: Realm<()> = Realm::new();
        let a = realm.add(None, WindowPatch::new(), ());
        let b = realm.add(None, WindowPatch::new(), ());
        let c = realm.add(None, WindowPatch::new(), ());
        realm.set_focused(&a);
        assert_eq!(realm.draw_order(), vec![b.clone(), c.clone(), a.clone()]);
        assert_eq!(realm.z_layer(&a), ZLayer::Focused);
        assert_eq!(realm.z_layer(&b), ZLayer::Background);
    }
}
