use std::collections::BTreeMap;
use std::rc::Weak;

use super::{Realm, RealmLink};
use crate::window::{WindowController, WindowKey};

/// Registration of a mounted window's controller.
///
/// Dropping the guard unregisters the controller from the realm, whichever
/// path the unmount takes. Unregistering after the realm is gone is a no-op.
pub struct MountGuard {
    controller: WindowController,
    realm: Weak<dyn RealmLink>,
}

impl MountGuard {
    pub(crate) fn new(controller: WindowController, realm: Weak<dyn RealmLink>) -> Self {
        Self { controller, realm }
    }

    pub fn id(&self) -> &WindowKey {
        self.controller.id()
    }

    pub fn controller(&self) -> &WindowController {
        &self.controller
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if let Some(realm) = self.realm.upgrade() {
            realm.unregister(&self.controller);
        }
        tracing::trace!(window = %self.controller.id(), "unmounted window");
    }
}

impl std::fmt::Debug for MountGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MountGuard").field(self.id()).finish()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MountChanges {
    pub mounted: Vec<WindowKey>,
    pub unmounted: Vec<WindowKey>,
}

impl MountChanges {
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty() && self.unmounted.is_empty()
    }
}

/// The host's set of live mounts, reconciled against the pool once per
/// frame.
#[derive(Debug, Default)]
pub struct MountSet {
    guards: BTreeMap<WindowKey, MountGuard>,
}

impl MountSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release guards whose window left the pool, then mount new pool
    /// members in pool order. The last window mounted ends up focused.
    pub fn sync<C: 'static>(&mut self, realm: &Realm<C>) -> MountChanges {
        let pool = realm.window_ids();
        let mut changes = MountChanges::default();

        let stale: Vec<WindowKey> = self
            .guards
            .keys()
            .filter(|id| !pool.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            self.guards.remove(&id);
            changes.unmounted.push(id);
        }

        for id in pool {
            if self.guards.contains_key(&id) {
                continue;
            }
            if let Some(guard) = realm.mount(&id) {
                self.guards.insert(id.clone(), guard);
                changes.mounted.push(id);
            }
        }
        changes
    }

    pub fn get(&self, id: &WindowKey) -> Option<&MountGuard> {
        self.guards.get(id)
    }

    pub fn contains(&self, id: &WindowKey) -> bool {
        self.guards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowPatch;

    #[test]
    fn sync_mounts_new_and_releases_removed_windows() {
        let realm: Realm<()> = Realm::new();
        let a = realm.add(None, WindowPatch::new(), ());
        let b = realm.add(None, WindowPatch::new(), ());
        let mut mounts = MountSet::new();

        let changes = mounts.sync(&realm);
        assert_eq!(changes.mounted, vec![a.clone(), b.clone()]);
        assert_eq!(realm.controller_count(), 2);
        assert_eq!(realm.focused(), Some(b.clone()));
        assert_eq!(mounts.len(), 2);

        realm.remove(&a);
        // Pool and controller table diverge until the next sync.
        assert!(realm.controller(&a).is_some());
        let changes = mounts.sync(&realm);
        assert_eq!(changes.unmounted, vec![a.clone()]);
        assert!(realm.controller(&a).is_none());
        assert!(!mounts.contains(&a));
        assert!(mounts.contains(&b));
        assert!(mounts.sync(&realm).is_empty());

        realm.remove(&b);
        mounts.sync(&realm);
        assert!(mounts.is_empty());
    }

    #[test]
    fn guard_outliving_realm_drops_cleanly() {
        let realm: Realm<()> = Realm::new();
        let id = realm.add(None, WindowPatch::new(), ());
        let guard = realm.mount(&id).unwrap();
        drop(realm);
        guard.controller().set_focused();
        guard.controller().close();
        drop(guard);
    }
}
