//! Focus and stacking.
//!
//! Two layers only: the focused window draws on top, everything else shares
//! the background layer in pool order.

use crate::window::WindowKey;

pub const FOCUSED_Z_INDEX: u16 = 10;
pub const BACKGROUND_Z_INDEX: u16 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZLayer {
    Focused,
    Background,
}

impl ZLayer {
    pub fn z_index(self) -> u16 {
        match self {
            ZLayer::Focused => FOCUSED_Z_INDEX,
            ZLayer::Background => BACKGROUND_Z_INDEX,
        }
    }
}

pub fn z_layer(focused: Option<&WindowKey>, id: &WindowKey) -> ZLayer {
    if focused == Some(id) {
        ZLayer::Focused
    } else {
        ZLayer::Background
    }
}

/// `ids` in order, with the focused one (if present) moved to the end.
pub fn draw_order(ids: &[WindowKey], focused: Option<&WindowKey>) -> Vec<WindowKey> {
    let mut order: Vec<WindowKey> = ids
        .iter()
        .filter(|id| Some(*id) != focused)
        .cloned()
        .collect();
    if let Some(focused) = focused
        && ids.contains(focused)
    {
        order.push(focused.clone());
    }
    order
}

/// Cyclic keyboard focus over an ordered set of items.
#[derive(Debug, Clone)]
pub struct FocusRing<T: Clone + Eq> {
    order: Vec<T>,
    current: Option<T>,
}

impl<T: Clone + Eq> Default for FocusRing<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            current: None,
        }
    }
}

impl<T: Clone + Eq> FocusRing<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_order(&mut self, order: Vec<T>) {
        self.order = order;
    }

    pub fn order(&self) -> &[T] {
        &self.order
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, current: Option<T>) {
        self.current = current;
    }

    /// Step to the next (or previous) item, wrapping. A current item that is
    /// not in the order restarts from the first.
    pub fn advance(&mut self, forward: bool) -> Option<&T> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len() as isize;
        let next = match self
            .current
            .as_ref()
            .and_then(|cur| self.order.iter().position(|item| item == cur))
        {
            Some(idx) => {
                let step = if forward { 1isize } else { -1isize };
                (idx as isize + step).rem_euclid(len) as usize
            }
            None if forward => 0,
            None => (len - 1) as usize,
        };
        self.current = Some(self.order[next].clone());
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<WindowKey> {
        names.iter().map(|n| WindowKey::from(*n)).collect()
    }

    #[test]
    fn focused_window_has_higher_z_index() {
        let a = WindowKey::from("a");
        let b = WindowKey::from("b");
        assert_eq!(z_layer(Some(&a), &a).z_index(), FOCUSED_Z_INDEX);
        assert_eq!(z_layer(Some(&a), &b).z_index(), BACKGROUND_Z_INDEX);
        assert_eq!(z_layer(None, &b), ZLayer::Background);
    }

    #[test]
    fn draw_order_ignores_focus_outside_the_pool() {
        let ids = keys(&["a", "b"]);
        let ghost = WindowKey::from("ghost");
        assert_eq!(draw_order(&ids, Some(&ghost)), ids);
        assert_eq!(draw_order(&ids, None), ids);
    }

    #[test]
    fn ring_wraps_both_ways() {
        let mut ring = FocusRing::new();
        ring.set_order(vec![1, 2, 3]);
        assert_eq!(ring.advance(true), Some(&1));
        assert_eq!(ring.advance(false), Some(&3));
        assert_eq!(ring.advance(true), Some(&1));
        ring.set_current(Some(2));
        assert_eq!(ring.advance(true), Some(&3));
    }

    #[test]
    fn empty_ring_keeps_nothing() {
        let mut ring: FocusRing<u8> = FocusRing::new();
        assert_eq!(ring.advance(true), None);
        assert_eq!(ring.current(), None);
    }
}
