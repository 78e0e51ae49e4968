//! Terminal host for a realm.
//!
//! Owns the mounts and the content views, places windows, draws them in
//! z-order and routes input: host shortcuts first, then titlebar buttons and
//! drags, then the focused window's content.

pub mod chrome;
pub mod geometry;
pub mod keys;

use std::collections::BTreeMap;

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};

use crate::content::{
    self, Content, ContentView, RealmPanel, ViewContext, build_view, open_debug_log,
};
use crate::event_loop::ControlFlow;
use crate::focus::FocusRing;
use crate::realm::{MountChanges, MountSet, Realm};
use crate::titlebar::{self, TitlebarOutcome};
use crate::ui::{fill, safe_set_string};
use crate::window::{Position, WindowController, WindowKey};

use chrome::{ChromeLayout, render_chrome};
use geometry::{cascade_position, clamp_to_bounds, drag_position, outer_size, window_rect};
use keys::{Action, KeyBindings};

#[derive(Debug, Clone)]
struct HeaderDrag {
    id: WindowKey,
    origin: Position,
    start_col: u16,
    start_row: u16,
}

pub struct Desktop {
    realm: Realm<Content>,
    mounts: MountSet,
    views: BTreeMap<WindowKey, Box<dyn ContentView>>,
    positions: BTreeMap<WindowKey, Position>,
    opened: usize,
    panel: RealmPanel,
    /// Layouts of the last frame, bottom to top.
    layouts: Vec<(WindowKey, ChromeLayout)>,
    desktop_area: Rect,
    drag: Option<HeaderDrag>,
    focus_ring: FocusRing<WindowKey>,
    bindings: KeyBindings,
    debug_window: Option<WindowKey>,
    notice: Option<String>,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(Realm::new())
    }
}

impl Desktop {
    pub fn new(realm: Realm<Content>) -> Self {
        Self {
            realm,
            mounts: MountSet::new(),
            views: BTreeMap::new(),
            positions: BTreeMap::new(),
            opened: 0,
            panel: RealmPanel::new(),
            layouts: Vec::new(),
            desktop_area: Rect::default(),
            drag: None,
            focus_ring: FocusRing::new(),
            bindings: KeyBindings::default(),
            debug_window: None,
            notice: None,
        }
    }

    pub fn realm(&self) -> &Realm<Content> {
        &self.realm
    }

    pub fn position(&self, id: &WindowKey) -> Option<Position> {
        self.positions.get(id).copied()
    }

    /// Last frame's layout for `id`, if it was drawn.
    pub fn layout(&self, id: &WindowKey) -> Option<&ChromeLayout> {
        self.layouts
            .iter()
            .find(|(window, _)| window == id)
            .map(|(_, layout)| layout)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn controller(&self, id: &WindowKey) -> Option<WindowController> {
        self.mounts.get(id).map(|guard| guard.controller().clone())
    }

    fn focused_controller(&self) -> Option<WindowController> {
        self.realm.focused().and_then(|id| self.controller(&id))
    }

    /// Reconcile mounts and views with the pool.
    pub fn sync(&mut self) -> MountChanges {
        let changes = self.mounts.sync(&self.realm);
        for id in &changes.unmounted {
            self.views.remove(id);
            self.positions.remove(id);
            if self.drag.as_ref().is_some_and(|drag| drag.id == *id) {
                self.drag = None;
            }
        }
        for id in &changes.mounted {
            let (Some(record), Some(controller)) =
                (self.realm.window_record(id), self.controller(id))
            else {
                continue;
            };
            let position = cascade_position(&record.state.draggable, self.opened);
            self.opened += 1;
            self.positions.insert(id.clone(), position);
            let view = build_view(&record.content, &controller, &self.realm);
            self.views.insert(id.clone(), view);
        }
        if !changes.is_empty() {
            tracing::trace!(
                mounted = changes.mounted.len(),
                unmounted = changes.unmounted.len(),
                "desktop synced"
            );
        }
        changes
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        self.sync();
        let [panel_area, desktop_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        self.desktop_area = desktop_area;

        self.panel.render(frame, panel_area, &self.realm);
        fill(frame.buffer_mut(), desktop_area, Style::default().bg(Color::Black));

        self.layouts.clear();
        let focused = self.realm.focused();
        for id in self.realm.draw_order() {
            let Some(state) = self.realm.window_state(&id) else {
                continue;
            };
            if state.is_hidden {
                continue;
            }
            let position = self.positions.get(&id).copied().unwrap_or_default();
            let rect = window_rect(position, &state, desktop_area);
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            let is_focused = focused.as_ref() == Some(&id);
            let layout = ChromeLayout::compute(rect, &state);
            render_chrome(frame.buffer_mut(), &layout, &state, is_focused);

            if layout.content.width > 0
                && layout.content.height > 0
                && let Some(controller) = self.mounts.get(&id).map(|g| g.controller().clone())
                && let Some(view) = self.views.get_mut(&id)
            {
                let ctx = ViewContext {
                    realm: &self.realm,
                    window: &controller,
                    focused: is_focused,
                };
                view.render(frame, layout.content, &ctx);
            }
            self.layouts.push((id, layout));
        }

        self.render_status(frame, status_area);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = Style::default().bg(Color::Blue).fg(Color::White);
        let buffer = frame.buffer_mut();
        fill(buffer, area, style);

        let left = match (&self.notice, self.realm.focused()) {
            (Some(notice), _) => notice.clone(),
            (None, Some(id)) => {
                let title = self
                    .realm
                    .window_state(&id)
                    .map(|state| state.title)
                    .unwrap_or_default();
                let hint = self.views.get(&id).map(|v| v.key_hint()).unwrap_or("");
                format!(" {title}  {hint}")
            }
            (None, None) => String::new(),
        };
        safe_set_string(buffer, area, area.x, area.y, &left, style);

        let help = format!("{} ", self.bindings.help_line());
        let width = help.chars().count() as u16;
        let left_end = area.x + left.chars().count() as u16 + 2;
        let start = (area.x + area.width).saturating_sub(width).max(left_end);
        safe_set_string(buffer, area, start, area.y, &help, style);
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        self.sync();
        let flow = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, event);
                ControlFlow::Continue
            }
            Event::Paste(_) => {
                self.dispatch_to_focused(event);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.sync();
        flow
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        let Some(action) = self.bindings.action_for_key(key) else {
            self.notice = None;
            self.dispatch_to_focused(&Event::Key(*key));
            return ControlFlow::Continue;
        };
        self.notice = None;
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::NewGenericWindow => {
                content::open_generic_window(&self.realm);
            }
            Action::OpenWindowList => {
                content::open_window_list(&self.realm);
            }
            Action::EditFocused => {
                if let Some(id) = self.realm.focused()
                    && content::open_editor(&self.realm, &id).is_none()
                {
                    self.notice = Some(format!(" cannot edit {id}"));
                }
            }
            Action::CloseFocused => {
                if let Some(controller) = self.focused_controller() {
                    match controller.request_close() {
                        Ok(outcome) => {
                            tracing::debug!(window = %controller.id(), ?outcome, "close requested");
                        }
                        Err(err) => self.report(&err),
                    }
                }
            }
            Action::ToggleMinimize => {
                if let Some(controller) = self.focused_controller()
                    && let Err(err) = controller.toggle_is_minimized()
                {
                    self.report(&err);
                }
            }
            Action::ToggleDebugLog => self.toggle_debug_log(),
        }
        ControlFlow::Continue
    }

    fn report(&mut self, err: &crate::error::RealmError) {
        tracing::warn!(error = %err, "window command failed");
        self.notice = Some(format!(" {err}"));
    }

    fn toggle_debug_log(&mut self) {
        if let Some(id) = self.debug_window.take()
            && self.realm.contains(&id)
        {
            match self.controller(&id) {
                Some(controller) => controller.close(),
                None => {
                    self.realm.remove(&id);
                }
            }
            return;
        }
        self.debug_window = Some(open_debug_log(&self.realm));
    }

    /// Move focus along the visible windows in pool order.
    fn cycle_focus(&mut self, forward: bool) {
        let visible: Vec<WindowKey> = self
            .realm
            .window_ids()
            .into_iter()
            .filter(|id| {
                self.realm
                    .window_state(id)
                    .is_some_and(|state| !state.is_hidden)
            })
            .collect();
        self.focus_ring.set_order(visible);
        self.focus_ring.set_current(self.realm.focused());
        if let Some(next) = self.focus_ring.advance(forward).cloned()
            && let Some(controller) = self.controller(&next)
        {
            controller.set_focused();
        }
    }

    fn dispatch_to_focused(&mut self, event: &Event) -> bool {
        let Some(id) = self.realm.focused() else {
            return false;
        };
        let area = self
            .layout(&id)
            .map(|layout| layout.content)
            .unwrap_or_default();
        self.dispatch_to(&id, event, area)
    }

    fn dispatch_to(&mut self, id: &WindowKey, event: &Event, area: Rect) -> bool {
        let Some(controller) = self.controller(id) else {
            return false;
        };
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        let ctx = ViewContext {
            realm: &self.realm,
            window: &controller,
            focused: true,
        };
        view.handle_event(event, area, &ctx)
    }

    /// Topmost drawn window under the pointer.
    fn window_at(&self, column: u16, row: u16) -> Option<(WindowKey, ChromeLayout)> {
        self.layouts
            .iter()
            .rev()
            .find(|(_, layout)| layout.contains(column, row))
            .cloned()
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, event: &Event) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) = self.panel.action_at(mouse.column, mouse.row) {
                    action.apply(&self.realm);
                    return;
                }
                let Some((id, layout)) = self.window_at(mouse.column, mouse.row) else {
                    return;
                };
                let Some(controller) = self.controller(&id) else {
                    return;
                };
                controller.set_focused();

                if let Some(button) = layout.button_at(mouse.column, mouse.row) {
                    match titlebar::press(&controller, button) {
                        Ok(TitlebarOutcome::Closed) => {}
                        Ok(outcome) => tracing::trace!(window = %id, ?outcome, "titlebar"),
                        Err(err) => self.report(&err),
                    }
                    return;
                }

                let state = controller.get_state(Clone::clone);
                let draggable = state.draggable.axis.allows_x() || state.draggable.axis.allows_y();
                if draggable && layout.handle_contains(state.handle_area, mouse.column, mouse.row) {
                    self.drag = Some(HeaderDrag {
                        id: id.clone(),
                        origin: self.positions.get(&id).copied().unwrap_or_default(),
                        start_col: mouse.column,
                        start_row: mouse.row,
                    });
                    if state.handle_area != crate::window::HandleArea::Content {
                        return;
                    }
                }
                if crate::ui::rect_contains(layout.content, mouse.column, mouse.row) {
                    self.dispatch_to(&id, event, layout.content);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.drag.clone() else {
                    return;
                };
                let Some(state) = self.realm.window_state(&drag.id) else {
                    self.drag = None;
                    return;
                };
                let cols = mouse.column as i32 - drag.start_col as i32;
                let rows = mouse.row as i32 - drag.start_row as i32;
                let moved = drag_position(&state.draggable, drag.origin, cols, rows);
                let clamped =
                    clamp_to_bounds(&state.draggable, moved, outer_size(&state), self.desktop_area);
                self.positions.insert(drag.id, clamped);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.drag.take() {
                    tracing::trace!(window = %drag.id, "drag finished");
                }
            }
            _ => {
                if let Some((id, layout)) = self.window_at(mouse.column, mouse.row)
                    && crate::ui::rect_contains(layout.content, mouse.column, mouse.row)
                {
                    self.dispatch_to(&id, event, layout.content);
                }
            }
        }
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("realm", &self.realm)
            .field("mounts", &self.mounts)
            .field("drag", &self.drag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn draw(desktop: &mut Desktop, terminal: &mut Terminal<TestBackend>) {
        terminal.draw(|frame| desktop.render(frame)).unwrap();
    }

    #[test]
    fn shortcuts_open_and_close_windows() {
        let mut desktop = Desktop::default();
        desktop.handle_event(&ctrl('n'));
        desktop.handle_event(&ctrl('l'));
        assert_eq!(desktop.realm().len(), 2);
        assert_eq!(desktop.realm().controller_count(), 2);

        // The list mounted last and holds focus.
        let list = desktop.realm().window_ids()[1].clone();
        assert_eq!(desktop.realm().focused(), Some(list.clone()));
        desktop.handle_event(&ctrl('w'));
        assert!(!desktop.realm().contains(&list));
        assert_eq!(desktop.realm().close_count(), 1);
        assert_eq!(desktop.realm().controller_count(), 1);
    }

    #[test]
    fn tab_cycles_focus_through_visible_windows() {
        let mut desktop = Desktop::default();
        let realm = desktop.realm().clone();
        let a = content::open_generic_window(&realm);
        let b = content::open_generic_window(&realm);
        let c = content::open_generic_window(&realm);
        desktop.sync();
        realm.controller(&b).unwrap().set_is_hidden(true).unwrap();

        let tab = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(realm.focused(), Some(c.clone()));
        desktop.handle_event(&tab);
        assert_eq!(realm.focused(), Some(a.clone()));
        desktop.handle_event(&tab);
        assert_eq!(realm.focused(), Some(c));
    }

    #[test]
    fn quit_shortcut_stops_the_loop() {
        let mut desktop = Desktop::default();
        assert_eq!(desktop.handle_event(&ctrl('q')), ControlFlow::Quit);
        assert_eq!(
            desktop.handle_event(&Event::Key(KeyEvent::new(
                KeyCode::Char('q'),
                KeyModifiers::NONE
            ))),
            ControlFlow::Continue
        );
    }

    #[test]
    fn render_places_focused_window_on_top() {
        let mut desktop = Desktop::default();
        let realm = desktop.realm().clone();
        let a = content::open_generic_window(&realm);
        let b = content::open_generic_window(&realm);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        draw(&mut desktop, &mut terminal);
        assert_eq!(desktop.layouts.last().map(|(id, _)| id.clone()), Some(b));

        realm.set_focused(&a);
        draw(&mut desktop, &mut terminal);
        assert_eq!(desktop.layouts.last().map(|(id, _)| id.clone()), Some(a));
    }

    #[test]
    fn hidden_windows_are_not_drawn() {
        let mut desktop = Desktop::default();
        let realm = desktop.realm().clone();
        let id = content::open_generic_window(&realm);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        draw(&mut desktop, &mut terminal);
        assert!(desktop.layout(&id).is_some());

        realm.controller(&id).unwrap().set_is_hidden(true).unwrap();
        draw(&mut desktop, &mut terminal);
        assert!(desktop.layout(&id).is_none());
    }
}
