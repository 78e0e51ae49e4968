use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Content, open_generic_window, open_window_list};
use crate::realm::Realm;
use crate::ui::{fill, rect_contains, safe_set_string};
use crate::window::WindowKey;

pub const PANEL_TITLE: &str = "Realm Panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    OpenWindowList,
    OpenGenericWindow,
}

impl PanelAction {
    pub fn label(self) -> &'static str {
        match self {
            PanelAction::OpenWindowList => "[ Window List ]",
            PanelAction::OpenGenericWindow => "[ New Generic Window ]",
        }
    }

    pub fn apply(self, realm: &Realm<Content>) -> WindowKey {
        match self {
            PanelAction::OpenWindowList => open_window_list(realm),
            PanelAction::OpenGenericWindow => open_generic_window(realm),
        }
    }
}

/// The realm's own panel: pool counters and buttons that add windows.
/// Lives outside the pool; it is never a window itself.
#[derive(Debug, Default)]
pub struct RealmPanel {
    buttons: Vec<(PanelAction, Rect)>,
}

impl RealmPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, realm: &Realm<Content>) {
        self.buttons.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let buffer = frame.buffer_mut();
        fill(buffer, area, style);

        let y = area.y;
        let mut x = area.x + 1;
        safe_set_string(
            buffer,
            area,
            x,
            y,
            PANEL_TITLE,
            style.add_modifier(Modifier::BOLD),
        );
        x += PANEL_TITLE.chars().count() as u16 + 2;

        for action in [PanelAction::OpenWindowList, PanelAction::OpenGenericWindow] {
            let label = action.label();
            let width = label.chars().count() as u16;
            safe_set_string(buffer, area, x, y, label, style.fg(Color::Yellow));
            self.buttons.push((action, Rect::new(x, y, width, 1)));
            x += width + 1;
        }

        let counters = format!(" Open: {}  Closed: {} ", realm.len(), realm.close_count());
        let counters_width = counters.chars().count() as u16;
        let right = area.x + area.width;
        let start = right.saturating_sub(counters_width).max(x);
        safe_set_string(buffer, area, start, y, &counters, style);
    }

    pub fn action_at(&self, column: u16, row: u16) -> Option<PanelAction> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(action, _)| *action)
    }
}
