use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use super::{ContentView, ViewContext, open_editor};
use crate::ui::rect_contains;
use crate::window::WindowKey;

/// Every window in the pool, title then id. Enter (or a click) opens an
/// editor on the selected window.
#[derive(Debug, Default)]
pub struct WindowListView {
    rows: Vec<(WindowKey, String)>,
    selected: usize,
    offset: usize,
}

impl WindowListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&WindowKey> {
        self.rows.get(self.selected).map(|(id, _)| id)
    }

    fn refresh(&mut self, ctx: &ViewContext<'_>) {
        self.rows = ctx
            .realm
            .records()
            .into_iter()
            .map(|record| {
                let label = format!("{}  {}", record.state.title, record.id);
                (record.id, label)
            })
            .collect();
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn bump_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.rows.len() - 1);
        }
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.rows.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }

    fn open_selected(&self, ctx: &ViewContext<'_>) {
        let Some(target) = self.selected_id() else {
            return;
        };
        if open_editor(ctx.realm, target).is_none() {
            tracing::debug!(window = %target, "no controller yet, editor not opened");
        }
    }
}

impl ContentView for WindowListView {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        self.refresh(ctx);
        if area.width == 0 || area.height == 0 {
            return;
        }
        let view = area.height as usize;
        self.keep_selected_in_view(view);

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .skip(self.offset)
            .take(view)
            .map(|(_, label)| ListItem::new(label.clone()))
            .collect();
        let mut state = ListState::default();
        if ctx.focused && !self.rows.is_empty() && self.selected >= self.offset {
            state.select(Some(self.selected - self.offset));
        }
        let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn handle_event(&mut self, event: &Event, area: Rect, ctx: &ViewContext<'_>) -> bool {
        self.refresh(ctx);
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.bump_selection(-1),
                KeyCode::Down | KeyCode::Char('j') => self.bump_selection(1),
                KeyCode::PageUp => self.bump_selection(-5),
                KeyCode::PageDown => self.bump_selection(5),
                KeyCode::Home => self.selected = 0,
                KeyCode::End => self.selected = self.rows.len().saturating_sub(1),
                KeyCode::Enter => self.open_selected(ctx),
                _ => return false,
            },
            Event::Mouse(mouse) => {
                if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                    || !rect_contains(area, mouse.column, mouse.row)
                {
                    return false;
                }
                let row = self.offset + (mouse.row - area.y) as usize;
                if row >= self.rows.len() {
                    return false;
                }
                self.selected = row;
                self.open_selected(ctx);
            }
            _ => return false,
        }
        true
    }

    fn key_hint(&self) -> &str {
        "Up/Down select  Enter edit"
    }
}
