use crossterm::event::{Event, KeyCode};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::{ContentView, ViewContext};
use crate::debug_log::global_debug_log;

/// Tail of the in-memory tracing sink. Follows new lines until scrolled up.
#[derive(Debug, Default)]
pub struct DebugLogView {
    /// Lines scrolled back from the tail.
    back: usize,
}

impl DebugLogView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentView for DebugLogView {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, _ctx: &ViewContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(log) = global_debug_log() else {
            frame.render_widget(Paragraph::new("logging to stderr"), area);
            return;
        };
        let view = area.height as usize;
        let total = log.len();
        self.back = self.back.min(total.saturating_sub(view));
        let lines: Vec<Line> = log
            .tail(view + self.back)
            .into_iter()
            .take(view)
            .map(Line::from)
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_event(&mut self, event: &Event, area: Rect, _ctx: &ViewContext<'_>) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        let page = area.height.max(1) as usize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.back += 1,
            KeyCode::Down | KeyCode::Char('j') => self.back = self.back.saturating_sub(1),
            KeyCode::PageUp => self.back += page,
            KeyCode::PageDown => self.back = self.back.saturating_sub(page),
            KeyCode::End => self.back = 0,
            _ => return false,
        }
        true
    }

    fn key_hint(&self) -> &str {
        "Up/Down scroll  End follow"
    }
}
