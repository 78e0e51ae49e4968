use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};

use super::{ContentView, ViewContext};

/// Static text body.
#[derive(Debug, Clone)]
pub struct TextView {
    body: String,
}

impl TextView {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl ContentView for TextView {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, _ctx: &ViewContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let paragraph = Paragraph::new(self.body.as_str()).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
