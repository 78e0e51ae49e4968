//! Window frame: border, titlebar and the hit regions derived from them.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::titlebar::{self, TitlebarButton};
use crate::ui::{contrast_fg, css_color, fill, rect_contains, safe_set_string};
use crate::window::{HandleArea, WindowConfig};

pub const BUTTON_WIDTH: u16 = 3;

/// Regions of one window on screen, all in terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeLayout {
    pub outer: Rect,
    pub titlebar: Option<Rect>,
    pub buttons: Vec<(TitlebarButton, Rect)>,
    /// Empty while the window is minimized.
    pub content: Rect,
    pub footer: Rect,
}

impl ChromeLayout {
    pub fn compute(outer: Rect, state: &WindowConfig) -> Self {
        let inner_x = outer.x.saturating_add(1);
        let inner_w = outer.width.saturating_sub(2);
        let bottom = outer.y.saturating_add(outer.height.saturating_sub(1));
        let mut top = outer.y.saturating_add(1);

        let mut titlebar = None;
        let mut buttons = Vec::new();
        if state.has_titlebar && outer.height >= 3 {
            let bar = Rect::new(inner_x, top, inner_w, 1);
            let mut right = bar.x.saturating_add(bar.width);
            for button in titlebar::buttons(state).into_iter().rev() {
                if right < bar.x + BUTTON_WIDTH {
                    break;
                }
                right -= BUTTON_WIDTH;
                buttons.push((button, Rect::new(right, bar.y, BUTTON_WIDTH, 1)));
            }
            buttons.reverse();
            titlebar = Some(bar);
            top = top.saturating_add(1);
        }

        let content = if state.is_minimized || bottom <= top {
            Rect::new(inner_x, top, 0, 0)
        } else {
            Rect::new(inner_x, top, inner_w, bottom - top)
        };
        let footer = if outer.height >= 2 {
            Rect::new(outer.x, bottom, outer.width, 1)
        } else {
            Rect::new(outer.x, bottom, 0, 0)
        };

        Self {
            outer,
            titlebar,
            buttons,
            content,
            footer,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.outer, column, row)
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<TitlebarButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(button, _)| *button)
    }

    /// Whether a press at (`column`, `row`) starts a drag for `area`.
    /// Buttons never start one.
    pub fn handle_contains(&self, area: HandleArea, column: u16, row: u16) -> bool {
        if self.button_at(column, row).is_some() {
            return false;
        }
        let region = match area {
            HandleArea::Wrapper => Some(self.outer),
            HandleArea::Titlebar => self.titlebar,
            HandleArea::Content => Some(self.content),
            HandleArea::Footer => Some(self.footer),
        };
        region.is_some_and(|rect| rect_contains(rect, column, row))
    }
}

fn style_bg(map: &crate::window::StyleMap, key: &str) -> Option<Color> {
    map.get(key).and_then(|value| css_color(value))
}

/// Draw frame and titlebar. The content area is cleared to the content
/// background; filling it is the content view's job.
pub fn render_chrome(buffer: &mut Buffer, layout: &ChromeLayout, state: &WindowConfig, focused: bool) {
    let outer = layout.outer;
    if outer.width < 2 || outer.height < 2 {
        return;
    }

    let content_bg = style_bg(&state.content_style, "backgroundColor").unwrap_or(Color::Reset);
    let content_style = Style::default().bg(content_bg).fg(contrast_fg(content_bg));
    fill(buffer, outer, content_style);

    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let border_style = Style::default().fg(border_color);
    if state.wrapper_style.get("border").map(String::as_str) != Some("none") {
        draw_border(buffer, outer, border_style);
    }

    if let Some(bar) = layout.titlebar {
        let bg = style_bg(&state.titlebar_style, "backgroundColor").unwrap_or(Color::Gray);
        let fg = style_bg(&state.titlebar_style, "color").unwrap_or_else(|| contrast_fg(bg));
        let mut bar_style = Style::default().bg(bg).fg(fg);
        if focused {
            bar_style = bar_style.add_modifier(Modifier::BOLD);
        }
        fill(buffer, bar, bar_style);
        let title_room = layout
            .buttons
            .first()
            .map_or(bar.x + bar.width, |(_, rect)| rect.x)
            .saturating_sub(bar.x + 1);
        let title_bounds = Rect::new(bar.x, bar.y, title_room + 1, 1);
        safe_set_string(buffer, title_bounds, bar.x + 1, bar.y, &state.title, bar_style);

        for (button, rect) in &layout.buttons {
            let style = match button {
                TitlebarButton::Close => bar_style.fg(Color::Red),
                TitlebarButton::Minimize => bar_style,
            };
            let label = format!(" {} ", button.glyph(state));
            safe_set_string(buffer, *rect, rect.x, rect.y, &label, style);
        }
    }
}

fn draw_border(buffer: &mut Buffer, rect: Rect, style: Style) {
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;
    for x in left..=right {
        for (y, corner_l, corner_r) in [(top, "┌", "┐"), (bottom, "└", "┘")] {
            let symbol = if x == left {
                corner_l
            } else if x == right {
                corner_r
            } else {
                "─"
            };
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    }
    for y in top + 1..bottom {
        for x in [left, right] {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol("│");
                cell.set_style(style);
            }
        }
    }
}
