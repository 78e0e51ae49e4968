//! Buffer drawing helpers shared by the host and the content views.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Write `text` at (`x`, `y`), clipped to `bounds`.
pub fn safe_set_string(buffer: &mut Buffer, bounds: Rect, x: u16, y: u16, text: &str, style: Style) {
    let bounds = bounds.intersection(buffer.area);
    if !rect_contains(bounds, x, y) {
        return;
    }
    let available = bounds.x.saturating_add(bounds.width).saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Blank every cell of `area` with `style`.
pub fn fill(buffer: &mut Buffer, area: Rect, style: Style) {
    let area = area.intersection(buffer.area);
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

/// Parse a CSS colour value from a window style map: `#rgb`, `#rrggbb`,
/// `#rrggbbaa` (alpha ignored) or a handful of basic names.
pub fn css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match hex.len() {
            3 | 4 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                (digits.next()??, digits.next()??, digits.next()??)
            }
            6 | 8 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
            _ => return None,
        };
        return Some(Color::Rgb(r, g, b));
    }
    match value.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "yellow" => Some(Color::Yellow),
        "gray" | "grey" => Some(Color::Gray),
        _ => None,
    }
}

/// Dark or light foreground that stays readable on `background`.
pub fn contrast_fg(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            let luma = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
            if luma > 128_000 {
                Color::Black
            } else {
                Color::White
            }
        }
        Color::Black | Color::Blue | Color::DarkGray | Color::Red => Color::White,
        _ => Color::Black,
    }
}
