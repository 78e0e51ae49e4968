//! Pixel <-> cell conversion and the drag collaborator's arithmetic.
//!
//! Window geometry is kept in pixels (the unit of `width`/`height` and the
//! draggable settings); the terminal works in cells of a fixed nominal size.

use ratatui::layout::Rect;

use crate::window::{DraggableConfig, Position, WindowConfig};

pub const CELL_WIDTH_PX: i32 = 8;
pub const CELL_HEIGHT_PX: i32 = 16;

pub const MIN_COLS: u16 = 16;
pub const MIN_ROWS: u16 = 3;

/// Offset between successive windows that open at the same default
/// position.
pub const CASCADE_STEP_PX: Position = Position { x: 32, y: 32 };
pub const CASCADE_SLOTS: usize = 8;

/// Bounds value that keeps a window inside the desktop.
pub const PARENT_BOUNDS: &str = "parent";

/// Outer size of a window in cells, borders included.
pub fn outer_size(state: &WindowConfig) -> (u16, u16) {
    let cols = (state.width as i32 / CELL_WIDTH_PX).clamp(MIN_COLS as i32, u16::MAX as i32) as u16;
    let rows = if state.is_minimized {
        let inner = (state.effective_height_px() as i32 / CELL_HEIGHT_PX).max(1);
        (inner + 2).min(u16::MAX as i32) as u16
    } else {
        (state.height as i32 / CELL_HEIGHT_PX).clamp(MIN_ROWS as i32, u16::MAX as i32) as u16
    };
    (cols, rows)
}

/// Where a window sits inside `desktop`, clipped to it. Positions are pixel
/// offsets from the desktop's top-left corner.
pub fn window_rect(position: Position, state: &WindowConfig, desktop: Rect) -> Rect {
    let (cols, rows) = outer_size(state);
    let x = desktop.x as i32 + position.x.div_euclid(CELL_WIDTH_PX);
    let y = desktop.y as i32 + position.y.div_euclid(CELL_HEIGHT_PX);
    clip(x, y, cols as i32, rows as i32, desktop)
}

fn clip(x: i32, y: i32, width: i32, height: i32, bounds: Rect) -> Rect {
    let left = x.max(bounds.x as i32);
    let top = y.max(bounds.y as i32);
    let right = (x + width).min(bounds.x as i32 + bounds.width as i32);
    let bottom = (y + height).min(bounds.y as i32 + bounds.height as i32);
    if right <= left || bottom <= top {
        return Rect::new(bounds.x, bounds.y, 0, 0);
    }
    Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    )
}

/// Initial position for the `slot`-th window opened at its default position.
pub fn cascade_position(config: &DraggableConfig, slot: usize) -> Position {
    let step = (slot % CASCADE_SLOTS) as i32;
    Position {
        x: config.default_position.x.saturating_add(step * CASCADE_STEP_PX.x),
        y: config.default_position.y.saturating_add(step * CASCADE_STEP_PX.y),
    }
}

/// Position after the pointer moved (`cols`, `rows`) cells since the drag
/// started at `start`. Honours the axis lock, the scale and the grid.
pub fn drag_position(config: &DraggableConfig, start: Position, cols: i32, rows: i32) -> Position {
    let scale = if config.scale > 0.0 { config.scale } else { 1.0 };
    let dx = if config.axis.allows_x() {
        snap(cols.saturating_mul(CELL_WIDTH_PX) as f32 / scale, config.grid[0])
    } else {
        0
    };
    let dy = if config.axis.allows_y() {
        snap(rows.saturating_mul(CELL_HEIGHT_PX) as f32 / scale, config.grid[1])
    } else {
        0
    };
    Position {
        x: start.x.saturating_add(dx),
        y: start.y.saturating_add(dy),
    }
}

fn snap(delta: f32, grid: u32) -> i32 {
    if grid <= 1 {
        return delta.round() as i32;
    }
    let grid = grid as f32;
    ((delta / grid).round() * grid) as i32
}

/// Keep a window of `size` (cells) inside `desktop` when its bounds are
/// `"parent"`. Other bounds values are left alone.
pub fn clamp_to_bounds(
    config: &DraggableConfig,
    position: Position,
    size: (u16, u16),
    desktop: Rect,
) -> Position {
    if config.bounds != PARENT_BOUNDS {
        return position;
    }
    let max_x = ((desktop.width as i32 - size.0 as i32) * CELL_WIDTH_PX).max(0);
    let max_y = ((desktop.height as i32 - size.1 as i32) * CELL_HEIGHT_PX).max(0);
    Position {
        x: position.x.clamp(0, max_x),
        y: position.y.clamp(0, max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::DragAxis;

    #[test]
    fn preset_sizes_map_to_cells() {
        let mut state = WindowConfig::default();
        assert_eq!(outer_size(&state), (75, 25));
        state.is_minimized = true;
        assert_eq!(outer_size(&state), (75, 3));
    }

    #[test]
    fn tiny_windows_get_a_minimum_size() {
        let state = WindowConfig {
            width: 10,
            height: 10,
            ..WindowConfig::default()
        };
        assert_eq!(outer_size(&state), (MIN_COLS, MIN_ROWS));
    }

    #[test]
    fn window_rect_is_clipped_to_desktop() {
        let desktop = Rect::new(0, 1, 40, 10);
        let rect = window_rect(Position { x: 80, y: 32 }, &WindowConfig::default(), desktop);
        assert_eq!(rect, Rect::new(10, 3, 30, 8));
    }

    #[test]
    fn drag_snaps_to_grid_and_respects_axis() {
        let mut cfg = DraggableConfig::default();
        // One cell right is 8px, snapped to the 10px grid.
        assert_eq!(
            drag_position(&cfg, Position::default(), 1, 0),
            Position { x: 10, y: 0 }
        );
        cfg.axis = DragAxis::Horizontal;
        assert_eq!(
            drag_position(&cfg, Position { x: 5, y: 5 }, 2, 3),
            Position { x: 25, y: 5 }
        );
        cfg.axis = DragAxis::Fixed;
        assert_eq!(
            drag_position(&cfg, Position::default(), 4, 4),
            Position::default()
        );
    }

    #[test]
    fn scale_divides_pointer_movement() {
        let cfg = DraggableConfig {
            scale: 2.0,
            grid: [1, 1],
            ..DraggableConfig::default()
        };
        assert_eq!(
            drag_position(&cfg, Position::default(), 2, 1),
            Position { x: 8, y: 8 }
        );
    }

    #[test]
    fn parent_bounds_clamp_inside_desktop() {
        let cfg = DraggableConfig::default();
        let desktop = Rect::new(0, 0, 100, 30);
        let clamped = clamp_to_bounds(&cfg, Position { x: -50, y: 9999 }, (75, 25), desktop);
        assert_eq!(clamped, Position { x: 0, y: 80 });

        let free = DraggableConfig {
            bounds: "none".into(),
            ..DraggableConfig::default()
        };
        let pos = Position { x: -50, y: 9999 };
        assert_eq!(clamp_to_bounds(&free, pos, (75, 25), desktop), pos);
    }

    #[test]
    fn extreme_positions_saturate() {
        let cfg = DraggableConfig {
            default_position: Position {
                x: i32::MAX,
                y: i32::MIN,
            },
            ..DraggableConfig::default()
        };
        assert_eq!(
            cascade_position(&cfg, 3),
            Position {
                x: i32::MAX,
                y: i32::MIN + 96
            }
        );

        let start = Position {
            x: i32::MAX - 5,
            y: i32::MIN + 5,
        };
        let moved = drag_position(&cfg, start, 10, -10);
        assert_eq!(moved, Position { x: i32::MAX, y: i32::MIN });

        let desktop = Rect::new(0, 1, 120, 38);
        let far = window_rect(moved, &WindowConfig::default(), desktop);
        assert_eq!(far.area(), 0);
        assert_eq!(
            clamp_to_bounds(&cfg, moved, (75, 25), desktop),
            Position { x: 360, y: 0 }
        );
    }

    #[test]
    fn cascade_wraps_after_eight_windows() {
        let cfg = DraggableConfig::default();
        assert_eq!(cascade_position(&cfg, 1), Position { x: 32, y: 32 });
        assert_eq!(cascade_position(&cfg, CASCADE_SLOTS), Position::default());
    }
}
