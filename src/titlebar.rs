//! Titlebar policy: which buttons a window shows and what pressing them does.
//!
//! Rendering lives in the host; this module only decides.

use crate::error::Result;
use crate::window::{CloseOutcome, WindowConfig, WindowController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlebarButton {
    Minimize,
    Close,
}

impl TitlebarButton {
    /// Label for the button in the window's current state.
    pub fn glyph(self, state: &WindowConfig) -> &'static str {
        match self {
            TitlebarButton::Minimize if state.is_minimized => "∨",
            TitlebarButton::Minimize => "∧",
            TitlebarButton::Close => "X",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlebarOutcome {
    Toggled { minimized: bool },
    Closed,
    Hidden,
}

/// Buttons in display order, left to right.
pub fn buttons(state: &WindowConfig) -> Vec<TitlebarButton> {
    if !state.has_titlebar {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(2);
    if state.has_minimize_button {
        out.push(TitlebarButton::Minimize);
    }
    if state.has_close_button {
        out.push(TitlebarButton::Close);
    }
    out
}

/// Run the button's action against its window. Close honours `isCloseable`
/// and hides the window when it is not.
pub fn press(controller: &WindowController, button: TitlebarButton) -> Result<TitlebarOutcome> {
    match button {
        TitlebarButton::Minimize => {
            controller.toggle_is_minimized()?;
            let minimized = controller.get_state(|state| state.is_minimized);
            Ok(TitlebarOutcome::Toggled { minimized })
        }
        TitlebarButton::Close => Ok(match controller.request_close()? {
            CloseOutcome::Closed => TitlebarOutcome::Closed,
            CloseOutcome::Hidden => TitlebarOutcome::Hidden,
        }),
    }
}
