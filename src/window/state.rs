//! Window reducer: a pure `(state, command) -> state` transition.
//!
//! Flags (hidden, minimized, size) are independent and layered on one
//! record. The size/geometry invariant is restored inside the transition, so
//! every command produces one final state and one notification.

use serde_json::Value;

use super::config::{SizePreset, WindowConfig};
use super::patch::WindowPatch;
use crate::error::{RealmError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleMinimized,
    SetHidden(bool),
    /// Deep merge; `None` leaves the state unchanged.
    UpdateState(Option<WindowPatch>),
}

impl Command {
    /// Parse the string-tagged wire form:
    /// `{"type": "toggle_isMinimized"}`, `{"type": "set_isHidden", "payload": true}`,
    /// `{"type": "update_state", "payload": {...}}`.
    ///
    /// An unrecognised `type` is [`RealmError::UnknownCommand`]; a payload of
    /// the wrong shape is [`RealmError::MalformedPatch`].
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| RealmError::UnknownCommand(value.to_string()))?;
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        match kind {
            "toggle_isMinimized" => Ok(Command::ToggleMinimized),
            "set_isHidden" => Ok(Command::SetHidden(serde_json::from_value(payload)?)),
            "update_state" => Ok(Command::UpdateState(serde_json::from_value(payload)?)),
            other => Err(RealmError::UnknownCommand(other.to_string())),
        }
    }
}

/// The state cell shared between a window's pool slot and its controller.
#[derive(Debug, Clone, Default)]
pub struct WindowState {
    pub(crate) config: WindowConfig,
    pub(crate) fault: Option<String>,
}

impl WindowState {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            fault: None,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Reason the window halted, if a fatal command hit it.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }
}

pub fn reduce(state: &WindowConfig, command: &Command) -> WindowConfig {
    match command {
        Command::ToggleMinimized => WindowConfig {
            is_minimized: !state.is_minimized,
            ..state.clone()
        },
        Command::SetHidden(hidden) => WindowConfig {
            is_hidden: *hidden,
            ..state.clone()
        },
        Command::UpdateState(None) => state.clone(),
        Command::UpdateState(Some(patch)) => {
            let mut next = state.clone();
            patch.apply(&mut next);
            sync_size(state, &mut next);
            next
        }
    }
}

/// Restore `size` <-> (`width`, `height`) after a merge. A new preset size
/// wins and forces its geometry; otherwise `size` is looked up from the final
/// geometry, so `custom` never sits on preset geometry.
fn sync_size(prev: &WindowConfig, next: &mut WindowConfig) {
    let size_changed = next.size != prev.size;
    let geometry_changed = (next.width, next.height) != (prev.width, prev.height);

    if size_changed && let Some((width, height)) = next.size.geometry() {
        next.width = width;
        next.height = height;
    } else if size_changed || geometry_changed {
        next.size = SizePreset::from_geometry(next.width, next.height).unwrap_or(SizePreset::Custom);
    }
}
