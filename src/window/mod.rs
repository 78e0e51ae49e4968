//! Per-window state and the controller handed to window content.
//!
//! A window is a [`WindowConfig`] record owned by exactly one reducer
//! ([`state::reduce`]) and driven through exactly one [`WindowController`].
//! Other windows reach it by looking the controller up in the realm and
//! subscribing to its state.

pub mod config;
pub mod controller;
pub mod patch;
pub mod state;
pub mod subscribers;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use config::{
    DragAxis, DraggableConfig, HandleArea, Position, SIZE_PRESETS, SizePreset, StyleMap,
    WindowConfig,
};
pub use controller::{CloseOutcome, WindowController};
pub use patch::{DraggablePatch, WindowPatch};
pub use state::{Command, WindowState, reduce};
pub use subscribers::{StateCallback, StateNotice, SubscriberRegistry};

const GENERATED_KEY_PREFIX: &str = "KEY-";

/// Opaque window identifier, unique within a realm.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A fresh random key (`KEY-<uuid v4>`).
    pub fn generate() -> Self {
        Self(format!("{GENERATED_KEY_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WindowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for WindowKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
