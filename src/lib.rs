//! A realm of movable, focusable panel windows.
//!
//! The core is [`realm::Realm`] (the pool of windows), [`window`] (per-window
//! state, reducer and controller) and [`focus`] (stacking). [`desktop`] is a
//! terminal host that mounts and draws a realm; [`content`] holds the panels
//! it ships with.

pub mod cli;
pub mod clipboard;
pub mod content;
pub mod debug_log;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod focus;
pub mod realm;
pub mod session;
pub mod titlebar;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::{RealmError, Result};
pub use realm::{MountGuard, MountSet, Realm, WindowRecord};
pub use window::{WindowConfig, WindowController, WindowKey, WindowPatch};
