//! Window content: the payload the realm stores per window, and the live
//! views the host builds from it.
//!
//! The realm keeps only the cheap [`Content`] descriptor. The host turns it
//! into a [`ContentView`] when the window mounts and drops the view when the
//! window unmounts.

pub mod debug_log;
pub mod editor;
pub mod js_literal;
pub mod realm_panel;
pub mod text;
pub mod window_list;

use crossterm::event::Event;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::realm::Realm;
use crate::window::{SizePreset, WindowController, WindowKey, WindowPatch};

pub use debug_log::DebugLogView;
pub use editor::{EditorMode, EditorView, ViewFormat};
pub use realm_panel::{PanelAction, RealmPanel};
pub use text::TextView;
pub use window_list::WindowListView;

pub const GENERIC_WINDOW_TITLE: &str = "Generic Window";
pub const GENERIC_WINDOW_BODY: &str = "Generic Content";
pub const WINDOW_LIST_TITLE: &str = "All Windows";
pub const EDITOR_TITLE: &str = "Wizard ¤";
pub const DEBUG_LOG_TITLE: &str = "Debug Log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    WindowList,
    /// State editor bound to another window.
    Editor { target: WindowKey },
    DebugLog,
}

/// What a view sees while rendering or handling input.
pub struct ViewContext<'a> {
    pub realm: &'a Realm<Content>,
    /// The controller of the window hosting the view.
    pub window: &'a WindowController,
    pub focused: bool,
}

pub trait ContentView {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>);

    fn handle_event(&mut self, _event: &Event, _area: Rect, _ctx: &ViewContext<'_>) -> bool {
        false
    }

    /// One-line hint shown in the status bar while the window is focused.
    fn key_hint(&self) -> &str {
        ""
    }
}

/// Build the live view for a freshly mounted window.
pub fn build_view(
    content: &Content,
    window: &WindowController,
    realm: &Realm<Content>,
) -> Box<dyn ContentView> {
    match content {
        Content::Text(body) => Box::new(TextView::new(body.clone())),
        Content::WindowList => Box::new(WindowListView::new()),
        Content::Editor { target } => Box::new(EditorView::new(target.clone(), window.clone(), realm)),
        Content::DebugLog => Box::new(DebugLogView::new()),
    }
}

pub fn open_generic_window(realm: &Realm<Content>) -> WindowKey {
    realm.add(
        None,
        WindowPatch::new().title(GENERIC_WINDOW_TITLE),
        Content::Text(GENERIC_WINDOW_BODY.to_string()),
    )
}

pub fn open_window_list(realm: &Realm<Content>) -> WindowKey {
    realm.add(
        None,
        WindowPatch::new().title(WINDOW_LIST_TITLE),
        Content::WindowList,
    )
}

/// Open an editor for `target`. Needs the target's controller, so windows
/// that are not mounted yet (or already gone) are refused.
pub fn open_editor(realm: &Realm<Content>, target: &WindowKey) -> Option<WindowKey> {
    realm.controller(target)?;
    Some(realm.add(
        None,
        WindowPatch::new().title(EDITOR_TITLE).size(SizePreset::Lg),
        Content::Editor {
            target: target.clone(),
        },
    ))
}

pub fn open_debug_log(realm: &Realm<Content>) -> WindowKey {
    realm.add(
        None,
        WindowPatch::new().title(DEBUG_LOG_TITLE).geometry(640, 320),
        Content::DebugLog,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_requires_a_mounted_target() {
        let realm: Realm<Content> = Realm::new();
        let target = open_generic_window(&realm);
        assert!(open_editor(&realm, &target).is_none());

        let _guard = realm.mount(&target).unwrap();
        let editor = open_editor(&realm, &target).unwrap();
        let record = realm.window_record(&editor).unwrap();
        assert_eq!(record.state.title, EDITOR_TITLE);
        assert_eq!((record.state.width, record.state.height), (800, 600));
        assert_eq!(record.content, Content::Editor { target });
    }

    #[test]
    fn panel_shortcuts_add_titled_windows() {
        let realm: Realm<Content> = Realm::new();
        let list = open_window_list(&realm);
        let generic = open_generic_window(&realm);
        assert_eq!(realm.window_state(&list).unwrap().title, WINDOW_LIST_TITLE);
        assert_eq!(
            realm.window_record(&generic).unwrap().content,
            Content::Text(GENERIC_WINDOW_BODY.to_string())
        );
    }
}
