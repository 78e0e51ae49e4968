//! The structured configuration record of a single window.
//!
//! Field names serialize in camelCase so the record round-trips through the
//! same option names callers pass to `Realm::add` (`handleArea`, `minHeight`,
//! `isCloseable`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::WindowKey;
use super::patch::WindowPatch;
use super::state::{Command, reduce};

/// Visual override group, merged key-wise by patches.
pub type StyleMap = BTreeMap<String, String>;

/// Fixed geometry for each size preset, in pixels.
pub const SIZE_PRESETS: [(SizePreset, u32, u32); 3] = [
    (SizePreset::Sm, 400, 200),
    (SizePreset::Md, 600, 400),
    (SizePreset::Lg, 800, 600),
];

/// Region of the window that starts a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleArea {
    Wrapper,
    #[default]
    Titlebar,
    Content,
    Footer,
}

impl HandleArea {
    pub fn as_str(self) -> &'static str {
        match self {
            HandleArea::Wrapper => "wrapper",
            HandleArea::Titlebar => "titlebar",
            HandleArea::Content => "content",
            HandleArea::Footer => "footer",
        }
    }
}

/// Denormalized view of (`width`, `height`).
///
/// Any unrecognised value deserializes as `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Sm,
    #[default]
    Md,
    Lg,
    #[serde(other)]
    Custom,
}

impl SizePreset {
    /// Preset geometry, `None` for `Custom`.
    pub fn geometry(self) -> Option<(u32, u32)> {
        SIZE_PRESETS
            .iter()
            .find(|(preset, _, _)| *preset == self)
            .map(|&(_, w, h)| (w, h))
    }

    /// Exact reverse lookup of the preset table.
    pub fn from_geometry(width: u32, height: u32) -> Option<Self> {
        SIZE_PRESETS
            .iter()
            .find(|&&(_, w, h)| w == width && h == height)
            .map(|&(preset, _, _)| preset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragAxis {
    #[default]
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "x")]
    Horizontal,
    #[serde(rename = "y")]
    Vertical,
    #[serde(rename = "none")]
    Fixed,
}

impl DragAxis {
    pub fn allows_x(self) -> bool {
        matches!(self, DragAxis::Both | DragAxis::Horizontal)
    }

    pub fn allows_y(self) -> bool {
        matches!(self, DragAxis::Both | DragAxis::Vertical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Settings forwarded verbatim to the drag collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraggableConfig {
    pub axis: DragAxis,
    pub default_position: Position,
    /// `"parent"` keeps the window inside its container; anything else is
    /// left to the collaborator.
    pub bounds: String,
    pub grid: [u32; 2],
    pub scale: f32,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            axis: DragAxis::Both,
            default_position: Position::default(),
            bounds: "parent".to_string(),
            grid: [10, 10],
            scale: 1.0,
        }
    }
}

/// Configuration and runtime flags of one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    pub handle_area: HandleArea,
    pub width: u32,
    pub height: u32,
    pub size: SizePreset,
    pub title: String,
    /// Collapsed height; the titlebar height when a titlebar is present.
    pub min_height: String,
    pub has_titlebar: bool,
    pub has_minimize_button: bool,
    pub has_close_button: bool,
    pub is_hidden: bool,
    pub is_minimized: bool,
    /// When false the titlebar close button hides the window instead.
    pub is_closeable: bool,
    pub draggable: DraggableConfig,
    pub wrapper_style: StyleMap,
    pub titlebar_style: StyleMap,
    pub content_style: StyleMap,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            handle_area: HandleArea::Titlebar,
            width: 600,
            height: 400,
            size: SizePreset::Md,
            title: "Example Titlebar".to_string(),
            min_height: "24px".to_string(),
            has_titlebar: true,
            has_minimize_button: true,
            has_close_button: true,
            is_hidden: false,
            is_minimized: false,
            is_closeable: true,
            draggable: DraggableConfig::default(),
            wrapper_style: style_map(&[("border", "1px solid black")]),
            titlebar_style: style_map(&[
                ("borderBottom", "1px solid black"),
                ("backgroundColor", "#E0E0E0FF"),
            ]),
            content_style: style_map(&[("backgroundColor", "#FDFAFD")]),
        }
    }
}

impl WindowConfig {
    /// Merge `patch` over `prior`.
    ///
    /// A missing prior or an absent/empty patch is a no-op; with neither, the
    /// result is the default configuration.
    pub fn merged(prior: Option<&WindowConfig>, patch: Option<&WindowPatch>) -> WindowConfig {
        let base = prior.cloned().unwrap_or_default();
        match patch {
            Some(patch) if !patch.is_empty() => {
                reduce(&base, &Command::UpdateState(Some(patch.clone())))
            }
            _ => base,
        }
    }

    /// Selector the drag collaborator uses to find this window's handle.
    pub fn handle_selector(&self, id: &WindowKey) -> String {
        format!(".{}-{}", self.handle_area.as_str(), id)
    }

    /// Collapsed height in pixels parsed from `minHeight` (`"24px"`, `"24"`).
    pub fn min_height_px(&self) -> Option<u32> {
        let raw = self.min_height.trim();
        let digits = raw.strip_suffix("px").unwrap_or(raw).trim();
        digits.parse::<f32>().ok().map(|v| v.max(0.0).round() as u32)
    }

    /// Height actually occupied, honouring `isMinimized`.
    pub fn effective_height_px(&self) -> u32 {
        if self.is_minimized {
            self.min_height_px().unwrap_or(0)
        } else {
            self.height
        }
    }
}

fn style_map(entries: &[(&str, &str)]) -> StyleMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_configuration() {
        let cfg = WindowConfig::default();
        assert_eq!((cfg.width, cfg.height), (600, 400));
        assert_eq!(cfg.size, SizePreset::Md);
        assert_eq!(cfg.handle_area, HandleArea::Titlebar);
        assert!(cfg.is_closeable);
        assert_eq!(cfg.draggable.grid, [10, 10]);
        assert_eq!(cfg.wrapper_style["border"], "1px solid black");
    }

    #[test]
    fn merged_without_prior_or_patch_is_default() {
        assert_eq!(WindowConfig::merged(None, None), WindowConfig::default());
    }

    #[test]
    fn merged_with_empty_patch_keeps_prior() {
        let mut prior = WindowConfig::default();
        prior.title = "kept".into();
        let merged = WindowConfig::merged(Some(&prior), Some(&WindowPatch::default()));
        assert_eq!(merged, prior);
    }

    #[test]
    fn preset_table_lookups() {
        assert_eq!(SizePreset::Lg.geometry(), Some((800, 600)));
        assert_eq!(SizePreset::Custom.geometry(), None);
        assert_eq!(SizePreset::from_geometry(400, 200), Some(SizePreset::Sm));
        assert_eq!(SizePreset::from_geometry(401, 200), None);
    }

    #[test]
    fn unknown_size_string_deserializes_as_custom() {
        let size: SizePreset = serde_json::from_str("\"xl\"").unwrap();
        assert_eq!(size, SizePreset::Custom);
    }

    #[test]
    fn serializes_option_names_in_camel_case() {
        let value = serde_json::to_value(WindowConfig::default()).unwrap();
        assert_eq!(value["handleArea"], "titlebar");
        assert_eq!(value["isCloseable"], true);
        assert_eq!(value["draggable"]["defaultPosition"]["x"], 0);
        assert_eq!(value["draggable"]["axis"], "both");
    }

    #[test]
    fn handle_selector_combines_area_and_id() {
        let cfg = WindowConfig::default();
        assert_eq!(
            cfg.handle_selector(&WindowKey::from("KEY-1")),
            ".titlebar-KEY-1"
        );
    }

    #[test]
    fn minimized_height_uses_min_height() {
        let mut cfg = WindowConfig::default();
        assert_eq!(cfg.effective_height_px(), 400);
        cfg.is_minimized = true;
        assert_eq!(cfg.effective_height_px(), 24);
    }
}
