//! Partial window configuration used by `updateState` and `Realm::add`.
//!
//! Every leaf is optional. Groups merge key-wise: a patch carrying
//! `{"wrapperStyle": {"color": "red"}}` adds one style key and keeps the rest.

use serde::{Deserialize, Serialize};

use super::config::{
    DragAxis, DraggableConfig, HandleArea, Position, SizePreset, StyleMap, WindowConfig,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraggablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<DragAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl DraggablePatch {
    pub fn is_empty(&self) -> bool {
        self.axis.is_none()
            && self.default_position.is_none()
            && self.bounds.is_none()
            && self.grid.is_none()
            && self.scale.is_none()
    }

    fn apply(&self, target: &mut DraggableConfig) {
        if let Some(axis) = self.axis {
            target.axis = axis;
        }
        if let Some(position) = self.default_position {
            target.default_position = position;
        }
        if let Some(bounds) = &self.bounds {
            target.bounds = bounds.clone();
        }
        if let Some(grid) = self.grid {
            target.grid = grid;
        }
        if let Some(scale) = self.scale {
            target.scale = scale;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_area: Option<HandleArea>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizePreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_titlebar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_minimize_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_close_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_minimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_closeable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<DraggablePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titlebar_style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_style: Option<StyleMap>,
}

impl WindowPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, size: SizePreset) -> Self {
        self.size = Some(size);
        self
    }

    pub fn geometry(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn closeable(mut self, closeable: bool) -> Self {
        self.is_closeable = Some(closeable);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(hidden);
        self
    }

    pub fn handle_area(mut self, area: HandleArea) -> Self {
        self.handle_area = Some(area);
        self
    }

    pub fn draggable(mut self, draggable: DraggablePatch) -> Self {
        self.draggable = Some(draggable);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Deep-merge onto `target`. Leaves the size/geometry invariant to the
    /// reducer.
    pub(crate) fn apply(&self, target: &mut WindowConfig) {
        macro_rules! replace {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field {
                    target.$field = value.clone();
                })*
            };
        }
        replace!(
            handle_area,
            width,
            height,
            size,
            title,
            min_height,
            has_titlebar,
            has_minimize_button,
            has_close_button,
            is_hidden,
            is_minimized,
            is_closeable,
        );
        if let Some(draggable) = &self.draggable {
            draggable.apply(&mut target.draggable);
        }
        merge_styles(&mut target.wrapper_style, self.wrapper_style.as_ref());
        merge_styles(&mut target.titlebar_style, self.titlebar_style.as_ref());
        merge_styles(&mut target.content_style, self.content_style.as_ref());
    }
}

fn merge_styles(target: &mut StyleMap, patch: Option<&StyleMap>) {
    if let Some(patch) = patch {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}
