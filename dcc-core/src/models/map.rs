//! Campaign map types.

use super::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default grid line color for new maps.
pub const DEFAULT_GRID_COLOR: &str = "#cccccc";

/// A battle or region map with its drawing layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Map {
    pub id: String,
    pub name: String,
    pub grid_width: i64,
    pub grid_height: i64,
    pub grid_size: i64,
    pub grid_color: String,
    pub show_grid: bool,
    pub is_active: bool,
    /// Drawing layer, stored exactly as the canvas exported it.
    pub strokes: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub icons: Vec<MapIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<MapBackground>,
}

impl Map {
    /// Create an active, empty map with the default grid settings.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        grid_width: i64,
        grid_height: i64,
        grid_size: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grid_width,
            grid_height,
            grid_size,
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            show_grid: true,
            is_active: true,
            strokes: empty_strokes(),
            icons: Vec::new(),
            background: None,
        }
    }

    /// Wipe the drawing layer and all placed icons, keeping grid settings.
    pub fn clear(&mut self) {
        self.strokes = empty_strokes();
        self.icons.clear();
    }
}

fn empty_strokes() -> Value {
    Value::Object(Default::default())
}

/// An icon placed on a map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapIcon {
    pub id: String,
    pub filename: String,
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub is_active: bool,
}

/// Background image placement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapBackground {
    pub filename: String,
    pub opacity: f64,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}
