// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Layers: named collections of same-kind features sharing a style and an
//! attribute schema.
//!
//! The schema (`columns`) is edited by the user at runtime; features are
//! not rewritten when it changes, so readers default missing attribute keys
//! (see `Feature::attribute`). Polygon layers always keep the reserved
//! extrusion column.

use super::ids::LayerId;
use crate::settings::schema::EXTRUSION_COLUMN;
use crate::theme::brand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// LAYER KIND
// ============================================================================

/// Geometry kind shared by every feature of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerKind {
    Point,
    Line,
    Polygon,
    Comment,
}

impl LayerKind {
    /// Point and comment features carry exactly one position
    pub fn is_single_point(self) -> bool {
        matches!(self, LayerKind::Point | LayerKind::Comment)
    }

    /// Upper-case label used in default feature names
    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Point => "POINT",
            LayerKind::Line => "LINE",
            LayerKind::Polygon => "POLYGON",
            LayerKind::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Attribute column value type (informational, values are always strings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
}

/// One entry of a layer's ordered attribute schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Text,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Number,
        }
    }

    /// The reserved polygon extrusion column
    pub fn extrusion() -> Self {
        Self::number(EXTRUSION_COLUMN)
    }

    /// Value a new feature gets for this column
    pub fn default_value(&self) -> &'static str {
        if self.name == EXTRUSION_COLUMN { "0" } else { "" }
    }
}

// ============================================================================
// STYLE
// ============================================================================

/// How features of a layer pick their base color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
    /// Every feature uses the layer color
    #[default]
    Single,
    /// Color is chosen from the value of one attribute column
    ByColumn,
}

/// Categorical coloring spec
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coloring {
    #[serde(default)]
    pub mode: ColorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Category value → color string overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub color_overrides: BTreeMap<String, String>,
}

impl Coloring {
    /// Column driving the color, when by-column coloring is active
    pub fn active_column(&self) -> Option<&str> {
        match self.mode {
            ColorMode::ByColumn => self.column.as_deref(),
            ColorMode::Single => None,
        }
    }
}

/// Persisted layer style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    /// Base color (hex or CSS color string)
    pub color: String,
    /// Line width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Point size in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<f64>,
    /// Default extrusion height for polygons (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extruded_height: Option<f64>,
    #[serde(default)]
    pub coloring: Coloring,
}

impl LayerStyle {
    /// Style a freshly created layer of `kind` starts with
    pub fn default_for(kind: LayerKind) -> Self {
        let (color, width, pixel_size, extruded_height) = match kind {
            LayerKind::Point => (brand::ORANGE_HEX, None, Some(15.0), None),
            LayerKind::Line => (brand::CYAN_HEX, Some(5.0), None, None),
            LayerKind::Polygon => (brand::BLUE_HEX, None, None, Some(0.0)),
            LayerKind::Comment => (brand::COMMENT_HEX, None, None, None),
        };
        Self {
            color: color.to_string(),
            width,
            pixel_size,
            extruded_height,
            coloring: Coloring::default(),
        }
    }
}

// ============================================================================
// LAYER
// ============================================================================

/// A persisted layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub visible: bool,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Layer {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Whether a column may be removed by the user
    pub fn is_reserved_column(&self, name: &str) -> bool {
        name == EXTRUSION_COLUMN
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: &LayerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(columns) = &patch.columns {
            self.columns = columns.clone();
        }
    }
}

/// A layer that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLayer {
    pub name: String,
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub visible: bool,
    pub columns: Vec<Column>,
}

impl NewLayer {
    /// A visible layer with the kind's default style and schema
    pub fn with_defaults(name: impl Into<String>, kind: LayerKind) -> Self {
        let columns = match kind {
            LayerKind::Polygon => vec![Column::extrusion()],
            _ => Vec::new(),
        };
        Self {
            name: name.into(),
            kind,
            style: LayerStyle::default_for(kind),
            visible: true,
            columns,
        }
    }

    pub fn into_layer(self, id: LayerId) -> Layer {
        Layer {
            id,
            name: self.name,
            kind: self.kind,
            style: self.style,
            visible: self.visible,
            columns: self.columns,
        }
    }
}

/// Partial layer update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<LayerStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_layers_start_with_extrusion_column() {
        let layer = NewLayer::with_defaults("Buildings", LayerKind::Polygon).into_layer(LayerId(1));
        assert!(layer.has_column(EXTRUSION_COLUMN));
        assert_eq!(layer.style.extruded_height, Some(0.0));

        let line = NewLayer::with_defaults("Roads", LayerKind::Line);
        assert!(line.columns.is_empty());
        assert_eq!(line.style.width, Some(5.0));
    }

    #[test]
    fn kind_point_counts() {
        assert!(LayerKind::Comment.is_single_point());
        assert!(!LayerKind::Line.is_single_point());
        assert!(LayerKind::Point.is_single_point());
    }

    #[test]
    fn style_serializes_with_camel_case_keys() {
        let mut style = LayerStyle::default_for(LayerKind::Point);
        style.coloring = Coloring {
            mode: ColorMode::ByColumn,
            column: Some("status".into()),
            color_overrides: BTreeMap::from([("ok".to_string(), "#00FF00".to_string())]),
        };
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["pixelSize"], 15.0);
        assert_eq!(json["coloring"]["mode"], "byColumn");
        assert_eq!(json["coloring"]["colorOverrides"]["ok"], "#00FF00");
    }

    #[test]
    fn missing_coloring_defaults_to_single() {
        let style: LayerStyle = serde_json::from_str(r##"{"color":"#fff"}"##).unwrap();
        assert_eq!(style.coloring.mode, ColorMode::Single);
        assert_eq!(style.coloring.active_column(), None);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut layer = NewLayer::with_defaults("Trees", LayerKind::Point).into_layer(LayerId(3));
        layer.apply(&LayerPatch {
            visible: Some(false),
            ..Default::default()
        });
        assert!(!layer.visible);
        assert_eq!(layer.name, "Trees");
    }
}
