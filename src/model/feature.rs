// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Features: one persisted geometry plus its string attributes.

use super::ids::{FeatureId, LayerId};
use super::layer::{Layer, LayerKind};
use crate::geo::{Geographic, WorldPoint};
use crate::settings::schema::{EXTRUSION_COLUMN, NAME_ATTRIBUTE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute bag keyed by column name
pub type Attributes = BTreeMap<String, String>;

/// Stored geometry
///
/// Point and comment features store a single record; lines and polygons
/// store an ordered list (polygons are implicitly closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Point(Geographic),
    Path(Vec<Geographic>),
}

impl Geometry {
    /// Build the stored shape for `kind` from world positions
    ///
    /// Single-point kinds keep the first position. Returns `None` when
    /// `points` is empty.
    pub fn from_world(kind: LayerKind, points: &[WorldPoint]) -> Option<Self> {
        let first = points.first()?;
        if kind.is_single_point() {
            Some(Geometry::Point(Geographic::from_world(*first)))
        } else {
            Some(Geometry::Path(
                points.iter().copied().map(Geographic::from_world).collect(),
            ))
        }
    }

    /// Build the stored shape for `kind` from geographic positions
    pub fn from_geographic(kind: LayerKind, points: Vec<Geographic>) -> Option<Self> {
        let first = *points.first()?;
        if kind.is_single_point() {
            Some(Geometry::Point(first))
        } else {
            Some(Geometry::Path(points))
        }
    }

    /// Positions in storage order
    pub fn positions(&self) -> &[Geographic] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::Path(points) => points,
        }
    }

    /// Positions converted to world space
    pub fn to_world(&self) -> Vec<WorldPoint> {
        self.positions().iter().map(Geographic::to_world).collect()
    }

    pub fn len(&self) -> usize {
        self.positions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }
}

/// A persisted feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub layer_id: LayerId,
    pub geometry: Geometry,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Feature {
    /// Attribute value, defaulting missing keys to the empty string
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    /// Display name (falls back to `Feature #<id>`)
    pub fn display_name(&self) -> String {
        match self.attribute(NAME_ATTRIBUTE) {
            "" => format!("Feature #{}", self.id),
            name => name.to_string(),
        }
    }

    /// Extrusion height in meters (0 when missing or unparseable)
    pub fn extrusion(&self) -> f64 {
        self.attribute(EXTRUSION_COLUMN)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Values for each of the layer's columns, in schema order
    ///
    /// Keys may lag schema changes; missing ones read as their column
    /// default.
    pub fn row(&self, layer: &Layer) -> Vec<String> {
        layer
            .columns
            .iter()
            .map(|col| match self.attributes.get(&col.name) {
                Some(value) => value.clone(),
                None => col.default_value().to_string(),
            })
            .collect()
    }

    pub fn apply(&mut self, patch: &FeaturePatch) {
        if let Some(geometry) = &patch.geometry {
            self.geometry = geometry.clone();
        }
        if let Some(attributes) = &patch.attributes {
            self.attributes = attributes.clone();
        }
    }
}

/// A feature that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeature {
    pub layer_id: LayerId,
    pub geometry: Geometry,
    pub attributes: Attributes,
}

impl NewFeature {
    /// A freshly drawn feature: every column initialized, named after its kind
    pub fn drawn(layer: &Layer, geometry: Geometry) -> Self {
        let mut attributes: Attributes = layer
            .columns
            .iter()
            .map(|col| (col.name.clone(), col.default_value().to_string()))
            .collect();
        attributes.insert(NAME_ATTRIBUTE.to_string(), format!("New {}", layer.kind));
        Self {
            layer_id: layer.id,
            geometry,
            attributes,
        }
    }

    pub fn into_feature(self, id: FeatureId) -> Feature {
        Feature {
            id,
            layer_id: self.layer_id,
            geometry: self.geometry,
            attributes: self.attributes,
        }
    }
}

/// Partial feature update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layer::{Column, NewLayer};

    fn polygon_layer() -> Layer {
        let mut layer = NewLayer::with_defaults("Parcels", LayerKind::Polygon).into_layer(LayerId(1));
        layer.columns.push(Column::text("owner"));
        layer
    }

    #[test]
    fn geometry_deserializes_point_and_path() {
        let point: Geometry =
            serde_json::from_str(r#"{"longitude":1.0,"latitude":2.0,"height":3.0}"#).unwrap();
        assert_eq!(point, Geometry::Point(Geographic::new(1.0, 2.0, 3.0)));

        let path: Geometry = serde_json::from_str(
            r#"[{"longitude":1.0,"latitude":2.0},{"longitude":3.0,"latitude":4.0,"height":5.0}]"#,
        )
        .unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.positions()[0].height, 0.0);
    }

    #[test]
    fn single_point_kinds_keep_first_position() {
        let points = [
            Geographic::new(10.0, 20.0, 0.0).to_world(),
            Geographic::new(11.0, 21.0, 0.0).to_world(),
        ];
        let geometry = Geometry::from_world(LayerKind::Comment, &points).unwrap();
        assert!(matches!(geometry, Geometry::Point(_)));
        assert!(Geometry::from_world(LayerKind::Line, &[]).is_none());
    }

    #[test]
    fn missing_attributes_read_as_defaults() {
        let layer = polygon_layer();
        let feature = Feature {
            id: FeatureId(9),
            layer_id: layer.id,
            geometry: Geometry::Path(vec![]),
            attributes: Attributes::from([("owner".to_string(), "city".to_string())]),
        };
        assert_eq!(feature.attribute("missing"), "");
        assert_eq!(feature.row(&layer), vec!["0".to_string(), "city".to_string()]);
        assert_eq!(feature.display_name(), "Feature #9");
        assert_eq!(feature.extrusion(), 0.0);
    }

    #[test]
    fn drawn_feature_initializes_every_column() {
        let layer = polygon_layer();
        let new = NewFeature::drawn(&layer, Geometry::Path(vec![]));
        assert_eq!(new.attributes["extrusion"], "0");
        assert_eq!(new.attributes["owner"], "");
        assert_eq!(new.attributes["name"], "New POLYGON");
    }
}
