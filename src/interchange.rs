// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! FeatureCollection import and export.
//!
//! The interchange document is the usual
//! `{ "type": "FeatureCollection", "features": [...] }` shape with Point,
//! LineString, and Polygon geometries. Multi* geometries are flattened to
//! their first member on import.

use crate::geo::{Geographic, close_ring};
use crate::model::{Attributes, Column, Feature, Geometry, Layer, LayerId, LayerKind, NewFeature, NewLayer};
use crate::settings::schema::{EXTRUSION_COLUMN, NAME_ATTRIBUTE};
use chrono::{DateTime, Local};
use serde_json::{Map, Value, json};

/// Reasons an import is rejected as a whole
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("the file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid format: the file has no features array")]
    MissingFeatures,
    #[error("no feature has a geometry")]
    NoGeometry,
    #[error("unsupported geometry type \"{0}\"")]
    UnsupportedGeometry(String),
    #[error("no feature has valid coordinates")]
    NoValidCoordinates,
}

/// A parsed collection, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCollection {
    pub layer: NewLayer,
    pub features: Vec<(Geometry, Attributes)>,
}

impl ImportedCollection {
    /// Features addressed to the layer once it has an id
    pub fn new_features(&self, layer_id: LayerId) -> Vec<NewFeature> {
        self.features
            .iter()
            .map(|(geometry, attributes)| NewFeature {
                layer_id,
                geometry: geometry.clone(),
                attributes: attributes.clone(),
            })
            .collect()
    }
}

// ============================================================================
// EXPORT
// ============================================================================

/// Serialize a layer's features as a FeatureCollection
///
/// Polygon rings are closed. Comment pins export as points.
pub fn export_layer<'a>(layer: &Layer, features: impl IntoIterator<Item = &'a Feature>) -> Value {
    let features: Vec<Value> = features
        .into_iter()
        .filter(|f| f.layer_id == layer.id)
        .map(|f| {
            json!({
                "type": "Feature",
                "geometry": export_geometry(layer.kind, &f.geometry),
                "properties": f.attributes,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "name": layer.name,
        "features": features,
    })
}

fn export_geometry(kind: LayerKind, geometry: &Geometry) -> Value {
    let positions = geometry.positions();
    match kind {
        LayerKind::Point | LayerKind::Comment => json!({
            "type": "Point",
            "coordinates": positions.first().map(coordinate),
        }),
        LayerKind::Line => json!({
            "type": "LineString",
            "coordinates": positions.iter().map(coordinate).collect::<Vec<_>>(),
        }),
        LayerKind::Polygon => json!({
            "type": "Polygon",
            "coordinates": [close_ring(positions).iter().map(coordinate).collect::<Vec<_>>()],
        }),
    }
}

fn coordinate(p: &Geographic) -> Value {
    json!([p.longitude, p.latitude, p.height])
}

// ============================================================================
// IMPORT
// ============================================================================

/// Layer name for an imported file: `<stem> (Import HHMMSS)`
pub fn import_layer_name(file_name: &str, now: DateTime<Local>) -> String {
    let lower = file_name.to_ascii_lowercase();
    let stem = [".geojson", ".json"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file_name[..file_name.len() - ext.len()])
        .unwrap_or(file_name);
    format!("{} (Import {})", stem, now.format("%H%M%S"))
}

/// Parse a FeatureCollection into a new layer and its features
///
/// The layer kind comes from the first feature that has a geometry. The
/// schema is the union of all property keys plus `name` (and `extrusion`
/// for polygons). Each feature keeps its own coordinates, reshaped to the
/// layer kind; features whose coordinates cannot be read are skipped.
pub fn parse_feature_collection(text: &str, layer_name: &str) -> Result<ImportedCollection, ImportError> {
    let document: Value = serde_json::from_str(text)?;
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingFeatures)?;

    let first_type = features
        .iter()
        .find_map(|f| f.get("geometry").filter(|g| !g.is_null()))
        .ok_or(ImportError::NoGeometry)?
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let kind = kind_for_type(first_type).ok_or_else(|| ImportError::UnsupportedGeometry(first_type.to_string()))?;

    let mut layer = NewLayer::with_defaults(layer_name, kind);
    layer.columns = schema(features, kind);

    let imported: Vec<(Geometry, Attributes)> = features
        .iter()
        .filter_map(|feature| {
            let positions = feature.get("geometry").and_then(parse_positions)?;
            let geometry = Geometry::from_geographic(kind, positions)?;
            Some((geometry, attributes(feature, kind)))
        })
        .collect();

    if imported.is_empty() {
        return Err(ImportError::NoValidCoordinates);
    }
    tracing::info!(
        "Parsed {} of {} features as {} layer \"{}\"",
        imported.len(),
        features.len(),
        kind,
        layer_name
    );
    Ok(ImportedCollection {
        layer,
        features: imported,
    })
}

fn kind_for_type(geometry_type: &str) -> Option<LayerKind> {
    match geometry_type {
        "Point" | "MultiPoint" => Some(LayerKind::Point),
        "LineString" | "MultiLineString" => Some(LayerKind::Line),
        "Polygon" | "MultiPolygon" => Some(LayerKind::Polygon),
        _ => None,
    }
}

/// Union of property keys in first-seen order, then `name` and `extrusion`
fn schema(features: &[Value], kind: LayerKind) -> Vec<Column> {
    let mut names: Vec<String> = Vec::new();
    for props in features.iter().filter_map(|f| f.get("properties").and_then(Value::as_object)) {
        for key in props.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    if !names.iter().any(|n| n == NAME_ATTRIBUTE) {
        names.push(NAME_ATTRIBUTE.to_string());
    }
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| {
            if kind == LayerKind::Polygon && name == EXTRUSION_COLUMN {
                Column::extrusion()
            } else {
                Column::text(name)
            }
        })
        .collect();
    if kind == LayerKind::Polygon && !columns.iter().any(|c| c.name == EXTRUSION_COLUMN) {
        columns.push(Column::extrusion());
    }
    columns
}

fn attributes(feature: &Value, kind: LayerKind) -> Attributes {
    let empty = Map::new();
    let props = feature.get("properties").and_then(Value::as_object).unwrap_or(&empty);
    let mut attributes: Attributes = props.iter().map(|(k, v)| (k.clone(), stringify(v))).collect();

    let has_name = attributes.get(NAME_ATTRIBUTE).is_some_and(|n| !n.is_empty());
    if !has_name {
        let name = match feature.get("id").filter(|id| !id.is_null()) {
            Some(id) => stringify(id),
            None => format!("Feature {}", kind),
        };
        attributes.insert(NAME_ATTRIBUTE.to_string(), name);
    }
    if kind == LayerKind::Polygon && attributes.get(EXTRUSION_COLUMN).is_none_or(|e| e.is_empty()) {
        attributes.insert(EXTRUSION_COLUMN.to_string(), "0".to_string());
    }
    attributes
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Positions of one geometry, by its own type
///
/// Polygons keep their outer ring, without the duplicated closing
/// coordinate. `None` for unsupported types or unreadable coordinates.
fn parse_positions(geometry: &Value) -> Option<Vec<Geographic>> {
    let coords = geometry.get("coordinates")?;
    let positions = match geometry.get("type")?.as_str()? {
        "Point" => vec![position(coords)?],
        "MultiPoint" => vec![position(coords.get(0)?)?],
        "LineString" => positions(coords)?,
        "MultiLineString" => positions(coords.get(0)?)?,
        "Polygon" => open_ring(positions(coords.get(0)?)?),
        "MultiPolygon" => open_ring(positions(coords.get(0)?.get(0)?)?),
        _ => return None,
    };
    (!positions.is_empty()).then_some(positions)
}

fn positions(list: &Value) -> Option<Vec<Geographic>> {
    list.as_array()?.iter().map(position).collect()
}

fn position(value: &Value) -> Option<Geographic> {
    let values = value.as_array()?;
    let longitude = number(values.first()?)?;
    let latitude = number(values.get(1)?)?;
    let height = match values.get(2) {
        Some(Value::Null) | None => 0.0,
        Some(h) => number(h)?,
    };
    Some(Geographic::new(longitude, latitude, height))
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn open_ring(mut ring: Vec<Geographic>) -> Vec<Geographic> {
    if ring.len() > 3 && crate::geo::is_ring_closed(&ring) {
        ring.pop();
    }
    ring
}
