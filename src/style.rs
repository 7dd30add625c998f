// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Derived entity styling.
//!
//! An entity's appearance is a pure function of its layer style, its
//! feature's attributes, and whether it is hovered or selected. Both the
//! scene binding (when placing entities) and the highlight controller (when
//! hover or selection changes between re-binds) go through
//! `feature_visual`, so "restoring" an entity is just re-deriving it with
//! `Emphasis::None`. Nothing needs to be saved from the entity itself.

use crate::model::{Feature, Layer, LayerKind, LayerStyle};
use crate::scene::EntityVisual;
use crate::theme;
use peniko::Color;
use peniko::color::{Srgb, parse_color as parse_css_color};
use std::collections::BTreeSet;

/// Legend label for features missing the color column value
const MISSING_CATEGORY_LABEL: &str = "N/A";

/// Interaction emphasis applied on top of the base style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    None,
    Hover,
    Selected,
}

/// Parse a hex or CSS color string
pub fn parse_color(value: &str) -> Option<Color> {
    parse_css_color(value.trim())
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

/// Deterministic palette color for a category value
///
/// Folds UTF-16 code units as `unit + ((hash << 5) - hash)` in double
/// precision, where only the shift operand is truncated to a signed 32-bit
/// integer. The sum itself is never wrapped, so long values match the
/// colors other clients of the same data compute. Empty values are gray.
pub fn category_color(value: &str) -> Color {
    if value.is_empty() {
        return theme::neutral::GRAY;
    }
    let hash = value.encode_utf16().fold(0.0_f64, |hash, unit| {
        let shifted = f64::from(to_int32(hash).wrapping_shl(5));
        f64::from(unit) + (shifted - hash)
    });
    let palette = &theme::category::PALETTE;
    let index = (hash.abs() % palette.len() as f64) as usize;
    palette[index]
}

/// Truncate a double to a signed 32-bit integer, wrapping modulo 2^32
fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    const TWO_32: f64 = 4_294_967_296.0;
    let wrapped = value.trunc().rem_euclid(TWO_32);
    if wrapped >= TWO_32 / 2.0 {
        (wrapped - TWO_32) as i32
    } else {
        wrapped as i32
    }
}

/// Base (un-highlighted) color of a feature
pub fn base_color(layer: &Layer, feature: &Feature) -> Color {
    match layer.style.coloring.active_column() {
        Some(column) => category_value_color(&layer.style, feature.attribute(column)),
        None => parse_color(&layer.style.color).unwrap_or(theme::neutral::GRAY),
    }
}

fn category_value_color(style: &LayerStyle, value: &str) -> Color {
    style
        .coloring
        .color_overrides
        .get(value)
        .and_then(|c| parse_color(c))
        .unwrap_or_else(|| category_color(value))
}

/// Visual for a feature entity under the given emphasis
pub fn feature_visual(layer: &Layer, feature: &Feature, emphasis: Emphasis) -> EntityVisual {
    derive_visual(layer.kind, &layer.style, base_color(layer, feature), emphasis)
}

/// Combine a base color and emphasis into the final entity visual
pub fn derive_visual(kind: LayerKind, style: &LayerStyle, base: Color, emphasis: Emphasis) -> EntityVisual {
    use theme::{feature, highlight, hover, neutral, selected};

    match (kind, emphasis) {
        (LayerKind::Point, Emphasis::None) => EntityVisual {
            color: base.with_alpha(feature::FILL_ALPHA),
            outline_color: feature::OUTLINE,
            outline_width: 0.0,
            size: style.pixel_size.unwrap_or(feature::POINT_SIZE),
        },
        (LayerKind::Point, Emphasis::Hover) => EntityVisual {
            color: hover::FILL.with_alpha(hover::ALPHA),
            outline_color: hover::OUTLINE,
            outline_width: hover::POINT_OUTLINE_WIDTH,
            size: highlight::POINT_SIZE,
        },
        (LayerKind::Point, Emphasis::Selected) => EntityVisual {
            color: selected::FILL.with_alpha(selected::ALPHA),
            outline_color: selected::OUTLINE,
            outline_width: selected::POINT_OUTLINE_WIDTH,
            size: highlight::POINT_SIZE,
        },
        (LayerKind::Line, emphasis) => {
            let (color, size) = match emphasis {
                Emphasis::None => (base, style.width.unwrap_or(feature::LINE_WIDTH)),
                Emphasis::Hover => (hover::FILL, highlight::LINE_WIDTH),
                Emphasis::Selected => (selected::FILL, highlight::LINE_WIDTH),
            };
            EntityVisual {
                color,
                outline_color: color,
                outline_width: 0.0,
                size,
            }
        }
        (LayerKind::Polygon, Emphasis::None) => EntityVisual {
            color: base.with_alpha(feature::FILL_ALPHA),
            outline_color: feature::OUTLINE,
            outline_width: feature::POLYGON_OUTLINE_WIDTH,
            size: 0.0,
        },
        (LayerKind::Polygon, Emphasis::Hover) => EntityVisual {
            color: hover::FILL.with_alpha(hover::ALPHA),
            outline_color: hover::OUTLINE,
            outline_width: highlight::POLYGON_OUTLINE_WIDTH,
            size: 0.0,
        },
        (LayerKind::Polygon, Emphasis::Selected) => EntityVisual {
            color: selected::FILL.with_alpha(selected::ALPHA),
            outline_color: selected::OUTLINE,
            outline_width: highlight::POLYGON_OUTLINE_WIDTH,
            size: 0.0,
        },
        // Comment pins keep their icon; emphasis tints and scales it
        (LayerKind::Comment, emphasis) => {
            let (color, size) = match emphasis {
                Emphasis::None => (neutral::WHITE, feature::COMMENT_SCALE),
                Emphasis::Hover => (hover::FILL, feature::COMMENT_SCALE),
                Emphasis::Selected => (neutral::WHITE, highlight::COMMENT_SCALE),
            };
            EntityVisual {
                color,
                outline_color: color,
                outline_width: 0.0,
                size,
            }
        }
    }
}

/// Legend entries for a by-column layer: sorted distinct values and colors
///
/// Empty for single-color layers. Features missing the value are listed as
/// `N/A` and drawn gray.
pub fn categories<'a>(layer: &Layer, features: impl IntoIterator<Item = &'a Feature>) -> Vec<(String, Color)> {
    let Some(column) = layer.style.coloring.active_column() else {
        return Vec::new();
    };
    let values: BTreeSet<&str> = features
        .into_iter()
        .filter(|f| f.layer_id == layer.id)
        .map(|f| f.attribute(column))
        .collect();

    let mut entries: Vec<(String, Color)> = values
        .into_iter()
        .map(|value| {
            let label = if value.is_empty() { MISSING_CATEGORY_LABEL } else { value };
            (label.to_string(), category_value_color(&layer.style, value))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
