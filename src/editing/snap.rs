// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Magnet snapping to nearby vertices and edges.

use crate::geo::{WorldPoint, closest_point_on_segment, distance};
use crate::model::{FeatureId, LayerKind, Workspace};

/// Find the closest vertex or edge point within `threshold` meters
///
/// Every feature of a visible layer is considered except `exclude` (the
/// feature being dragged). Single-point features offer their one vertex;
/// lines and polygons offer every vertex and then the closest point on
/// every edge, with polygon edges wrapping back to the first vertex. Only
/// strictly closer candidates replace the running best, so ties keep the
/// first one found in feature order.
pub fn find_snap_target(
    candidate: WorldPoint,
    exclude: Option<FeatureId>,
    workspace: &Workspace,
    threshold: f64,
) -> Option<WorldPoint> {
    let mut best: Option<WorldPoint> = None;
    let mut best_distance = threshold;

    let mut consider = |point: WorldPoint| {
        let d = distance(candidate, point);
        if d < best_distance {
            best_distance = d;
            best = Some(point);
        }
    };

    for (feature, layer) in workspace.visible_features() {
        if Some(feature.id) == exclude {
            continue;
        }
        let positions = feature.geometry.to_world();

        if layer.kind.is_single_point() {
            if let Some(&vertex) = positions.first() {
                consider(vertex);
            }
            continue;
        }

        for &vertex in &positions {
            consider(vertex);
        }

        let wraps = layer.kind == LayerKind::Polygon && positions.len() > 2;
        let edge_count = if wraps {
            positions.len()
        } else {
            positions.len().saturating_sub(1)
        };
        for i in 0..edge_count {
            let a = positions[i];
            let b = positions[(i + 1) % positions.len()];
            if a == b {
                continue;
            }
            consider(closest_point_on_segment(candidate, a, b));
        }
    }

    best
}
