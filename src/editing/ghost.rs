// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Drag sessions and the ghost preview geometry.
//!
//! A `DragSession` lives for exactly one relocation or vertex-edit gesture.
//! It owns a copy of the feature's original world positions and the ghost:
//! the render-only candidate geometry that pointer-move samples overwrite.
//! The persisted feature is never touched here; the interaction machine
//! hands the ghost to the orchestrator on commit.

use crate::geo::{Geographic, WorldPoint};
use crate::model::{Feature, FeatureId, Layer, LayerKind};
use crate::scene::{EntityRef, EntityShape, EntitySpec, EntityVisual};
use crate::theme::{feature as feature_theme, ghost};

/// Transient state for one relocation or vertex-edit gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    feature_id: FeatureId,
    kind: LayerKind,
    /// Extrusion attribute of the feature (meters, 0 when flat)
    extrusion: f64,
    /// Persisted positions at the start of the gesture
    original: Vec<WorldPoint>,
    /// Current candidate geometry, `None` when nothing is being previewed
    ghost: Option<Vec<WorldPoint>>,
}

impl DragSession {
    /// Start a session over a feature's current geometry
    ///
    /// The ghost starts empty; call `reset_ghost` to preview the original
    /// positions before the first move.
    pub fn new(feature: &Feature, layer: &Layer) -> Self {
        Self {
            feature_id: feature.id,
            kind: layer.kind,
            extrusion: feature.extrusion(),
            original: feature.geometry.to_world(),
            ghost: None,
        }
    }

    pub fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn original(&self) -> &[WorldPoint] {
        &self.original
    }

    pub fn ghost(&self) -> Option<&[WorldPoint]> {
        self.ghost.as_deref()
    }

    /// Preview the unmodified geometry
    pub fn reset_ghost(&mut self) {
        self.ghost = Some(self.original.clone());
    }

    /// Rigidly translate the whole geometry so its reference vertex lands on
    /// `target`
    ///
    /// The reference is the first original vertex. Single-point kinds simply
    /// move to `target`.
    pub fn relocate_to(&mut self, target: WorldPoint) {
        let Some(reference) = self.original.first().copied() else {
            return;
        };
        if self.kind.is_single_point() {
            self.ghost = Some(vec![target]);
            return;
        }
        let delta = target - reference;
        self.ghost = Some(self.original.iter().map(|p| *p + delta).collect());
    }

    /// Replace exactly one vertex of the original geometry with `target`
    ///
    /// Returns `false` when `index` is out of range; the ghost is left as is.
    pub fn move_vertex(&mut self, index: usize, target: WorldPoint) -> bool {
        if index >= self.original.len() {
            return false;
        }
        let mut positions = self.original.clone();
        positions[index] = target;
        self.ghost = Some(positions);
        true
    }

    /// Take the ghost for persisting
    ///
    /// The committed geometry becomes the session's new original, so a
    /// vertex-edit session can keep going. A second call without an
    /// intervening move returns `None`.
    pub fn take_commit(&mut self) -> Option<Vec<WorldPoint>> {
        let committed = self.ghost.take()?;
        self.original = committed.clone();
        Some(committed)
    }

    /// Shape of the ghost entity, if a ghost is being previewed
    pub fn ghost_shape(&self) -> Option<EntityShape> {
        let positions = self.ghost.as_ref()?;
        let first = *positions.first()?;
        let shape = match self.kind {
            LayerKind::Point | LayerKind::Comment => EntityShape::Point(first),
            LayerKind::Line => EntityShape::Polyline(positions.clone()),
            LayerKind::Polygon => EntityShape::Polygon {
                positions: positions.clone(),
                extruded_height: self.extruded_top(first),
            },
        };
        Some(shape)
    }

    /// Full ghost entity description, if a ghost is being previewed
    pub fn ghost_entity(&self) -> Option<EntitySpec> {
        Some(EntitySpec {
            id: EntityRef::ghost(),
            shape: self.ghost_shape()?,
            visual: ghost_visual(self.kind),
            show: true,
        })
    }

    /// Extruded top follows the ghost's first vertex height
    fn extruded_top(&self, first: WorldPoint) -> Option<f64> {
        (self.extrusion > 0.0).then(|| Geographic::from_world(first).height + self.extrusion)
    }
}

/// Ghost preview visual for a layer kind
fn ghost_visual(kind: LayerKind) -> EntityVisual {
    match kind {
        LayerKind::Point => EntityVisual {
            color: ghost::FILL.with_alpha(ghost::ALPHA),
            outline_color: ghost::OUTLINE,
            outline_width: ghost::POINT_OUTLINE_WIDTH,
            size: feature_theme::POINT_SIZE,
        },
        LayerKind::Comment => EntityVisual {
            color: ghost::COMMENT_FILL,
            outline_color: ghost::OUTLINE,
            outline_width: ghost::POINT_OUTLINE_WIDTH,
            size: feature_theme::POINT_SIZE,
        },
        LayerKind::Line => EntityVisual {
            color: ghost::FILL.with_alpha(ghost::ALPHA),
            outline_color: ghost::FILL,
            outline_width: 0.0,
            size: ghost::LINE_WIDTH,
        },
        LayerKind::Polygon => EntityVisual {
            color: ghost::FILL.with_alpha(ghost::POLYGON_ALPHA),
            outline_color: ghost::OUTLINE,
            outline_width: ghost::POLYGON_OUTLINE_WIDTH,
            size: 0.0,
        },
    }
}
