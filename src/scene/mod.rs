// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene engine capability surface.
//!
//! The editing core never talks to a concrete renderer. Anything that can
//! pick entities and world positions under a screen point, place and remove
//! entities, patch an entity's visuals, and fly the camera satisfies
//! `Scene`. `HeadlessScene` is the in-memory implementation used by the CLI
//! and the tests; `binding` turns the workspace plus interaction state into
//! the declarative entity set.

pub mod binding;
pub mod headless;

use crate::geo::WorldPoint;
use crate::model::FeatureId;
use peniko::Color;
use std::fmt;

pub use binding::SceneBinding;
pub use headless::HeadlessScene;

/// A position on the render surface, in pixels
pub type ScreenPoint = kurbo::Point;

/// Prefix of vertex handle pseudo-entity ids (`vertex_handle_<index>`)
const VERTEX_HANDLE_PREFIX: &str = "vertex_handle_";

/// Id of the ghost preview entity
const GHOST_ID: &str = "ghost_preview";

/// Prefix of in-progress drawing markers
const DRAW_PREVIEW_PREFIX: &str = "draw_preview_";

// ============================================================================
// ENTITY REFERENCES
// ============================================================================

/// Identifier of an entity placed in the scene
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef(String);

/// What a picked entity stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    /// A persisted feature, by id
    Feature(FeatureId),
    /// A vertex handle of the feature being edited, by vertex index
    VertexHandle(usize),
    /// Anything else (ghost, draw preview, terrain tiles, malformed ids)
    Other,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn for_feature(id: FeatureId) -> Self {
        Self(id.to_string())
    }

    pub fn vertex_handle(index: usize) -> Self {
        Self(format!("{VERTEX_HANDLE_PREFIX}{index}"))
    }

    pub fn ghost() -> Self {
        Self(GHOST_ID.to_string())
    }

    pub fn draw_preview(part: &str) -> Self {
        Self(format!("{DRAW_PREVIEW_PREFIX}{part}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the id into what it refers to
    ///
    /// A `vertex_handle_` id whose suffix is not an index classifies as
    /// `Other`, so malformed handles are ignored by the click logic.
    pub fn classify(&self) -> EntityClass {
        if let Some(rest) = self.0.strip_prefix(VERTEX_HANDLE_PREFIX) {
            return rest
                .parse()
                .map(EntityClass::VertexHandle)
                .unwrap_or(EntityClass::Other);
        }
        self.0
            .parse()
            .map(EntityClass::Feature)
            .unwrap_or(EntityClass::Other)
    }

    /// Feature id, when this entity is a feature
    pub fn feature_id(&self) -> Option<FeatureId> {
        match self.classify() {
            EntityClass::Feature(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ENTITY DESCRIPTIONS
// ============================================================================

/// Per-entity visual properties the highlight controller may override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityVisual {
    pub color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
    /// Point pixel size, line width, or billboard scale depending on shape
    pub size: f64,
}

/// Geometry of a placed entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityShape {
    Point(WorldPoint),
    /// Comment pin
    Billboard(WorldPoint),
    Polyline(Vec<WorldPoint>),
    Polygon {
        positions: Vec<WorldPoint>,
        /// Absolute top height in meters when extruded
        extruded_height: Option<f64>,
    },
}

/// Everything needed to place an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub id: EntityRef,
    pub shape: EntityShape,
    pub visual: EntityVisual,
    /// Hidden entities stay placed but are not drawn or pickable
    pub show: bool,
}

/// Where a camera flight ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTarget {
    /// Fly to a world position
    Position(WorldPoint),
    /// Frame a bounding sphere from `range` meters at `pitch` radians
    Sphere {
        center: WorldPoint,
        radius: f64,
        pitch: f64,
        range: f64,
    },
}

/// Errors reported by a scene implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("entity '{0}' is not in the scene")]
    EntityNotFound(EntityRef),
    #[error("entity '{0}' already exists")]
    DuplicateEntity(EntityRef),
}

// ============================================================================
// SCENE TRAIT
// ============================================================================

/// Capabilities the editing core needs from a 3D (or 2D) map engine
pub trait Scene {
    /// Entity under a screen point
    fn pick_entity(&self, at: ScreenPoint) -> Option<EntityRef>;

    /// World position of the surface or mesh under a screen point
    fn pick_position(&self, at: ScreenPoint) -> Option<WorldPoint>;

    /// Ray-cast against bare terrain, used when no mesh is under the cursor
    fn pick_terrain(&self, at: ScreenPoint) -> Option<WorldPoint>;

    fn place_entity(&mut self, spec: EntitySpec) -> Result<EntityRef, SceneError>;

    fn remove_entity(&mut self, entity: &EntityRef) -> Result<(), SceneError>;

    fn set_entity_visual(&mut self, entity: &EntityRef, visual: EntityVisual) -> Result<(), SceneError>;

    /// Replace an entity's geometry without re-placing it
    fn set_entity_shape(&mut self, entity: &EntityRef, shape: EntityShape) -> Result<(), SceneError>;

    fn fly_camera_to(&mut self, target: CameraTarget, duration_seconds: f64);

    /// Resolve a screen point to a world position
    ///
    /// Surface/mesh picking first, then a terrain ray-cast. `None` means the
    /// cursor is over empty sky.
    fn project(&self, at: ScreenPoint) -> Option<WorldPoint> {
        self.pick_position(at).or_else(|| self.pick_terrain(at))
    }
}
