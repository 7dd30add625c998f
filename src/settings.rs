// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Application settings and configuration constants.
//!
//! This module holds non-visual settings that stay stable across theme
//! changes. Visual styling (colors, sizes) belongs in `theme.rs`. Values
//! that users may want to tune per deployment are mirrored by
//! `config::EditorConfig`, which falls back to these defaults.

// ============================================================================
// SNAP SETTINGS
// ============================================================================
/// Whether magnet snapping starts enabled
const SNAP_ENABLED_BY_DEFAULT: bool = false;

/// Maximum distance (world meters) for a vertex or edge to attract a drag
const SNAP_THRESHOLD_METERS: f64 = 0.5;

// ============================================================================
// CAMERA SETTINGS
// ============================================================================
/// Duration of zoom-to-feature camera flights (seconds)
const FLY_DURATION_SECONDS: f64 = 1.5;

/// Height above a point feature the camera flies to (meters)
const POINT_FLY_HEIGHT_METERS: f64 = 200.0;

/// Camera distance as a multiple of the bounding sphere radius
const SHAPE_FLY_RANGE_FACTOR: f64 = 2.5;

/// Camera pitch when flying to a line or polygon (radians, negative = down)
const SHAPE_FLY_PITCH: f64 = -0.5;

// ============================================================================
// DRAWING SETTINGS
// ============================================================================
/// Minimum accumulated points before a double-click commits a shape.
///
/// Applies to both lines and polygons.
const MIN_DRAW_POINTS: usize = 2;

// ============================================================================
// ATTRIBUTE SCHEMA
// ============================================================================
/// Reserved polygon column holding the extrusion height in meters
const EXTRUSION_COLUMN: &str = "extrusion";

/// Attribute key every feature carries
const NAME_ATTRIBUTE: &str = "name";

// ============================================================================
// STORAGE
// ============================================================================
/// Default location of the JSON document store used by the CLI
const DEFAULT_STORE_PATH: &str = "terra-asset-store.json";

/// Default configuration file name looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "terra-asset.toml";

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Magnet snapping settings
pub mod snap {
    /// Whether snapping is on when the editor starts
    pub const ENABLED_BY_DEFAULT: bool = super::SNAP_ENABLED_BY_DEFAULT;

    /// Snap radius in world meters
    pub const THRESHOLD_METERS: f64 = super::SNAP_THRESHOLD_METERS;
}

/// Camera flight settings for zoom-to-feature
pub mod camera {
    pub const FLY_DURATION_SECONDS: f64 = super::FLY_DURATION_SECONDS;
    pub const POINT_FLY_HEIGHT_METERS: f64 = super::POINT_FLY_HEIGHT_METERS;
    pub const SHAPE_FLY_RANGE_FACTOR: f64 = super::SHAPE_FLY_RANGE_FACTOR;
    pub const SHAPE_FLY_PITCH: f64 = super::SHAPE_FLY_PITCH;
}

/// Drawing tool settings
pub mod drawing {
    /// Minimum points for a double-click commit of a line or polygon
    pub const MIN_POINTS: usize = super::MIN_DRAW_POINTS;
}

/// Attribute schema conventions shared by layers and features
pub mod schema {
    /// Reserved, non-deletable polygon column
    pub const EXTRUSION_COLUMN: &str = super::EXTRUSION_COLUMN;

    /// Attribute every feature carries
    pub const NAME_ATTRIBUTE: &str = super::NAME_ATTRIBUTE;
}

/// Storage and configuration file locations
pub mod storage {
    pub const DEFAULT_STORE_PATH: &str = super::DEFAULT_STORE_PATH;
    pub const DEFAULT_CONFIG_FILE: &str = super::DEFAULT_CONFIG_FILE;
}
