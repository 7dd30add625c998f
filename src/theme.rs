// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Theme colors and constants
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use peniko::Color;

// ============================================================================
// BRAND COLORS -- Used for default layer styles
// ============================================================================
const BRAND_BLUE: Color = Color::from_rgb8(0x03, 0x69, 0xa9);

// ============================================================================
// NEUTRALS
// ============================================================================
const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);
const BLACK: Color = Color::from_rgb8(0x00, 0x00, 0x00);
const GRAY: Color = Color::from_rgb8(0x80, 0x80, 0x80);

// ============================================================================
// HIGHLIGHTS -- Hover and selection overrides
// ============================================================================
const HOVER_FILL: Color = Color::from_rgb8(0x00, 0xff, 0xff);
const HOVER_OUTLINE: Color = WHITE;
const HOVER_ALPHA: f32 = 0.7;

const SELECTED_FILL: Color = WHITE;
const SELECTED_OUTLINE: Color = BLACK;
const SELECTED_ALPHA: f32 = 0.9;

// ============================================================================
// FEATURE DEFAULTS
// ============================================================================
const FEATURE_FILL_ALPHA: f32 = 0.6;
const FEATURE_OUTLINE: Color = WHITE;
const POINT_DEFAULT_SIZE: f64 = 10.0;
const LINE_DEFAULT_WIDTH: f64 = 5.0;
const POLYGON_OUTLINE_WIDTH: f64 = 1.0;

const HIGHLIGHT_POINT_SIZE: f64 = 20.0;
const HIGHLIGHT_LINE_WIDTH: f64 = 8.0;
const HIGHLIGHT_POLYGON_OUTLINE_WIDTH: f64 = 3.0;
const HOVER_POINT_OUTLINE_WIDTH: f64 = 2.0;
const SELECTED_POINT_OUTLINE_WIDTH: f64 = 4.0;

const COMMENT_SCALE: f64 = 1.0;
const COMMENT_SELECTED_SCALE: f64 = 1.3;

// ============================================================================
// GHOST PREVIEW AND EDIT HANDLES
// ============================================================================
const GHOST_FILL: Color = HOVER_FILL;
const GHOST_ALPHA: f32 = 0.8;
const GHOST_POLYGON_ALPHA: f32 = 0.4;
const GHOST_COMMENT_FILL: Color = Color::from_rgb8(0xff, 0x00, 0x00);
const GHOST_LINE_WIDTH: f64 = 6.0;

const VERTEX_HANDLE_FILL: Color = WHITE;
const VERTEX_HANDLE_ARMED_FILL: Color = Color::from_rgb8(0xff, 0x00, 0x00);
const VERTEX_HANDLE_OUTLINE: Color = BLACK;
const VERTEX_HANDLE_SIZE: f64 = 10.0;
const VERTEX_HANDLE_ARMED_SIZE: f64 = 15.0;

const DRAW_PREVIEW: Color = Color::from_rgb8(0xff, 0xff, 0x00);
const DRAW_PREVIEW_LINE_WIDTH: f64 = 2.0;
const DRAW_PREVIEW_POINT_SIZE: f64 = 8.0;

// ============================================================================
// CATEGORY PALETTE -- Colors assigned to column values by hash
// ============================================================================
const CATEGORY_PALETTE: [Color; 12] = [
    Color::from_rgb8(0xe6, 0x19, 0x4b),
    Color::from_rgb8(0x3c, 0xb4, 0x4b),
    Color::from_rgb8(0xff, 0xe1, 0x19),
    Color::from_rgb8(0x43, 0x63, 0xd8),
    Color::from_rgb8(0xf5, 0x82, 0x31),
    Color::from_rgb8(0x91, 0x1e, 0xb4),
    Color::from_rgb8(0x42, 0xd4, 0xf4),
    Color::from_rgb8(0xf0, 0x32, 0xe6),
    Color::from_rgb8(0xbf, 0xef, 0x45),
    Color::from_rgb8(0xfa, 0xbe, 0xbe),
    Color::from_rgb8(0x46, 0x99, 0x90),
    Color::from_rgb8(0xdc, 0xbe, 0xff),
];

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Brand colors, also used as layer style defaults
pub mod brand {
    use super::Color;
    pub const BLUE: Color = super::BRAND_BLUE;

    /// Hex strings stored in new layer styles
    pub const BLUE_HEX: &str = "#0369A9";
    pub const ORANGE_HEX: &str = "#EA5906";
    pub const CYAN_HEX: &str = "#06B6D4";
    pub const COMMENT_HEX: &str = "#FF0000";
}

/// Neutral colors
pub mod neutral {
    use super::Color;
    pub const WHITE: Color = super::WHITE;
    pub const BLACK: Color = super::BLACK;
    /// Fallback for empty category values and unparseable colors
    pub const GRAY: Color = super::GRAY;
}

/// Hover highlight (accent color, partial opacity, light outline)
pub mod hover {
    use super::Color;
    pub const FILL: Color = super::HOVER_FILL;
    pub const OUTLINE: Color = super::HOVER_OUTLINE;
    pub const ALPHA: f32 = super::HOVER_ALPHA;
    pub const POINT_OUTLINE_WIDTH: f64 = super::HOVER_POINT_OUTLINE_WIDTH;
}

/// Selection highlight (high contrast, higher opacity, thicker outline)
pub mod selected {
    use super::Color;
    pub const FILL: Color = super::SELECTED_FILL;
    pub const OUTLINE: Color = super::SELECTED_OUTLINE;
    pub const ALPHA: f32 = super::SELECTED_ALPHA;
    pub const POINT_OUTLINE_WIDTH: f64 = super::SELECTED_POINT_OUTLINE_WIDTH;
}

/// Un-highlighted feature appearance
pub mod feature {
    use super::Color;
    pub const FILL_ALPHA: f32 = super::FEATURE_FILL_ALPHA;
    pub const OUTLINE: Color = super::FEATURE_OUTLINE;
    pub const POINT_SIZE: f64 = super::POINT_DEFAULT_SIZE;
    pub const LINE_WIDTH: f64 = super::LINE_DEFAULT_WIDTH;
    pub const POLYGON_OUTLINE_WIDTH: f64 = super::POLYGON_OUTLINE_WIDTH;
    pub const COMMENT_SCALE: f64 = super::COMMENT_SCALE;
}

/// Sizes shared by hover and selection highlights
pub mod highlight {
    pub const POINT_SIZE: f64 = super::HIGHLIGHT_POINT_SIZE;
    pub const LINE_WIDTH: f64 = super::HIGHLIGHT_LINE_WIDTH;
    pub const POLYGON_OUTLINE_WIDTH: f64 = super::HIGHLIGHT_POLYGON_OUTLINE_WIDTH;
    pub const COMMENT_SCALE: f64 = super::COMMENT_SELECTED_SCALE;
}

/// Ghost preview shown during relocation and vertex drags
pub mod ghost {
    use super::Color;
    pub const FILL: Color = super::GHOST_FILL;
    pub const ALPHA: f32 = super::GHOST_ALPHA;
    pub const POLYGON_ALPHA: f32 = super::GHOST_POLYGON_ALPHA;
    pub const COMMENT_FILL: Color = super::GHOST_COMMENT_FILL;
    pub const OUTLINE: Color = super::WHITE;
    pub const LINE_WIDTH: f64 = super::GHOST_LINE_WIDTH;
    pub const POINT_OUTLINE_WIDTH: f64 = 2.0;
    pub const POLYGON_OUTLINE_WIDTH: f64 = 3.0;
}

/// Vertex handles shown while editing vertices
pub mod vertex_handle {
    use super::Color;
    pub const FILL: Color = super::VERTEX_HANDLE_FILL;
    pub const ARMED_FILL: Color = super::VERTEX_HANDLE_ARMED_FILL;
    pub const OUTLINE: Color = super::VERTEX_HANDLE_OUTLINE;
    pub const OUTLINE_WIDTH: f64 = 2.0;
    pub const SIZE: f64 = super::VERTEX_HANDLE_SIZE;
    pub const ARMED_SIZE: f64 = super::VERTEX_HANDLE_ARMED_SIZE;
}

/// In-progress drawing preview (accumulated points)
pub mod draw_preview {
    use super::Color;
    pub const COLOR: Color = super::DRAW_PREVIEW;
    pub const LINE_WIDTH: f64 = super::DRAW_PREVIEW_LINE_WIDTH;
    pub const POINT_SIZE: f64 = super::DRAW_PREVIEW_POINT_SIZE;
}

/// Palette for categorical (by-column) coloring
pub mod category {
    use super::Color;
    pub const PALETTE: [Color; 12] = super::CATEGORY_PALETTE;
}
