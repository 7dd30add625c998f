// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Layer and feature data model

pub mod feature;
pub mod ids;
pub mod layer;
pub mod workspace;

pub use feature::{Attributes, Feature, FeaturePatch, Geometry, NewFeature};
pub use ids::{FeatureId, LayerId};
pub use layer::{Column, ColumnType, ColorMode, Coloring, Layer, LayerKind, LayerPatch, LayerStyle, NewLayer};
pub use workspace::Workspace;
