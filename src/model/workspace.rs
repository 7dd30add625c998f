// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory layer and feature collections.
//!
//! `Workspace` is the single source of truth for what the editor shows. It
//! is refreshed wholesale from the store on load and patched incrementally
//! afterwards. Only the orchestrator (`data::AppState`) mutates it; the
//! interaction state machine and the scene binding read it by shared
//! reference.

use super::feature::{Feature, FeaturePatch};
use super::ids::{FeatureId, LayerId};
use super::layer::{Layer, LayerPatch};

/// Canonical layers (in display order) and features
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    layers: Vec<Layer>,
    features: Vec<Feature>,
}

impl Workspace {
    pub fn new(layers: Vec<Layer>, features: Vec<Feature>) -> Self {
        Self { layers, features }
    }

    // ===== READ ACCESS =====

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// A feature together with its owning layer
    pub fn feature_with_layer(&self, id: FeatureId) -> Option<(&Feature, &Layer)> {
        let feature = self.feature(id)?;
        let layer = self.layer(feature.layer_id)?;
        Some((feature, layer))
    }

    /// Features of one layer, in collection order
    pub fn features_of(&self, layer_id: LayerId) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(move |f| f.layer_id == layer_id)
    }

    /// Features whose layer is visible, in feature collection order
    pub fn visible_features(&self) -> impl Iterator<Item = (&Feature, &Layer)> {
        self.features.iter().filter_map(|feature| {
            self.layer(feature.layer_id)
                .filter(|layer| layer.visible)
                .map(|layer| (feature, layer))
        })
    }

    // ===== MUTATION (orchestrator only) =====

    pub(crate) fn replace_all(&mut self, layers: Vec<Layer>, features: Vec<Feature>) {
        self.layers = layers;
        self.features = features;
    }

    pub(crate) fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub(crate) fn patch_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a layer and every feature it owns, returning the removed
    /// feature ids
    pub(crate) fn remove_layer(&mut self, id: LayerId) -> Vec<FeatureId> {
        self.layers.retain(|l| l.id != id);
        let removed = self.features_of(id).map(|f| f.id).collect();
        self.features.retain(|f| f.layer_id != id);
        removed
    }

    /// Move a layer within the display order
    pub(crate) fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        true
    }

    pub(crate) fn push_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub(crate) fn patch_feature(&mut self, id: FeatureId, patch: &FeaturePatch) -> bool {
        match self.features.iter_mut().find(|f| f.id == id) {
            Some(feature) => {
                feature.apply(patch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_feature(&mut self, id: FeatureId) -> bool {
        let before = self.features.len();
        self.features.retain(|f| f.id != id);
        self.features.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Geographic;
    use crate::model::feature::{Attributes, Geometry};
    use crate::model::layer::{LayerKind, NewLayer};

    fn sample() -> Workspace {
        let points = NewLayer::with_defaults("Points", LayerKind::Point).into_layer(LayerId(1));
        let mut hidden = NewLayer::with_defaults("Hidden", LayerKind::Point).into_layer(LayerId(2));
        hidden.visible = false;
        let feature = |id, layer| Feature {
            id: FeatureId(id),
            layer_id: LayerId(layer),
            geometry: Geometry::Point(Geographic::new(0.0, 0.0, 0.0)),
            attributes: Attributes::new(),
        };
        Workspace::new(vec![points, hidden], vec![feature(10, 1), feature(11, 2), feature(12, 1)])
    }

    #[test]
    fn visible_features_skip_hidden_layers() {
        let ws = sample();
        let ids: Vec<_> = ws.visible_features().map(|(f, _)| f.id).collect();
        assert_eq!(ids, vec![FeatureId(10), FeatureId(12)]);
    }

    #[test]
    fn removing_layer_cascades_to_features() {
        let mut ws = sample();
        let removed = ws.remove_layer(LayerId(1));
        assert_eq!(removed, vec![FeatureId(10), FeatureId(12)]);
        assert_eq!(ws.features().len(), 1);
        assert!(ws.layer(LayerId(1)).is_none());
    }

    #[test]
    fn move_layer_reorders() {
        let mut ws = sample();
        assert!(ws.move_layer(0, 1));
        assert_eq!(ws.layers()[0].id, LayerId(2));
        assert!(!ws.move_layer(0, 5));
    }
}
