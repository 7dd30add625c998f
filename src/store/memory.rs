// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory store with monotonically increasing ids.

use super::{Store, StoreError};
use crate::model::{Feature, FeatureId, FeaturePatch, Layer, LayerId, LayerPatch, NewFeature, NewLayer};
use serde::{Deserialize, Serialize};

/// Serializable contents of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    layers: Vec<Layer>,
    features: Vec<Feature>,
    next_layer_id: i64,
    next_feature_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a snapshot; new ids continue after the largest stored one
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let next_layer_id = snapshot.layers.iter().map(|l| l.id.0).max().unwrap_or(0) + 1;
        let next_feature_id = snapshot.features.iter().map(|f| f.id.0).max().unwrap_or(0) + 1;
        let mut store = Self {
            layers: snapshot.layers,
            features: snapshot.features,
            next_layer_id,
            next_feature_id,
        };
        store.layers.sort_by_key(|l| l.id);
        store.features.sort_by_key(|f| f.id);
        store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            layers: self.layers.clone(),
            features: self.features.clone(),
        }
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, StoreError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StoreError::LayerNotFound(id))
    }

    fn feature_mut(&mut self, id: FeatureId) -> Result<&mut Feature, StoreError> {
        self.features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FeatureNotFound(id))
    }
}

impl Store for MemoryStore {
    async fn list_layers(&self) -> Result<Vec<Layer>, StoreError> {
        Ok(self.layers.clone())
    }

    async fn list_features(&self) -> Result<Vec<Feature>, StoreError> {
        Ok(self.features.clone())
    }

    async fn insert_layer(&mut self, layer: NewLayer) -> Result<Layer, StoreError> {
        let layer = layer.into_layer(LayerId(self.next_layer_id));
        self.next_layer_id += 1;
        self.layers.push(layer.clone());
        Ok(layer)
    }

    async fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<Layer, StoreError> {
        let layer = self.layer_mut(id)?;
        layer.apply(&patch);
        Ok(layer.clone())
    }

    async fn delete_layer(&mut self, id: LayerId) -> Result<(), StoreError> {
        self.layer_mut(id)?;
        self.layers.retain(|l| l.id != id);
        self.features.retain(|f| f.layer_id != id);
        Ok(())
    }

    async fn insert_features(&mut self, features: Vec<NewFeature>) -> Result<Vec<Feature>, StoreError> {
        // Validate the whole batch before assigning any id
        if let Some(missing) = features
            .iter()
            .map(|f| f.layer_id)
            .find(|id| !self.layers.iter().any(|l| l.id == *id))
        {
            return Err(StoreError::LayerNotFound(missing));
        }
        let inserted: Vec<Feature> = features
            .into_iter()
            .map(|new| {
                let feature = new.into_feature(FeatureId(self.next_feature_id));
                self.next_feature_id += 1;
                feature
            })
            .collect();
        self.features.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_feature(&mut self, id: FeatureId, patch: FeaturePatch) -> Result<Feature, StoreError> {
        let feature = self.feature_mut(id)?;
        feature.apply(&patch);
        Ok(feature.clone())
    }

    async fn delete_feature(&mut self, id: FeatureId) -> Result<(), StoreError> {
        self.feature_mut(id)?;
        self.features.retain(|f| f.id != id);
        Ok(())
    }
}
