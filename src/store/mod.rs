// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Persistence collaborator.
//!
//! Layers and features are addressed by integer id and support list,
//! insert, partial update, and delete. Every call is awaited by the
//! orchestrator; failures are reported to the user and never retried.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::{MemoryStore, StoreSnapshot};

use crate::model::{Feature, FeatureId, FeaturePatch, Layer, LayerId, LayerPatch, NewFeature, NewLayer};

/// Errors a store can report
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("layer {0} does not exist")]
    LayerNotFound(LayerId),
    #[error("feature {0} does not exist")]
    FeatureNotFound(FeatureId),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

/// CRUD access to the layer and feature collections
#[allow(async_fn_in_trait)]
pub trait Store {
    /// All layers, ordered by id
    async fn list_layers(&self) -> Result<Vec<Layer>, StoreError>;

    /// All features, ordered by id
    async fn list_features(&self) -> Result<Vec<Feature>, StoreError>;

    async fn insert_layer(&mut self, layer: NewLayer) -> Result<Layer, StoreError>;

    async fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<Layer, StoreError>;

    /// Delete a layer and every feature it owns
    async fn delete_layer(&mut self, id: LayerId) -> Result<(), StoreError>;

    /// Insert a batch of features, returning them with their ids
    async fn insert_features(&mut self, features: Vec<NewFeature>) -> Result<Vec<Feature>, StoreError>;

    async fn update_feature(&mut self, id: FeatureId, patch: FeaturePatch) -> Result<Feature, StoreError>;

    async fn delete_feature(&mut self, id: FeatureId) -> Result<(), StoreError>;
}
