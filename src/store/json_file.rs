// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Store persisted to a single JSON document.
//!
//! Reads are served from memory. Every successful write rewrites the whole
//! document; collections here are small. The document is written to a
//! sibling temp file and renamed into place, so an interrupted write never
//! leaves a truncated store behind.

use super::{MemoryStore, Store, StoreError, StoreSnapshot};
use crate::model::{Feature, FeatureId, FeaturePatch, Layer, LayerId, LayerPatch, NewFeature, NewLayer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the document at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str::<StoreSnapshot>(&text)?
        } else {
            tracing::info!("No store at {}, starting empty", path.display());
            StoreSnapshot::default()
        };
        tracing::debug!(
            "Opened store {} ({} layers, {} features)",
            path.display(),
            snapshot.layers.len(),
            snapshot.features.len()
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.inner.snapshot())?;
        let staging = self.staging_path();
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Store for JsonFileStore {
    async fn list_layers(&self) -> Result<Vec<Layer>, StoreError> {
        self.inner.list_layers().await
    }

    async fn list_features(&self) -> Result<Vec<Feature>, StoreError> {
        self.inner.list_features().await
    }

    async fn insert_layer(&mut self, layer: NewLayer) -> Result<Layer, StoreError> {
        let layer = self.inner.insert_layer(layer).await?;
        self.persist()?;
        Ok(layer)
    }

    async fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<Layer, StoreError> {
        let layer = self.inner.update_layer(id, patch).await?;
        self.persist()?;
        Ok(layer)
    }

    async fn delete_layer(&mut self, id: LayerId) -> Result<(), StoreError> {
        self.inner.delete_layer(id).await?;
        self.persist()
    }

    async fn insert_features(&mut self, features: Vec<NewFeature>) -> Result<Vec<Feature>, StoreError> {
        let features = self.inner.insert_features(features).await?;
        self.persist()?;
        Ok(features)
    }

    async fn update_feature(&mut self, id: FeatureId, patch: FeaturePatch) -> Result<Feature, StoreError> {
        let feature = self.inner.update_feature(id, patch).await?;
        self.persist()?;
        Ok(feature)
    }

    async fn delete_feature(&mut self, id: FeatureId) -> Result<(), StoreError> {
        self.inner.delete_feature(id).await?;
        self.persist()
    }
}
