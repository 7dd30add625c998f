// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Loading and FeatureCollection import/export for AppState

use super::{AppState, Prompt};
use crate::interchange;
use crate::model::LayerId;
use crate::scene::Scene;
use crate::store::Store;
use chrono::Local;

impl<St: Store, Sc: Scene, P: Prompt> AppState<St, Sc, P> {
    /// Replace the workspace with the store's contents
    pub async fn load(&mut self) {
        self.busy = true;
        let layers = self.store.list_layers().await;
        let features = self.store.list_features().await;
        self.busy = false;

        match (layers, features) {
            (Ok(mut layers), Ok(features)) => {
                layers.sort_by_key(|l| l.id);
                tracing::info!("Loaded {} layers, {} features", layers.len(), features.len());
                self.workspace.replace_all(layers, features);
                self.reconcile();
            }
            (Err(err), _) | (_, Err(err)) => self.report("Loading data", err),
        }
    }

    /// Serialize a layer as a pretty-printed FeatureCollection
    pub fn export_layer(&mut self, id: LayerId) -> Option<String> {
        let layer = self.workspace.layer(id)?;
        let document = interchange::export_layer(layer, self.workspace.features_of(id));
        match serde_json::to_string_pretty(&document) {
            Ok(text) => {
                tracing::info!("Exported layer '{}'", layer.name);
                Some(text)
            }
            Err(err) => {
                self.notify(format!("Export error: {err}"));
                None
            }
        }
    }

    /// Import a FeatureCollection document into a new layer
    ///
    /// Validation failures abort the import before anything is written.
    /// Ignored while another store call is outstanding.
    pub async fn import_feature_collection(&mut self, file_name: &str, text: &str) -> Option<LayerId> {
        if self.store_call_pending("Import") {
            return None;
        }
        let layer_name = interchange::import_layer_name(file_name, Local::now());
        let collection = match interchange::parse_feature_collection(text, &layer_name) {
            Ok(collection) => collection,
            Err(err) => {
                self.notify(format!("Import error: {err}"));
                return None;
            }
        };

        self.busy = true;
        let result = self.store.insert_layer(collection.layer.clone()).await;
        self.busy = false;
        let layer = match result {
            Ok(layer) => layer,
            Err(err) => {
                self.report("Import", err);
                return None;
            }
        };
        let layer_id = layer.id;
        self.workspace.push_layer(layer);

        self.busy = true;
        let result = self.store.insert_features(collection.new_features(layer_id)).await;
        self.busy = false;
        let count = match result {
            Ok(features) => {
                let count = features.len();
                for feature in features {
                    self.workspace.push_feature(feature);
                }
                count
            }
            Err(err) => {
                self.report("Import", err);
                self.rebind();
                return Some(layer_id);
            }
        };

        self.interaction
            .set_active_layer(&mut self.scene, &self.workspace, Some(layer_id));
        self.rebind();
        self.notify(format!(
            "Success! {count} elements were imported into layer \"{layer_name}\"."
        ));
        Some(layer_id)
    }
}
