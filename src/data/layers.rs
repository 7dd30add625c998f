// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Layer management for AppState (create, style, schema, delete)

use super::{AppState, Prompt};
use crate::model::{Column, ColumnType, LayerId, LayerKind, LayerPatch, LayerStyle, NewLayer};
use crate::scene::Scene;
use crate::store::Store;
use crate::style;
use peniko::Color;

pub const CONFIRM_DELETE_LAYER: &str = "Are you sure you want to delete this layer?";
pub const RESERVED_COLUMN: &str = "You cannot delete the extrusion column.";
pub const DUPLICATE_COLUMN: &str = "Column already exists!";

impl<St: Store, Sc: Scene, P: Prompt> AppState<St, Sc, P> {
    /// Create a layer with the kind's default style and make it active
    pub async fn create_layer(&mut self, name: &str, kind: LayerKind) -> Option<LayerId> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring layer with empty name");
            return None;
        }
        if self.store_call_pending("Creating layer") {
            return None;
        }

        self.busy = true;
        let result = self.store.insert_layer(NewLayer::with_defaults(name, kind)).await;
        self.busy = false;

        match result {
            Ok(layer) => {
                let id = layer.id;
                tracing::info!("Created {} layer '{}' ({})", layer.kind, layer.name, id);
                self.workspace.push_layer(layer);
                self.interaction
                    .set_active_layer(&mut self.scene, &self.workspace, Some(id));
                self.rebind();
                Some(id)
            }
            Err(err) => {
                self.report("Creating layer", err);
                None
            }
        }
    }

    /// Replace a layer's style
    pub async fn save_layer_style(&mut self, id: LayerId, style: LayerStyle) {
        let patch = LayerPatch {
            style: Some(style),
            ..Default::default()
        };
        self.patch_layer(id, patch, "Saving layer style").await;
    }

    /// Override the color used for one category value
    pub async fn set_category_color(&mut self, id: LayerId, value: &str, color: &str) {
        let Some(layer) = self.workspace.layer(id) else {
            return;
        };
        let mut style = layer.style.clone();
        style
            .coloring
            .color_overrides
            .insert(value.to_string(), color.to_string());
        self.save_layer_style(id, style).await;
    }

    pub async fn toggle_layer_visibility(&mut self, id: LayerId) {
        let Some(layer) = self.workspace.layer(id) else {
            return;
        };
        let patch = LayerPatch {
            visible: Some(!layer.visible),
            ..Default::default()
        };
        self.patch_layer(id, patch, "Updating layer visibility").await;
    }

    /// Delete a layer and all of its features after confirmation
    pub async fn delete_layer(&mut self, id: LayerId) {
        if self.workspace.layer(id).is_none() || !self.prompt.confirm(CONFIRM_DELETE_LAYER) {
            return;
        }
        let removed = self.workspace.remove_layer(id);
        tracing::info!("Deleted layer {} with {} features", id, removed.len());
        self.reconcile();

        self.busy = true;
        let result = self.store.delete_layer(id).await;
        self.busy = false;
        if let Err(err) = result {
            self.report("Deleting layer", err);
        }
    }

    /// Append an attribute column; names are trimmed and must be unique
    pub async fn add_column(&mut self, id: LayerId, name: &str, column_type: ColumnType) {
        let name = name.trim();
        let Some(layer) = self.workspace.layer(id) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        if layer.has_column(name) {
            self.notify(DUPLICATE_COLUMN);
            return;
        }
        let mut columns = layer.columns.clone();
        columns.push(Column {
            name: name.to_string(),
            column_type,
        });
        let patch = LayerPatch {
            columns: Some(columns),
            ..Default::default()
        };
        self.patch_layer(id, patch, "Adding column").await;
    }

    /// Remove an attribute column after confirmation
    ///
    /// Feature attribute values are kept; only the schema changes.
    pub async fn delete_column(&mut self, id: LayerId, name: &str) {
        let Some(layer) = self.workspace.layer(id) else {
            return;
        };
        if layer.is_reserved_column(name) {
            self.notify(RESERVED_COLUMN);
            return;
        }
        if !layer.has_column(name) || !self.prompt.confirm(&format!("Delete column \"{name}\"?")) {
            return;
        }
        let columns = layer.columns.iter().filter(|c| c.name != name).cloned().collect();
        let patch = LayerPatch {
            columns: Some(columns),
            ..Default::default()
        };
        self.patch_layer(id, patch, "Deleting column").await;
    }

    /// Move a layer within the display order (not persisted)
    pub fn reorder_layers(&mut self, from: usize, to: usize) {
        if self.workspace.move_layer(from, to) {
            self.rebind();
        }
    }

    /// Legend entries (category value, color) for a by-column layer
    pub fn legend(&self, id: LayerId) -> Vec<(String, Color)> {
        match self.workspace.layer(id) {
            Some(layer) => style::categories(layer, self.workspace.features_of(id)),
            None => Vec::new(),
        }
    }

    /// Apply a layer patch locally, re-bind, then persist it
    async fn patch_layer(&mut self, id: LayerId, patch: LayerPatch, action: &str) {
        if !self.workspace.patch_layer(id, &patch) {
            return;
        }
        self.rebind();

        self.busy = true;
        let result = self.store.update_layer(id, patch).await;
        self.busy = false;
        if let Err(err) = result {
            self.report(action, err);
        }
    }
}
