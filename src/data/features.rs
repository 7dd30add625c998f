// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Feature operations for AppState (create, commit, edit, delete, zoom)

use super::{AppState, Prompt};
use crate::geo::{self, WorldPoint};
use crate::model::{Attributes, FeatureId, FeaturePatch, Geometry, LayerId, NewFeature};
use crate::scene::{CameraTarget, Scene};
use crate::settings::{camera, schema};
use crate::store::Store;

pub const CONFIRM_DELETE_FEATURE: &str = "Delete this element?";

/// One row of a layer's attribute table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub id: FeatureId,
    /// Display name
    pub name: String,
    /// Values in the layer's column order
    pub values: Vec<String>,
}

impl<St: Store, Sc: Scene, P: Prompt> AppState<St, Sc, P> {
    /// Save edits from the attribute form
    ///
    /// `name` is merged into the attributes. Clears the selection.
    pub async fn save_feature_edit(
        &mut self,
        id: FeatureId,
        name: &str,
        mut attributes: Attributes,
        geometry: Option<Geometry>,
    ) {
        if self.workspace.feature(id).is_none() {
            return;
        }
        attributes.insert(schema::NAME_ATTRIBUTE.to_string(), name.to_string());
        let patch = FeaturePatch {
            geometry,
            attributes: Some(attributes),
        };
        self.workspace.patch_feature(id, &patch);
        self.interaction.select(&mut self.scene, &self.workspace, None);
        self.rebind();
        self.persist_feature(id, patch, "Saving element").await;
    }

    /// Delete a feature after confirmation
    pub async fn delete_feature(&mut self, id: FeatureId) {
        if self.workspace.feature(id).is_none() || !self.prompt.confirm(CONFIRM_DELETE_FEATURE) {
            return;
        }
        self.workspace.remove_feature(id);
        tracing::info!("Deleted feature {}", id);
        self.reconcile();

        self.busy = true;
        let result = self.store.delete_feature(id).await;
        self.busy = false;
        if let Err(err) = result {
            self.report("Deleting element", err);
        }
    }

    /// Fly the camera to a feature
    ///
    /// Points are approached from above; lines and polygons are framed by
    /// their bounding sphere.
    pub fn zoom_to_feature(&mut self, id: FeatureId) {
        let Some((feature, layer)) = self.workspace.feature_with_layer(id) else {
            return;
        };
        let target = if layer.kind.is_single_point() {
            let Some(position) = feature.geometry.positions().first() else {
                return;
            };
            let above = position.with_height(position.height + camera::POINT_FLY_HEIGHT_METERS);
            CameraTarget::Position(above.to_world())
        } else {
            let Some((center, radius)) = geo::bounding_sphere(&feature.geometry.to_world()) else {
                return;
            };
            CameraTarget::Sphere {
                center,
                radius,
                pitch: camera::SHAPE_FLY_PITCH,
                range: radius * camera::SHAPE_FLY_RANGE_FACTOR,
            }
        };
        tracing::debug!("Flying to feature {}", id);
        self.scene.fly_camera_to(target, self.fly_duration);
    }

    /// Attribute table rows of a layer
    pub fn rows(&self, layer_id: LayerId) -> Vec<FeatureRow> {
        let Some(layer) = self.workspace.layer(layer_id) else {
            return Vec::new();
        };
        self.workspace
            .features_of(layer_id)
            .map(|feature| FeatureRow {
                id: feature.id,
                name: feature.display_name(),
                values: feature.row(layer),
            })
            .collect()
    }

    /// Insert a freshly drawn feature
    pub(super) async fn create_feature(&mut self, layer_id: LayerId, points: Vec<WorldPoint>) {
        if self.store_call_pending("Creating element") {
            return;
        }
        let Some(layer) = self.workspace.layer(layer_id) else {
            return;
        };
        let Some(geometry) = Geometry::from_world(layer.kind, &points) else {
            return;
        };
        let new = NewFeature::drawn(layer, geometry);

        self.busy = true;
        let result = self.store.insert_features(vec![new]).await;
        self.busy = false;

        match result {
            Ok(inserted) => {
                for feature in inserted {
                    tracing::info!("Created feature {} on layer {}", feature.id, layer_id);
                    self.workspace.push_feature(feature);
                }
                self.rebind();
            }
            Err(err) => self.report("Creating element", err),
        }
    }

    /// Write committed ghost positions back to a feature
    pub(super) async fn commit_geometry(&mut self, id: FeatureId, points: Vec<WorldPoint>) {
        let Some((_, layer)) = self.workspace.feature_with_layer(id) else {
            return;
        };
        let Some(geometry) = Geometry::from_world(layer.kind, &points) else {
            return;
        };
        let patch = FeaturePatch {
            geometry: Some(geometry),
            attributes: None,
        };
        self.workspace.patch_feature(id, &patch);
        self.rebind();
        self.persist_feature(id, patch, "Saving geometry").await;
    }

    async fn persist_feature(&mut self, id: FeatureId, patch: FeaturePatch, action: &str) {
        self.busy = true;
        let result = self.store.update_feature(id, patch).await;
        self.busy = false;
        if let Err(err) = result {
            self.report(action, err);
        }
    }
}
