// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Hover and selection emphasis on placed scene entities.
//!
//! Two independent slots, hovered and selected, each remembering which
//! entity currently carries an override. Applying and restoring both go
//! through `style::feature_visual`, so nothing about the entity's previous
//! appearance has to be saved. Scene failures (the entity was removed
//! while hovered, for instance) are logged and swallowed.

use crate::model::{FeatureId, Workspace};
use crate::scene::{EntityRef, Scene};
use crate::style::{Emphasis, feature_visual};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightController {
    hovered: Option<EntityRef>,
    selected: Option<EntityRef>,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&EntityRef> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&EntityRef> {
        self.selected.as_ref()
    }

    /// Emphasis a feature entity should be drawn with right now
    pub fn emphasis_of(&self, id: FeatureId) -> Emphasis {
        let entity = EntityRef::for_feature(id);
        if self.selected.as_ref() == Some(&entity) {
            Emphasis::Selected
        } else if self.hovered.as_ref() == Some(&entity) {
            Emphasis::Hover
        } else {
            Emphasis::None
        }
    }

    /// Move the hover override to `entity`
    ///
    /// Returns `false` when `entity` is already the hovered one. The
    /// previous hover is restored before the new one is applied. Entities
    /// that are not features, and the selected entity, are never hovered.
    pub fn hover<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        entity: Option<EntityRef>,
    ) -> bool {
        if self.hovered == entity {
            return false;
        }
        self.clear_hover(scene, workspace);

        let Some(entity) = entity.filter(|e| e.feature_id().is_some()) else {
            return true;
        };
        if self.selected.as_ref() == Some(&entity) {
            return true;
        }
        apply(scene, workspace, &entity, Emphasis::Hover);
        self.hovered = Some(entity);
        true
    }

    /// Restore the hovered entity, if any
    pub fn clear_hover<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace) {
        if let Some(previous) = self.hovered.take() {
            let emphasis = if self.selected.as_ref() == Some(&previous) {
                Emphasis::Selected
            } else {
                Emphasis::None
            };
            apply(scene, workspace, &previous, emphasis);
        }
    }

    /// Move the selection override to the entity of `feature`
    pub fn select<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        feature: Option<FeatureId>,
    ) {
        self.clear_hover(scene, workspace);
        if let Some(previous) = self.selected.take() {
            apply(scene, workspace, &previous, Emphasis::None);
        }
        if let Some(id) = feature {
            let entity = EntityRef::for_feature(id);
            apply(scene, workspace, &entity, Emphasis::Selected);
            self.selected = Some(entity);
        }
    }
}

fn apply<S: Scene + ?Sized>(scene: &mut S, workspace: &Workspace, entity: &EntityRef, emphasis: Emphasis) {
    let Some((feature, layer)) = entity.feature_id().and_then(|id| workspace.feature_with_layer(id)) else {
        tracing::debug!("No feature behind entity {entity}, skipping {emphasis:?} visual");
        return;
    };
    if let Err(err) = scene.set_entity_visual(entity, feature_visual(layer, feature, emphasis)) {
        tracing::debug!("Could not apply {emphasis:?} visual: {err}");
    }
}
