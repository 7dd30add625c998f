// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mode switches and pointer events for AppState.
//!
//! Each handler forwards to the interaction state machine, applies the
//! returned command, and re-binds the scene. Pointer moves are synchronous
//! and only refresh the ghost entity.

use super::{AppState, Prompt};
use crate::editing::{Command, InteractionError};
use crate::model::{FeatureId, LayerId};
use crate::scene::{Scene, ScreenPoint};
use crate::store::Store;

impl<St: Store, Sc: Scene, P: Prompt> AppState<St, Sc, P> {
    // ===== MODES =====

    pub fn set_active_layer(&mut self, layer: Option<LayerId>) {
        self.interaction
            .set_active_layer(&mut self.scene, &self.workspace, layer);
        self.rebind();
    }

    pub fn start_drawing(&mut self) {
        let result = self.interaction.start_drawing(&mut self.scene, &self.workspace);
        self.after_mode_switch(result);
    }

    pub fn stop_drawing(&mut self) {
        self.interaction.stop_drawing(&mut self.scene, &self.workspace);
        self.rebind();
    }

    pub fn start_relocation(&mut self) {
        let result = self.interaction.start_relocation(&mut self.scene, &self.workspace);
        self.after_mode_switch(result);
    }

    pub fn start_vertex_edit(&mut self) {
        let result = self.interaction.start_vertex_edit(&mut self.scene, &self.workspace);
        self.after_mode_switch(result);
    }

    pub fn finish_vertex_edit(&mut self) {
        self.interaction.finish_vertex_edit(&mut self.scene, &self.workspace);
        self.rebind();
    }

    /// Leave whatever mode is active without committing
    pub fn cancel_interaction(&mut self) {
        self.interaction.cancel(&mut self.scene, &self.workspace);
        self.rebind();
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.interaction.toggle_snap()
    }

    pub fn select_feature(&mut self, feature: Option<FeatureId>) {
        self.interaction.select(&mut self.scene, &self.workspace, feature);
        self.rebind();
    }

    // ===== POINTER EVENTS =====

    /// Primary click on the render surface
    pub async fn click(&mut self, at: ScreenPoint) {
        let command = self.interaction.on_click(&mut self.scene, &self.workspace, at);
        self.rebind();
        if let Some(command) = command {
            self.apply(command).await;
        }
    }

    pub async fn double_click(&mut self, _at: ScreenPoint) {
        let command = self.interaction.on_double_click(&mut self.scene, &self.workspace);
        self.rebind();
        if let Some(command) = command {
            self.apply(command).await;
        }
    }

    /// Pointer-move sample; never awaits
    pub fn pointer_moved(&mut self, at: ScreenPoint) {
        if self
            .interaction
            .on_pointer_move(&mut self.scene, &self.workspace, at)
        {
            self.binding.refresh_ghost(&mut self.scene, &self.interaction);
        }
    }

    async fn apply(&mut self, command: Command) {
        match command {
            Command::CreateFeature { layer_id, points } => self.create_feature(layer_id, points).await,
            Command::CommitGeometry { feature_id, points } => self.commit_geometry(feature_id, points).await,
            Command::Notify(message) => self.notify(message),
        }
    }

    fn after_mode_switch(&mut self, result: Result<(), InteractionError>) {
        if let Err(err) = result {
            let message = match err {
                InteractionError::NoActiveLayer => "Select a layer first.".to_string(),
                InteractionError::NoSelection => "Select an element first.".to_string(),
                InteractionError::FeatureNotFound(_) => err.to_string(),
            };
            self.notify(message);
        }
        self.rebind();
    }
}
