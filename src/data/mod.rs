// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Central application state (`AppState`) that drives the editor.
//!
//! `AppState` owns the canonical layer and feature collections, the
//! interaction state machine, and the scene binding. It is the only writer
//! of the workspace: the state machine hands back `Command`s and this module
//! applies them, first locally and then through the store. Store failures
//! become user notifications; the optimistic local state is kept.
//! Sub-modules split the methods by domain: layers, features, pointer
//! interaction, and file I/O.

mod features;
mod file_io;
mod interaction;
mod layers;

use crate::config::EditorConfig;
use crate::editing::InteractionMachine;
use crate::model::Workspace;
use crate::scene::Scene;
use crate::scene::binding::SceneBinding;
use crate::settings;
use crate::store::{Store, StoreError};

pub use features::FeatureRow;

/// Asks the user to confirm destructive actions
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Prompt that accepts everything (non-interactive use)
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        tracing::info!("Auto-confirmed: {}", message);
        true
    }
}

/// Main application state
pub struct AppState<St, Sc, P> {
    /// Layers (display order) and features as last loaded or edited
    pub workspace: Workspace,

    /// Mode, selection, snapping and highlight state
    pub interaction: InteractionMachine,

    /// Entities currently bound into the scene
    pub binding: SceneBinding,

    pub scene: Sc,

    /// Persistence backend
    pub store: St,

    /// Confirmation dialogs for destructive actions
    pub prompt: P,

    /// User-facing alerts not yet shown
    pub notifications: Vec<String>,

    /// Set while a store call is outstanding; repeated create or import
    /// triggers are dropped until it clears
    busy: bool,

    /// Duration of zoom-to-feature camera flights (seconds)
    pub fly_duration: f64,
}

impl<St: Store, Sc: Scene, P: Prompt> AppState<St, Sc, P> {
    /// Create an empty state; call `load` to fetch the store's contents
    pub fn new(store: St, scene: Sc, prompt: P) -> Self {
        Self {
            workspace: Workspace::default(),
            interaction: InteractionMachine::default(),
            binding: SceneBinding::new(),
            scene,
            store,
            prompt,
            notifications: Vec::new(),
            busy: false,
            fly_duration: settings::camera::FLY_DURATION_SECONDS,
        }
    }

    /// Apply user configuration
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.interaction = InteractionMachine::new(config.snap.enabled, config.snap.threshold_meters);
        self.fly_duration = config.camera.fly_duration_seconds;
        self
    }

    /// Whether a store call is outstanding (hosts show a spinner)
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Drain pending user-facing alerts
    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    // ===== INTERNAL HELPERS =====

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Alert: {}", message);
        self.notifications.push(message);
    }

    /// Surface a failed store call; local state is left as it is
    fn report(&mut self, action: &str, err: StoreError) {
        tracing::error!("{} failed: {}", action, err);
        self.notifications.push(format!("{action} failed: {err}"));
    }

    /// True (and logged) when `action` must wait for an outstanding store call
    fn store_call_pending(&self, action: &str) -> bool {
        if self.busy {
            tracing::debug!("{} ignored: a store call is still pending", action);
        }
        self.busy
    }

    /// Re-derive every bound entity from the current state
    fn rebind(&mut self) {
        self.binding.rebuild(&mut self.scene, &self.workspace, &self.interaction);
    }

    /// Drop stale references after a deletion, then re-bind
    fn reconcile(&mut self) {
        self.interaction.reconcile(&mut self.scene, &self.workspace);
        self.rebind();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::{Feature, FeatureId, FeaturePatch, Layer, LayerId, LayerPatch, NewFeature, NewLayer};
    use crate::scene::HeadlessScene;
    use crate::store::MemoryStore;

    /// Answers every confirmation with a fixed value and records the
    /// questions
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        pub answer: bool,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.push(message.to_string());
            self.answer
        }
    }

    /// Store wrapper whose writes can be made to fail
    #[derive(Debug, Default)]
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_writes: bool,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), StoreError> {
            if self.fail_writes {
                Err(StoreError::Backend("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl Store for FlakyStore {
        async fn list_layers(&self) -> Result<Vec<Layer>, StoreError> {
            self.inner.list_layers().await
        }

        async fn list_features(&self) -> Result<Vec<Feature>, StoreError> {
            self.inner.list_features().await
        }

        async fn insert_layer(&mut self, layer: NewLayer) -> Result<Layer, StoreError> {
            self.check()?;
            self.inner.insert_layer(layer).await
        }

        async fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<Layer, StoreError> {
            self.check()?;
            self.inner.update_layer(id, patch).await
        }

        async fn delete_layer(&mut self, id: LayerId) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete_layer(id).await
        }

        async fn insert_features(&mut self, features: Vec<NewFeature>) -> Result<Vec<Feature>, StoreError> {
            self.check()?;
            self.inner.insert_features(features).await
        }

        async fn update_feature(&mut self, id: FeatureId, patch: FeaturePatch) -> Result<Feature, StoreError> {
            self.check()?;
            self.inner.update_feature(id, patch).await
        }

        async fn delete_feature(&mut self, id: FeatureId) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete_feature(id).await
        }
    }

    pub type TestState = AppState<FlakyStore, HeadlessScene, ScriptedPrompt>;

    pub fn state() -> TestState {
        AppState::new(FlakyStore::default(), HeadlessScene::new(), ScriptedPrompt::answering(true))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::config::EditorConfig;

    #[test]
    fn config_sets_snapping_and_flight_duration() {
        let mut config = EditorConfig::default();
        config.snap.enabled = true;
        config.snap.threshold_meters = 2.0;
        config.camera.fly_duration_seconds = 0.5;

        let state = state().with_config(&config);
        assert!(state.interaction.snap_enabled());
        assert_eq!(state.interaction.snap_threshold(), 2.0);
        assert_eq!(state.fly_duration, 0.5);
    }

    #[test]
    fn notifications_drain() {
        let mut state = state();
        state.notify("one");
        state.notify("two");
        assert_eq!(state.take_notifications(), vec!["one", "two"]);
        assert!(state.take_notifications().is_empty());
    }
}
