// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer interaction state machine.
//!
//! `InteractionMachine` owns everything ephemeral about editing: the current
//! mode, the active layer, the selected feature, the snap toggle, and the
//! hover/selection highlight slots. The drawing accumulator and drag
//! sessions live inside the `Mode` variants, so at most one of them exists
//! at a time and leaving a mode drops its state.
//!
//! The machine never mutates the workspace. Clicks that should change
//! persisted data return a `Command` which the orchestrator applies.
//! Sub-modules split the event handlers: `pointer` for clicks and drag
//! moves, `hover` for hover sampling and cursor feedback.

mod hover;
mod pointer;

pub use pointer::TOO_FEW_POINTS;

use super::ghost::DragSession;
use super::highlight::HighlightController;
use crate::geo::WorldPoint;
use crate::model::{FeatureId, LayerId, Workspace};
use crate::scene::Scene;
use crate::settings;

/// Top-level interaction mode
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Accumulating points for a new feature on the active layer
    Drawing { points: Vec<WorldPoint> },
    /// Moving the selected feature as a whole
    Relocating(DragSession),
    /// Editing individual vertices of the selected feature
    EditingVertices {
        session: DragSession,
        /// Vertex picked for dragging
        armed: Option<usize>,
    },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Drawing { .. } => "drawing",
            Mode::Relocating(_) => "relocating",
            Mode::EditingVertices { .. } => "editing vertices",
        }
    }

    /// Relocation or vertex editing
    pub fn is_dragging(&self) -> bool {
        matches!(self, Mode::Relocating(_) | Mode::EditingVertices { .. })
    }

    fn session(&self) -> Option<&DragSession> {
        match self {
            Mode::Relocating(session) | Mode::EditingVertices { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// A persisted-data change requested by the machine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a feature on a layer from drawn world positions
    CreateFeature {
        layer_id: LayerId,
        points: Vec<WorldPoint>,
    },
    /// Replace a feature's geometry with committed ghost positions
    CommitGeometry {
        feature_id: FeatureId,
        points: Vec<WorldPoint>,
    },
    /// Tell the user something
    Notify(String),
}

/// Pointer cursor the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Over a selectable feature
    Pointer,
    /// Placing points
    Crosshair,
    /// Dragging without snapping
    Grabbing,
    /// Dragging with snapping enabled
    Copy,
}

/// Reasons a mode cannot be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("no active layer")]
    NoActiveLayer,
    #[error("no feature selected")]
    NoSelection,
    #[error("feature {0} is not loaded")]
    FeatureNotFound(FeatureId),
}

/// Ephemeral editing state and the pointer event handlers
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    mode: Mode,
    active_layer: Option<LayerId>,
    selected: Option<FeatureId>,
    snap_enabled: bool,
    snap_threshold: f64,
    highlight: HighlightController,
    cursor: CursorStyle,
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(settings::snap::ENABLED_BY_DEFAULT, settings::snap::THRESHOLD_METERS)
    }
}

impl InteractionMachine {
    pub fn new(snap_enabled: bool, snap_threshold: f64) -> Self {
        Self {
            mode: Mode::Idle,
            active_layer: None,
            selected: None,
            snap_enabled,
            snap_threshold,
            highlight: HighlightController::new(),
            cursor: CursorStyle::Default,
        }
    }

    // ===== STATE ACCESS =====

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn active_layer(&self) -> Option<LayerId> {
        self.active_layer
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selected
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn snap_threshold(&self) -> f64 {
        self.snap_threshold
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, Mode::Drawing { .. })
    }

    pub fn is_relocating(&self) -> bool {
        matches!(self.mode, Mode::Relocating(_))
    }

    pub fn is_editing_vertices(&self) -> bool {
        matches!(self.mode, Mode::EditingVertices { .. })
    }

    /// Points placed so far while drawing
    pub fn draw_points(&self) -> &[WorldPoint] {
        match &self.mode {
            Mode::Drawing { points } => points,
            _ => &[],
        }
    }

    /// Active relocation or vertex-edit session
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.mode.session()
    }

    /// Vertex picked for dragging while editing vertices
    pub fn armed_vertex(&self) -> Option<usize> {
        match self.mode {
            Mode::EditingVertices { armed, .. } => armed,
            _ => None,
        }
    }

    /// Feature whose entity is replaced by the ghost and handles
    pub fn hidden_feature(&self) -> Option<FeatureId> {
        self.mode.session().map(DragSession::feature_id)
    }

    // ===== MODE TRANSITIONS =====

    /// Change the active layer; drawing on the previous layer is abandoned
    pub fn set_active_layer<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        layer: Option<LayerId>,
    ) {
        if self.is_drawing() && layer != self.active_layer {
            self.enter(scene, workspace, Mode::Idle);
        }
        self.active_layer = layer;
    }

    pub fn start_drawing<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
    ) -> Result<(), InteractionError> {
        let layer = self
            .active_layer
            .filter(|id| workspace.layer(*id).is_some())
            .ok_or(InteractionError::NoActiveLayer)?;
        tracing::debug!("Drawing on layer {}", layer);
        self.enter(scene, workspace, Mode::Drawing { points: Vec::new() });
        Ok(())
    }

    /// Abandon the in-progress drawing, if any
    pub fn stop_drawing<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace) {
        if self.is_drawing() {
            self.enter(scene, workspace, Mode::Idle);
        }
    }

    /// Begin moving the selected feature; the ghost starts at its current
    /// geometry
    pub fn start_relocation<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
    ) -> Result<(), InteractionError> {
        let mut session = self.session_for_selection(workspace)?;
        session.reset_ghost();
        self.enter(scene, workspace, Mode::Relocating(session));
        Ok(())
    }

    /// Begin editing vertices of the selected feature
    pub fn start_vertex_edit<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
    ) -> Result<(), InteractionError> {
        let session = self.session_for_selection(workspace)?;
        self.enter(scene, workspace, Mode::EditingVertices { session, armed: None });
        Ok(())
    }

    pub fn finish_vertex_edit<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace) {
        if self.is_editing_vertices() {
            self.enter(scene, workspace, Mode::Idle);
        }
    }

    /// Leave any mode, dropping the accumulator or ghost
    pub fn cancel<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace) {
        if self.mode != Mode::Idle {
            self.enter(scene, workspace, Mode::Idle);
        }
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap_enabled = !self.snap_enabled;
        if self.mode.is_dragging() {
            self.cursor = self.drag_cursor();
        }
        tracing::debug!("Snapping {}", if self.snap_enabled { "on" } else { "off" });
        self.snap_enabled
    }

    /// Change the selected feature and its highlight
    ///
    /// A drag session over a different feature is abandoned.
    pub fn select<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        feature: Option<FeatureId>,
    ) {
        if self.hidden_feature().is_some_and(|id| Some(id) != feature) {
            self.enter(scene, workspace, Mode::Idle);
        }
        if self.selected != feature {
            tracing::debug!("Selection: {:?} -> {:?}", self.selected, feature);
        }
        self.selected = feature;
        self.highlight.select(scene, workspace, feature);
    }

    /// Drop references to layers and features that no longer exist
    pub fn reconcile<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace) {
        if self.active_layer.is_some_and(|id| workspace.layer(id).is_none()) {
            self.stop_drawing(scene, workspace);
            self.active_layer = None;
        }
        if self.selected.is_some_and(|id| workspace.feature(id).is_none()) {
            self.select(scene, workspace, None);
        }
        if self.hidden_feature().is_some_and(|id| workspace.feature(id).is_none()) {
            self.enter(scene, workspace, Mode::Idle);
        }
    }

    fn session_for_selection(&self, workspace: &Workspace) -> Result<DragSession, InteractionError> {
        let id = self.selected.ok_or(InteractionError::NoSelection)?;
        let (feature, layer) = workspace
            .feature_with_layer(id)
            .ok_or(InteractionError::FeatureNotFound(id))?;
        Ok(DragSession::new(feature, layer))
    }

    /// Switch modes; the previous mode's state is dropped with it
    fn enter<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace, mode: Mode) {
        tracing::info!("Interaction mode: {} -> {}", self.mode.name(), mode.name());
        self.highlight.clear_hover(scene, workspace);
        self.mode = mode;
        self.cursor = match &self.mode {
            Mode::Idle => CursorStyle::Default,
            Mode::Drawing { .. } => CursorStyle::Crosshair,
            Mode::Relocating(_) | Mode::EditingVertices { .. } => self.drag_cursor(),
        };
    }

    fn drag_cursor(&self) -> CursorStyle {
        if self.snap_enabled {
            CursorStyle::Copy
        } else {
            CursorStyle::Grabbing
        }
    }
}
