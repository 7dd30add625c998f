// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer-move sampling: hover tracking and cursor feedback.

use super::{CursorStyle, InteractionMachine, Mode};
use crate::model::Workspace;
use crate::scene::{Scene, ScreenPoint};

impl InteractionMachine {
    /// Handle one pointer-move sample
    ///
    /// In idle mode this tracks hover. Drawing and dragging suppress hover;
    /// dragging moves the ghost instead. Returns `true` when the ghost
    /// changed and its entity needs refreshing. Never blocks.
    pub fn on_pointer_move<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        at: ScreenPoint,
    ) -> bool {
        match self.mode {
            Mode::Idle => {
                self.sample_hover(scene, workspace, at);
                false
            }
            Mode::Drawing { .. } => {
                self.highlight.clear_hover(scene, workspace);
                self.cursor = CursorStyle::Crosshair;
                false
            }
            Mode::Relocating(_) | Mode::EditingVertices { .. } => {
                self.highlight.clear_hover(scene, workspace);
                self.cursor = self.drag_cursor();
                self.drag_to(scene, workspace, at)
            }
        }
    }

    fn sample_hover<S: Scene + ?Sized>(&mut self, scene: &mut S, workspace: &Workspace, at: ScreenPoint) {
        let picked = scene.pick_entity(at);
        if self.highlight.hover(scene, workspace, picked) {
            tracing::trace!("Hover now {:?}", self.highlight.hovered());
        }
        // Only a feature that took the hover highlight gets the pointer
        self.cursor = if self.highlight.hovered().is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        };
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::scene::EntityRef;
    use crate::style::{Emphasis, feature_visual};

    fn visual_is(scene: &crate::scene::HeadlessScene, ws: &Workspace, id: crate::model::FeatureId, emphasis: Emphasis) -> bool {
        let (feature, layer) = ws.feature_with_layer(id).unwrap();
        scene.entity(&EntityRef::for_feature(id)).unwrap().visual == feature_visual(layer, feature, emphasis)
    }

    #[test]
    fn moving_directly_between_features_never_double_highlights() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(TREE)), None);
        scene.script_pick(at(2.0, 1.0), Some(EntityRef::for_feature(ROAD)), None);

        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert!(visual_is(&scene, &ws, TREE, Emphasis::Hover));
        assert_eq!(machine.cursor(), CursorStyle::Pointer);

        machine.on_pointer_move(&mut scene, &ws, at(2.0, 1.0));
        assert!(visual_is(&scene, &ws, TREE, Emphasis::None));
        assert!(visual_is(&scene, &ws, ROAD, Emphasis::Hover));

        machine.on_pointer_move(&mut scene, &ws, at(80.0, 80.0));
        assert!(visual_is(&scene, &ws, ROAD, Emphasis::None));
        assert_eq!(machine.cursor(), CursorStyle::Default);
    }

    #[test]
    fn hovering_selected_feature_keeps_selection_visual() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        machine.select(&mut scene, &ws, Some(BLOCK));
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(BLOCK)), None);

        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert!(visual_is(&scene, &ws, BLOCK, Emphasis::Selected));
        assert_eq!(machine.highlight().hovered(), None);
        assert_eq!(machine.cursor(), CursorStyle::Default);
    }

    #[test]
    fn pointer_cursor_follows_the_hover_highlight() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        machine.select(&mut scene, &ws, Some(BLOCK));
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(TREE)), None);
        scene.script_pick(at(2.0, 1.0), Some(EntityRef::for_feature(BLOCK)), None);

        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert_eq!(machine.cursor(), CursorStyle::Pointer);
        // Repeated samples over the same feature keep the pointer
        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert_eq!(machine.cursor(), CursorStyle::Pointer);

        machine.on_pointer_move(&mut scene, &ws, at(2.0, 1.0));
        assert!(visual_is(&scene, &ws, TREE, Emphasis::None));
        assert_eq!(machine.cursor(), CursorStyle::Default);
    }

    #[test]
    fn dragging_suppresses_hover_and_shows_drag_cursor() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::new(false, 0.5);
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(TREE)), None);
        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert!(machine.highlight().hovered().is_some());

        machine.select(&mut scene, &ws, Some(ROAD));
        machine.start_relocation(&mut scene, &ws).unwrap();
        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert_eq!(machine.highlight().hovered(), None);
        assert!(visual_is(&scene, &ws, TREE, Emphasis::None));
        assert_eq!(machine.cursor(), CursorStyle::Grabbing);

        machine.toggle_snap();
        assert_eq!(machine.cursor(), CursorStyle::Copy);
    }

    #[test]
    fn drawing_uses_crosshair() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        machine.set_active_layer(&mut scene, &ws, Some(ROADS));
        machine.start_drawing(&mut scene, &ws).unwrap();
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(TREE)), None);
        machine.on_pointer_move(&mut scene, &ws, at(1.0, 1.0));
        assert_eq!(machine.cursor(), CursorStyle::Crosshair);
        assert_eq!(machine.highlight().hovered(), None);
    }
}
