// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Click, double-click, and drag-move handling.

use super::{Command, InteractionMachine, Mode};
use crate::editing::snap::find_snap_target;
use crate::geo::WorldPoint;
use crate::model::Workspace;
use crate::scene::{EntityClass, Scene, ScreenPoint};
use crate::settings;

/// Alert shown when a multi-point drawing is finished too early
pub const TOO_FEW_POINTS: &str = "Too few points!";

impl InteractionMachine {
    /// Primary click on the render surface
    ///
    /// Evaluated in a fixed priority order: vertex-handle pick, relocation
    /// commit, vertex commit, select or deselect, draw.
    pub fn on_click<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        at: ScreenPoint,
    ) -> Option<Command> {
        let picked = scene.pick_entity(at);
        let class = picked.as_ref().map(|e| e.classify());

        // Vertex handles win over everything else
        if let Some(EntityClass::VertexHandle(index)) = class {
            self.arm_vertex(index);
            return None;
        }

        match &mut self.mode {
            Mode::Relocating(session) => {
                let feature_id = session.feature_id();
                let committed = session.take_commit();
                self.enter(scene, workspace, Mode::Idle);
                return committed.map(|points| Command::CommitGeometry { feature_id, points });
            }
            Mode::EditingVertices { session, armed } => {
                if armed.take().is_none() {
                    return None;
                }
                let feature_id = session.feature_id();
                return session
                    .take_commit()
                    .map(|points| Command::CommitGeometry { feature_id, points });
            }
            Mode::Idle => {
                match class {
                    Some(EntityClass::Feature(id)) => self.select(scene, workspace, Some(id)),
                    None => self.select(scene, workspace, None),
                    // Ghost, draw preview, or foreign entities
                    Some(_) => {}
                }
                return None;
            }
            Mode::Drawing { .. } => {}
        }

        self.draw_click(scene, workspace, at)
    }

    /// Double-click finishes a multi-point drawing
    pub fn on_double_click<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
    ) -> Option<Command> {
        let layer = self.active_layer.and_then(|id| workspace.layer(id))?;
        let Mode::Drawing { points } = &mut self.mode else {
            return None;
        };
        if layer.kind.is_single_point() {
            return None;
        }
        if points.len() < settings::drawing::MIN_POINTS {
            return Some(Command::Notify(TOO_FEW_POINTS.to_string()));
        }
        let points = std::mem::take(points);
        let layer_id = layer.id;
        tracing::info!("Finished drawing {} points on layer {}", points.len(), layer_id);
        self.enter(scene, workspace, Mode::Idle);
        Some(Command::CreateFeature { layer_id, points })
    }

    /// Move the ghost to follow the cursor
    ///
    /// Returns `true` when the ghost changed. Samples that do not resolve to
    /// a world position are skipped, leaving the last valid ghost in place.
    pub(super) fn drag_to<S: Scene + ?Sized>(
        &mut self,
        scene: &S,
        workspace: &Workspace,
        at: ScreenPoint,
    ) -> bool {
        let Some(feature_id) = self.hidden_feature() else {
            return false;
        };
        if matches!(self.mode, Mode::EditingVertices { armed: None, .. }) {
            return false;
        }
        let Some(mut target) = scene.project(at) else {
            tracing::debug!("No world position under {:?}, keeping ghost", at);
            return false;
        };
        if self.snap_enabled
            && let Some(snapped) = find_snap_target(target, Some(feature_id), workspace, self.snap_threshold)
        {
            target = snapped;
        }

        match &mut self.mode {
            Mode::Relocating(session) => {
                session.relocate_to(target);
                true
            }
            Mode::EditingVertices {
                session,
                armed: Some(index),
            } => session.move_vertex(*index, target),
            _ => false,
        }
    }

    /// Arm a vertex for dragging; ignored outside vertex editing
    fn arm_vertex(&mut self, index: usize) {
        let Mode::EditingVertices { session, armed } = &mut self.mode else {
            tracing::debug!("Vertex handle {} clicked outside vertex editing", index);
            return;
        };
        if index >= session.original().len() {
            tracing::debug!("Ignoring out of range vertex handle {}", index);
            return;
        }
        *armed = Some(index);
        session.reset_ghost();
    }

    fn draw_click<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        at: ScreenPoint,
    ) -> Option<Command> {
        let layer = self.active_layer.and_then(|id| workspace.layer(id))?;
        let point = scene.project(at)?;

        if layer.kind.is_single_point() {
            let layer_id = layer.id;
            self.enter(scene, workspace, Mode::Idle);
            return Some(Command::CreateFeature {
                layer_id,
                points: vec![point],
            });
        }

        if let Mode::Drawing { points } = &mut self.mode {
            push_point(points, point);
        }
        None
    }
}

/// Append a drawn point, skipping exact repeats (the clicks that make up a
/// double-click land on the same spot)
fn push_point(points: &mut Vec<WorldPoint>, point: WorldPoint) {
    if points.last() != Some(&point) {
        points.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::geo::Geographic;
    use crate::model::{FeatureId, Geometry, LayerKind};
    use crate::scene::{EntityRef, HeadlessScene};
    use crate::style::Emphasis;

    fn machine() -> InteractionMachine {
        InteractionMachine::new(false, settings::snap::THRESHOLD_METERS)
    }

    fn world(lon: f64, lat: f64) -> WorldPoint {
        Geographic::new(lon, lat, 0.0).to_world()
    }

    #[test]
    fn clicking_feature_selects_and_empty_space_deselects() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::for_feature(TREE)), None);

        assert_eq!(machine.on_click(&mut scene, &ws, at(1.0, 1.0)), None);
        assert_eq!(machine.selected(), Some(TREE));
        assert_eq!(machine.highlight().emphasis_of(TREE), Emphasis::Selected);
        assert_eq!(machine.mode(), &Mode::Idle);

        machine.on_click(&mut scene, &ws, at(50.0, 50.0));
        assert_eq!(machine.selected(), None);
    }

    #[test]
    fn drawing_two_point_line_then_double_click() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        let (a, b) = (world(11.0, 45.0), world(11.001, 45.0));
        scene.script_pick(at(10.0, 10.0), None, Some(a));
        scene.script_pick(at(20.0, 10.0), None, Some(b));

        machine.set_active_layer(&mut scene, &ws, Some(ROADS));
        machine.start_drawing(&mut scene, &ws).unwrap();
        assert_eq!(machine.on_click(&mut scene, &ws, at(10.0, 10.0)), None);
        assert_eq!(machine.on_click(&mut scene, &ws, at(20.0, 10.0)), None);
        // Second click of the double-click lands on the same spot
        assert_eq!(machine.on_click(&mut scene, &ws, at(20.0, 10.0)), None);
        assert_eq!(machine.draw_points().len(), 2);

        let command = machine.on_double_click(&mut scene, &ws);
        assert_eq!(
            command,
            Some(Command::CreateFeature {
                layer_id: ROADS,
                points: vec![a, b],
            })
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert!(machine.draw_points().is_empty());
    }

    #[test]
    fn double_click_with_one_point_is_rejected() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        scene.script_pick(at(10.0, 10.0), None, Some(world(11.0, 45.0)));

        machine.set_active_layer(&mut scene, &ws, Some(BLOCKS));
        machine.start_drawing(&mut scene, &ws).unwrap();
        machine.on_click(&mut scene, &ws, at(10.0, 10.0));
        assert_eq!(
            machine.on_double_click(&mut scene, &ws),
            Some(Command::Notify(TOO_FEW_POINTS.to_string()))
        );
        assert!(machine.is_drawing());
        assert_eq!(machine.draw_points().len(), 1);
    }

    #[test]
    fn point_layers_create_on_single_click() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        let p = world(11.0, 45.0);
        // Clicking onto an existing feature while drawing still draws
        scene.script_pick(at(5.0, 5.0), Some(EntityRef::for_feature(ROAD)), Some(p));

        machine.set_active_layer(&mut scene, &ws, Some(TREES));
        machine.start_drawing(&mut scene, &ws).unwrap();
        let command = machine.on_click(&mut scene, &ws, at(5.0, 5.0));
        assert_eq!(
            command,
            Some(Command::CreateFeature {
                layer_id: TREES,
                points: vec![p],
            })
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.selected(), None);
    }

    #[test]
    fn drawing_click_over_sky_adds_nothing() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.set_active_layer(&mut scene, &ws, Some(ROADS));
        machine.start_drawing(&mut scene, &ws).unwrap();
        assert_eq!(machine.on_click(&mut scene, &ws, at(99.0, 99.0)), None);
        assert!(machine.draw_points().is_empty());
    }

    #[test]
    fn relocation_commits_translated_geometry_once() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.select(&mut scene, &ws, Some(ROAD));
        machine.start_relocation(&mut scene, &ws).unwrap();

        let target = world(10.05, 45.05);
        scene.script_pick(at(30.0, 30.0), None, Some(target));
        assert!(machine.on_pointer_move(&mut scene, &ws, at(30.0, 30.0)));

        let Some(Command::CommitGeometry { feature_id, points }) = machine.on_click(&mut scene, &ws, at(30.0, 30.0))
        else {
            panic!("expected a geometry commit");
        };
        assert_eq!(feature_id, ROAD);
        assert_eq!(points.len(), 2);
        assert!(crate::geo::distance(points[0], target) < 1e-6);
        assert_eq!(machine.mode(), &Mode::Idle);

        // Ghost already cleared: a second click only re-selects, never commits
        let again = machine.on_click(&mut scene, &ws, at(30.0, 30.0));
        assert!(!matches!(again, Some(Command::CommitGeometry { .. })));
    }

    #[test]
    fn relocation_leaves_workspace_untouched_until_commit() {
        let ws = workspace();
        let before = ws.feature(BLOCK).cloned();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.select(&mut scene, &ws, Some(BLOCK));
        machine.start_relocation(&mut scene, &ws).unwrap();
        scene.script_pick(at(30.0, 30.0), None, Some(world(12.0, 46.0)));
        machine.on_pointer_move(&mut scene, &ws, at(30.0, 30.0));

        machine.cancel(&mut scene, &ws);
        assert_eq!(ws.feature(BLOCK).cloned(), before);
        assert_eq!(machine.drag_session(), None);
        assert_eq!(machine.selected(), Some(BLOCK));
    }

    #[test]
    fn sky_samples_keep_the_last_ghost() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.select(&mut scene, &ws, Some(TREE));
        machine.start_relocation(&mut scene, &ws).unwrap();
        let target = world(10.5, 45.5);
        scene.script_pick(at(30.0, 30.0), None, Some(target));
        machine.on_pointer_move(&mut scene, &ws, at(30.0, 30.0));

        assert!(!machine.on_pointer_move(&mut scene, &ws, at(200.0, 200.0)));
        assert_eq!(machine.drag_session().unwrap().ghost(), Some(&[target][..]));
    }

    #[test]
    fn vertex_edit_changes_only_the_armed_vertex() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.select(&mut scene, &ws, Some(BLOCK));
        machine.start_vertex_edit(&mut scene, &ws).unwrap();

        // Handles are placed by the binding; place one by hand here
        scene
            .place_entity(crate::scene::EntitySpec {
                id: EntityRef::vertex_handle(2),
                shape: crate::scene::EntityShape::Point(world(10.101, 45.101)),
                visual: crate::style::feature_visual(
                    ws.layer(BLOCKS).unwrap(),
                    ws.feature(BLOCK).unwrap(),
                    Emphasis::None,
                ),
                show: true,
            })
            .unwrap();
        scene.script_pick(at(40.0, 40.0), Some(EntityRef::vertex_handle(2)), None);
        assert_eq!(machine.on_click(&mut scene, &ws, at(40.0, 40.0)), None);
        assert_eq!(machine.armed_vertex(), Some(2));

        let target = world(10.102, 45.102);
        scene.script_pick(at(45.0, 45.0), None, Some(target));
        assert!(machine.on_pointer_move(&mut scene, &ws, at(45.0, 45.0)));

        let original = ws.feature(BLOCK).unwrap().geometry.to_world();
        let Some(Command::CommitGeometry { feature_id, points }) = machine.on_click(&mut scene, &ws, at(45.0, 45.0))
        else {
            panic!("expected a geometry commit");
        };
        assert_eq!(feature_id, BLOCK);
        assert_eq!(points.len(), original.len());
        for (i, (committed, before)) in points.iter().zip(&original).enumerate() {
            if i == 2 {
                assert_eq!(*committed, target);
            } else {
                assert_eq!(committed, before);
            }
        }
        assert_eq!(ws.layer(BLOCKS).unwrap().kind, LayerKind::Polygon);
        assert!(Geometry::from_world(LayerKind::Polygon, &points).is_some());

        // Still editing, nothing armed
        assert!(machine.is_editing_vertices());
        assert_eq!(machine.armed_vertex(), None);
        assert_eq!(machine.on_click(&mut scene, &ws, at(45.0, 45.0)), None);
    }

    #[test]
    fn vertex_handle_outside_editing_is_ignored() {
        let ws = workspace();
        let mut scene = HeadlessScene::new();
        let mut machine = machine();
        scene
            .place_entity(crate::scene::EntitySpec {
                id: EntityRef::vertex_handle(0),
                shape: crate::scene::EntityShape::Point(world(10.0, 45.0)),
                visual: crate::style::derive_visual(
                    LayerKind::Point,
                    &ws.layer(TREES).unwrap().style,
                    crate::theme::neutral::WHITE,
                    Emphasis::None,
                ),
                show: true,
            })
            .unwrap();
        scene.script_pick(at(1.0, 1.0), Some(EntityRef::vertex_handle(0)), None);
        machine.select(&mut scene, &ws, Some(FeatureId(1)));
        assert_eq!(machine.on_click(&mut scene, &ws, at(1.0, 1.0)), None);
        // Not treated as empty space either
        assert_eq!(machine.selected(), Some(FeatureId(1)));
    }

    #[test]
    fn snapping_pulls_drag_target_onto_other_features() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = machine();
        machine.toggle_snap();
        machine.select(&mut scene, &ws, Some(TREE));
        machine.start_relocation(&mut scene, &ws).unwrap();

        let road_start = world(10.01, 45.0);
        let near = road_start + glam::DVec3::new(0.2, 0.0, 0.0);
        scene.script_pick(at(30.0, 30.0), None, Some(near));
        machine.on_pointer_move(&mut scene, &ws, at(30.0, 30.0));

        let ghost = machine.drag_session().unwrap().ghost().unwrap()[0];
        assert!(crate::geo::distance(ghost, road_start) < 0.25);
        assert!(crate::geo::distance(ghost, near) <= machine.snap_threshold());
    }
}
