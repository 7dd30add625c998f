// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Declarative scene binding.
//!
//! The entity set is a pure function of the workspace and the interaction
//! state (`entity_specs`). After every discrete change (load, commit,
//! selection, mode switch) the orchestrator calls `rebuild`, which removes
//! what was placed last time and places the new set. Pointer-move samples
//! skip all of that: `refresh_ghost` only swaps the ghost entity's shape.

use super::{EntityRef, EntityShape, EntitySpec, EntityVisual, Scene};
use crate::editing::InteractionMachine;
use crate::geo::WorldPoint;
use crate::model::{Feature, Layer, LayerKind, Workspace};
use crate::style::feature_visual;
use crate::theme::{draw_preview, vertex_handle};

/// Id suffix of the in-progress drawing polyline
const DRAW_PREVIEW_LINE: &str = "line";

/// Tracks which entities the binding owns in the scene
#[derive(Debug, Clone, Default)]
pub struct SceneBinding {
    placed: Vec<EntityRef>,
}

impl SceneBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities currently placed by the binding, in placement order
    pub fn placed(&self) -> &[EntityRef] {
        &self.placed
    }

    /// Replace every bound entity with a freshly derived set
    pub fn rebuild<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        workspace: &Workspace,
        interaction: &InteractionMachine,
    ) {
        for entity in self.placed.drain(..) {
            if let Err(err) = scene.remove_entity(&entity) {
                tracing::debug!("Re-bind: {err}");
            }
        }
        for spec in entity_specs(workspace, interaction) {
            match scene.place_entity(spec) {
                Ok(entity) => self.placed.push(entity),
                Err(err) => tracing::warn!("Could not place entity: {err}"),
            }
        }
        tracing::debug!("Bound {} entities", self.placed.len());
    }

    /// Push the current ghost geometry to the ghost entity
    ///
    /// Places the ghost if a drag started previewing since the last
    /// rebuild; removes it when the preview has been cleared.
    pub fn refresh_ghost<S: Scene + ?Sized>(&mut self, scene: &mut S, interaction: &InteractionMachine) {
        let ghost_id = EntityRef::ghost();
        let is_placed = self.placed.contains(&ghost_id);
        match interaction.drag_session().and_then(|s| s.ghost_entity()) {
            Some(spec) if is_placed => {
                if let Err(err) = scene.set_entity_shape(&ghost_id, spec.shape) {
                    tracing::debug!("Ghost refresh: {err}");
                }
            }
            Some(spec) => match scene.place_entity(spec) {
                Ok(entity) => self.placed.push(entity),
                Err(err) => tracing::warn!("Could not place ghost: {err}"),
            },
            None if is_placed => {
                if let Err(err) = scene.remove_entity(&ghost_id) {
                    tracing::debug!("Ghost removal: {err}");
                }
                self.placed.retain(|e| *e != ghost_id);
            }
            None => {}
        }
    }
}

/// Derive the full entity set
///
/// Features of visible layers in layer order (minus the one being
/// dragged), then the ghost, vertex handles, and the drawing preview.
pub fn entity_specs(workspace: &Workspace, interaction: &InteractionMachine) -> Vec<EntitySpec> {
    let hidden = interaction.hidden_feature();
    let mut specs: Vec<EntitySpec> = workspace
        .layers()
        .iter()
        .filter(|layer| layer.visible)
        .flat_map(|layer| workspace.features_of(layer.id).map(move |feature| (feature, layer)))
        .filter(|(feature, _)| Some(feature.id) != hidden)
        .filter_map(|(feature, layer)| feature_spec(feature, layer, interaction))
        .collect();

    if let Some(session) = interaction.drag_session() {
        if let Some(ghost) = session.ghost_entity() {
            specs.push(ghost);
        }
        if interaction.is_editing_vertices() {
            let armed = interaction.armed_vertex();
            specs.extend(
                session
                    .original()
                    .iter()
                    .enumerate()
                    .map(|(index, position)| handle_spec(index, *position, armed == Some(index))),
            );
        }
    }

    specs.extend(draw_preview_specs(interaction.draw_points()));
    specs
}

fn feature_spec(feature: &Feature, layer: &Layer, interaction: &InteractionMachine) -> Option<EntitySpec> {
    let positions = feature.geometry.to_world();
    let first = *positions.first()?;
    let shape = match layer.kind {
        LayerKind::Point => EntityShape::Point(first),
        LayerKind::Comment => EntityShape::Billboard(first),
        LayerKind::Line => EntityShape::Polyline(positions),
        LayerKind::Polygon => {
            let extrusion = feature.extrusion();
            let base = feature.geometry.positions()[0].height;
            EntityShape::Polygon {
                positions,
                extruded_height: (extrusion > 0.0).then_some(base + extrusion),
            }
        }
    };
    let emphasis = interaction.highlight().emphasis_of(feature.id);
    Some(EntitySpec {
        id: EntityRef::for_feature(feature.id),
        shape,
        visual: feature_visual(layer, feature, emphasis),
        show: true,
    })
}

/// The armed handle is hidden while its vertex is being dragged
fn handle_spec(index: usize, position: WorldPoint, armed: bool) -> EntitySpec {
    let (color, size) = if armed {
        (vertex_handle::ARMED_FILL, vertex_handle::ARMED_SIZE)
    } else {
        (vertex_handle::FILL, vertex_handle::SIZE)
    };
    EntitySpec {
        id: EntityRef::vertex_handle(index),
        shape: EntityShape::Point(position),
        visual: EntityVisual {
            color,
            outline_color: vertex_handle::OUTLINE,
            outline_width: vertex_handle::OUTLINE_WIDTH,
            size,
        },
        show: !armed,
    }
}

fn draw_preview_specs(points: &[WorldPoint]) -> Vec<EntitySpec> {
    if points.is_empty() {
        return Vec::new();
    }
    let marker = EntityVisual {
        color: draw_preview::COLOR,
        outline_color: draw_preview::COLOR,
        outline_width: 0.0,
        size: draw_preview::POINT_SIZE,
    };
    let line = EntitySpec {
        id: EntityRef::draw_preview(DRAW_PREVIEW_LINE),
        shape: EntityShape::Polyline(points.to_vec()),
        visual: EntityVisual {
            size: draw_preview::LINE_WIDTH,
            ..marker
        },
        show: true,
    };
    std::iter::once(line)
        .chain(points.iter().enumerate().map(|(i, p)| EntitySpec {
            id: EntityRef::draw_preview(&i.to_string()),
            shape: EntityShape::Point(*p),
            visual: marker,
            show: true,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::interaction::test_support::*;
    use crate::scene::{EntityClass, HeadlessScene};
    use crate::style::Emphasis;
    use crate::theme;

    fn ids(specs: &[EntitySpec]) -> Vec<String> {
        specs.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn binds_visible_features_in_layer_order() {
        let ws = workspace();
        let machine = InteractionMachine::default();
        let specs = entity_specs(&ws, &machine);
        assert_eq!(ids(&specs), vec!["1", "2", "3"]);
        assert!(matches!(specs[0].shape, EntityShape::Point(_)));
        assert!(matches!(specs[1].shape, EntityShape::Polyline(_)));
        assert!(matches!(
            specs[2].shape,
            EntityShape::Polygon {
                extruded_height: None,
                ..
            }
        ));
    }

    #[test]
    fn selected_feature_is_bound_with_selection_visual() {
        let ws = workspace();
        let mut scene = HeadlessScene::new();
        let mut machine = InteractionMachine::default();
        machine.select(&mut scene, &ws, Some(TREE));

        let mut binding = SceneBinding::new();
        binding.rebuild(&mut scene, &ws, &machine);
        let (feature, layer) = ws.feature_with_layer(TREE).unwrap();
        assert_eq!(
            scene.entity(&EntityRef::for_feature(TREE)).unwrap().visual,
            feature_visual(layer, feature, Emphasis::Selected)
        );
    }

    #[test]
    fn relocation_hides_original_and_binds_ghost() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        machine.select(&mut scene, &ws, Some(BLOCK));
        machine.start_relocation(&mut scene, &ws).unwrap();

        let specs = entity_specs(&ws, &machine);
        assert_eq!(ids(&specs), vec!["1", "2", "ghost_preview"]);
        let ghost = specs.last().unwrap();
        assert_eq!(ghost.visual.outline_width, theme::ghost::POLYGON_OUTLINE_WIDTH);
    }

    #[test]
    fn vertex_edit_binds_handles_and_hides_armed_one() {
        let ws = workspace();
        let mut scene = HeadlessScene::new();
        let mut machine = InteractionMachine::default();
        let mut binding = SceneBinding::new();
        machine.select(&mut scene, &ws, Some(ROAD));
        machine.start_vertex_edit(&mut scene, &ws).unwrap();
        binding.rebuild(&mut scene, &ws, &machine);

        let handles: Vec<_> = scene
            .entity_ids()
            .filter(|e| matches!(e.classify(), EntityClass::VertexHandle(_)))
            .cloned()
            .collect();
        assert_eq!(handles.len(), 2);
        // No ghost until a vertex is armed
        assert!(scene.entity(&EntityRef::ghost()).is_none());
        assert!(scene.entity(&EntityRef::for_feature(ROAD)).is_none());

        scene.script_pick(at(3.0, 3.0), Some(EntityRef::vertex_handle(1)), None);
        machine.on_click(&mut scene, &ws, at(3.0, 3.0));
        binding.rebuild(&mut scene, &ws, &machine);
        assert!(!scene.entity(&EntityRef::vertex_handle(1)).unwrap().show);
        assert!(scene.entity(&EntityRef::vertex_handle(0)).unwrap().show);
        assert!(matches!(
            scene.entity(&EntityRef::ghost()).unwrap().shape,
            EntityShape::Polyline(_)
        ));
    }

    #[test]
    fn refresh_ghost_only_touches_the_ghost() {
        let ws = workspace();
        let mut scene = HeadlessScene::new();
        let mut machine = InteractionMachine::default();
        let mut binding = SceneBinding::new();
        machine.select(&mut scene, &ws, Some(TREE));
        machine.start_relocation(&mut scene, &ws).unwrap();
        binding.rebuild(&mut scene, &ws, &machine);
        let count = scene.entity_count();

        let target = crate::geo::Geographic::new(10.2, 45.2, 0.0).to_world();
        scene.script_pick(at(9.0, 9.0), None, Some(target));
        assert!(machine.on_pointer_move(&mut scene, &ws, at(9.0, 9.0)));
        binding.refresh_ghost(&mut scene, &machine);

        assert_eq!(scene.entity_count(), count);
        assert_eq!(scene.entity(&EntityRef::ghost()).unwrap().shape, EntityShape::Point(target));

        machine.cancel(&mut scene, &ws);
        binding.refresh_ghost(&mut scene, &machine);
        assert!(scene.entity(&EntityRef::ghost()).is_none());
    }

    #[test]
    fn ghost_missing_from_scene_is_still_forgotten() {
        let ws = workspace();
        let mut scene = HeadlessScene::new();
        let mut machine = InteractionMachine::default();
        let mut binding = SceneBinding::new();
        machine.select(&mut scene, &ws, Some(TREE));
        machine.start_relocation(&mut scene, &ws).unwrap();
        binding.rebuild(&mut scene, &ws, &machine);
        assert!(binding.placed.contains(&EntityRef::ghost()));

        scene.remove_entity(&EntityRef::ghost()).unwrap();
        machine.cancel(&mut scene, &ws);
        binding.refresh_ghost(&mut scene, &machine);
        assert!(!binding.placed.contains(&EntityRef::ghost()));
        assert!(scene.entity(&EntityRef::ghost()).is_none());
    }

    #[test]
    fn drawing_preview_follows_accumulated_points() {
        let ws = workspace();
        let mut scene = scene(&ws);
        let mut machine = InteractionMachine::default();
        machine.set_active_layer(&mut scene, &ws, Some(ROADS));
        machine.start_drawing(&mut scene, &ws).unwrap();
        assert_eq!(entity_specs(&ws, &machine).len(), 3);

        scene.script_pick(at(1.0, 1.0), None, Some(crate::geo::Geographic::new(11.0, 45.0, 0.0).to_world()));
        scene.script_pick(at(2.0, 1.0), None, Some(crate::geo::Geographic::new(11.1, 45.0, 0.0).to_world()));
        machine.on_click(&mut scene, &ws, at(1.0, 1.0));
        machine.on_click(&mut scene, &ws, at(2.0, 1.0));

        let specs = entity_specs(&ws, &machine);
        assert_eq!(
            ids(&specs)[3..],
            ["draw_preview_line", "draw_preview_0", "draw_preview_1"]
        );
    }
}
