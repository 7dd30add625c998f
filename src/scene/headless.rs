// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory scene with scripted picking.
//!
//! Nothing is drawn. Entities are kept in a map so their shapes and visuals
//! can be inspected, and pick results are scripted per screen point. Picking
//! only reports entities that are currently placed and shown, like a real
//! engine would.

use super::{CameraTarget, EntityRef, EntityShape, EntitySpec, EntityVisual, Scene, SceneError, ScreenPoint};
use crate::geo::WorldPoint;
use std::collections::BTreeMap;

/// Screen points closer than this (pixels) resolve to the same scripted pick
const PICK_TOLERANCE: f64 = 0.5;

/// What the scene reports under one screen point
#[derive(Debug, Clone, Default)]
struct ScriptedPick {
    at: ScreenPoint,
    entity: Option<EntityRef>,
    position: Option<WorldPoint>,
    terrain: Option<WorldPoint>,
}

/// Scene implementation without a renderer
#[derive(Debug, Default)]
pub struct HeadlessScene {
    entities: BTreeMap<EntityRef, EntitySpec>,
    picks: Vec<ScriptedPick>,
    last_flight: Option<(CameraTarget, f64)>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the entity and surface position under `at`
    pub fn script_pick(&mut self, at: ScreenPoint, entity: Option<EntityRef>, position: Option<WorldPoint>) {
        let pick = self.pick_slot(at);
        pick.entity = entity;
        pick.position = position;
    }

    /// Script the terrain ray-cast result under `at`
    pub fn script_terrain(&mut self, at: ScreenPoint, position: Option<WorldPoint>) {
        self.pick_slot(at).terrain = position;
    }

    pub fn entity(&self, id: &EntityRef) -> Option<&EntitySpec> {
        self.entities.get(id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityRef> {
        self.entities.keys()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Most recent camera flight (target, duration)
    pub fn last_flight(&self) -> Option<(CameraTarget, f64)> {
        self.last_flight
    }

    fn pick_slot(&mut self, at: ScreenPoint) -> &mut ScriptedPick {
        let index = match self.picks.iter().position(|p| p.at.distance(at) < PICK_TOLERANCE) {
            Some(index) => index,
            None => {
                self.picks.push(ScriptedPick {
                    at,
                    ..Default::default()
                });
                self.picks.len() - 1
            }
        };
        &mut self.picks[index]
    }

    fn scripted(&self, at: ScreenPoint) -> Option<&ScriptedPick> {
        self.picks.iter().find(|p| p.at.distance(at) < PICK_TOLERANCE)
    }
}

impl Scene for HeadlessScene {
    fn pick_entity(&self, at: ScreenPoint) -> Option<EntityRef> {
        let entity = self.scripted(at)?.entity.as_ref()?;
        self.entities
            .get(entity)
            .filter(|spec| spec.show)
            .map(|spec| spec.id.clone())
    }

    fn pick_position(&self, at: ScreenPoint) -> Option<WorldPoint> {
        self.scripted(at)?.position
    }

    fn pick_terrain(&self, at: ScreenPoint) -> Option<WorldPoint> {
        self.scripted(at)?.terrain
    }

    fn place_entity(&mut self, spec: EntitySpec) -> Result<EntityRef, SceneError> {
        if self.entities.contains_key(&spec.id) {
            return Err(SceneError::DuplicateEntity(spec.id));
        }
        let id = spec.id.clone();
        self.entities.insert(id.clone(), spec);
        Ok(id)
    }

    fn remove_entity(&mut self, entity: &EntityRef) -> Result<(), SceneError> {
        self.entities
            .remove(entity)
            .map(|_| ())
            .ok_or_else(|| SceneError::EntityNotFound(entity.clone()))
    }

    fn set_entity_visual(&mut self, entity: &EntityRef, visual: EntityVisual) -> Result<(), SceneError> {
        let spec = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| SceneError::EntityNotFound(entity.clone()))?;
        spec.visual = visual;
        Ok(())
    }

    fn set_entity_shape(&mut self, entity: &EntityRef, shape: EntityShape) -> Result<(), SceneError> {
        let spec = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| SceneError::EntityNotFound(entity.clone()))?;
        spec.shape = shape;
        Ok(())
    }

    fn fly_camera_to(&mut self, target: CameraTarget, duration_seconds: f64) {
        self.last_flight = Some((target, duration_seconds));
    }
}
