//! The world owns every entity list and advances them one frame at a time.
//!
//! Static colliders and interactables are ordered `Vec`s with stable
//! iteration order; collision and interaction resolution depend on that
//! order, which makes a run reproducible from its inputs alone.

use dino_core::input::InputSnapshot;
use dino_core::time::sanitize_delta;

use crate::behavior::{Behavior, Interactable};
use crate::events::GameEvent;
use crate::geometry::StaticCollider;
use crate::player::Player;

/// Longest frame the simulation will integrate in one step.
pub const MAX_STEP_DELTA: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

pub struct World {
    pub statics: Vec<StaticCollider>,
    pub interactables: Vec<Behavior>,
    pub player: Player,
    pub bounds: WorldBounds,
    pub frame: u64,
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(player: Player, bounds: WorldBounds) -> Self {
        Self {
            statics: Vec::new(),
            interactables: Vec::new(),
            player,
            bounds,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn add_static(&mut self, collider: StaticCollider) {
        self.statics.push(collider);
    }

    pub fn add_interactable(&mut self, object: Behavior) {
        self.interactables.push(object);
    }

    #[allow(dead_code)]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame: player first, then every interactable, then the
    /// out-of-bounds check.
    pub fn step(&mut self, delta: f32, input: &InputSnapshot) {
        let delta = sanitize_delta(f64::from(delta), f64::from(MAX_STEP_DELTA)) as f32;

        self.player.update(
            delta,
            input,
            &self.statics,
            &mut self.interactables,
            &mut self.events,
        );

        for object in &mut self.interactables {
            object.update(delta, &self.statics);
        }

        if !self.player.is_dead() && self.player.rect().top() > self.bounds.height {
            self.player.on_fell_out_of_bounds(&mut self.events);
        }

        self.frame += 1;
    }
}
