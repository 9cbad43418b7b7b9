//! Integrate-and-resolve for anything that moves through static geometry.
//!
//! The algorithm is **axis-separated**: move along X, fix up against the
//! first overlapping static collider, then move along Y from the corrected X
//! and fix up again. Each axis resolves at most one obstacle, the first one
//! in the world's list order. Overlapping static geometry or simultaneous
//! contact with several colliders can therefore leave an entity clamped to
//! the wrong edge; levels are expected to avoid stacking solids.
//!
//! `position` is the sub-pixel truth. The hitbox rect is rebuilt from it
//! before every test, and collision clamping writes the corrected rect back
//! into `position`, never the other way round.

use glam::Vec2;
use serde::Deserialize;

use crate::geometry::{collides_with_statics, first_hit, Rect, StaticCollider};
use crate::hitbox::HitboxSet;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s^2 (30 per frame at 60 Hz).
    pub gravity: f32,
    pub max_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            max_fall_speed: 800.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MovingBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitboxes: HitboxSet,
    pub has_gravity: bool,
    /// Set when the X pass hit something this step.
    pub has_collided: bool,
    pub physics: PhysicsConfig,
}

impl MovingBody {
    pub fn new(position: Vec2, hitboxes: HitboxSet, has_gravity: bool) -> Self {
        let mut body = Self {
            position,
            velocity: Vec2::ZERO,
            hitboxes,
            has_gravity,
            has_collided: false,
            physics: PhysicsConfig::default(),
        };
        body.hitboxes.sync_to(position);
        body
    }

    pub fn rect(&self) -> Rect {
        self.hitboxes.rect()
    }

    #[allow(dead_code)]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.hitboxes.sync_to(position);
    }

    /// One-unit downward probe. Not a persistent contact flag: it is
    /// recomputed every time it is asked.
    pub fn is_grounded(&self, statics: &[StaticCollider]) -> bool {
        collides_with_statics(&self.rect().moved(0.0, 1.0), statics)
    }

    pub fn step(&mut self, delta: f32, statics: &[StaticCollider]) {
        if self.has_gravity {
            self.velocity.y =
                (self.velocity.y + self.physics.gravity * delta).min(self.physics.max_fall_speed);
        }

        let dx = self.velocity.x * delta;
        let dy = self.velocity.y * delta;
        self.has_collided = false;

        self.position.x += dx;
        self.hitboxes.sync_to(self.position);
        let rect = self.rect();
        if let Some(obstacle) = first_hit(&rect, statics) {
            self.has_collided = true;
            let mut clamped = rect;
            if dx > 0.0 {
                clamped.x = obstacle.rect.left() - rect.width;
            } else if dx < 0.0 {
                clamped.x = obstacle.rect.right();
            }
            self.position.x = self.hitboxes.set_active_rect(clamped).x;
        }

        self.position.y += dy;
        self.hitboxes.sync_to(self.position);
        let rect = self.rect();
        if let Some(obstacle) = first_hit(&rect, statics) {
            let mut clamped = rect;
            if dy > 0.0 {
                clamped.y = obstacle.rect.top() - rect.height;
                self.velocity.y = 0.0;
            } else if dy < 0.0 {
                clamped.y = obstacle.rect.bottom();
                self.velocity.y = 0.0;
            }
            self.position.y = self.hitboxes.set_active_rect(clamped).y;
        }
    }
}
