//! Objects that react when the player's hitbox overlaps them.
//!
//! `Behavior` is the closed set of interactable kinds a level can contain.
//! Reactions never remove themselves from the world directly: `on_collide`
//! returns a `Reaction` and the world sweeps `Remove`d objects after the
//! interaction scan finishes.

use dino_core::animation::{AnimationClip, AnimationState, ClipLibrary, FrameRef};
use glam::Vec2;

use crate::events::GameEvent;
use crate::geometry::{Rect, StaticCollider};
use crate::hitbox::{AlphaBounds, Hitbox, HitboxSet, DEFAULT_HITBOX};
use crate::physics::MovingBody;
use crate::player::Player;

/// How far (in world units) the player's feet may sit below an enemy's top
/// edge and still count as a stomp.
pub const STOMP_THRESHOLD: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Keep,
    Remove,
}

pub trait Interactable {
    fn rect(&self) -> Rect;

    fn on_collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) -> Reaction;

    fn update(&mut self, _delta: f32, _statics: &[StaticCollider]) {}
}

#[derive(Debug, Clone)]
pub struct LetterPickUp {
    pub letter: char,
    pub hitbox: Hitbox,
}

impl LetterPickUp {
    pub fn new(position: Vec2, letter: char, source: &impl AlphaBounds) -> Self {
        Self {
            letter,
            hitbox: Hitbox::from_source(position, source),
        }
    }
}

impl Interactable for LetterPickUp {
    fn rect(&self) -> Rect {
        self.hitbox.rect
    }

    fn on_collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) -> Reaction {
        player.on_pickup_letter(self.letter, events);
        Reaction::Remove
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: MovingBody,
    pub current_direction: i8,
}

impl Enemy {
    pub fn new(position: Vec2, source: &impl AlphaBounds, has_gravity: bool) -> Self {
        let hitboxes = HitboxSet::new(DEFAULT_HITBOX, position, source);
        Self {
            body: MovingBody::new(position, hitboxes, has_gravity),
            current_direction: 1,
        }
    }

    /// A player rising into the enemy with their feet no lower than
    /// `STOMP_THRESHOLD` below its top edge.
    pub fn is_stomped_by(&self, player: &Player) -> bool {
        player.body.velocity.y < 0.0
            && player.rect().bottom() <= self.body.rect().top() + STOMP_THRESHOLD
    }
}

impl Interactable for Enemy {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn on_collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) -> Reaction {
        if self.is_stomped_by(player) {
            player.on_stomp();
            events.push(GameEvent::EnemyStomped);
            Reaction::Remove
        } else {
            player.on_hit_by_enemy("enemy", self.current_direction, events);
            Reaction::Keep
        }
    }

    fn update(&mut self, delta: f32, statics: &[StaticCollider]) {
        self.body.step(delta, statics);
    }
}

pub fn default_worm_clips() -> ClipLibrary {
    ClipLibrary::new("worm").with_clip("walk", AnimationClip::from_fps(5, 10, true))
}

/// Patrols back and forth: turns around after `max_distance` or on bumping
/// into a wall.
#[derive(Debug, Clone)]
pub struct Worm {
    pub enemy: Enemy,
    pub speed_x: f32,
    pub distance: f32,
    pub max_distance: f32,
    pub animation: AnimationState,
    clips: ClipLibrary,
}

impl Worm {
    pub fn new(position: Vec2, source: &impl AlphaBounds) -> Self {
        Self {
            enemy: Enemy::new(position, source, true),
            speed_x: 10.0,
            distance: 0.0,
            max_distance: 50.0,
            animation: AnimationState::new("walk"),
            clips: default_worm_clips(),
        }
    }

    #[allow(dead_code)]
    pub fn current_frame(&self) -> FrameRef<'_> {
        self.animation.current_frame(self.enemy.current_direction)
    }
}

impl Interactable for Worm {
    fn rect(&self) -> Rect {
        self.enemy.rect()
    }

    fn on_collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) -> Reaction {
        self.enemy.on_collide(player, events)
    }

    fn update(&mut self, delta: f32, statics: &[StaticCollider]) {
        let body = &mut self.enemy.body;
        body.velocity.x = f32::from(self.enemy.current_direction) * self.speed_x;
        body.step(delta, statics);

        if !body.has_collided {
            self.distance += (body.velocity.x * delta).abs();
        }
        if self.distance >= self.max_distance || body.has_collided {
            self.enemy.current_direction = -self.enemy.current_direction;
            self.distance = 0.0;
            body.has_collided = false;
        }

        let dt_us = (f64::from(delta) * 1_000_000.0).round() as u64;
        if let Some(clip) = self.clips.get(&self.animation.clip_name) {
            self.animation.tick(dt_us, clip);
        }
    }
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Letter(LetterPickUp),
    Enemy(Enemy),
    Worm(Worm),
}

impl Interactable for Behavior {
    fn rect(&self) -> Rect {
        match self {
            Self::Letter(letter) => letter.rect(),
            Self::Enemy(enemy) => enemy.rect(),
            Self::Worm(worm) => worm.rect(),
        }
    }

    fn on_collide(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) -> Reaction {
        match self {
            Self::Letter(letter) => letter.on_collide(player, events),
            Self::Enemy(enemy) => enemy.on_collide(player, events),
            Self::Worm(worm) => worm.on_collide(player, events),
        }
    }

    fn update(&mut self, delta: f32, statics: &[StaticCollider]) {
        match self {
            Self::Letter(letter) => letter.update(delta, statics),
            Self::Enemy(enemy) => enemy.update(delta, statics),
            Self::Worm(worm) => worm.update(delta, statics),
        }
    }
}
