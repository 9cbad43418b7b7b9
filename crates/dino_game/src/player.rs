//! The player: a `MovingBody` driven by a small finite state machine.
//!
//! Each frame runs, in order:
//!  1. interaction scan against the world's interactables
//!  2. input + grounded status -> next `PlayerState`
//!  3. invincibility timer (overrides horizontal velocity during knockback)
//!  4. physics integration and collision resolution
//!  5. animation tick
//!
//! What a state *looks* like (animation clip, sound cue, hitbox shape) lives
//! in one table, `PlayerState::profile`, so the control flow below only
//! decides which state to be in.

use dino_core::animation::{AnimationClip, AnimationState, ClipLibrary, FrameRef};
use dino_core::input::InputSnapshot;
use glam::Vec2;
use serde::Deserialize;

use crate::behavior::{Behavior, Interactable, Reaction};
use crate::events::{Ability, GameEvent, SoundCue};
use crate::geometry::{Rect, StaticCollider};
use crate::hitbox::{HitboxError, HitboxSet, CROUCH_HITBOX, DEFAULT_HITBOX};
use crate::physics::MovingBody;

pub const MAX_LETTERS: usize = 5;

/// Marks an open invincibility window on the frame the hit lands, before the
/// timer has advanced. Any non-zero `time_since_hit` means "window open".
const HIT_WINDOW_OPEN: f32 = f32::MIN_POSITIVE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Idle,
    Run,
    Jump,
    Fall,
    Duck,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateProfile {
    pub animation: &'static str,
    pub sound: Option<SoundCue>,
    pub hitbox: &'static str,
}

impl PlayerState {
    #[allow(dead_code)]
    pub const ALL: [PlayerState; 6] = [
        Self::Idle,
        Self::Run,
        Self::Jump,
        Self::Fall,
        Self::Duck,
        Self::Dead,
    ];

    pub const fn profile(self) -> StateProfile {
        match self {
            Self::Idle => StateProfile {
                animation: "idle",
                sound: Some(SoundCue::Idle),
                hitbox: DEFAULT_HITBOX,
            },
            Self::Run => StateProfile {
                animation: "run",
                sound: Some(SoundCue::Run),
                hitbox: DEFAULT_HITBOX,
            },
            Self::Jump => StateProfile {
                animation: "jump_up",
                sound: Some(SoundCue::JumpUp),
                hitbox: DEFAULT_HITBOX,
            },
            Self::Fall => StateProfile {
                animation: "fall",
                sound: Some(SoundCue::Fall),
                hitbox: DEFAULT_HITBOX,
            },
            Self::Duck => StateProfile {
                animation: "duck",
                sound: None,
                hitbox: CROUCH_HITBOX,
            },
            // No dedicated death clip yet; the idle clip stands in.
            Self::Dead => StateProfile {
                animation: "idle",
                sound: None,
                hitbox: DEFAULT_HITBOX,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub speed_x: f32,
    pub jump_force: f32,
    pub lives: u32,
    pub invincibility_time: f32,
    pub knockback_speed: f32,
    pub knockback_lift: f32,
    pub stomp_bounce: f32,
    pub jump_unlocked: bool,
    pub crouch_unlocked: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed_x: 70.0,
            jump_force: 400.0,
            lives: 3,
            invincibility_time: 0.7,
            knockback_speed: 250.0,
            knockback_lift: 300.0,
            stomp_bounce: 250.0,
            jump_unlocked: false,
            crouch_unlocked: false,
        }
    }
}

/// Standing and crouching shapes on the 24x24 dino canvas.
pub fn default_player_hitboxes(position: Vec2) -> HitboxSet {
    let mut hitboxes = HitboxSet::new(DEFAULT_HITBOX, position, &Rect::new(4.0, 2.0, 16.0, 22.0));
    hitboxes.add(CROUCH_HITBOX, position, &Rect::new(4.0, 12.0, 16.0, 12.0));
    hitboxes
}

pub fn default_player_clips() -> ClipLibrary {
    ClipLibrary::new("dino")
        .with_clip("idle", AnimationClip::from_fps(6, 10, true))
        .with_clip("run", AnimationClip::from_fps(9, 14, true))
        .with_clip("jump_up", AnimationClip::from_fps(6, 10, true))
        .with_clip("fall", AnimationClip::from_fps(8, 10, true))
        .with_clip("duck", AnimationClip::from_fps(4, 10, true))
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: MovingBody,
    pub tuning: PlayerTuning,
    pub state: PlayerState,
    pub letters_collected: Vec<char>,
    pub is_jump_unlocked: bool,
    pub is_crouch_unlocked: bool,
    pub lives: u32,
    pub current_direction: i8,
    pub bounce_velocity_x: f32,
    pub time_since_hit: f32,
    pub animation: AnimationState,
    clips: ClipLibrary,
}

impl Player {
    /// Both the "default" and "crouch" shapes must be present, and the crouch
    /// shape must stay inside the standing shape's horizontal span: ducking
    /// switches shape without a collision check.
    pub fn new(
        position: Vec2,
        hitboxes: HitboxSet,
        tuning: PlayerTuning,
        clips: ClipLibrary,
    ) -> Result<Self, HitboxError> {
        for name in [DEFAULT_HITBOX, CROUCH_HITBOX] {
            if !hitboxes.contains(name) {
                return Err(HitboxError::Unknown(name.to_string()));
            }
        }
        if let (Some(standing), Some(crouch)) =
            (hitboxes.get(DEFAULT_HITBOX), hitboxes.get(CROUCH_HITBOX))
        {
            if !crouch.fits_within_x(standing) {
                return Err(HitboxError::WiderThan {
                    name: CROUCH_HITBOX.to_string(),
                    outer: DEFAULT_HITBOX.to_string(),
                });
            }
        }
        let mut body = MovingBody::new(position, hitboxes, true);
        body.hitboxes.set_active(DEFAULT_HITBOX, position)?;

        Ok(Self {
            body,
            tuning,
            state: PlayerState::Idle,
            letters_collected: Vec::with_capacity(MAX_LETTERS),
            is_jump_unlocked: tuning.jump_unlocked,
            is_crouch_unlocked: tuning.crouch_unlocked,
            lives: tuning.lives,
            current_direction: 1,
            bounce_velocity_x: 0.0,
            time_since_hit: 0.0,
            animation: AnimationState::new(PlayerState::Idle.profile().animation),
            clips,
        })
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn current_frame(&self) -> FrameRef<'_> {
        self.animation.current_frame(self.current_direction)
    }

    pub fn update(
        &mut self,
        delta: f32,
        input: &InputSnapshot,
        statics: &[StaticCollider],
        interactables: &mut Vec<Behavior>,
        events: &mut Vec<GameEvent>,
    ) {
        self.do_interaction(interactables, events);
        self.handle_movement(input, statics, events);
        self.tick_invincibility(delta);
        self.body.step(delta, statics);
        self.tick_animation(delta);
    }

    /// Call `on_collide` on every interactable overlapping the player, in list
    /// order. Objects asking to be removed are swept after the scan.
    pub fn do_interaction(&mut self, interactables: &mut Vec<Behavior>, events: &mut Vec<GameEvent>) {
        if self.is_dead() {
            return;
        }
        let mut removed = vec![false; interactables.len()];
        for (index, object) in interactables.iter_mut().enumerate() {
            if !self.rect().intersects(&object.rect()) {
                continue;
            }
            if object.on_collide(self, events) == Reaction::Remove {
                removed[index] = true;
            }
        }
        if removed.contains(&true) {
            let mut flags = removed.into_iter();
            interactables.retain(|_| !flags.next().unwrap_or(false));
        }
    }

    pub fn handle_movement(
        &mut self,
        input: &InputSnapshot,
        statics: &[StaticCollider],
        events: &mut Vec<GameEvent>,
    ) {
        if self.is_dead() {
            return;
        }

        let grounded = self.body.is_grounded(statics);
        let mut new_state = self.state;

        if input.left {
            self.body.velocity.x = -self.tuning.speed_x;
            self.current_direction = -1;
            new_state = PlayerState::Run;
        } else if input.right {
            self.body.velocity.x = self.tuning.speed_x;
            self.current_direction = 1;
            new_state = PlayerState::Run;
        } else if grounded {
            self.body.velocity.x = 0.0;
            new_state = PlayerState::Idle;
        }

        if grounded {
            if self.is_jump_unlocked && input.jump {
                self.body.velocity.y = -self.tuning.jump_force;
                new_state = PlayerState::Jump;
            } else if self.is_crouch_unlocked && input.crouch {
                new_state = PlayerState::Duck;
            }
        } else if self.body.velocity.y <= 0.0 {
            new_state = PlayerState::Jump;
        } else {
            new_state = PlayerState::Fall;
        }

        // Standing up needs headroom.
        if self.state == PlayerState::Duck && new_state != PlayerState::Duck {
            match self
                .body
                .hitboxes
                .try_set_active(DEFAULT_HITBOX, self.body.position, statics)
            {
                Ok(true) => {}
                Ok(false) => new_state = PlayerState::Duck,
                Err(err) => {
                    log::error!("Uncrouch failed: {err}");
                    new_state = PlayerState::Duck;
                }
            }
        }

        if new_state != self.state {
            self.state = new_state;
            self.on_state_changed(events);
        }
    }

    /// Apply the state table: restart the clip, emit the cue, switch shape.
    pub fn on_state_changed(&mut self, events: &mut Vec<GameEvent>) {
        let profile = self.state.profile();
        log::debug!("Player state -> {:?}", self.state);

        self.animation.play(profile.animation);
        if let Some(cue) = profile.sound {
            events.push(GameEvent::Sound(cue));
        }
        if let Err(err) = self
            .body
            .hitboxes
            .set_active(profile.hitbox, self.body.position)
        {
            log::error!("Hitbox switch for {:?} failed: {err}", self.state);
        }
    }

    /// Returns false when the hit lands inside an open invincibility window
    /// (or on a dead player) and is ignored.
    pub fn on_hit_by_enemy(&mut self, source: &str, direction: i8, events: &mut Vec<GameEvent>) -> bool {
        if self.is_dead() || self.time_since_hit != 0.0 {
            return false;
        }

        self.bounce_velocity_x = f32::from(direction) * self.tuning.knockback_speed;
        self.body.velocity.y = -self.tuning.knockback_lift;
        self.time_since_hit = HIT_WINDOW_OPEN;

        if self.lives > 1 {
            self.lives -= 1;
            log::debug!("Player hit by {source}, {} lives left", self.lives);
            events.push(GameEvent::Sound(SoundCue::Damage));
            events.push(GameEvent::PlayerHit {
                lives_left: self.lives,
            });
        } else {
            self.on_player_death("hit by enemy", events);
        }
        true
    }

    /// Bounce off a stomped enemy. Clears any knockback in progress.
    pub fn on_stomp(&mut self) {
        self.body.velocity.y = -self.tuning.stomp_bounce;
        self.body.velocity.x = 0.0;
        self.bounce_velocity_x = 0.0;
        self.time_since_hit = 0.0;
    }

    pub fn on_fell_out_of_bounds(&mut self, events: &mut Vec<GameEvent>) {
        self.on_player_death("fell out of bounds", events);
    }

    pub fn on_player_death(&mut self, reason: &str, events: &mut Vec<GameEvent>) {
        if self.is_dead() {
            return;
        }
        log::info!("Player died: {reason}");
        self.lives = 0;
        self.state = PlayerState::Dead;
        self.on_state_changed(events);
        events.push(GameEvent::PlayerDied {
            reason: reason.to_string(),
        });
    }

    /// Returns false (and changes nothing) when the collection is full.
    pub fn on_pickup_letter(&mut self, letter: char, events: &mut Vec<GameEvent>) -> bool {
        if self.letters_collected.len() >= MAX_LETTERS {
            log::warn!(
                "Letter '{letter}' rejected, already holding {}",
                self.letters_collected.iter().collect::<String>()
            );
            return false;
        }

        self.letters_collected.push(letter);
        events.push(GameEvent::LetterCollected(letter));

        let word: String = self
            .letters_collected
            .iter()
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match word.as_str() {
            "JUMP" => self.unlock(Ability::Jump, events),
            "DUCK" => self.unlock(Ability::Crouch, events),
            "BABEL" => {
                log::info!("BABEL spelled, level won");
                events.push(GameEvent::Won);
            }
            _ => return true,
        }
        self.letters_collected.clear();
        true
    }

    fn unlock(&mut self, ability: Ability, events: &mut Vec<GameEvent>) {
        match ability {
            Ability::Jump => self.is_jump_unlocked = true,
            Ability::Crouch => self.is_crouch_unlocked = true,
        }
        log::info!("{ability:?} unlocked");
        events.push(GameEvent::AbilityUnlocked(ability));
    }

    fn tick_invincibility(&mut self, delta: f32) {
        if self.time_since_hit == 0.0 {
            return;
        }
        self.time_since_hit += delta;
        if self.time_since_hit >= self.tuning.invincibility_time {
            self.time_since_hit = 0.0;
            self.bounce_velocity_x = 0.0;
        } else {
            self.body.velocity.x = self.bounce_velocity_x;
        }
    }

    fn tick_animation(&mut self, delta: f32) {
        let dt_us = (f64::from(delta) * 1_000_000.0).round() as u64;
        match self.clips.get(&self.animation.clip_name) {
            Some(clip) => {
                self.animation.tick(dt_us, clip);
            }
            None => log::trace!("No clip '{}' for player", self.animation.clip_name),
        }
    }
}
