//! Physical key tracking and the logical per-frame input gameplay reads.
//!
//! Movement, jumping and crouching are all level-triggered: an action is on
//! every frame one of its keys is held. Gameplay never looks at physical keys
//! directly; the driver calls `snapshot()` and hands the resulting
//! `InputSnapshot` to the simulation.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    LCtrl,
    W,
    A,
    S,
    D,
}

/// Logical pressed/not-pressed state for one simulation frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InputSnapshot {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub crouch: bool,
}

impl InputSnapshot {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        jump: false,
        crouch: false,
    };

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::NONE
        }
    }

    pub fn crouch() -> Self {
        Self {
            crouch: true,
            ..Self::NONE
        }
    }

    /// Actions on in either snapshot.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left || other.left,
            right: self.right || other.right,
            jump: self.jump || other.jump,
            crouch: self.crouch || other.crouch,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.held.contains(key))
    }

    /// Collapse the physical key set into the logical actions gameplay reads.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.any_held(&[Key::A, Key::Left]),
            right: self.any_held(&[Key::D, Key::Right]),
            jump: self.any_held(&[Key::Space, Key::W, Key::Up]),
            crouch: self.any_held(&[Key::LCtrl, Key::S, Key::Down]),
        }
    }
}
