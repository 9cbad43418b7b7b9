//! Notifications the simulation emits for the outside world.
//!
//! The core never plays audio or drives UI. It pushes `GameEvent`s into the
//! world's queue and the frame driver drains them after each step.

use std::fmt;

/// Semantic sound cue. Playback, looping and mixing happen elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Idle,
    Run,
    JumpUp,
    Fall,
    Damage,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::JumpUp => "jump_up",
            Self::Fall => "fall",
            Self::Damage => "damage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Jump,
    Crouch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    LetterCollected(char),
    AbilityUnlocked(Ability),
    Won,
    EnemyStomped,
    PlayerHit { lives_left: u32 },
    PlayerDied { reason: String },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sound(cue) => write!(f, "sound '{}'", cue.name()),
            Self::LetterCollected(letter) => write!(f, "letter '{letter}' collected"),
            Self::AbilityUnlocked(ability) => write!(f, "{ability:?} unlocked"),
            Self::Won => f.write_str("word BABEL completed"),
            Self::EnemyStomped => f.write_str("enemy stomped"),
            Self::PlayerHit { lives_left } => write!(f, "player hit ({lives_left} lives left)"),
            Self::PlayerDied { reason } => write!(f, "player died: {reason}"),
        }
    }
}
