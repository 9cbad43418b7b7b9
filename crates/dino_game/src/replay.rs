use dino_core::input::{InputSnapshot, InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

/// One recorded input held for `repeat` consecutive frames. Actions can be
/// given directly or as the physical keys that were held.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(flatten)]
    pub input: InputSnapshot,
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    pub fn snapshot(&self) -> InputSnapshot {
        let mut held = InputState::new();
        for key in &self.keys {
            held.key_down(*key);
        }
        self.input.union(held.snapshot())
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<InputSnapshot> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let input = frame.snapshot();
            for _ in 0..frame.repeat.max(1) {
                out.push(input);
            }
        }
        out
    }

    pub fn duration_secs(&self) -> f32 {
        self.expanded_inputs().len() as f32 * self.fixed_dt
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt.is_nan() || replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
