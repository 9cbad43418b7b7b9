//! Semantic animation clips and deterministic tick logic.
//!
//! Gameplay selects clips by name ("idle", "run", "walk", ...) and asks for
//! the current frame index for a facing direction. Decoding sprite sheets is
//! left to whoever draws the frame; a clip here is only a frame count and a
//! per-frame duration.
//!
//! All timing uses integer microseconds (`u64`) so advancement is identical
//! across platforms under a fixed timestep. The JSON format stores `fps` for
//! readability; on load it becomes `frame_duration_us`.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A named run of equally timed frames that can loop or play once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    pub frame_count: usize,
    pub frame_duration_us: u64,
    pub looping: bool,
}

impl AnimationClip {
    pub fn from_fps(frame_count: usize, fps: u32, looping: bool) -> Self {
        Self {
            frame_count,
            frame_duration_us: 1_000_000 / u64::from(fps.max(1)),
            looping,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frame_duration_us * self.frame_count as u64
    }
}

/// Clips keyed by semantic name.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    pub library_id: String,
    clips: HashMap<String, AnimationClip>,
}

impl ClipLibrary {
    pub fn new(library_id: &str) -> Self {
        Self {
            library_id: library_id.to_string(),
            clips: HashMap::new(),
        }
    }

    pub fn with_clip(mut self, name: &str, clip: AnimationClip) -> Self {
        self.insert(name, clip);
        self
    }

    pub fn insert(&mut self, name: &str, clip: AnimationClip) {
        self.clips.insert(name.to_string(), clip);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// The frame a renderer should draw this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub clip_name: &'a str,
    pub index: usize,
    /// Sheets are authored facing right; a negative direction mirrors them.
    pub mirrored: bool,
}

/// Runtime state for one active animation instance.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    /// Switch to `clip_name` and restart it from the first frame.
    pub fn play(&mut self, clip_name: &str) {
        self.clip_name.clear();
        self.clip_name.push_str(clip_name);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed_us = 0;
        self.finished = false;
    }

    /// Advance by `dt_us` microseconds and return the current frame index.
    /// Integer arithmetic only.
    pub fn tick(&mut self, dt_us: u64, clip: &AnimationClip) -> usize {
        if clip.frame_count == 0 || clip.frame_duration_us == 0 || self.finished {
            return self.frame_index;
        }

        self.elapsed_us += dt_us;

        while self.elapsed_us >= clip.frame_duration_us {
            self.elapsed_us -= clip.frame_duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frame_count {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frame_count - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        self.frame_index
    }

    pub fn current_frame(&self, direction: i8) -> FrameRef<'_> {
        FrameRef {
            clip_name: &self.clip_name,
            index: self.frame_index,
            mirrored: direction < 0,
        }
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct ClipLibraryJson {
    version: String,
    library_id: String,
    clips: HashMap<String, AnimationClipJson>,
}

#[derive(Debug, Deserialize)]
struct AnimationClipJson {
    frames: usize,
    fps: u32,
    #[serde(default = "default_looping")]
    looping: bool,
}

/// Load a clip library definition from disk.
pub fn load_clip_library(path: &Path) -> Result<ClipLibrary, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read clip library {}: {e}", path.display()))?;
    parse_clip_library(&raw)
        .map_err(|e| format!("Failed to load clip library {}: {e}", path.display()))
}

pub fn parse_clip_library(raw: &str) -> Result<ClipLibrary, String> {
    let json: ClipLibraryJson =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    validate_clip_library(&json)?;

    let mut library = ClipLibrary::new(&json.library_id);
    for (name, clip) in json.clips {
        library.insert(
            &name,
            AnimationClip::from_fps(clip.frames, clip.fps, clip.looping),
        );
    }
    Ok(library)
}

fn validate_clip_library(json: &ClipLibraryJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Clip library validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.library_id.is_empty() {
        return Err("Clip library validation failed: library_id is empty".to_string());
    }
    for (name, clip) in &json.clips {
        if clip.frames == 0 {
            return Err(format!(
                "Clip library validation failed: clip '{}' has no frames",
                name
            ));
        }
        if clip.fps == 0 {
            return Err(format!(
                "Clip library validation failed: clip '{}' has zero fps",
                name
            ));
        }
    }
    Ok(())
}

const fn default_looping() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dino_clips_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn clip(frames: usize, looping: bool) -> AnimationClip {
        AnimationClip {
            frame_count: frames,
            frame_duration_us: 100_000,
            looping,
        }
    }

    #[test]
    fn tick_advances_through_frames() {
        let clip = clip(3, true);
        let mut state = AnimationState::new("walk");

        assert_eq!(state.tick(0, &clip), 0);
        assert_eq!(state.tick(50_000, &clip), 0);
        // 110ms total
        assert_eq!(state.tick(60_000, &clip), 1);
    }

    #[test]
    fn looping_wraps_around() {
        let clip = clip(2, true);
        let mut state = AnimationState::new("idle");
        assert_eq!(state.tick(250_000, &clip), 0);
        assert!(!state.finished);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let clip = clip(2, false);
        let mut state = AnimationState::new("jump_up");

        assert_eq!(state.tick(300_000, &clip), 1);
        assert!(state.finished);
        assert_eq!(state.tick(100_000, &clip), 1);
    }

    #[test]
    fn play_restarts_from_first_frame() {
        let clip = clip(4, true);
        let mut state = AnimationState::new("run");
        state.tick(250_000, &clip);
        assert_eq!(state.frame_index, 2);

        state.play("fall");
        assert_eq!(state.clip_name, "fall");
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.elapsed_us, 0);
    }

    #[test]
    fn current_frame_mirrors_when_facing_left() {
        let state = AnimationState::new("run");
        assert!(!state.current_frame(1).mirrored);
        let frame = state.current_frame(-1);
        assert!(frame.mirrored);
        assert_eq!(frame.clip_name, "run");
        assert_eq!(frame.index, 0);
    }

    #[test]
    fn from_fps_converts_to_microseconds() {
        let clip = AnimationClip::from_fps(9, 10, true);
        assert_eq!(clip.frame_duration_us, 100_000);
        assert_eq!(clip.total_duration_us(), 900_000);
    }

    #[test]
    fn load_clip_library_parses_valid_json() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "library_id": "dino",
              "clips": {
                "run": { "frames": 9, "fps": 14 },
                "jump_up": { "frames": 6, "fps": 10, "looping": false }
              }
            }"#,
        )
        .expect("write temp file");

        let library = load_clip_library(&path).expect("should parse");
        assert_eq!(library.library_id, "dino");
        assert_eq!(library.len(), 2);
        assert!(library.get("run").unwrap().looping);
        assert!(!library.get("jump_up").unwrap().looping);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn parse_clip_library_rejects_zero_frames() {
        let err = parse_clip_library(
            r#"{ "version": "0.1", "library_id": "x", "clips": { "idle": { "frames": 0, "fps": 10 } } }"#,
        )
        .expect_err("zero frames should fail");
        assert!(err.contains("no frames"));
    }

    #[test]
    fn parse_clip_library_rejects_bad_version() {
        let err = parse_clip_library(r#"{ "version": "9.9", "library_id": "x", "clips": {} }"#)
            .expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
    }
}
