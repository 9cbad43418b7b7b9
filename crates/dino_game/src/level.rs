//! Level files: static geometry plus the initial interactable population.
//!
//! A level is plain JSON, validated on load so `build_world` can assume
//! positive sizes and alphabetic letters. Hitbox shapes are either authored
//! inline as `{x, y, width, height}` bounds on the sprite canvas or taken from
//! the alpha bounding box of a PNG.

use std::fs;
use std::path::{Path, PathBuf};

use dino_core::animation::{load_clip_library, ClipLibrary};
use glam::Vec2;
use serde::Deserialize;

use crate::behavior::{Behavior, Enemy, LetterPickUp, Worm};
use crate::geometry::{Rect, StaticCollider};
use crate::hitbox::{load_hitbox_image, AlphaBounds, HitboxSet, CROUCH_HITBOX, DEFAULT_HITBOX};
use crate::physics::PhysicsConfig;
use crate::player::{default_player_clips, Player, PlayerTuning};
use crate::world::{World, WorldBounds};

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub width: f32,
    pub height: f32,
    pub spawn: SpawnPoint,
    pub solids: Vec<Rect>,
    #[serde(default)]
    pub letters: Vec<LetterSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub player: PlayerShapes,
    #[serde(default)]
    pub tuning: PlayerTuning,
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Clip library JSON for the player; built-in clips when absent.
    #[serde(default)]
    pub animations: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LetterSpawn {
    pub x: f32,
    pub y: f32,
    pub letter: char,
    #[serde(default = "default_letter_bounds")]
    pub bounds: Rect,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Worm,
    Static,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
    #[serde(default = "default_enemy_bounds")]
    pub bounds: Rect,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum HitboxSpec {
    Image { image: PathBuf },
    Bounds(Rect),
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerShapes {
    pub default: HitboxSpec,
    pub crouch: HitboxSpec,
}

impl Default for PlayerShapes {
    fn default() -> Self {
        Self {
            default: HitboxSpec::Bounds(Rect::new(4.0, 2.0, 16.0, 22.0)),
            crouch: HitboxSpec::Bounds(Rect::new(4.0, 12.0, 16.0, 12.0)),
        }
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            level.version
        ));
    }
    if level.width <= 0.0 || level.height <= 0.0 {
        return Err("Level validation failed: width and height must be > 0".to_string());
    }
    if level.solids.is_empty() {
        return Err("Level validation failed: solids list is empty".to_string());
    }
    for (i, solid) in level.solids.iter().enumerate() {
        if solid.is_empty() {
            return Err(format!(
                "Level validation failed: solid {i} has non-positive size"
            ));
        }
    }
    for letter in &level.letters {
        if !letter.letter.is_ascii_alphabetic() {
            return Err(format!(
                "Level validation failed: letter pickup '{}' at ({}, {}) is not A-Z",
                letter.letter, letter.x, letter.y
            ));
        }
    }
    for enemy in &level.enemies {
        if enemy.bounds.is_empty() {
            return Err(format!(
                "Level validation failed: enemy at ({}, {}) has an empty hitbox",
                enemy.x, enemy.y
            ));
        }
    }
    if level.spawn.x < 0.0
        || level.spawn.x > level.width
        || level.spawn.y < 0.0
        || level.spawn.y > level.height
    {
        log::warn!(
            "Level '{}' spawns the player outside its bounds at ({}, {})",
            level.level_id,
            level.spawn.x,
            level.spawn.y
        );
    }
    Ok(())
}

/// Canvas-local bounds for one shape. A fully transparent image gives an
/// empty rect, which builds a hitbox that never collides.
fn shape_bounds(shape: &HitboxSpec) -> Result<Rect, String> {
    match shape {
        HitboxSpec::Bounds(bounds) => Ok(*bounds),
        HitboxSpec::Image { image } => {
            Ok(load_hitbox_image(image)?.alpha_bounds().unwrap_or_default())
        }
    }
}

pub fn build_world(level: &LevelFile) -> Result<World, String> {
    let spawn = Vec2::new(level.spawn.x, level.spawn.y);
    let mut hitboxes = HitboxSet::new(DEFAULT_HITBOX, spawn, &shape_bounds(&level.player.default)?);
    hitboxes.add(CROUCH_HITBOX, spawn, &shape_bounds(&level.player.crouch)?);

    let clips: ClipLibrary = match &level.animations {
        Some(path) => load_clip_library(path)?,
        None => default_player_clips(),
    };

    let mut player = Player::new(spawn, hitboxes, level.tuning, clips)
        .map_err(|e| format!("Level '{}': {e}", level.level_id))?;
    player.body.physics = level.physics;

    let mut world = World::new(
        player,
        WorldBounds {
            width: level.width,
            height: level.height,
        },
    );
    for solid in &level.solids {
        world.add_static(StaticCollider::new(*solid));
    }
    for letter in &level.letters {
        world.add_interactable(Behavior::Letter(LetterPickUp::new(
            Vec2::new(letter.x, letter.y),
            letter.letter.to_ascii_uppercase(),
            &letter.bounds,
        )));
    }
    for spawn in &level.enemies {
        let position = Vec2::new(spawn.x, spawn.y);
        let object = match spawn.kind {
            EnemyKind::Worm => {
                let mut worm = Worm::new(position, &spawn.bounds);
                worm.enemy.body.physics = level.physics;
                Behavior::Worm(worm)
            }
            EnemyKind::Static => {
                let mut enemy = Enemy::new(position, &spawn.bounds, false);
                enemy.body.physics = level.physics;
                Behavior::Enemy(enemy)
            }
        };
        world.add_interactable(object);
    }

    log::info!(
        "Level '{}' loaded: {} solids, {} letters, {} enemies",
        level.level_id,
        level.solids.len(),
        level.letters.len(),
        level.enemies.len()
    );
    Ok(world)
}

fn default_letter_bounds() -> Rect {
    Rect::new(0.0, 0.0, 12.0, 12.0)
}

fn default_enemy_bounds() -> Rect {
    Rect::new(0.0, 0.0, 32.0, 16.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dino_level_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    const VALID_LEVEL: &str = r#"{
      "version": "0.1",
      "level_id": "meadow",
      "width": 1600,
      "height": 1200,
      "spawn": { "x": 100, "y": 176 },
      "solids": [
        { "x": 0, "y": 200, "width": 1600, "height": 32 },
        { "x": 400, "y": 120, "width": 32, "height": 80 }
      ],
      "letters": [
        { "x": 150, "y": 186, "letter": "j" },
        { "x": 170, "y": 186, "letter": "U", "bounds": { "x": 2, "y": 2, "width": 8, "height": 8 } }
      ],
      "enemies": [
        { "x": 300, "y": 184, "kind": "worm" },
        { "x": 500, "y": 184, "kind": "static", "bounds": { "x": 0, "y": 0, "width": 16, "height": 16 } }
      ],
      "tuning": { "jump_unlocked": true, "lives": 5 }
    }"#;

    #[test]
    fn load_level_valid_file_parses() {
        let path = temp_file_path("valid", "json");
        fs::write(&path, VALID_LEVEL).expect("write temp file");

        let level = load_level_from_path(&path).expect("valid level should load");
        assert_eq!(level.level_id, "meadow");
        assert_eq!(level.solids.len(), 2);
        assert_eq!(level.letters[0].bounds, default_letter_bounds());
        assert_eq!(level.enemies[0].kind, EnemyKind::Worm);
        assert!(level.tuning.jump_unlocked);
        assert_eq!(level.tuning.speed_x, PlayerTuning::default().speed_x);
        assert_eq!(level.physics, PhysicsConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn build_world_populates_lists_in_file_order() {
        let level: LevelFile = serde_json::from_str(VALID_LEVEL).expect("parse");
        let world = build_world(&level).expect("world builds");
        assert_eq!(world.statics.len(), 2);
        assert_eq!(world.interactables.len(), 4);
        assert!(matches!(&world.interactables[0], Behavior::Letter(l) if l.letter == 'J'));
        assert!(matches!(&world.interactables[2], Behavior::Worm(_)));
        assert!(matches!(&world.interactables[3], Behavior::Enemy(_)));
        assert!(world.player.is_jump_unlocked);
        assert_eq!(world.player.lives, 5);
        assert_eq!(world.player.rect().bottom(), 200.0);
        assert_eq!(world.bounds.height, 1200.0);
    }

    #[test]
    fn player_shapes_can_come_from_images() {
        let default_path = temp_file_path("default", "png");
        let crouch_path = temp_file_path("crouch", "png");
        let mut standing = image::RgbaImage::new(24, 24);
        let mut crouching = image::RgbaImage::new(24, 24);
        for y in 0..24 {
            for x in 0..24 {
                if (4..20).contains(&x) && y >= 2 {
                    standing.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
                }
                if (4..20).contains(&x) && y >= 12 {
                    crouching.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
                }
            }
        }
        standing.save(&default_path).expect("write png");
        crouching.save(&crouch_path).expect("write png");

        let mut level: LevelFile = serde_json::from_str(VALID_LEVEL).expect("parse");
        level.player = PlayerShapes {
            default: HitboxSpec::Image {
                image: default_path.clone(),
            },
            crouch: HitboxSpec::Image {
                image: crouch_path.clone(),
            },
        };
        let world = build_world(&level).expect("world builds");
        let shapes = &world.player.body.hitboxes;
        assert_eq!(shapes.rect(), Rect::new(104.0, 178.0, 16.0, 22.0));
        assert_eq!(
            shapes.get(CROUCH_HITBOX).map(|h| h.offset),
            Some(Vec2::new(4.0, 12.0))
        );

        // A crouch sprite wider than the standing one would push into walls.
        let mut sprawling = image::RgbaImage::new(24, 24);
        for y in 12..24 {
            for x in 1..23 {
                sprawling.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
            }
        }
        sprawling.save(&crouch_path).expect("write png");
        let err = build_world(&level).err().expect("wide crouch should fail");
        assert!(err.contains("extends past the 'default' shape"));

        let _ = fs::remove_file(default_path);
        let _ = fs::remove_file(crouch_path);
    }

    #[test]
    fn level_physics_reaches_enemies() {
        let mut level: LevelFile = serde_json::from_str(VALID_LEVEL).expect("parse");
        level.physics = PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        };
        level.enemies[0].y = 100.0;
        let mut world = build_world(&level).expect("world builds");

        let Behavior::Worm(worm) = &world.interactables[2] else {
            panic!("expected worm");
        };
        assert_eq!(worm.enemy.body.physics, level.physics);
        let Behavior::Enemy(enemy) = &world.interactables[3] else {
            panic!("expected static enemy");
        };
        assert_eq!(enemy.body.physics, level.physics);
        assert_eq!(world.player.body.physics, level.physics);

        for _ in 0..30 {
            world.step(1.0 / 60.0, &dino_core::input::InputSnapshot::NONE);
        }
        let Behavior::Worm(worm) = &world.interactables[2] else {
            panic!("expected worm");
        };
        assert_eq!(worm.enemy.body.position.y, 100.0);
        assert!(worm.enemy.body.position.x > 300.0);
    }

    #[test]
    fn missing_hitbox_image_is_reported() {
        let mut level: LevelFile = serde_json::from_str(VALID_LEVEL).expect("parse");
        level.player.crouch = HitboxSpec::Image {
            image: PathBuf::from("does/not/exist.png"),
        };
        let err = build_world(&level).err().expect("missing image should fail");
        assert!(err.contains("Failed to load hitbox image"));
    }

    #[test]
    fn load_level_rejects_non_letter_pickup() {
        let path = temp_file_path("digit", "json");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "level_id": "bad",
              "width": 100,
              "height": 100,
              "spawn": { "x": 0, "y": 0 },
              "solids": [{ "x": 0, "y": 90, "width": 100, "height": 10 }],
              "letters": [{ "x": 10, "y": 10, "letter": "7" }]
            }"#,
        )
        .expect("write temp file");
        let err = load_level_from_path(&path).expect_err("digit pickup should fail");
        assert!(err.contains("is not A-Z"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_rejects_empty_solids() {
        let path = temp_file_path("empty", "json");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "level_id": "void",
              "width": 100,
              "height": 100,
              "spawn": { "x": 0, "y": 0 },
              "solids": []
            }"#,
        )
        .expect("write temp file");
        let err = load_level_from_path(&path).expect_err("empty solids should fail");
        assert!(err.contains("solids list is empty"));
        let _ = fs::remove_file(path);
    }
}
