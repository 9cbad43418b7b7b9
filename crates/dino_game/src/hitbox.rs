//! Named alternate collision shapes for one entity.
//!
//! Each shape is derived once, at construction, from the non-transparent
//! bounding box of a reference bitmap. The bounding box origin becomes the
//! shape's `offset`: the displacement from the entity's sprite anchor to the
//! hitbox top-left. Shapes authored on the same canvas therefore share a
//! common anchor, so switching from "default" to "crouch" keeps the feet
//! where they were.
//!
//! Exactly one shape is active at a time and `active_name` always names an
//! existing entry.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::RgbaImage;
use thiserror::Error;

use crate::geometry::{collides_with_statics, Rect, StaticCollider};

pub const DEFAULT_HITBOX: &str = "default";
pub const CROUCH_HITBOX: &str = "crouch";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HitboxError {
    #[error("unknown hitbox '{0}'")]
    Unknown(String),
    #[error("hitbox '{name}' extends past the '{outer}' shape horizontally")]
    WiderThan { name: String, outer: String },
}

/// Anything that can report the bounding rectangle of its non-transparent
/// pixels, in its own local coordinates.
pub trait AlphaBounds {
    /// `None` when every pixel is transparent.
    fn alpha_bounds(&self) -> Option<Rect>;
}

impl AlphaBounds for RgbaImage {
    fn alpha_bounds(&self) -> Option<Rect> {
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        let mut any = false;
        for (x, y, pixel) in self.enumerate_pixels() {
            if pixel.0[3] == 0 {
                continue;
            }
            any = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        any.then(|| {
            Rect::new(
                min.0 as f32,
                min.1 as f32,
                (max.0 - min.0 + 1) as f32,
                (max.1 - min.1 + 1) as f32,
            )
        })
    }
}

/// Bounds authored directly in data files.
impl AlphaBounds for Rect {
    fn alpha_bounds(&self) -> Option<Rect> {
        (!self.is_empty()).then_some(*self)
    }
}

pub fn load_hitbox_image(path: &Path) -> Result<RgbaImage, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to load hitbox image {}: {e}", path.display()))?;
    Ok(image.to_rgba8())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub rect: Rect,
    pub offset: Vec2,
}

impl Hitbox {
    /// A fully transparent source yields a zero-size rect with zero offset,
    /// which never collides.
    pub fn from_source(position: Vec2, source: &impl AlphaBounds) -> Self {
        match source.alpha_bounds() {
            Some(bounds) => {
                let offset = Vec2::new(bounds.x, bounds.y);
                let top_left = position + offset;
                Self {
                    rect: Rect::new(top_left.x, top_left.y, bounds.width, bounds.height),
                    offset,
                }
            }
            None => Self {
                rect: Rect::new(position.x, position.y, 0.0, 0.0),
                offset: Vec2::ZERO,
            },
        }
    }

    pub fn placed_at(&self, position: Vec2) -> Rect {
        self.rect.with_top_left(position + self.offset)
    }

    /// True when this shape's horizontal span on the canvas lies inside
    /// `outer`'s. An empty shape never collides and always fits.
    pub fn fits_within_x(&self, outer: &Hitbox) -> bool {
        self.rect.is_empty()
            || (self.offset.x >= outer.offset.x
                && self.offset.x + self.rect.width <= outer.offset.x + outer.rect.width)
    }
}

#[derive(Debug, Clone)]
pub struct HitboxSet {
    entries: HashMap<String, Hitbox>,
    active_name: String,
}

impl HitboxSet {
    pub fn new(name: &str, position: Vec2, source: &impl AlphaBounds) -> Self {
        let mut entries = HashMap::new();
        entries.insert(name.to_string(), Hitbox::from_source(position, source));
        Self {
            entries,
            active_name: name.to_string(),
        }
    }

    /// Register (or replace) a shape. The active selection is unchanged.
    pub fn add(&mut self, name: &str, position: Vec2, source: &impl AlphaBounds) {
        self.entries
            .insert(name.to_string(), Hitbox::from_source(position, source));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Hitbox> {
        self.entries.get(name)
    }

    pub fn active_name(&self) -> &str {
        &self.active_name
    }

    pub fn active(&self) -> &Hitbox {
        // Construction inserts the first entry and every switch checks the
        // name, so the active entry always exists.
        &self.entries[&self.active_name]
    }

    pub fn rect(&self) -> Rect {
        self.active().rect
    }

    #[allow(dead_code)]
    pub fn offset(&self) -> Vec2 {
        self.active().offset
    }

    /// Move the active rect so its top-left sits at `position + offset`.
    pub fn sync_to(&mut self, position: Vec2) {
        if let Some(hitbox) = self.entries.get_mut(&self.active_name) {
            hitbox.rect = hitbox.placed_at(position);
        }
    }

    /// Overwrite the active rect, e.g. after collision clamping. Returns the
    /// entity position implied by the new rect.
    pub fn set_active_rect(&mut self, rect: Rect) -> Vec2 {
        match self.entries.get_mut(&self.active_name) {
            Some(hitbox) => {
                hitbox.rect = rect;
                rect.top_left() - hitbox.offset
            }
            None => rect.top_left(),
        }
    }

    /// Unconditional switch. Used where the new shape cannot be blocked,
    /// e.g. shrinking into a crouch.
    pub fn set_active(&mut self, name: &str, position: Vec2) -> Result<(), HitboxError> {
        let hitbox = self
            .entries
            .get_mut(name)
            .ok_or_else(|| HitboxError::Unknown(name.to_string()))?;
        hitbox.rect = hitbox.placed_at(position);
        self.active_name = name.to_string();
        Ok(())
    }

    /// Switch only if the new shape, placed at `position`, is clear of every
    /// static collider. Returns `Ok(false)` and leaves the active shape alone
    /// when blocked.
    pub fn try_set_active(
        &mut self,
        name: &str,
        position: Vec2,
        statics: &[StaticCollider],
    ) -> Result<bool, HitboxError> {
        let candidate = self
            .entries
            .get(name)
            .ok_or_else(|| HitboxError::Unknown(name.to_string()))?
            .placed_at(position);
        if collides_with_statics(&candidate, statics) {
            return Ok(false);
        }
        self.set_active(name, position)?;
        Ok(true)
    }
}
