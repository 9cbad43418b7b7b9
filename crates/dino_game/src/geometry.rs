//! Axis-aligned rectangles and overlap queries.
//!
//! Coordinates are world units with y growing downward, so `top < bottom`.
//! Overlap is strict on every edge: rectangles that merely touch do not
//! intersect, and a zero-width or zero-height rectangle never intersects
//! anything.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn moved(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn with_top_left(&self, top_left: Vec2) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            ..*self
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }
}

/// A piece of immutable level geometry. Owned by the world, read-only to
/// everything that moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub rect: Rect,
}

impl StaticCollider {
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// The first collider in list order that `rect` overlaps. List order, not
/// distance, decides which obstacle wins.
pub fn first_hit<'a>(rect: &Rect, statics: &'a [StaticCollider]) -> Option<&'a StaticCollider> {
    statics.iter().find(|s| rect.intersects(&s.rect))
}

pub fn collides_with_statics(rect: &Rect, statics: &[StaticCollider]) -> bool {
    collides_any(rect, statics.iter().map(|s| &s.rect))
}

/// True if `rect` intersects any rectangle in `others`.
pub fn collides_any<'a, I>(rect: &Rect, others: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().any(|other| rect.intersects(other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(-5.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, -5.0, 5.0, 5.0)));
    }

    #[test]
    fn zero_area_rect_never_intersects() {
        let wall = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!Rect::new(50.0, 50.0, 0.0, 0.0).intersects(&wall));
        assert!(!Rect::new(50.0, 50.0, 10.0, 0.0).intersects(&wall));
        assert!(!wall.intersects(&Rect::new(50.0, 50.0, 0.0, 10.0)));
    }

    #[test]
    fn collides_any_scans_list() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let others = [
            Rect::new(20.0, 0.0, 5.0, 5.0),
            Rect::new(8.0, 8.0, 5.0, 5.0),
        ];
        assert!(collides_any(&rect, &others));
        assert!(!collides_any(&rect, &others[..1]));
        assert!(!collides_any(&rect, std::iter::empty()));
    }

    #[test]
    fn first_hit_respects_list_order() {
        let statics = [
            StaticCollider::new(Rect::new(100.0, 0.0, 10.0, 10.0)),
            StaticCollider::new(Rect::new(5.0, 0.0, 10.0, 10.0)),
            StaticCollider::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ];
        let probe = Rect::new(0.0, 0.0, 8.0, 8.0);
        let hit = first_hit(&probe, &statics).expect("probe overlaps two colliders");
        assert_eq!(hit.rect.x, 5.0);
        assert!(collides_with_statics(&probe, &statics));
        assert!(!collides_with_statics(&probe.moved(50.0, 0.0), &statics));
    }

    #[test]
    fn moved_and_with_top_left_keep_size() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.moved(1.0, -1.0), Rect::new(2.0, 1.0, 3.0, 4.0));
        assert_eq!(
            rect.with_top_left(Vec2::new(10.0, 20.0)),
            Rect::new(10.0, 20.0, 3.0, 4.0)
        );
        assert_eq!(rect.right(), 4.0);
        assert_eq!(rect.bottom(), 6.0);
    }
}
