//! Axis-aligned rectangles and hitbox utilities
//!
//! Everything in the runner collides as boxes: sprites are drawn into a
//! bounding rectangle and a tighter hitbox is derived from it by insetting
//! each side by a fixed per-entity padding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen-space rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Point test including the edges (used for clickable controls)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Per-side inset applied to a bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(pad: f32) -> Self {
        Self::new(pad, pad, pad, pad)
    }
}

/// Player hitbox inset (the sprite has a lot of empty space around the dog)
pub const PLAYER_HITBOX: Padding = Padding::new(18.0, 30.0, 10.0, 30.0);
/// Obstacle hitbox inset
pub const OBSTACLE_HITBOX: Padding = Padding::uniform(6.0);

/// Shrink a rectangle by `padding` on each side.
///
/// Width and height are clamped at zero, so an over-padded rectangle
/// degenerates into an empty box that never intersects anything.
pub fn shrink_rect(rect: Rect, padding: Padding) -> Rect {
    Rect {
        x: rect.x + padding.left,
        y: rect.y + padding.top,
        width: (rect.width - padding.left - padding.right).max(0.0),
        height: (rect.height - padding.top - padding.bottom).max(0.0),
    }
}

/// Overlap test with half-open intervals on both axes.
///
/// Rectangles that only touch along an edge do not intersect.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
