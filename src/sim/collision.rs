//! Axis-aligned square overlap tests
//!
//! Every entity in the game is an axis-aligned square given by its top-left
//! corner and side length.

use glam::Vec2;

/// Axis-aligned square (top-left corner + side)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    pub pos: Vec2,
    pub size: f32,
}

impl Square {
    pub const fn new(pos: Vec2, size: f32) -> Self {
        Self { pos, size }
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(margin),
            size: self.size + 2.0 * margin,
        }
    }
}

/// Strict overlap: squares that only share an edge do not overlap
#[inline]
pub fn overlaps(a: Square, b: Square) -> bool {
    a.pos.x < b.pos.x + b.size
        && a.pos.x + a.size > b.pos.x
        && a.pos.y < b.pos.y + b.size
        && a.pos.y + a.size > b.pos.y
}

/// True if any part of `a` lies outside the `width` x `height` canvas
#[inline]
pub fn out_of_bounds(a: Square, width: f32, height: f32) -> bool {
    a.pos.x < 0.0 || a.pos.x + a.size > width || a.pos.y < 0.0 || a.pos.y + a.size > height
}
