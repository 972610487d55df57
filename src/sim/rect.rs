//! Axis-aligned rectangles and the playfield
//!
//! Screen coordinates: origin at the top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The playfield: `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

/// Which edges a clamp touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ClampHits {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Clamp a box into the arena, horizontal axis first, then vertical.
    ///
    /// A box larger than the arena on some axis is pinned to the origin on
    /// that axis.
    pub fn clamp(&self, pos: &mut Vec2, size: Vec2) -> ClampHits {
        let mut hits = ClampHits::default();

        let max_x = (self.width - size.x).max(0.0);
        if pos.x < 0.0 {
            pos.x = 0.0;
            hits.left = true;
        } else if pos.x > max_x {
            pos.x = max_x;
            hits.right = true;
        }

        let max_y = (self.height - size.y).max(0.0);
        if pos.y < 0.0 {
            pos.y = 0.0;
            hits.top = true;
        } else if pos.y >= max_y {
            // Resting exactly on the floor counts as a floor contact
            pos.y = max_y;
            hits.bottom = true;
        }

        hits
    }

    /// True once a box is completely outside the arena on the side it is
    /// travelling toward. Boxes spawned just outside and moving inward are
    /// not departed.
    pub fn departed(&self, rect: &Rect, vel: Vec2) -> bool {
        (vel.x < 0.0 && rect.right() < 0.0)
            || (vel.x > 0.0 && rect.left() > self.width)
            || (vel.y < 0.0 && rect.bottom() < 0.0)
            || (vel.y > 0.0 && rect.top() > self.height)
    }
}
