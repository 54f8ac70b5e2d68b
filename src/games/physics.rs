//! Small 2D kinematics helpers shared by the canvas games.
//!
//! Boards use logical pixel coordinates with the origin in the top-left
//! corner and `y` growing downwards.

/// A moving body: position plus per-tick velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub const fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self { x, y, vx, vy }
    }

    /// Move by one tick of velocity.
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn is_resting(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0
    }
}

/// Axis-aligned box in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict point-in-rect test (points on the edge are outside).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px > self.x && px < self.right() && py > self.y && py < self.bottom()
    }

    /// Strict overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Distance between two points.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

/// Express `(dx, dy)` in a frame rotated by `angle` radians.
pub fn to_local(dx: f32, dy: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = (-angle).sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}
