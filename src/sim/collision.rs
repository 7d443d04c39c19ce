//! Collision detection for the avatar against the playfield and obstacles
//!
//! Everything is axis-aligned. The avatar is a box centered on its position,
//! each obstacle contributes two solid rects derived from its gap center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Axis-aligned rectangle in screen space (origin = top-left corner, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rect of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// True if the rect has no area (zero or negative extent on either axis)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Positive-area overlap test. Rects that only share an edge or a corner
    /// do not intersect, and an empty rect never intersects anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Avatar center left the playfield vertically
    OutOfBounds,
    /// Avatar box overlapped a solid part of the obstacle at `index`
    Obstacle { index: usize },
}

/// Check if the avatar's center is above the top or below the bottom edge.
///
/// Only the center is tested, not the box edges. Exactly 0 or exactly
/// `height` is still in bounds.
#[inline]
pub fn center_out_of_bounds(center_y: f32, height: f32) -> bool {
    center_y < 0.0 || center_y > height
}

/// Run every collision check against the current state.
///
/// All obstacles are visited even after a hit; the first cause found is
/// the one reported.
pub fn find_crash(state: &GameState) -> Option<CrashCause> {
    let mut cause = None;

    if center_out_of_bounds(state.avatar.pos.y, state.playfield.height) {
        cause = Some(CrashCause::OutOfBounds);
    }

    let avatar_box = state.avatar.bounds();
    for (index, obstacle) in state.obstacles.iter().enumerate() {
        let hit = avatar_box.intersects(&obstacle.upper_rect())
            || avatar_box.intersects(&obstacle.lower_rect());
        if hit && cause.is_none() {
            cause = Some(CrashCause::Obstacle { index });
        }
    }

    cause
}
