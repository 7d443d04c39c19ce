//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a run can be
//! reconfigured from JSON without touching code.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity a jump sets (must be negative)
    pub jump_velocity: f32,
    /// Avatar spawn x
    pub avatar_spawn_x: f32,
    /// Avatar bounding box width/height
    pub avatar_size: f32,
    /// Obstacle width
    pub obstacle_width: f32,
    /// Height of the passable gap
    pub obstacle_gap: f32,
    /// Number of obstacles in the rotating sequence
    pub obstacle_count: usize,
    /// Horizontal distance between consecutive obstacles
    pub obstacle_spacing: f32,
    /// Leftward scroll speed (pixels/s)
    pub scroll_speed: f32,
    /// x below which an obstacle is recycled (must be negative)
    pub recycle_threshold: f32,
    /// Distance kept between gap centers and the playfield edges
    pub gap_safe_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            avatar_spawn_x: AVATAR_SPAWN_X,
            avatar_size: AVATAR_SIZE,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_spacing: OBSTACLE_SPACING,
            scroll_speed: SCROLL_SPEED,
            recycle_threshold: RECYCLE_THRESHOLD,
            gap_safe_margin: GAP_SAFE_MARGIN,
        }
    }
}

impl Tuning {
    /// Distance an obstacle travels when it is recycled
    pub fn recycle_offset(&self) -> f32 {
        self.obstacle_count as f32 * self.obstacle_spacing
    }

    /// Check that the constants describe a playable game.
    ///
    /// Returns a human-readable reason for the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("gravity", self.gravity),
            ("avatar_size", self.avatar_size),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_gap", self.obstacle_gap),
            ("obstacle_spacing", self.obstacle_spacing),
            ("scroll_speed", self.scroll_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.avatar_spawn_x.is_finite() {
            return Err(format!(
                "avatar_spawn_x must be finite, got {}",
                self.avatar_spawn_x
            ));
        }
        if self.obstacle_count == 0 {
            return Err("obstacle_count must be at least 1".to_string());
        }
        if !(self.jump_velocity.is_finite() && self.jump_velocity < 0.0) {
            return Err(format!(
                "jump_velocity must be negative (upward), got {}",
                self.jump_velocity
            ));
        }
        if !(self.recycle_threshold.is_finite() && self.recycle_threshold < 0.0) {
            return Err(format!(
                "recycle_threshold must be left of the playfield, got {}",
                self.recycle_threshold
            ));
        }
        if !self.gap_safe_margin.is_finite() || self.gap_safe_margin < 0.0 {
            return Err(format!(
                "gap_safe_margin must be non-negative, got {}",
                self.gap_safe_margin
            ));
        }
        Ok(())
    }
}
