//! Skyhop - A tap-to-flap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, recycling, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline and scene projection
//! - `settings`: Runtime configuration (tick rate, seed, playfield)
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Nominal clock rate of the fixed-rate timer
    pub const TICK_RATE_HZ: u32 = 60;

    /// Downward acceleration (pixels/s², +y is down)
    pub const GRAVITY: f32 = 1500.0;
    /// Velocity set by a jump (negative = upward)
    pub const JUMP_VELOCITY: f32 = -500.0;

    /// Avatar spawn column and bounding box
    pub const AVATAR_SPAWN_X: f32 = 100.0;
    pub const AVATAR_SIZE: f32 = 40.0;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    pub const OBSTACLE_COUNT: usize = 3;
    pub const OBSTACLE_SPACING: f32 = 300.0;

    /// Horizontal scroll speed of obstacles (pixels/s)
    pub const SCROLL_SPEED: f32 = 200.0;
    /// Obstacles left of this x are recycled to the right
    pub const RECYCLE_THRESHOLD: f32 = -100.0;
    /// Gap centers stay this far from the top and bottom edges
    pub const GAP_SAFE_MARGIN: f32 = 200.0;

    /// Fallback playfield when the environment doesn't supply one (portrait phone)
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 390.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 844.0;
}
