//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an explicit timestamp
//! - Seeded RNG only
//! - Playfield bounds are passed in, never read from the environment
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CrashCause, Rect, center_out_of_bounds, find_crash};
pub use state::{Avatar, GameEvent, GameState, Obstacle, ObstacleView, Playfield, Snapshot};
pub use tick::{elapsed_since, recycle_obstacles, update};
