//! Game state and core simulation types
//!
//! Everything the renderer draws is read from here, either directly or
//! through an immutable [`Snapshot`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CrashCause, Rect};
use crate::tuning::Tuning;

/// Playfield bounds supplied by the environment (screen/canvas size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.height / 2.0
    }
}

impl Default for Playfield {
    fn default() -> Self {
        use crate::consts::{DEFAULT_PLAYFIELD_HEIGHT, DEFAULT_PLAYFIELD_WIDTH};
        Self::new(DEFAULT_PLAYFIELD_WIDTH, DEFAULT_PLAYFIELD_HEIGHT)
    }
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Center of the avatar; x never changes after spawn
    pub pos: Vec2,
    /// Vertical velocity (pixels/s, +y is down)
    pub vel_y: f32,
    /// Bounding box size
    pub size: Vec2,
}

impl Avatar {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel_y: 0.0,
            size,
        }
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
    }

    /// Overwrite (not add to) the vertical velocity
    pub fn jump(&mut self, jump_velocity: f32) {
        self.vel_y = jump_velocity;
    }

    /// Collision box centered on the avatar
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// One scrolling hazard: a solid column with a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// x = left edge, y = vertical center of the gap
    pub pos: Vec2,
    pub width: f32,
    pub gap: f32,
    /// Full height the column spans, frozen at construction
    pub span_height: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, width: f32, gap: f32, span_height: f32) -> Self {
        Self {
            pos,
            width,
            gap,
            span_height,
        }
    }

    /// y where the gap opens (bottom edge of the upper solid)
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.pos.y - self.gap / 2.0
    }

    /// y where the gap closes (top edge of the lower solid)
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.pos.y + self.gap / 2.0
    }

    /// Solid region from the top of the playfield down to the gap
    pub fn upper_rect(&self) -> Rect {
        Rect::new(
            Vec2::new(self.pos.x, 0.0),
            Vec2::new(self.width, self.gap_top()),
        )
    }

    /// Solid region from the gap down to the bottom of the span
    pub fn lower_rect(&self) -> Rect {
        Rect::new(
            Vec2::new(self.pos.x, self.gap_bottom()),
            Vec2::new(self.width, self.span_height - self.gap_bottom()),
        )
    }
}

/// Notable things that happened since the last drain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// An obstacle was recycled; `score` is the new total
    Scored { score: u64 },
    Crashed { cause: CrashCause },
    Restarted { seed: u64 },
}

/// Render-facing view of an obstacle with its solids already derived
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub pos: Vec2,
    pub width: f32,
    pub upper: Rect,
    pub lower: Rect,
}

/// Immutable copy of everything a renderer reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub avatar: Avatar,
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    pub game_over: bool,
    pub playfield: Playfield,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub playfield: Playfield,
    pub tuning: Tuning,
    pub avatar: Avatar,
    /// Fixed-length rotating sequence, recycled in place
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub game_over: bool,
    /// Timestamp of the last processed tick (seconds, 0.0 = none yet)
    pub last_tick: f64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session on the given playfield
    pub fn new(playfield: Playfield, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let avatar = spawn_avatar(&playfield, &tuning);
        let obstacles = spawn_obstacles(&playfield, &tuning, &mut rng);
        Self {
            seed,
            playfield,
            tuning,
            avatar,
            obstacles,
            score: 0,
            game_over: false,
            last_tick: 0.0,
            rng,
            events: Vec::new(),
        }
    }

    /// Start a new run with the next seed in sequence
    pub fn restart(&mut self) {
        self.restart_with_seed(self.seed.wrapping_add(1));
    }

    /// Start a new run with an explicit seed
    pub fn restart_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.avatar = spawn_avatar(&self.playfield, &self.tuning);
        self.obstacles = spawn_obstacles(&self.playfield, &self.tuning, &mut self.rng);
        self.score = 0;
        self.game_over = false;
        self.last_tick = 0.0;
        self.events.push(GameEvent::Restarted { seed });
        log::info!("Run restarted with seed {}", seed);
    }

    /// Upward impulse. Ignored once the run is over.
    pub fn jump(&mut self) {
        if self.game_over {
            return;
        }
        self.avatar.jump(self.tuning.jump_velocity);
        self.events.push(GameEvent::Jumped);
    }

    /// Record new environment bounds.
    ///
    /// Used for the out-of-bounds check, later gap draws and the next
    /// restart. Obstacles already built keep their span height.
    pub fn set_playfield(&mut self, playfield: Playfield) {
        if playfield != self.playfield {
            log::debug!(
                "Playfield resized {}x{} -> {}x{}",
                self.playfield.width,
                self.playfield.height,
                playfield.width,
                playfield.height
            );
            self.playfield = playfield;
        }
    }

    /// Draw a new gap center inside the safe band of the current playfield
    pub fn random_gap_center(&mut self) -> f32 {
        random_gap_center(
            &mut self.rng,
            self.playfield.height,
            self.tuning.gap_safe_margin,
        )
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events pending since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Immutable copy for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            avatar: self.avatar.clone(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    pos: o.pos,
                    width: o.width,
                    upper: o.upper_rect(),
                    lower: o.lower_rect(),
                })
                .collect(),
            score: self.score,
            game_over: self.game_over,
            playfield: self.playfield,
        }
    }
}

/// Avatar at the spawn column, vertically centered, at rest
pub fn spawn_avatar(playfield: &Playfield, tuning: &Tuning) -> Avatar {
    Avatar::new(
        Vec2::new(tuning.avatar_spawn_x, playfield.mid_y()),
        Vec2::splat(tuning.avatar_size),
    )
}

/// Lay out the obstacle sequence just past the right edge, evenly spaced
pub fn spawn_obstacles(playfield: &Playfield, tuning: &Tuning, rng: &mut Pcg32) -> Vec<Obstacle> {
    (0..tuning.obstacle_count)
        .map(|i| {
            let x = playfield.width + i as f32 * tuning.obstacle_spacing;
            let y = random_gap_center(rng, playfield.height, tuning.gap_safe_margin);
            Obstacle::new(
                Vec2::new(x, y),
                tuning.obstacle_width,
                tuning.obstacle_gap,
                playfield.height,
            )
        })
        .collect()
}

/// Uniform draw from `[margin, height - margin]`.
///
/// Falls back to the midpoint when the playfield is too short for the band
/// or the band isn't finite.
pub fn random_gap_center(rng: &mut Pcg32, height: f32, margin: f32) -> f32 {
    let lo = margin;
    let hi = height - margin;
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.random_range(lo..=hi)
    } else {
        height / 2.0
    }
}
