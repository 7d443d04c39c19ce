//! Projects a simulation snapshot into drawable triangles
//!
//! Pure: reads a [`Snapshot`] and never touches game state.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{Rect, Snapshot};

/// Circle tessellation for the avatar
pub const AVATAR_SEGMENTS: u32 = 24;

/// Build the full frame, back to front
pub fn build(snapshot: &Snapshot) -> Vec<Vertex> {
    let field = Rect::new(
        Vec2::ZERO,
        Vec2::new(snapshot.playfield.width, snapshot.playfield.height),
    );

    let mut vertices = Vec::with_capacity(
        12 + snapshot.obstacles.len() * 12 + AVATAR_SEGMENTS as usize * 3,
    );

    vertices.extend(shapes::rect(&field, colors::SKY));

    for obstacle in &snapshot.obstacles {
        vertices.extend(shapes::rect(&obstacle.upper, colors::OBSTACLE));
        vertices.extend(shapes::rect(&obstacle.lower, colors::OBSTACLE));
    }

    let avatar = &snapshot.avatar;
    vertices.extend(shapes::circle(
        avatar.pos,
        avatar.size.x / 2.0,
        colors::AVATAR,
        AVATAR_SEGMENTS,
    ));

    if snapshot.game_over {
        vertices.extend(shapes::rect(&field, colors::GAME_OVER_DIM));
    }

    vertices
}
