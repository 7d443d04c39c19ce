//! Idle/demo controller
//!
//! Steers the avatar toward the gap of the next obstacle by deciding, each
//! tick, whether to jump. Used by the headless runner and browser idle mode.

use super::state::GameState;

/// Gap center the avatar should aim for.
///
/// The first obstacle whose right edge has not yet passed the avatar's left
/// edge, or the playfield middle when none is ahead.
pub fn target_y(state: &GameState) -> f32 {
    let avatar_left = state.avatar.pos.x - state.avatar.size.x / 2.0;
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.width >= avatar_left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        .map(|o| o.pos.y)
        .unwrap_or_else(|| state.playfield.mid_y())
}

/// True when the avatar has sunk far enough below the target to flap
pub fn should_jump(state: &GameState) -> bool {
    if state.game_over {
        return false;
    }
    let slack = state.tuning.obstacle_gap / 4.0;
    state.avatar.pos.y > target_y(state) + slack
}
