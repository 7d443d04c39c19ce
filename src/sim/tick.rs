//! Per-tick simulation update
//!
//! Advances the game by the wall-clock time elapsed since the previous tick.

use super::collision::find_crash;
use super::state::{GameEvent, GameState};

/// Elapsed seconds between the last processed tick and `current_time`.
///
/// The first tick after construction/restart yields 0, and a clock that runs
/// backwards is clamped to 0.
pub fn elapsed_since(last_tick: f64, current_time: f64) -> f32 {
    if last_tick == 0.0 {
        return 0.0;
    }
    (current_time - last_tick).max(0.0) as f32
}

/// Advance the game state to `current_time` (seconds, monotonic)
pub fn update(state: &mut GameState, current_time: f64) {
    if state.game_over {
        return;
    }

    let dt = elapsed_since(state.last_tick, current_time);
    state.last_tick = current_time;

    state.avatar.apply_gravity(state.tuning.gravity, dt);

    scroll_obstacles(state, dt);
    recycle_obstacles(state);

    if let Some(cause) = find_crash(state) {
        state.game_over = true;
        state.push_event(GameEvent::Crashed { cause });
        log::info!("Crashed ({:?}) with score {}", cause, state.score);
    }
}

/// Move every obstacle left by the scroll speed
fn scroll_obstacles(state: &mut GameState, dt: f32) {
    let dx = state.tuning.scroll_speed * dt;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= dx;
    }
}

/// Send every obstacle past the left threshold back to the right.
///
/// Each recycle scores one point. Returns how many were recycled.
pub fn recycle_obstacles(state: &mut GameState) -> usize {
    let threshold = state.tuning.recycle_threshold;
    let offset = state.tuning.recycle_offset();
    let mut recycled = 0;

    for i in 0..state.obstacles.len() {
        if state.obstacles[i].pos.x < threshold {
            let gap_center = state.random_gap_center();
            let obstacle = &mut state.obstacles[i];
            obstacle.pos.x += offset;
            obstacle.pos.y = gap_center;

            state.score += 1;
            recycled += 1;
            state.push_event(GameEvent::Scored { score: state.score });
            log::debug!(
                "Obstacle {} recycled to x={:.1}, score {}",
                i,
                state.obstacles[i].pos.x,
                state.score
            );
        }
    }

    recycled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::CrashCause;
    use crate::sim::state::Playfield;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(Playfield::new(400.0, 800.0), Tuning::default(), seed)
    }

    /// Park every obstacle far to the right so only gravity matters
    fn clear_obstacles(state: &mut GameState) {
        for (i, obstacle) in state.obstacles.iter_mut().enumerate() {
            obstacle.pos.x = 5000.0 + i as f32 * 300.0;
        }
    }

    #[test]
    fn test_first_tick_has_zero_dt() {
        let mut state = new_state(1);
        let before = state.avatar.clone();
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();

        update(&mut state, 1000.0);

        assert_eq!(state.avatar, before);
        assert_eq!(state.last_tick, 1000.0);
        let after: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        assert_eq!(xs, after);
    }

    #[test]
    fn test_repeated_timestamp_is_zero_dt() {
        let mut state = new_state(1);
        update(&mut state, 10.0);
        update(&mut state, 10.0 + FRAME);
        let avatar = state.avatar.clone();
        update(&mut state, 10.0 + FRAME);
        assert_eq!(state.avatar, avatar);
    }

    #[test]
    fn test_backwards_clock_is_clamped() {
        assert_eq!(elapsed_since(0.0, 5.0), 0.0);
        assert_eq!(elapsed_since(5.0, 4.0), 0.0);
        assert!((elapsed_since(5.0, 5.5) - 0.5).abs() < 1e-6);

        let mut state = new_state(1);
        update(&mut state, 10.0);
        let avatar = state.avatar.clone();
        update(&mut state, 9.0);
        assert_eq!(state.avatar, avatar);
        assert_eq!(state.last_tick, 9.0);
    }

    #[test]
    fn test_gravity_integration_order() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        update(&mut state, 1.0);
        update(&mut state, 1.1);

        // v = 1500 * 0.1 = 150, then y += 150 * 0.1 = 15
        assert!((state.avatar.vel_y - 150.0).abs() < 1e-3);
        assert!((state.avatar.pos.y - 415.0).abs() < 1e-3);
        assert_eq!(state.avatar.pos.x, 100.0);
    }

    #[test]
    fn test_jump_moves_up_compared_to_falling() {
        let mut falling = new_state(3);
        clear_obstacles(&mut falling);
        let mut jumping = falling.clone();

        update(&mut falling, 1.0);
        update(&mut jumping, 1.0);
        jumping.jump();
        update(&mut falling, 1.0 + FRAME);
        update(&mut jumping, 1.0 + FRAME);

        let start = 400.0;
        let fall_dy = falling.avatar.pos.y - start;
        let jump_dy = jumping.avatar.pos.y - start;
        assert!(jump_dy < 0.0);
        assert!(jump_dy < fall_dy);
    }

    #[test]
    fn test_obstacles_scroll_left() {
        let mut state = new_state(1);
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        update(&mut state, 2.0);
        update(&mut state, 2.05);
        for (before, obstacle) in xs.iter().zip(&state.obstacles) {
            assert!((obstacle.pos.x - (before - 10.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_recycle_moves_obstacle_and_scores() {
        let mut state = new_state(1);
        state.obstacles[0].pos.x = -150.0;

        let recycled = recycle_obstacles(&mut state);

        assert_eq!(recycled, 1);
        assert_eq!(state.obstacles[0].pos.x, 750.0);
        assert!((200.0..=600.0).contains(&state.obstacles[0].pos.y));
        assert_eq!(state.score, 1);
        assert_eq!(state.events(), &[GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_recycle_threshold_is_strict() {
        let mut state = new_state(1);
        state.obstacles[0].pos.x = -100.0;
        assert_eq!(recycle_obstacles(&mut state), 0);
        assert_eq!(state.obstacles[0].pos.x, -100.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_recycle_handles_every_qualifying_obstacle() {
        let mut state = new_state(1);
        state.obstacles[0].pos.x = -150.0;
        state.obstacles[1].pos.x = -120.0;
        state.obstacles[2].pos.x = 300.0;

        assert_eq!(recycle_obstacles(&mut state), 2);
        assert_eq!(state.obstacles[0].pos.x, 750.0);
        assert_eq!(state.obstacles[1].pos.x, 780.0);
        assert_eq!(state.obstacles[2].pos.x, 300.0);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_update_recycles_during_tick() {
        let mut state = new_state(1);
        // Keep the avatar clear of everything
        state.obstacles[0].pos = Vec2::new(-99.0, 400.0);
        state.obstacles[1].pos.x = 2000.0;
        state.obstacles[2].pos.x = 2300.0;
        update(&mut state, 1.0);
        update(&mut state, 1.0 + FRAME);

        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].pos.x > 700.0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_center_on_top_edge_is_not_terminal() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.avatar.pos.y = 0.0;
        update(&mut state, 1.0);
        assert!(!state.game_over);

        state.avatar.pos.y = 800.0;
        update(&mut state, 1.0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_center_past_edges_is_terminal() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.avatar.pos.y = -0.5;
        update(&mut state, 1.0);
        assert!(state.game_over);
        assert_eq!(
            state.events(),
            &[GameEvent::Crashed {
                cause: CrashCause::OutOfBounds
            }]
        );

        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.avatar.pos.y = 800.5;
        update(&mut state, 1.0);
        assert!(state.game_over);
    }

    #[test]
    fn test_box_may_poke_out_while_center_is_inside() {
        // Only the center is checked against the playfield, not the box
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.avatar.pos.y = 5.0;
        update(&mut state, 1.0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_inside_upper_solid_is_terminal_and_freezes() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        // Upper solid spans y 0..525 at x 80..140; avatar box 80..120 x 80..120
        state.obstacles[1].pos = Vec2::new(80.0, 600.0);
        state.avatar.pos.y = 100.0;

        update(&mut state, 1.0);
        assert!(state.game_over);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Crashed {
                cause: CrashCause::Obstacle { index: 1 }
            }]
        );

        let avatar = state.avatar.clone();
        let obstacles = state.obstacles.clone();
        let last_tick = state.last_tick;
        update(&mut state, 2.0);
        assert_eq!(state.avatar, avatar);
        assert_eq!(state.obstacles, obstacles);
        assert_eq!(state.last_tick, last_tick);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_lower_solid_collision() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.obstacles[0].pos = Vec2::new(90.0, 200.0);
        state.avatar.pos.y = 700.0;
        update(&mut state, 1.0);
        assert!(state.game_over);
    }

    #[test]
    fn test_passing_through_gap_is_safe() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        state.obstacles[0].pos = Vec2::new(90.0, 400.0);
        update(&mut state, 1.0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_touching_solid_edge_is_safe() {
        let mut state = new_state(1);
        clear_obstacles(&mut state);
        // Avatar box spans x 80..120; obstacle starts exactly at its right edge
        state.obstacles[0].pos = Vec2::new(120.0, 100.0);
        update(&mut state, 1.0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_restart_after_crash_resumes_updates() {
        let mut state = new_state(1);
        state.avatar.pos.y = -10.0;
        update(&mut state, 1.0);
        assert!(state.game_over);

        state.restart();
        update(&mut state, 5.0);
        update(&mut state, 5.0 + FRAME);
        assert!(!state.game_over);
        assert!(state.avatar.pos.y > 400.0);
    }

    proptest! {
        #[test]
        fn prop_terminal_state_is_frozen(seed in any::<u64>(), t in 0.0f64..1.0e6, dt in 0.0f64..10.0) {
            let mut state = new_state(seed);
            state.game_over = true;
            state.last_tick = t;
            let avatar = state.avatar.clone();
            let obstacles = state.obstacles.clone();

            update(&mut state, t + dt);

            prop_assert_eq!(&state.avatar, &avatar);
            prop_assert_eq!(&state.obstacles, &obstacles);
            prop_assert_eq!(state.score, 0);
            prop_assert!(state.game_over);
        }

        #[test]
        fn prop_score_counts_recycles(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f64..0.5, 1..200),
        ) {
            let mut state = new_state(seed);
            // Keep the avatar airborne and out of reach so runs last
            state.tuning.gravity = 1.0e-3;
            state.avatar.size = Vec2::ZERO;

            let mut now = 1.0;
            let mut last_score = 0;
            update(&mut state, now);
            for step in steps {
                now += step;
                update(&mut state, now);
                let scored = state
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::Scored { .. }))
                    .count() as u64;
                prop_assert!(state.score >= last_score);
                prop_assert_eq!(state.score - last_score, scored);
                last_score = state.score;
            }
        }
    }
}
