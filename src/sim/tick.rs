//! Per-frame simulation tick
//!
//! One call advances the session by exactly one display frame. Drawing is
//! done separately from the resulting state by the renderer.

use super::collision::collides;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump held (Space/ArrowUp) or a pending touch
    pub jump: bool,
}

/// Reset the session and enter `Running`.
///
/// Valid from any phase; this is both the first start and every restart.
pub fn start_run(state: &mut GameState) {
    let viewport = state.viewport;

    state.score = 0.0;
    state.jump_count = 0;
    state.game_speed = BASE_GAME_SPEED;
    state.frame_count = 0;
    state.spawner.reset();
    state.obstacles.clear();
    state.ambient.clear();
    state.player.reset(&viewport);
    state.events.clear();
    state.phase = GamePhase::Running;

    log::info!("Run started (seed {})", state.seed);
}

/// Move from `Running` to `Dying`. Calls in any other phase are ignored.
pub fn trigger_game_over(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.player.kill();
    state.phase = GamePhase::Dying;
    state.events.push(GameEvent::Collided);

    log::info!(
        "Collision at frame {} with score {}",
        state.frame_count,
        state.display_score()
    );
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Running => tick_running(state, input),
        GamePhase::Dying => tick_dying(state),
        GamePhase::Idle | GamePhase::Over => {}
    }
}

fn tick_running(state: &mut GameState, input: &TickInput) {
    let viewport = state.viewport;
    let ground_y = viewport.ground_y();

    state.ambient.update(&mut state.rng, &viewport);

    if state.player.update(input.jump, ground_y) {
        state.jump_count += 1;
        state.events.push(GameEvent::Jumped);
    }

    state
        .spawner
        .spawn_obstacles(&mut state.rng, &mut state.obstacles, &viewport);

    // Every obstacle moves this tick even after a hit, so the frozen frame
    // shown during the death animation is consistent.
    let player_rect = state.player.rect();
    let mut hit = false;
    for obstacle in &mut state.obstacles {
        obstacle.update(state.game_speed);
        if !hit && collides(&player_rect, &obstacle.rect()) {
            hit = true;
        }
    }
    if hit {
        trigger_game_over(state);
    }

    state.obstacles.retain(|o| !o.is_off_screen());

    if state.phase != GamePhase::Running {
        return;
    }

    state.score += SCORE_PER_TICK;
    if state.frame_count > 0 && state.frame_count % SPEED_STEP_INTERVAL == 0 {
        state.game_speed += SPEED_STEP;
        log::debug!("Speed up to {:.1}", state.game_speed);
    }
    state.frame_count += 1;
}

fn tick_dying(state: &mut GameState) {
    let viewport = state.viewport;
    let ground_y = viewport.ground_y();

    state.ambient.update(&mut state.rng, &viewport);
    state.player.update(false, ground_y);

    if state.player.is_settled(ground_y) {
        state.phase = GamePhase::Over;
        let score = state.display_score();
        state.events.push(GameEvent::RunEnded { score });
        log::info!("Run over, final score {}", score);
    }
}
