//! Game session state
//!
//! Everything a run mutates lives in one `GameState`, owned by whoever drives
//! the frame loop.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Obstacle, Player};
use super::environment::{Ambient, DayPhase};
use super::spawner::Spawner;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first run has started
    Idle,
    /// Active gameplay
    Running,
    /// Collision happened, death animation playing
    Dying,
    /// Death animation finished; the outer UI owns the screen
    Over,
}

/// Things that happened during a tick that the platform layer may react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A jump started (sound cue)
    Jumped,
    /// The player hit an obstacle and started burning
    Collided,
    /// The death animation settled; final floored score attached
    RunEnded { score: u64 },
}

/// Playfield dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Height of the ground band at the bottom of the screen
    pub ground_height: f32,
}

impl Viewport {
    /// Tall screens grow the ground band so the action stays vertically centred
    pub fn new(width: f32, height: f32) -> Self {
        let ground_height = if height > BASE_GAME_HEIGHT {
            BASE_GROUND_HEIGHT + (height - BASE_GAME_HEIGHT) / 2.0
        } else {
            BASE_GROUND_HEIGHT
        };
        Self {
            width,
            height,
            ground_height,
        }
    }

    /// Y coordinate of the ground line (top of the ground band)
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub ambient: Ambient,
    pub spawner: Spawner,
    /// Real-valued score; display with `display_score`
    pub score: f32,
    pub game_speed: f32,
    /// Ticks since the run started
    pub frame_count: u64,
    /// Successful jumps this run (drives day/night)
    pub jump_count: u32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle session
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            viewport,
            player: Player::new(&viewport),
            obstacles: Vec::new(),
            ambient: Ambient::default(),
            spawner: Spawner::new(),
            score: 0.0,
            game_speed: BASE_GAME_SPEED,
            frame_count: 0,
            jump_count: 0,
            events: Vec::new(),
        }
    }

    /// Replace the RNG stream (used when restarting with a fresh seed)
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Score as shown in the HUD
    pub fn display_score(&self) -> u64 {
        crate::display_score(self.score)
    }

    pub fn day_phase(&self) -> DayPhase {
        DayPhase::from_jump_count(self.jump_count)
    }

    /// Adapt to a new canvas size, keeping grounded things on the new ground line
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        let ground_y = self.viewport.ground_y();

        if self.player.grounded {
            self.player.y = ground_y - self.player.height;
        }
        for obstacle in &mut self.obstacles {
            obstacle.y = ground_y - obstacle.height;
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while the frame loop needs to keep ticking
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Dying)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_ground_height() {
        assert_eq!(Viewport::new(800.0, 400.0).ground_height, 50.0);
        assert_eq!(Viewport::new(800.0, 300.0).ground_height, 50.0);
        assert_eq!(Viewport::new(800.0, 600.0).ground_height, 150.0);
        assert_eq!(Viewport::new(800.0, 600.0).ground_y(), 450.0);
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1, Viewport::new(800.0, 400.0));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.game_speed, BASE_GAME_SPEED);
        assert!(!state.is_animating());
    }

    #[test]
    fn test_resize_moves_grounded_things_to_new_ground() {
        let mut state = GameState::new(1, Viewport::new(800.0, 400.0));
        let mut obstacle = Obstacle::spawn(&mut state.rng, &state.viewport);
        obstacle.x = 400.0;
        state.obstacles.push(obstacle);

        state.resize(1000.0, 700.0);
        let ground = state.viewport.ground_y();
        assert_eq!(state.player.bottom(), ground);
        assert!((state.obstacles[0].y + state.obstacles[0].height - ground).abs() < 1e-3);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1, Viewport::new(800.0, 400.0));
        state.events.push(GameEvent::Jumped);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        assert!(state.events.is_empty());
    }
}
