//! Ember Dash - a side-scrolling fire-jumping runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, day/night)
//! - `renderer`: WebGPU rendering pipeline and procedural scene drawing
//! - `leaderboard`: Top-5 high score table backed by a remote store
//! - `settings`: Persisted player preferences
//! - `audio`: Procedural sound cues (WASM only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StoreError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, ScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration added to the player's velocity every tick
    pub const GRAVITY: f32 = 0.6;
    /// Upward velocity impulse on jump (negative because y grows downward)
    pub const JUMP_STRENGTH: f32 = -12.0;

    /// Viewport height the layout was designed for
    pub const BASE_GAME_HEIGHT: f32 = 400.0;
    /// Ground band height at or below the base game height
    pub const BASE_GROUND_HEIGHT: f32 = 50.0;
    /// Height of the grass strip drawn on top of the ground
    pub const GRASS_HEIGHT: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Frames per running pose
    pub const PLAYER_ANIMATION_SPEED: u32 = 15;
    /// Number of running poses
    pub const PLAYER_POSES: u32 = 3;
    /// Frames per burning-animation frame while dead
    pub const FIRE_FRAME_TICKS: u32 = 10;
    /// Dying settles once |dy| is at or below this
    pub const SETTLE_VELOCITY: f32 = 0.1;

    /// Obstacle size ranges (min, span)
    pub const OBSTACLE_MIN_WIDTH: f32 = 30.0;
    pub const OBSTACLE_WIDTH_SPAN: f32 = 20.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 30.0;
    pub const OBSTACLE_HEIGHT_SPAN: f32 = 30.0;

    /// Spawn countdown range in ticks (min, span)
    pub const SPAWN_TIMER_MIN: f32 = 60.0;
    pub const SPAWN_TIMER_SPAN: f32 = 90.0;
    /// Per-tick chance of an extra obstacle when spacing allows
    pub const EXTRA_SPAWN_CHANCE: f64 = 0.02;
    /// Clearance from the right edge the newest obstacle needs before an extra spawn
    pub const MIN_OBSTACLE_GAP: f32 = 250.0;

    /// Ambient spawn chances per tick
    pub const CLOUD_CHANCE: f64 = 0.01;
    pub const BIRD_CHANCE: f64 = 0.005;
    pub const UNDERGROUND_CHANCE: f64 = 0.005;

    /// Inward hitbox padding applied to both rectangles
    pub const COLLISION_PADDING: f32 = 10.0;

    /// Speed and score
    pub const BASE_GAME_SPEED: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.5;
    pub const SPEED_STEP_INTERVAL: u64 = 500;
    pub const SCORE_PER_TICK: f32 = 0.1;

    /// Day/night: one full cycle every 30 jumps, night for the second half
    pub const DAY_NIGHT_CYCLE_JUMPS: u32 = 30;
    pub const NIGHT_START_JUMPS: u32 = 15;

    /// Star field
    pub const STAR_COUNT: u32 = 20;
    pub const STAR_SIZE: f32 = 2.0;

    /// Celestial body
    pub const CELESTIAL_Y: f32 = 50.0;
    pub const CELESTIAL_DRIFT: f32 = 0.5;
    pub const SUN_RADIUS: f32 = 40.0;
    pub const MOON_RADIUS: f32 = 30.0;
}

/// Floor a real-valued score for display and storage
#[inline]
pub fn display_score(score: f32) -> u64 {
    score.max(0.0).floor() as u64
}
