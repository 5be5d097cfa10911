//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One tick per display frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod environment;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, collides};
pub use entities::{Bird, Cloud, Obstacle, Player, PlayerPose, UndergroundItem, UndergroundKind};
pub use environment::{Ambient, DayPhase, celestial_position, star_position};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, Viewport};
pub use tick::{TickInput, start_run, tick, trigger_game_over};
