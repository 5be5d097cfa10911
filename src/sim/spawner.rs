//! Obstacle and ambient scenery spawning

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Bird, Cloud, Obstacle, UndergroundItem};
use super::environment::Ambient;
use super::state::Viewport;
use crate::consts::*;

/// Countdown-driven obstacle spawner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks until the next forced spawn (0 = spawn on the next tick)
    pub timer: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self { timer: 0.0 }
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Run one tick of obstacle spawning.
    ///
    /// The countdown always fires when it runs out. On top of that there is a
    /// small per-tick chance of an extra obstacle, allowed only once the
    /// newest obstacle has cleared the right edge by `MIN_OBSTACLE_GAP`.
    /// Returns the number of obstacles added.
    pub fn spawn_obstacles<R: Rng>(
        &mut self,
        rng: &mut R,
        obstacles: &mut Vec<Obstacle>,
        viewport: &Viewport,
    ) -> usize {
        let mut spawned = 0;

        self.timer -= 1.0;
        if self.timer <= 0.0 {
            obstacles.push(Obstacle::spawn(rng, viewport));
            self.timer = SPAWN_TIMER_MIN + rng.random::<f32>() * SPAWN_TIMER_SPAN;
            spawned += 1;
        }

        if rng.random_bool(EXTRA_SPAWN_CHANCE) && has_room_for_obstacle(obstacles, viewport) {
            obstacles.push(Obstacle::spawn(rng, viewport));
            spawned += 1;
        }

        spawned
    }
}

/// True when there are no obstacles or the newest one is far enough from the right edge
pub fn has_room_for_obstacle(obstacles: &[Obstacle], viewport: &Viewport) -> bool {
    obstacles
        .last()
        .is_none_or(|newest| viewport.width - newest.rect().right() > MIN_OBSTACLE_GAP)
}

/// Roll the independent per-tick chances for clouds, birds and underground items
pub fn spawn_ambient<R: Rng>(rng: &mut R, ambient: &mut Ambient, viewport: &Viewport) {
    if rng.random_bool(CLOUD_CHANCE) {
        ambient.clouds.push(Cloud::spawn(rng, viewport));
    }
    if rng.random_bool(BIRD_CHANCE) {
        ambient.birds.push(Bird::spawn(rng, viewport));
    }
    if rng.random_bool(UNDERGROUND_CHANCE) {
        ambient.underground.push(UndergroundItem::spawn(rng, viewport));
    }
}
