//! Day/night cycle, sky bodies and the ambient scenery set
//!
//! The cycle is keyed to the number of jumps, not to elapsed time, so the
//! atmosphere follows how actively the player is playing.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Bird, Cloud, UndergroundItem};
use super::spawner::spawn_ambient;
use super::state::Viewport;
use crate::consts::*;

/// Lighting phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Square wave over the jump counter: 15 jumps of day, then 15 of night
    pub fn from_jump_count(jump_count: u32) -> Self {
        if jump_count % DAY_NIGHT_CYCLE_JUMPS >= NIGHT_START_JUMPS {
            DayPhase::Night
        } else {
            DayPhase::Day
        }
    }

    pub fn is_night(&self) -> bool {
        matches!(self, DayPhase::Night)
    }
}

/// Horizontal position of the sun/moon: constant leftward drift, wrapping
/// with a 50px margin past either edge.
pub fn celestial_x(frame_count: u64, viewport_width: f32) -> f32 {
    let span = viewport_width + 100.0;
    let travelled = (frame_count as f32 * CELESTIAL_DRIFT) % span;
    viewport_width + 50.0 - travelled
}

/// Centre of the sun or moon
pub fn celestial_position(frame_count: u64, viewport: &Viewport) -> Vec2 {
    Vec2::new(celestial_x(frame_count, viewport.width), CELESTIAL_Y)
}

/// Top-left corner of star `index`; stars creep slowly to the left
pub fn star_position(index: u32, frame_count: u64, viewport: &Viewport) -> Vec2 {
    let offset = (index as f32 * 50.0 + frame_count as f32 * 0.1) % viewport.width;
    let y = (index as f32 * 37.0) % (viewport.height / 2.0);
    Vec2::new(viewport.width - offset, y)
}

/// Scenery that moves independently of the game speed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ambient {
    pub clouds: Vec<Cloud>,
    pub birds: Vec<Bird>,
    pub underground: Vec<UndergroundItem>,
}

impl Ambient {
    pub fn clear(&mut self) {
        self.clouds.clear();
        self.birds.clear();
        self.underground.clear();
    }

    /// Spawn, advance and prune one tick of scenery
    pub fn update<R: Rng>(&mut self, rng: &mut R, viewport: &Viewport) {
        spawn_ambient(rng, self, viewport);

        for cloud in &mut self.clouds {
            cloud.update();
        }
        for bird in &mut self.birds {
            bird.update();
        }
        for item in &mut self.underground {
            item.update();
        }

        self.clouds.retain(|c| !c.marked_for_deletion);
        self.birds.retain(|b| !b.marked_for_deletion);
        self.underground.retain(|u| !u.marked_for_deletion);
    }

    pub fn len(&self) -> usize {
        self.clouds.len() + self.birds.len() + self.underground.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_day_night_boundaries() {
        assert_eq!(DayPhase::from_jump_count(0), DayPhase::Day);
        assert_eq!(DayPhase::from_jump_count(14), DayPhase::Day);
        assert_eq!(DayPhase::from_jump_count(15), DayPhase::Night);
        assert_eq!(DayPhase::from_jump_count(29), DayPhase::Night);
        assert_eq!(DayPhase::from_jump_count(30), DayPhase::Day);
        assert_eq!(DayPhase::from_jump_count(45), DayPhase::Night);
    }

    #[test]
    fn test_celestial_drifts_left_and_wraps() {
        let width = 800.0;
        assert_eq!(celestial_x(0, width), 850.0);
        assert_eq!(celestial_x(2, width), 849.0);
        // One full span (900px at 0.5px/frame) brings it back
        assert_eq!(celestial_x(1800, width), 850.0);
        assert!(celestial_x(1799, width) < -49.0);
    }

    #[test]
    fn test_stars_stay_in_upper_half() {
        let vp = Viewport::new(800.0, 400.0);
        for frame in [0u64, 17, 1000, 123_456] {
            for i in 0..STAR_COUNT {
                let p = star_position(i, frame, &vp);
                assert!(p.x > 0.0 && p.x <= vp.width);
                assert!(p.y >= 0.0 && p.y < vp.height / 2.0);
            }
        }
    }

    #[test]
    fn test_marked_entities_are_pruned_same_tick() {
        let vp = Viewport::new(800.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambient = Ambient::default();
        let mut cloud = Cloud::spawn(&mut rng, &vp);
        cloud.x = -cloud.width - cloud.height;
        ambient.clouds.push(cloud);

        ambient.update(&mut rng, &vp);
        assert!(ambient.clouds.iter().all(|c| !c.marked_for_deletion));
    }

    #[test]
    fn test_ambient_population_stays_bounded() {
        let vp = Viewport::new(800.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(77);
        let mut ambient = Ambient::default();
        for _ in 0..10_000 {
            ambient.update(&mut rng, &vp);
        }
        assert!(ambient.len() < 60);
    }

    proptest! {
        #[test]
        fn prop_phase_is_periodic(n in 0u32..100_000) {
            prop_assert_eq!(DayPhase::from_jump_count(n), DayPhase::from_jump_count(n + 30));
            prop_assert_ne!(DayPhase::from_jump_count(n), DayPhase::from_jump_count(n + 15));
        }
    }
}
