//! Entity kinds: the player, fire obstacles and ambient scenery
//!
//! World direction: the player stands near the left edge and everything else
//! enters from the right and travels left.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::Viewport;
use crate::consts::*;

/// Visual pose of the player, derived from physics state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPose {
    /// Running cycle pose index
    Running(u32),
    Airborne,
    /// Burning animation frame index
    Burning(u32),
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (positive = falling)
    pub dy: f32,
    pub grounded: bool,
    pub dead: bool,
    /// Running animation counter (advances only while grounded)
    pub frame: u32,
    /// Burning animation counter (advances only while dead)
    pub fire_frame: u32,
}

impl Player {
    pub fn new(viewport: &Viewport) -> Self {
        let mut player = Self {
            x: PLAYER_X,
            y: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            dy: 0.0,
            grounded: true,
            dead: false,
            frame: 0,
            fire_frame: 0,
        };
        player.reset(viewport);
        player
    }

    /// Stand the player on the ground, alive, ready for a new run
    pub fn reset(&mut self, viewport: &Viewport) {
        self.x = PLAYER_X;
        self.y = viewport.ground_y() - self.height;
        self.dy = 0.0;
        self.grounded = true;
        self.dead = false;
        self.frame = 0;
        self.fire_frame = 0;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Advance one tick of physics.
    ///
    /// Returns `true` when a jump was started this tick. Jumps are only
    /// accepted while grounded and alive.
    pub fn update(&mut self, jump_pressed: bool, ground_y: f32) -> bool {
        if self.dead {
            self.fire_frame += 1;
            self.y += self.dy;
            self.dy += GRAVITY;
            if self.bottom() > ground_y {
                self.y = ground_y - self.height;
                self.dy = 0.0;
            }
            return false;
        }

        let mut jumped = false;
        if jump_pressed && self.grounded {
            self.dy = JUMP_STRENGTH;
            self.grounded = false;
            jumped = true;
        }

        self.y += self.dy;
        self.dy += GRAVITY;

        if self.bottom() > ground_y {
            self.y = ground_y - self.height;
            self.dy = 0.0;
            self.grounded = true;
        }

        if self.grounded {
            self.frame += 1;
        }

        jumped
    }

    /// Switch to the burning state; the body drops straight down from here
    pub fn kill(&mut self) {
        self.dead = true;
        self.dy = 0.0;
    }

    /// Dead body has come to rest on the ground
    pub fn is_settled(&self, ground_y: f32) -> bool {
        self.y >= ground_y - self.height && self.dy.abs() <= SETTLE_VELOCITY
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn pose(&self) -> PlayerPose {
        if self.dead {
            PlayerPose::Burning((self.fire_frame / FIRE_FRAME_TICKS) % 3)
        } else if self.grounded {
            PlayerPose::Running((self.frame / PLAYER_ANIMATION_SPEED) % PLAYER_POSES)
        } else {
            PlayerPose::Airborne
        }
    }
}

/// A fire obstacle sitting on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Flame animation counter
    pub frame: u32,
}

impl Obstacle {
    /// Create an obstacle just past the right edge
    pub fn spawn<R: Rng>(rng: &mut R, viewport: &Viewport) -> Self {
        let width = OBSTACLE_MIN_WIDTH + rng.random::<f32>() * OBSTACLE_WIDTH_SPAN;
        let height = OBSTACLE_MIN_HEIGHT + rng.random::<f32>() * OBSTACLE_HEIGHT_SPAN;
        Self {
            x: viewport.width,
            y: viewport.ground_y() - height,
            width,
            height,
            frame: 0,
        }
    }

    pub fn update(&mut self, game_speed: f32) {
        self.x -= game_speed;
        self.frame += 1;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Background cloud drifting slower than the obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub marked_for_deletion: bool,
}

impl Cloud {
    pub fn spawn<R: Rng>(rng: &mut R, viewport: &Viewport) -> Self {
        let height = 30.0 + rng.random::<f32>() * 20.0;
        Self {
            // The left lobe reaches height/2 behind x
            x: viewport.width + height / 2.0 + rng.random::<f32>() * 200.0,
            y: rng.random::<f32>() * (viewport.height / 2.0),
            width: 60.0 + rng.random::<f32>() * 40.0,
            height,
            speed: 1.0 + rng.random::<f32>(),
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self) {
        self.x -= self.speed;
        if self.x + self.width + self.height / 2.0 < 0.0 {
            self.marked_for_deletion = true;
        }
    }
}

/// A bird flapping across the upper sky
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub frame: u32,
    pub marked_for_deletion: bool,
}

impl Bird {
    pub fn spawn<R: Rng>(rng: &mut R, viewport: &Viewport) -> Self {
        Self {
            x: viewport.width + 30.0 + rng.random::<f32>() * 200.0,
            y: rng.random::<f32>() * (viewport.height / 3.0),
            width: 20.0,
            height: 10.0,
            speed: 2.0 + rng.random::<f32>() * 2.0,
            frame: 0,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self) {
        self.x -= self.speed;
        self.frame += 1;
        if self.x + self.width < 0.0 {
            self.marked_for_deletion = true;
        }
    }
}

/// Critters and features buried in the ground band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UndergroundKind {
    Worm,
    Rock,
    Bug,
    Rat,
    Snake,
    Hole,
    Water,
}

impl UndergroundKind {
    pub const ALL: [UndergroundKind; 7] = [
        UndergroundKind::Worm,
        UndergroundKind::Rock,
        UndergroundKind::Bug,
        UndergroundKind::Rat,
        UndergroundKind::Snake,
        UndergroundKind::Hole,
        UndergroundKind::Water,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Something scrolling past inside the ground band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndergroundItem {
    pub kind: UndergroundKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub frame: u32,
    /// Fraction of the base game speed this item scrolls at
    pub parallax_factor: f32,
    pub marked_for_deletion: bool,
}

impl UndergroundItem {
    pub fn spawn<R: Rng>(rng: &mut R, viewport: &Viewport) -> Self {
        let kind = UndergroundKind::random(rng);
        let ground_top = viewport.ground_y();
        Self {
            kind,
            x: viewport.width + rng.random::<f32>() * 100.0,
            y: ground_top + 20.0 + rng.random::<f32>() * (viewport.ground_height - 40.0).max(0.0),
            size: 15.0 + rng.random::<f32>() * 20.0,
            frame: 0,
            parallax_factor: 0.5 + rng.random::<f32>() * 0.3,
            marked_for_deletion: false,
        }
    }

    pub fn speed(&self) -> f32 {
        BASE_GAME_SPEED * self.parallax_factor
    }

    pub fn update(&mut self) {
        self.x -= self.speed();
        self.frame += 1;
        if self.x < -100.0 {
            self.marked_for_deletion = true;
        }
    }
}
