//! Axis-aligned collision detection
//!
//! Sprite bounding boxes are larger than the silhouettes drawn inside them,
//! so both boxes are shrunk by a fixed padding before the overlap test.

use serde::{Deserialize, Serialize};

use crate::consts::COLLISION_PADDING;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink the rectangle by `padding` on every side
    pub fn inset(&self, padding: f32) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: self.width - 2.0 * padding,
            height: self.height - 2.0 * padding,
        }
    }

    /// Strict AABB overlap (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Padded overlap test used between the player and each obstacle
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.inset(COLLISION_PADDING)
        .overlaps(&b.inset(COLLISION_PADDING))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_overlap_collides() {
        let a = Rect::new(100.0, 100.0, 50.0, 100.0);
        assert!(collides(&a, &a));
    }

    #[test]
    fn test_near_miss_within_padding_is_forgiven() {
        // Boxes overlap by 15px horizontally, but each loses 10px per side
        let player = Rect::new(50.0, 250.0, 50.0, 100.0);
        let fire = Rect::new(85.0, 300.0, 40.0, 50.0);
        assert!(player.overlaps(&fire));
        assert!(!collides(&player, &fire));
    }

    #[test]
    fn test_deep_overlap_collides() {
        let player = Rect::new(50.0, 250.0, 50.0, 100.0);
        let fire = Rect::new(70.0, 300.0, 40.0, 50.0);
        assert!(collides(&player, &fire));
    }

    #[test]
    fn test_vertical_clearance() {
        // Player high above the flame
        let player = Rect::new(60.0, 100.0, 50.0, 100.0);
        let fire = Rect::new(60.0, 300.0, 40.0, 50.0);
        assert!(!collides(&player, &fire));
    }

    proptest! {
        #[test]
        fn prop_separated_never_collide(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 25.0f32..200.0,
            h in 25.0f32..200.0,
            gap in 0.0f32..300.0,
            other_w in 25.0f32..200.0,
            other_h in 25.0f32..200.0,
            horizontal in any::<bool>(),
        ) {
            let a = Rect::new(x, y, w, h);
            let b = if horizontal {
                Rect::new(x + w + gap, y, other_w, other_h)
            } else {
                Rect::new(x, y + h + gap, other_w, other_h)
            };
            prop_assert!(!collides(&a, &b));
            prop_assert!(!collides(&b, &a));
        }

        #[test]
        fn prop_identical_rects_collide(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 25.0f32..200.0,
            h in 25.0f32..200.0,
        ) {
            let a = Rect::new(x, y, w, h);
            prop_assert!(collides(&a, &a));
        }

        #[test]
        fn prop_collision_is_symmetric(
            ax in -200.0f32..200.0, ay in -200.0f32..200.0,
            bx in -200.0f32..200.0, by in -200.0f32..200.0,
            w in 25.0f32..100.0, h in 25.0f32..100.0,
        ) {
            let a = Rect::new(ax, ay, w, h);
            let b = Rect::new(bx, by, h, w);
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }
    }
}
