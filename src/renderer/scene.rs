//! Procedural scene drawing
//!
//! Turns a `GameState` into one triangle list, back to front. Nothing here
//! mutates state; animation comes from the entities' own frame counters.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::shapes;
use super::vertex::{Vertex, colors, hsl};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    Bird, Cloud, GameState, Obstacle, Player, PlayerPose, UndergroundItem, UndergroundKind,
    Viewport, celestial_position, star_position,
};

/// Build the full frame for the current state
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let night = state.day_phase().is_night();
    let vp = &state.viewport;

    draw_sky(&mut out, vp, night);
    if night {
        let star_frame = if settings.reduced_motion {
            0
        } else {
            state.frame_count
        };
        draw_stars(&mut out, vp, star_frame);
    }
    draw_celestial_body(&mut out, celestial_position(state.frame_count, vp), night);

    for cloud in &state.ambient.clouds {
        draw_cloud(&mut out, cloud, night);
    }
    for bird in &state.ambient.birds {
        draw_bird(&mut out, bird, night);
    }

    out.extend(shapes::rect(
        0.0,
        vp.ground_y(),
        vp.width,
        vp.ground_height,
        if night {
            colors::GROUND_NIGHT
        } else {
            colors::GROUND_DAY
        },
    ));
    for item in &state.ambient.underground {
        draw_underground_item(&mut out, item);
    }
    out.extend(shapes::rect(
        0.0,
        vp.ground_y(),
        vp.width,
        GRASS_HEIGHT,
        if night {
            colors::GRASS_NIGHT
        } else {
            colors::GRASS_DAY
        },
    ));

    draw_player(&mut out, &state.player);
    for obstacle in &state.obstacles {
        draw_obstacle(&mut out, obstacle);
    }

    out
}

fn draw_sky(out: &mut Vec<Vertex>, vp: &Viewport, night: bool) {
    let color = if night {
        colors::SKY_NIGHT
    } else {
        colors::SKY_DAY
    };
    out.extend(shapes::rect(0.0, 0.0, vp.width, vp.height, color));
}

fn draw_stars(out: &mut Vec<Vertex>, vp: &Viewport, frame: u64) {
    for i in 0..STAR_COUNT {
        let p = star_position(i, frame, vp);
        out.extend(shapes::rect(p.x, p.y, STAR_SIZE, STAR_SIZE, colors::STAR));
    }
}

fn draw_celestial_body(out: &mut Vec<Vertex>, center: Vec2, night: bool) {
    if night {
        out.extend(shapes::circle(center, MOON_RADIUS, colors::MOON, 32));
        out.extend(shapes::circle(
            center + Vec2::new(-10.0, 5.0),
            5.0,
            colors::MOON_CRATER,
            12,
        ));
    } else {
        out.extend(shapes::circle(center, SUN_RADIUS, colors::SUN, 40));
        for i in 0..8 {
            let angle = (i as f32 / 8.0) * TAU;
            let dir = Vec2::new(angle.cos(), angle.sin());
            out.extend(shapes::line(
                center + dir * 50.0,
                center + dir * 70.0,
                2.0,
                colors::SUN,
            ));
        }
    }
}

/// Three lobes: half-discs at each end and a large hump on top
fn draw_cloud(out: &mut Vec<Vertex>, cloud: &Cloud, night: bool) {
    let color = if night {
        colors::CLOUD_NIGHT
    } else {
        colors::CLOUD_DAY
    };
    let (x, y, w, h) = (cloud.x, cloud.y, cloud.width, cloud.height);

    let mut outline = Vec::with_capacity(64);
    outline.extend(shapes::arc_points(Vec2::new(x, y), h / 2.0, FRAC_PI_2, 1.5 * PI, 12));
    outline.extend(shapes::arc_points(
        Vec2::new(x + w / 2.0, y - h / 2.0),
        h,
        PI,
        TAU,
        20,
    ));
    outline.extend(shapes::arc_points(
        Vec2::new(x + w, y),
        h / 2.0,
        1.5 * PI,
        2.5 * PI,
        12,
    ));

    out.extend(shapes::fan(Vec2::new(x + w / 2.0, y), &outline, color));
}

fn draw_bird(out: &mut Vec<Vertex>, bird: &Bird, night: bool) {
    let color = if night {
        colors::BIRD_NIGHT
    } else {
        colors::BIRD_DAY
    };
    let (x, y, w) = (bird.x, bird.y, bird.width);
    let wing_y = (bird.frame as f32 * 0.2).sin() * 5.0;

    let mut points = shapes::quad_curve(
        Vec2::new(x, y),
        Vec2::new(x + w / 4.0, y - wing_y),
        Vec2::new(x + w / 2.0, y),
        6,
    );
    points.extend(
        shapes::quad_curve(
            Vec2::new(x + w / 2.0, y),
            Vec2::new(x + w * 0.75, y - wing_y),
            Vec2::new(x + w, y),
            6,
        )
        .into_iter()
        .skip(1),
    );
    out.extend(shapes::polyline(&points, 2.0, color));
}

fn draw_underground_item(out: &mut Vec<Vertex>, item: &UndergroundItem) {
    let origin = Vec2::new(item.x, item.y);
    let size = item.size;
    let frame = item.frame as f32;

    match item.kind {
        UndergroundKind::Worm => {
            let points: Vec<Vec2> = (0..size as u32)
                .step_by(2)
                .map(|i| {
                    let i = i as f32;
                    origin + Vec2::new(i, (frame * 0.05 + i * 0.5).sin() * 3.0)
                })
                .collect();
            out.extend(shapes::polyline(&points, 3.0, colors::WORM));
        }
        UndergroundKind::Rock => {
            out.extend(shapes::circle(origin, size / 2.0, colors::ROCK, 16));
            out.extend(shapes::circle(
                origin + Vec2::new(-2.0, -2.0),
                size / 4.0,
                colors::ROCK_HIGHLIGHT,
                12,
            ));
        }
        UndergroundKind::Bug => {
            out.extend(shapes::ellipse(origin, size / 3.0, size / 4.0, colors::BUG, 16));
            for (dx, dy) in [(-1.0f32, -1.0f32), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
                out.extend(shapes::line(
                    origin + Vec2::new(5.0 * dx, 0.0),
                    origin + Vec2::new(8.0 * dx, 3.0 * dy),
                    1.0,
                    colors::BUG_LEGS,
                ));
            }
        }
        UndergroundKind::Rat => {
            out.extend(shapes::ellipse(origin, size / 2.0, size / 3.0, colors::RAT, 16));
            let tail = shapes::quad_curve(
                origin + Vec2::new(size / 2.0, 0.0),
                origin + Vec2::new(size, (frame * 0.1).sin() * 5.0),
                origin + Vec2::new(size + 10.0, 0.0),
                8,
            );
            out.extend(shapes::polyline(&tail, 2.0, colors::PINK));
            out.extend(shapes::circle(
                origin + Vec2::new(-size / 3.0, -size / 4.0),
                3.0,
                colors::PINK,
                8,
            ));
        }
        UndergroundKind::Snake => {
            let length = (size * 1.5) as u32;
            let points: Vec<Vec2> = (0..length)
                .step_by(3)
                .map(|i| {
                    let i = i as f32;
                    origin + Vec2::new(i - size / 2.0, (frame * 0.05 + i * 0.3).sin() * 4.0)
                })
                .collect();
            out.extend(shapes::polyline(&points, 4.0, colors::SNAKE));
            if let (Some(head), Some(tail)) = (points.first(), points.last()) {
                out.extend(shapes::dot(*head, 4.0, colors::SNAKE));
                out.extend(shapes::dot(*tail, 4.0, colors::SNAKE));
            }
            if (item.frame / 20) % 2 == 0 {
                let mouth = origin + Vec2::new(-size / 2.0, 0.0);
                out.extend(shapes::line(
                    mouth,
                    mouth - Vec2::new(5.0, 0.0),
                    1.0,
                    colors::TONGUE,
                ));
            }
        }
        UndergroundKind::Hole => {
            out.extend(shapes::ellipse(origin, size, size / 2.0, colors::HOLE, 20));
        }
        UndergroundKind::Water => {
            out.extend(shapes::ellipse(origin, size * 1.5, size / 2.0, colors::WATER, 20));
        }
    }
}

/// Cheap repeatable noise in [0, 1) for flame flicker
fn flicker(seed: u32) -> f32 {
    ((seed as f32 * 12.9898).sin() * 43_758.547).fract().abs()
}

/// Two-layer flame filling the box (x, y, w, h), bottom edge on y + h
fn draw_flame(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, frame: u32) {
    let time = frame as f32 * 0.2;
    let base = y + h;

    let mut outer = shapes::quad_curve(
        Vec2::new(x, base),
        Vec2::new(x - 5.0 + time.sin() * 5.0, y + h / 2.0),
        Vec2::new(x + w / 2.0 + (time * 1.5).cos() * 5.0, y),
        10,
    );
    outer.extend(
        shapes::quad_curve(
            Vec2::new(x + w / 2.0 + (time * 1.5).cos() * 5.0, y),
            Vec2::new(x + w + 5.0 + (time + 1.0).sin() * 5.0, y + h / 2.0),
            Vec2::new(x + w, base),
            10,
        )
        .into_iter()
        .skip(1),
    );
    let outer_color = hsl(10.0 + flicker(frame) * 20.0, 1.0, 0.5);
    out.extend(shapes::fan(Vec2::new(x + w / 2.0, base - h * 0.3), &outer, outer_color));

    let mut inner = shapes::quad_curve(
        Vec2::new(x + 10.0, base),
        Vec2::new(x + 10.0 + (time + 2.0).sin() * 3.0, y + h / 2.0 + 10.0),
        Vec2::new(x + w / 2.0 + (time * 2.0).cos() * 3.0, y + 15.0),
        8,
    );
    inner.extend(
        shapes::quad_curve(
            Vec2::new(x + w / 2.0 + (time * 2.0).cos() * 3.0, y + 15.0),
            Vec2::new(x + w - 10.0 + (time + 3.0).sin() * 3.0, y + h / 2.0 + 10.0),
            Vec2::new(x + w - 10.0, base),
            8,
        )
        .into_iter()
        .skip(1),
    );
    let inner_color = hsl(40.0 + flicker(frame.wrapping_add(7)) * 20.0, 1.0, 0.6);
    out.extend(shapes::fan(
        Vec2::new(x + w / 2.0, base - (h - 15.0) * 0.3),
        &inner,
        inner_color,
    ));
}

fn draw_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle) {
    draw_flame(
        out,
        obstacle.x,
        obstacle.y,
        obstacle.width,
        obstacle.height,
        obstacle.frame,
    );
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player) {
    let (x, y, w, h) = (player.x, player.y, player.width, player.height);

    let pose = player.pose();
    if let PlayerPose::Burning(index) = pose {
        // Wider than the body, feet-anchored; each animation frame is a different height
        let draw_w = w * 1.5;
        let draw_h = h * (0.8 + 0.1 * index as f32);
        let draw_x = x + (w - draw_w) / 2.0;
        draw_flame(out, draw_x, y + h - draw_h, draw_w, draw_h, player.fire_frame);
        return;
    }

    let head_r = w * 0.22;
    let head = Vec2::new(x + w / 2.0, y + head_r + 2.0);
    let hip = Vec2::new(x + w / 2.0, y + h * 0.62);
    let shoulder = Vec2::new(x + w / 2.0, y + head_r * 2.0 + 6.0);

    // (front foot, back foot) offsets from the hip
    let (front, back) = match pose {
        PlayerPose::Running(0) => (Vec2::new(14.0, h * 0.38), Vec2::new(-14.0, h * 0.38)),
        PlayerPose::Running(1) => (Vec2::new(4.0, h * 0.38), Vec2::new(-4.0, h * 0.38)),
        PlayerPose::Running(_) => (Vec2::new(-10.0, h * 0.38), Vec2::new(12.0, h * 0.38)),
        _ => (Vec2::new(16.0, h * 0.26), Vec2::new(-12.0, h * 0.30)),
    };

    out.extend(shapes::line(shoulder, hip, 12.0, colors::PLAYER));
    out.extend(shapes::line(hip, hip + front, 7.0, colors::PLAYER));
    out.extend(shapes::line(hip, hip + back, 7.0, colors::PLAYER));
    out.extend(shapes::line(
        shoulder + Vec2::new(0.0, 4.0),
        shoulder + Vec2::new(-back.x, 26.0),
        5.0,
        colors::PLAYER,
    ));
    out.extend(shapes::circle(head, head_r, colors::PLAYER_SKIN, 16));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, start_run, tick};

    fn state() -> GameState {
        GameState::new(17, Viewport::new(800.0, 400.0))
    }

    fn contains_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_scene_is_whole_triangles() {
        let mut state = state();
        start_run(&mut state);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        let v = build_scene(&state, &Settings::default());
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
    }

    #[test]
    fn test_day_scene_colors() {
        let state = state();
        let v = build_scene(&state, &Settings::default());
        assert_eq!(v[0].color, colors::SKY_DAY);
        assert!(contains_color(&v, colors::SUN));
        assert!(contains_color(&v, colors::GRASS_DAY));
        assert!(!contains_color(&v, colors::MOON));
        assert!(!contains_color(&v, colors::STAR));
    }

    #[test]
    fn test_night_scene_has_moon_and_stars() {
        let mut state = state();
        state.jump_count = 15;
        let v = build_scene(&state, &Settings::default());
        assert_eq!(v[0].color, colors::SKY_NIGHT);
        assert!(contains_color(&v, colors::MOON));
        assert!(contains_color(&v, colors::GROUND_NIGHT));
        let star_vertices = v.iter().filter(|v| v.color == colors::STAR).count();
        assert_eq!(star_vertices, STAR_COUNT as usize * 6);
    }

    #[test]
    fn test_every_underground_kind_draws() {
        let vp = Viewport::new(800.0, 400.0);
        for kind in UndergroundKind::ALL {
            let item = UndergroundItem {
                kind,
                x: 100.0,
                y: vp.ground_y() + 25.0,
                size: 20.0,
                frame: 0,
                parallax_factor: 0.6,
                marked_for_deletion: false,
            };
            let mut out = Vec::new();
            draw_underground_item(&mut out, &item);
            assert!(!out.is_empty(), "{kind:?} drew nothing");
            assert_eq!(out.len() % 3, 0);
        }
    }

    #[test]
    fn test_dead_player_draws_flames_not_body() {
        let mut player = Player::new(&Viewport::new(800.0, 400.0));
        player.kill();
        let mut out = Vec::new();
        draw_player(&mut out, &player);
        assert!(!out.is_empty());
        assert!(!contains_color(&out, colors::PLAYER));
    }

    #[test]
    fn test_flicker_in_unit_range() {
        for seed in 0..1000 {
            let f = flicker(seed);
            assert!((0.0..1.0).contains(&f));
        }
    }
}
