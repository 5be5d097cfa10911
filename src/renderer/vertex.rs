//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Build an RGBA color from a 0xRRGGBB literal
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// HSL (degrees, 0-1, 0-1) to RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    pub const SKY_DAY: [f32; 4] = hex(0x87CEEB, 1.0);
    pub const SKY_NIGHT: [f32; 4] = hex(0x000033, 1.0);
    pub const STAR: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const SUN: [f32; 4] = hex(0xFFD700, 1.0);
    pub const MOON: [f32; 4] = hex(0xF4F6F0, 1.0);
    pub const MOON_CRATER: [f32; 4] = hex(0xE0E0E0, 1.0);
    pub const GROUND_DAY: [f32; 4] = hex(0x8B4513, 1.0);
    pub const GROUND_NIGHT: [f32; 4] = hex(0x3B1E08, 1.0);
    pub const GRASS_DAY: [f32; 4] = hex(0x228B22, 1.0);
    pub const GRASS_NIGHT: [f32; 4] = hex(0x1A4D1A, 1.0);
    pub const CLOUD_DAY: [f32; 4] = hex(0xFFFFFF, 0.8);
    pub const CLOUD_NIGHT: [f32; 4] = hex(0x646464, 0.8);
    pub const BIRD_DAY: [f32; 4] = hex(0x333333, 1.0);
    pub const BIRD_NIGHT: [f32; 4] = hex(0xCCCCCC, 1.0);
    pub const PLAYER: [f32; 4] = hex(0x333333, 1.0);
    pub const PLAYER_SKIN: [f32; 4] = hex(0xE0B48C, 1.0);

    pub const WORM: [f32; 4] = hex(0xFF9999, 1.0);
    pub const ROCK: [f32; 4] = hex(0x555555, 1.0);
    pub const ROCK_HIGHLIGHT: [f32; 4] = hex(0x777777, 1.0);
    pub const BUG: [f32; 4] = hex(0x222222, 1.0);
    pub const BUG_LEGS: [f32; 4] = hex(0x000000, 1.0);
    pub const RAT: [f32; 4] = hex(0x808080, 1.0);
    pub const PINK: [f32; 4] = hex(0xFFC0CB, 1.0);
    pub const SNAKE: [f32; 4] = hex(0x228B22, 1.0);
    pub const TONGUE: [f32; 4] = hex(0xFF0000, 1.0);
    pub const HOLE: [f32; 4] = hex(0x2A1505, 1.0);
    pub const WATER: [f32; 4] = hex(0x0064FF, 0.6);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xFF0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x000033, 0.5)[2], 0x33 as f32 / 255.0);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
        let blue = hsl(240.0, 1.0, 0.5);
        assert!((blue[2] - 1.0).abs() < 1e-5 && blue[0].abs() < 1e-5);
    }
}
