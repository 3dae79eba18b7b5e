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

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [0.3, 0.85, 1.0, 1.0];
    pub const SHIP_WING: [f32; 4] = [0.15, 0.5, 0.8, 1.0];
    pub const BULLET: [f32; 4] = [1.0, 0.95, 0.4, 1.0];
    pub const ASTEROID: [f32; 4] = [0.55, 0.45, 0.38, 1.0];
    pub const BOSS: [f32; 4] = [0.75, 0.15, 0.25, 1.0];
    pub const BOSS_COCKPIT: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const BOSS_CANNON: [f32; 4] = [0.4, 0.4, 0.45, 1.0];
    pub const BOSS_BULLET: [f32; 4] = [1.0, 0.3, 0.9, 1.0];
    pub const HP_BAR_BACK: [f32; 4] = [0.2, 0.2, 0.2, 0.8];
    pub const HP_BAR_FILL: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    // Message colors
    pub const INFO: [f32; 4] = [0.3, 0.9, 1.0, 1.0];
    pub const WIN: [f32; 4] = [0.3, 1.0, 0.4, 1.0];
    pub const LOSE: [f32; 4] = [1.0, 0.3, 0.3, 1.0];

    /// CSS `rgba()` string for DOM overlays
    pub fn css(color: [f32; 4]) -> String {
        let [r, g, b, a] = color;
        format!(
            "rgba({}, {}, {}, {})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }
}
