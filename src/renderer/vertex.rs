//! Vertex types for 2D debug geometry

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
}

/// Colors for overlay elements
pub mod colors {
    pub const CELL: [f32; 4] = [0.2, 0.6, 1.0, 0.35];
    pub const OBSTACLE: [f32; 4] = [1.0, 0.25, 0.2, 0.5];
    pub const FOOTPRINT: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    pub const SAMPLE_POINT: [f32; 4] = [1.0, 0.9, 0.2, 1.0];
}
