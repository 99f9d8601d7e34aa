//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Two triangles covering the quad `a b c d` (in winding order)
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Filled axis-aligned rectangle from its screen corners
pub fn filled_rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    )
}

/// Rectangle outline `thickness` pixels wide, drawn inside the edges
pub fn rect_outline(min: Vec2, max: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min((max.x - min.x) / 2.0).min((max.y - min.y) / 2.0);
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom
    vertices.extend(filled_rect(min, Vec2::new(max.x, min.y + t), color));
    vertices.extend(filled_rect(Vec2::new(min.x, max.y - t), max, color));
    // Left and right, between them
    vertices.extend(filled_rect(
        Vec2::new(min.x, min.y + t),
        Vec2::new(min.x + t, max.y - t),
        color,
    ));
    vertices.extend(filled_rect(
        Vec2::new(max.x - t, min.y + t),
        Vec2::new(max.x, max.y - t),
        color,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}
