//! Axis-aligned rectangles in world pixels
//!
//! Y grows downward (screen convention). A rectangle covers
//! `[min.x, max.x) x [min.y, max.y)`; two rectangles that only share an edge
//! do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Rectangle whose bottom edge is centred on `anchor` (sprite feet)
    pub fn from_midbottom(anchor: Vec2, width: f32, height: f32) -> Self {
        Self::new(anchor.x - width / 2.0, anchor.y - height, width, height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) / 2.0, self.max.y)
    }

    /// Copy moved by `offset`
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Strict overlap test (shared edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midbottom_anchor() {
        let r = Rect::from_midbottom(Vec2::new(100.0, 50.0), 20.0, 5.0);
        assert_eq!(r.min, Vec2::new(90.0, 45.0));
        assert_eq!(r.max, Vec2::new(110.0, 50.0));
        assert_eq!(r.midbottom(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 32.0, 48.0);
        let touching = Rect::new(32.0, 0.0, 32.0, 48.0);
        let inside = Rect::new(31.0, 10.0, 4.0, 4.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).translate(Vec2::new(5.0, -5.0));
        assert_eq!(r.min, Vec2::new(5.0, -5.0));
        assert_eq!(r.max, Vec2::new(15.0, 5.0));
        assert_eq!(r.width(), 10.0);
    }
}
