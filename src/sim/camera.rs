//! Camera: which level is being looked at, and the scroll offset

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::avatar::AvatarId;

/// View onto the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Level the camera is on (drives layer visibility)
    pub level: i32,
    /// Centre of the view in world pixels; `z` lifts it with the terrain
    pub pos: Vec3,
    /// Screen size in pixels
    pub size: Vec2,
    /// Avatar the camera follows
    pub tracked: Option<AvatarId>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            level: 0,
            pos: Vec3::ZERO,
            size: Vec2::new(1024.0, 768.0),
            tracked: None,
        }
    }
}

impl Camera {
    /// World position of the top-left screen corner
    pub fn scroll_offset(&self) -> Vec2 {
        Vec2::new(
            self.pos.x - self.size.x / 2.0,
            self.pos.y - self.pos.z - self.size.y / 2.0,
        )
    }

    /// Project a world point (height lifts it up the screen)
    pub fn world_to_screen(&self, p: Vec3) -> Vec2 {
        Vec2::new(p.x, p.y - p.z) - self.scroll_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_maps_to_screen_centre() {
        let cam = Camera {
            pos: Vec3::new(500.0, 400.0, 30.0),
            size: Vec2::new(800.0, 600.0),
            ..Default::default()
        };
        assert_eq!(cam.world_to_screen(cam.pos), Vec2::new(400.0, 300.0));
        assert_eq!(cam.scroll_offset(), Vec2::new(100.0, 70.0));
        // Same ground point without height sits lower on screen
        assert_eq!(
            cam.world_to_screen(Vec3::new(500.0, 400.0, 0.0)),
            Vec2::new(400.0, 330.0)
        );
    }
}
