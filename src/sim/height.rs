//! Surface height from tile metadata
//!
//! Each tile with a `Height` describes a plane centred on the tile midpoint:
//! `Height` tile-heights tall at the centre, tilted by `XSlope`/`YSlope`
//! tile-heights across its width/depth.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile_index::TileIndex;

/// Height of the surface under a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightSample {
    /// Height in vertical pixels above the level floor
    pub z: f32,
    /// dz/dx and dz/dy in pixels per pixel
    pub gradient: Vec2,
    /// False when no tile (or no `Height` property) covers the point
    pub exists: bool,
}

impl HeightSample {
    pub const NONE: HeightSample = HeightSample {
        z: 0.0,
        gradient: Vec2::ZERO,
        exists: false,
    };
}

/// Point used for height sampling: the anchor raised by half the box height,
/// so the middle of the footprint decides, not its bottom edge.
#[inline]
pub fn sample_point(anchor: Vec2, collision_box_height: f32) -> Vec2 {
    Vec2::new(anchor.x, anchor.y - collision_box_height / 2.0)
}

/// Height and local gradient of the surface at a world position
pub fn height_and_slope(world: Vec2, index: &TileIndex<'_>) -> HeightSample {
    let hit = index.lookup(world);
    let Some(tile) = hit.primary() else {
        return HeightSample::NONE;
    };
    let Some(height) = tile.height else {
        return HeightSample::NONE;
    };

    let tile_w = index.tile_width();
    let tile_h = index.tile_height();

    let h_avg = tile_h * height;
    let h_dx = tile_h * tile.x_slope;
    let h_dy = tile_h * tile.y_slope;

    // Position inside the tile, -0.5..0.5 around the midpoint
    let rel_x = (world.x - hit.tile_x as f32 * tile_w) / tile_w - 0.5;
    let rel_y = (world.y - hit.tile_y as f32 * tile_h) / tile_h - 0.5;

    HeightSample {
        z: h_avg + h_dx * rel_x + h_dy * rel_y,
        gradient: Vec2::new(h_dx / tile_w, h_dy / tile_h),
        exists: true,
    }
}
