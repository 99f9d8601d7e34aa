//! Axis-separated collision against blocking tiles
//!
//! Broad phase is the 3x3 cell neighbourhood around the mover. Each
//! neighbour only blocks travel in the directions its position makes
//! possible: the tile to the north-west can only be entered while moving
//! north or west, so it tests `NORTH | WEST` against the tile's `Block` mask.
//!
//! Narrow phase tests the footprint moved by each axis of the step on its
//! own. A blocked axis is zeroed, a free one keeps the exact requested
//! value, which gives sliding along walls for diagonal input.

use glam::Vec2;

use super::rect::Rect;
use super::tile_index::TileIndex;
use crate::map::BlockMask;
use crate::special_round;

/// Neighbour offsets and the travel directions that can reach them
pub const NEIGHBOUR_MASKS: [((i64, i64), BlockMask); 9] = [
    ((0, 0), BlockMask::ALL),
    ((0, -1), BlockMask::NORTH),
    ((1, -1), BlockMask::NORTH.union(BlockMask::EAST)),
    ((1, 0), BlockMask::EAST),
    ((1, 1), BlockMask::SOUTH.union(BlockMask::EAST)),
    ((0, 1), BlockMask::SOUTH),
    ((-1, 1), BlockMask::SOUTH.union(BlockMask::WEST)),
    ((-1, 0), BlockMask::WEST),
    ((-1, -1), BlockMask::NORTH.union(BlockMask::WEST)),
];

/// A blocking cell near the mover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub tile_x: i64,
    pub tile_y: i64,
    pub rect: Rect,
}

/// Cells around `pos` whose tiles block the direction they can be reached from
pub fn blocking_neighbours(pos: Vec2, index: &TileIndex<'_>) -> Vec<Obstacle> {
    let (cx, cy) = index.cell_coords(pos);
    let mut obstacles = Vec::new();

    for ((dx, dy), mask) in NEIGHBOUR_MASKS {
        let (tx, ty) = (cx + dx, cy + dy);
        let hit = index.lookup_cell(tx, ty);
        if hit.tiles.iter().any(|t| t.block.intersects(mask)) {
            obstacles.push(Obstacle {
                tile_x: tx,
                tile_y: ty,
                rect: index.cell_rect(tx, ty),
            });
        }
    }

    obstacles
}

/// Clip a requested step against nearby blocking tiles.
///
/// `pos` is the footprint anchor (midbottom). Each returned component is
/// either the requested value untouched or exactly zero.
pub fn resolve(
    pos: Vec2,
    step: Vec2,
    footprint_width: f32,
    footprint_height: f32,
    index: &TileIndex<'_>,
) -> Vec2 {
    if step == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let obstacles = blocking_neighbours(pos, index);
    if obstacles.is_empty() {
        return step;
    }

    let footprint = Rect::from_midbottom(pos, footprint_width, footprint_height);
    let blocked = |offset: Vec2| {
        let moved = footprint.translate(offset);
        obstacles.iter().any(|o| moved.overlaps(&o.rect))
    };

    let result_x = if step.x != 0.0 && blocked(Vec2::new(special_round(step.x), 0.0)) {
        0.0
    } else {
        step.x
    };
    let result_y = if step.y != 0.0 && blocked(Vec2::new(0.0, special_round(step.y))) {
        0.0
    } else {
        step.y
    };

    Vec2::new(result_x, result_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Cell, ContentGrid, Properties, PropertyValue, RawCell, Tile, TileSet};
    use proptest::prelude::*;

    const FLOOR: u32 = 1;
    const WALL: u32 = 2;

    fn tiles_with(block: PropertyValue) -> TileSet {
        let mut tiles = TileSet::new();
        tiles.insert(FLOOR, Tile::from_properties(FLOOR, Properties::default()).unwrap());
        let mut p = Properties::default();
        p.insert("Block", block);
        tiles.insert(WALL, Tile::from_properties(WALL, p).unwrap());
        tiles
    }

    /// 10x10 floor with walls at the given cells
    fn grid_with_walls(walls: &[(usize, usize)]) -> ContentGrid {
        let mut grid = ContentGrid::empty(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                let gid = if walls.contains(&(x, y)) { WALL } else { FLOOR };
                grid.set(x, y, Cell::from_raw(&RawCell::Gid(gid)));
            }
        }
        grid
    }

    #[test]
    fn test_step_into_wall_is_zeroed() {
        let grid = grid_with_walls(&[(5, 5)]);
        let tiles = tiles_with(PropertyValue::Bool(true));
        let index = TileIndex::new(&grid, &tiles, 32.0, 48.0);

        // Centre of tile (4, 5), feet on the cell's vertical centre
        let pos = Vec2::new(4.0 * 32.0 + 16.0, 5.0 * 48.0 + 24.0);
        let step = resolve(pos, Vec2::new(40.0, 0.0), 32.0, 5.0, &index);
        assert_eq!(step, Vec2::ZERO);
    }

    #[test]
    fn test_step_away_from_wall_is_kept() {
        let grid = grid_with_walls(&[(5, 5)]);
        let tiles = tiles_with(PropertyValue::Bool(true));
        let index = TileIndex::new(&grid, &tiles, 32.0, 48.0);

        let pos = Vec2::new(4.0 * 32.0 + 16.0, 5.0 * 48.0 + 24.0);
        let step = resolve(pos, Vec2::new(-3.3, 0.0), 20.0, 5.0, &index);
        assert_eq!(step, Vec2::new(-3.3, 0.0));
    }

    #[test]
    fn test_diagonal_slides_along_wall() {
        let grid = grid_with_walls(&[(5, 5)]);
        let tiles = tiles_with(PropertyValue::Bool(true));
        let index = TileIndex::new(&grid, &tiles, 32.0, 48.0);

        // Footprint right edge flush against the wall's left side
        let pos = Vec2::new(160.0 - 10.0, 5.0 * 48.0 + 24.0);
        let step = resolve(pos, Vec2::new(2.5, -2.5), 20.0, 5.0, &index);
        assert_eq!(step, Vec2::new(0.0, -2.5));
    }

    #[test]
    fn test_fractional_step_still_blocks() {
        let grid = grid_with_walls(&[(5, 5)]);
        let tiles = tiles_with(PropertyValue::Bool(true));
        let index = TileIndex::new(&grid, &tiles, 32.0, 48.0);

        // A 0.1 px step would not overlap, but rounds up to a full pixel
        let pos = Vec2::new(160.0 - 10.0, 5.0 * 48.0 + 24.0);
        let step = resolve(pos, Vec2::new(0.1, 0.0), 20.0, 5.0, &index);
        assert_eq!(step.x, 0.0);
    }

    #[test]
    fn test_directional_mask() {
        // Wall only blocks northbound travel
        let grid = grid_with_walls(&[(4, 4)]);
        let tiles = tiles_with(PropertyValue::Int(BlockMask::NORTH.bits() as i64));
        let index = TileIndex::new(&grid, &tiles, 32.0, 32.0);

        // Standing south of the wall, walking north: blocked
        let south = Vec2::new(4.0 * 32.0 + 16.0, 5.0 * 32.0 + 5.0);
        assert_eq!(resolve(south, Vec2::new(0.0, -4.0), 20.0, 5.0, &index).y, 0.0);

        // Standing west of it, walking east into it: its mask has no EAST bit
        let west = Vec2::new(4.0 * 32.0 - 11.0, 4.0 * 32.0 + 16.0);
        assert_eq!(resolve(west, Vec2::new(4.0, 0.0), 20.0, 5.0, &index).x, 4.0);
    }

    #[test]
    fn test_corner_neighbour_uses_combined_mask() {
        // Tile to the north-east blocking only EAST travel still counts
        let grid = grid_with_walls(&[(5, 4)]);
        let tiles = tiles_with(PropertyValue::Int(BlockMask::EAST.bits() as i64));
        let index = TileIndex::new(&grid, &tiles, 32.0, 32.0);

        let pos = Vec2::new(4.0 * 32.0 + 16.0, 5.0 * 32.0 + 5.0);
        let found = blocking_neighbours(pos, &index);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].tile_x, found[0].tile_y), (5, 4));
    }

    #[test]
    fn test_zero_mask_never_blocks() {
        let grid = grid_with_walls(&[(5, 5)]);
        let tiles = tiles_with(PropertyValue::Int(0));
        let index = TileIndex::new(&grid, &tiles, 32.0, 48.0);
        let pos = Vec2::new(4.0 * 32.0 + 16.0, 5.0 * 48.0 + 24.0);
        assert!(blocking_neighbours(pos, &index).is_empty());
        assert_eq!(
            resolve(pos, Vec2::new(40.0, 0.0), 32.0, 5.0, &index),
            Vec2::new(40.0, 0.0)
        );
    }

    #[test]
    fn test_off_map_is_open() {
        let grid = grid_with_walls(&[]);
        let tiles = tiles_with(PropertyValue::Bool(true));
        let index = TileIndex::new(&grid, &tiles, 32.0, 32.0);
        let step = resolve(Vec2::new(-100.0, -100.0), Vec2::new(-7.0, 3.0), 20.0, 5.0, &index);
        assert_eq!(step, Vec2::new(-7.0, 3.0));
    }

    proptest! {
        #[test]
        fn zero_step_is_always_zero(
            walls in proptest::collection::vec((0usize..10, 0usize..10), 0..30),
            x in -50.0f32..370.0,
            y in -50.0f32..370.0,
            w in 1.0f32..40.0,
        ) {
            let grid = grid_with_walls(&walls);
            let tiles = tiles_with(PropertyValue::Bool(true));
            let index = TileIndex::new(&grid, &tiles, 32.0, 32.0);
            let step = resolve(Vec2::new(x, y), Vec2::ZERO, w, 5.0, &index);
            prop_assert_eq!(step, Vec2::ZERO);
        }

        #[test]
        fn components_are_kept_or_zeroed(
            walls in proptest::collection::vec((0usize..10, 0usize..10), 0..30),
            x in 0.0f32..320.0,
            y in 0.0f32..320.0,
            sx in -20.0f32..20.0,
            sy in -20.0f32..20.0,
        ) {
            let grid = grid_with_walls(&walls);
            let tiles = tiles_with(PropertyValue::Bool(true));
            let index = TileIndex::new(&grid, &tiles, 32.0, 32.0);
            let step = resolve(Vec2::new(x, y), Vec2::new(sx, sy), 20.0, 5.0, &index);
            prop_assert!(step.x == sx || step.x == 0.0);
            prop_assert!(step.y == sy || step.y == 0.0);
        }
    }
}
