//! Position to tile lookup
//!
//! Maps a world pixel position onto a layer's content grid and resolves the
//! cell to tile records. Anything off the grid is simply "no tile".

use glam::Vec2;

use super::rect::Rect;
use crate::map::{Cell, ContentGrid, Tile, TileSet};

/// Result of a tile lookup
#[derive(Debug, Clone)]
pub struct TileHit<'a> {
    pub tile_x: i64,
    pub tile_y: i64,
    /// The cell, if the grid has one here
    pub cell: Option<&'a Cell>,
    /// Every resolvable tile of the cell, in cell order
    pub tiles: Vec<&'a Tile>,
    primary: Option<&'a Tile>,
}

impl<'a> TileHit<'a> {
    /// The tile whose properties count (the cell's first gid)
    pub fn primary(&self) -> Option<&'a Tile> {
        self.primary
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_none()
    }
}

/// Read-only view of one layer's grid plus the tile dictionary
#[derive(Debug, Clone, Copy)]
pub struct TileIndex<'a> {
    grid: &'a ContentGrid,
    tiles: &'a TileSet,
    tile_size: Vec2,
}

impl<'a> TileIndex<'a> {
    pub fn new(grid: &'a ContentGrid, tiles: &'a TileSet, tile_width: f32, tile_height: f32) -> Self {
        Self {
            grid,
            tiles,
            tile_size: Vec2::new(tile_width, tile_height),
        }
    }

    #[inline]
    pub fn tile_width(&self) -> f32 {
        self.tile_size.x
    }

    #[inline]
    pub fn tile_height(&self) -> f32 {
        self.tile_size.y
    }

    /// Grid coordinate of the cell containing `pos`
    pub fn cell_coords(&self, pos: Vec2) -> (i64, i64) {
        (
            (pos.x / self.tile_size.x).floor() as i64,
            (pos.y / self.tile_size.y).floor() as i64,
        )
    }

    /// Pixel rectangle covered by a cell
    pub fn cell_rect(&self, tile_x: i64, tile_y: i64) -> Rect {
        Rect::new(
            tile_x as f32 * self.tile_size.x,
            tile_y as f32 * self.tile_size.y,
            self.tile_size.x,
            self.tile_size.y,
        )
    }

    /// Tiles of the cell containing a world position
    pub fn lookup(&self, pos: Vec2) -> TileHit<'a> {
        let (tile_x, tile_y) = self.cell_coords(pos);
        self.lookup_cell(tile_x, tile_y)
    }

    /// Tiles of a cell; ids missing from the dictionary are skipped
    pub fn lookup_cell(&self, tile_x: i64, tile_y: i64) -> TileHit<'a> {
        let cell = self.grid.get(tile_x, tile_y);
        let mut tiles = Vec::new();
        let mut primary = None;
        if let Some(cell) = cell {
            for id in cell.tile_ids() {
                match self.tiles.get(&id) {
                    Some(tile) => tiles.push(tile),
                    None => log::trace!("tile id {id} at ({tile_x}, {tile_y}) not in dictionary"),
                }
            }
            primary = self.tiles.get(&cell.primary_tile_id());
        }
        TileHit {
            tile_x,
            tile_y,
            cell,
            tiles,
            primary,
        }
    }
}
