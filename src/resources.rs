//! Sprite sheet descriptions and their cache
//!
//! Image decoding belongs to the renderer. What the simulation needs from a
//! sheet is its frame layout; the cache makes sure each sheet file is checked
//! and described once per loaded map. Nothing is ever evicted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::sim::avatar::{Direction, WalkPhase};
use crate::sim::rect::Rect;

/// Frame width of the character sheets
pub const FRAME_WIDTH: f32 = 32.0;
/// Frame height of the character sheets
pub const FRAME_HEIGHT: f32 = 48.0;
/// Gap between frames
pub const FRAME_SPACING: f32 = 1.0;

/// Frame layout of a character sheet
///
/// One row per facing (south, west, east, north), one column per stride
/// (right leg, standing, left leg).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub path: PathBuf,
    pub frame_width: f32,
    pub frame_height: f32,
    pub spacing: f32,
}

impl SpriteSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            spacing: FRAME_SPACING,
        }
    }

    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.frame_width, self.frame_height)
    }

    fn row(dir: Direction) -> u32 {
        match dir {
            Direction::South => 0,
            Direction::West => 1,
            Direction::East => 2,
            Direction::North => 3,
        }
    }

    /// Source rectangle for a facing and walk phase
    pub fn frame(&self, dir: Direction, phase: WalkPhase) -> Rect {
        let col = phase.frame_column() as f32;
        let row = Self::row(dir) as f32;
        Rect::new(
            col * (self.frame_width + self.spacing),
            row * (self.frame_height + self.spacing),
            self.frame_width,
            self.frame_height,
        )
    }
}

/// Sprite sheets keyed by file path
#[derive(Debug, Default)]
pub struct ResourceCache {
    sheets: HashMap<PathBuf, Arc<SpriteSheet>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared sheet for `path`; a missing file is an error
    pub fn sprite_sheet(&mut self, path: impl AsRef<Path>) -> Result<Arc<SpriteSheet>, WorldError> {
        let path = path.as_ref();
        if let Some(sheet) = self.sheets.get(path) {
            return Ok(Arc::clone(sheet));
        }
        if !path.is_file() {
            return Err(WorldError::MissingSpritesheet(path.to_path_buf()));
        }
        log::info!("~ Image: '{}'", path.display());
        let sheet = Arc::new(SpriteSheet::new(path));
        self.sheets.insert(path.to_path_buf(), Arc::clone(&sheet));
        Ok(sheet)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
