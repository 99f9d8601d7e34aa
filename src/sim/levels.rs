//! Vertical levels and the layers that belong to them
//!
//! Map layers are grouped by their `Level` property. Each level has exactly
//! one metadata layer (height, slope and blocking data, never drawn) and one
//! avatar layer (where avatars on that level are drawn), plus any number of
//! plain visual layers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::tile_index::TileIndex;
use crate::error::WorldError;
use crate::map::{ContentGrid, TileSet};

/// What a layer is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerRole {
    Metadata,
    Avatar,
    Visual,
    Objects,
}

impl LayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerRole::Metadata => "metadata",
            LayerRole::Avatar => "avatar",
            LayerRole::Visual => "visual",
            LayerRole::Objects => "objects",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A world layer built from a map layer
#[derive(Debug, Clone, Serialize)]
pub struct SpriteLayer {
    /// Position in map draw order
    pub index: usize,
    pub name: String,
    pub level: i32,
    pub role: LayerRole,
    /// Visibility flag from the map file
    pub map_visible: bool,
    /// Current visibility (camera level rules applied)
    pub visible: bool,
    pub grid: ContentGrid,
    pub tile_width: f32,
    pub tile_height: f32,
}

impl SpriteLayer {
    /// Tile lookups on this layer
    pub fn tile_index<'a>(&'a self, tiles: &'a TileSet) -> TileIndex<'a> {
        TileIndex::new(&self.grid, tiles, self.tile_width, self.tile_height)
    }
}

/// Layers registered for one level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldLevel {
    pub level: i32,
    pub metadata: Option<usize>,
    pub avatar: Option<usize>,
    /// Visual and object layers
    pub others: Vec<usize>,
}

/// Level number to layer indices
#[derive(Debug, Clone, Default, Serialize)]
pub struct Levels {
    levels: HashMap<i32, WorldLevel>,
}

impl Levels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer; a level takes at most one metadata and one avatar layer
    pub fn register(
        &mut self,
        level: i32,
        role: LayerRole,
        index: usize,
        name: &str,
    ) -> Result<(), WorldError> {
        let entry = self.levels.entry(level).or_insert_with(|| WorldLevel {
            level,
            ..Default::default()
        });
        let slot = match role {
            LayerRole::Metadata => &mut entry.metadata,
            LayerRole::Avatar => &mut entry.avatar,
            LayerRole::Visual | LayerRole::Objects => {
                entry.others.push(index);
                return Ok(());
            }
        };
        if slot.is_some() {
            return Err(WorldError::DuplicateLayer {
                level,
                role,
                name: name.to_string(),
            });
        }
        *slot = Some(index);
        Ok(())
    }

    pub fn get(&self, level: i32) -> Option<&WorldLevel> {
        self.levels.get(&level)
    }

    /// Index of the level's metadata layer
    pub fn metadata_layer(&self, level: i32) -> Result<usize, WorldError> {
        self.levels
            .get(&level)
            .and_then(|l| l.metadata)
            .ok_or(WorldError::MissingLayer {
                level,
                role: LayerRole::Metadata,
            })
    }

    /// Index of the level's avatar layer
    pub fn avatar_layer(&self, level: i32) -> Result<usize, WorldError> {
        self.levels
            .get(&level)
            .and_then(|l| l.avatar)
            .ok_or(WorldError::MissingLayer {
                level,
                role: LayerRole::Avatar,
            })
    }

    /// Both layers avatars need to stand on a level
    pub fn require_walkable(&self, level: i32) -> Result<(usize, usize), WorldError> {
        Ok((self.metadata_layer(level)?, self.avatar_layer(level)?))
    }

    /// Registered level numbers, lowest first
    pub fn level_numbers(&self) -> Vec<i32> {
        let mut numbers: Vec<i32> = self.levels.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }
}

/// Whether a layer is drawn for the camera's current level.
///
/// Levels at or below the camera are drawn, the one directly above only
/// while `show_level_up` is set. Metadata and object layers never are.
pub fn layer_visible(
    layer_level: i32,
    role: LayerRole,
    map_visible: bool,
    camera_level: i32,
    show_level_up: bool,
) -> bool {
    if !map_visible || matches!(role, LayerRole::Metadata | LayerRole::Objects) {
        return false;
    }
    if layer_level <= camera_level {
        return true;
    }
    show_level_up && layer_level == camera_level + 1
}

/// Dead band for the "show level above" flag (thresholds in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelUpHysteresis {
    /// Turn on at or above this height
    pub show_at: f32,
    /// Turn off only below this height
    pub hide_below: f32,
}

impl LevelUpHysteresis {
    pub fn update(&self, showing: bool, z: f32) -> bool {
        if showing {
            z >= self.hide_below
        } else {
            z >= self.show_at
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_register_and_lookup() {
        let mut levels = Levels::new();
        levels.register(0, LayerRole::Visual, 0, "ground").unwrap();
        levels.register(0, LayerRole::Metadata, 1, "meta0").unwrap();
        levels.register(0, LayerRole::Avatar, 2, "avatars0").unwrap();
        levels.register(1, LayerRole::Metadata, 3, "meta1").unwrap();

        assert_eq!(levels.metadata_layer(0).unwrap(), 1);
        assert_eq!(levels.avatar_layer(0).unwrap(), 2);
        assert_eq!(levels.require_walkable(0).unwrap(), (1, 2));
        assert_eq!(levels.get(0).unwrap().others, vec![0]);
        assert_eq!(levels.level_numbers(), vec![0, 1]);
    }

    #[test]
    fn test_missing_level_is_error() {
        let mut levels = Levels::new();
        levels.register(1, LayerRole::Metadata, 3, "meta1").unwrap();

        assert!(matches!(
            levels.metadata_layer(7),
            Err(WorldError::MissingLayer { level: 7, role: LayerRole::Metadata })
        ));
        // Level exists but has no avatar layer
        assert!(matches!(
            levels.avatar_layer(1),
            Err(WorldError::MissingLayer { level: 1, role: LayerRole::Avatar })
        ));
        assert!(levels.require_walkable(1).is_err());
    }

    #[test]
    fn test_duplicate_metadata_rejected() {
        let mut levels = Levels::new();
        levels.register(0, LayerRole::Metadata, 0, "a").unwrap();
        let err = levels.register(0, LayerRole::Metadata, 1, "b").unwrap_err();
        assert!(matches!(err, WorldError::DuplicateLayer { level: 0, .. }));
        assert_eq!(levels.metadata_layer(0).unwrap(), 0);
    }

    #[test]
    fn test_visibility_rules() {
        // Below and at camera level
        assert!(layer_visible(0, LayerRole::Visual, true, 1, false));
        assert!(layer_visible(1, LayerRole::Avatar, true, 1, false));
        // One above only with the flag
        assert!(!layer_visible(2, LayerRole::Visual, true, 1, false));
        assert!(layer_visible(2, LayerRole::Visual, true, 1, true));
        // Two above never
        assert!(!layer_visible(3, LayerRole::Visual, true, 1, true));
        // Metadata and objects never
        assert!(!layer_visible(0, LayerRole::Metadata, true, 1, true));
        assert!(!layer_visible(0, LayerRole::Objects, true, 1, true));
        // Hidden in the map file
        assert!(!layer_visible(0, LayerRole::Visual, false, 1, true));
    }

    #[test]
    fn test_hysteresis_dead_band() {
        let h = LevelUpHysteresis {
            show_at: 34.5,
            hide_below: 23.0,
        };
        let mut showing = false;
        showing = h.update(showing, 30.0);
        assert!(!showing);
        showing = h.update(showing, 34.5);
        assert!(showing);
        // Retreat into the band: stays on
        showing = h.update(showing, 25.0);
        assert!(showing);
        showing = h.update(showing, 23.0);
        assert!(showing);
        showing = h.update(showing, 22.9);
        assert!(!showing);
        // Back into the band from below: stays off
        showing = h.update(showing, 30.0);
        assert!(!showing);
    }

    proptest! {
        #[test]
        fn no_chatter_inside_band(zs in proptest::collection::vec(23.0f32..34.5, 1..50)) {
            let h = LevelUpHysteresis { show_at: 34.5, hide_below: 23.0 };
            for start in [false, true] {
                let mut showing = start;
                for z in &zs {
                    showing = h.update(showing, *z);
                    prop_assert_eq!(showing, start);
                }
            }
        }
    }
}
