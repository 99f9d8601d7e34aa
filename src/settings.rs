//! World tuning
//!
//! Every constant the simulation depends on lives here so it can be tuned
//! from a JSON file instead of being buried in movement code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::MapError;
use crate::sim::levels::LevelUpHysteresis;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Projection ===
    /// Horizontal pixels per meter
    pub hpixels_per_meter: f32,
    /// Vertical pixels per meter (about hpixels * sqrt(2) / 2)
    pub vpixels_per_meter: f32,
    /// Height of one level in meters
    pub meters_per_level: f32,

    // === Avatars ===
    /// Collision footprint height
    pub collision_box_height: f32,
    /// Sprite size for avatars without a sheet
    pub default_avatar_width: f32,
    pub default_avatar_height: f32,
    /// Pixels walked per walk-cycle phase
    pub walk_distance_quantum: f32,
    /// Walking speed, pixels per millisecond
    pub speed_x: f32,
    pub speed_y: f32,

    // === Level-up visibility ===
    /// Show the level above from this height (meters)
    pub level_up_show_meters: f32,
    /// Hide it again below this height (meters)
    pub level_up_hide_meters: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hpixels_per_meter: HPIXELS_PER_METER,
            vpixels_per_meter: VPIXELS_PER_METER,
            meters_per_level: METERS_PER_LEVEL,

            collision_box_height: COLLISION_BOX_HEIGHT,
            default_avatar_width: DEFAULT_AVATAR_WIDTH,
            default_avatar_height: DEFAULT_AVATAR_HEIGHT,
            walk_distance_quantum: WALK_DISTANCE_QUANTUM,
            speed_x: SPEED_X,
            speed_y: SPEED_Y,

            level_up_show_meters: LEVEL_UP_SHOW_METERS,
            level_up_hide_meters: LEVEL_UP_HIDE_METERS,
        }
    }
}

impl Settings {
    /// Vertical pixels between two stacked levels
    pub fn vpixels_per_level(&self) -> f32 {
        self.meters_per_level * self.vpixels_per_meter
    }

    /// Thresholds for showing the level above, in pixels
    pub fn level_up_hysteresis(&self) -> LevelUpHysteresis {
        LevelUpHysteresis {
            show_at: self.level_up_show_meters * self.vpixels_per_meter,
            hide_below: self.level_up_hide_meters * self.vpixels_per_meter,
        }
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from '{}'", path.as_ref().display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to '{}'", path.as_ref().display());
        Ok(())
    }
}
