//! Tile Strata - height-aware movement over stacked tile maps
//!
//! Core modules:
//! - `map`: Parsed map model (layers, tiles, typed tile properties)
//! - `sim`: Simulation (tile lookup, height field, collision, levels, avatars)
//! - `renderer`: Debug overlay geometry
//! - `resources`: Sprite sheet cache
//! - `settings`: Tunable world constants

pub mod error;
pub mod map;
pub mod renderer;
pub mod resources;
pub mod settings;
pub mod sim;

pub use error::{MapError, WorldError};
pub use settings::Settings;

/// Default world constants
pub mod consts {
    /// Horizontal pixels per meter
    pub const HPIXELS_PER_METER: f32 = 32.0;
    /// Vertical pixels per meter (45 degrees, so 32 * sqrt(2) / 2)
    pub const VPIXELS_PER_METER: f32 = 23.0;
    /// Height of one stacked level in meters
    pub const METERS_PER_LEVEL: f32 = 3.0;

    /// Collision footprint height (the strip around the feet)
    pub const COLLISION_BOX_HEIGHT: f32 = 5.0;
    /// Width of an avatar without a sprite sheet
    pub const DEFAULT_AVATAR_WIDTH: f32 = 25.0;
    /// Height of an avatar without a sprite sheet
    pub const DEFAULT_AVATAR_HEIGHT: f32 = 45.0;

    /// Travel distance per walk phase step (pixels)
    pub const WALK_DISTANCE_QUANTUM: f32 = 10.0;

    /// Show the level above once the tracked avatar is this high (meters)
    pub const LEVEL_UP_SHOW_METERS: f32 = 1.5;
    /// Hide it again only below this height (meters)
    pub const LEVEL_UP_HIDE_METERS: f32 = 1.0;

    /// Walking speed (pixels per millisecond)
    pub const SPEED_X: f32 = 0.075 * 2.0;
    pub const SPEED_Y: f32 = 0.053 * 2.0;
}

/// Round toward the direction of travel.
///
/// Negative values are floored, everything else is ceiled, so a stepped
/// rectangle always clears a boundary instead of stopping inside it.
#[inline]
pub fn special_round(value: f32) -> f32 {
    if value < 0.0 {
        value.floor()
    } else {
        value.ceil()
    }
}
