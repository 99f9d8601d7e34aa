//! Simulation module
//!
//! Everything that moves lives here:
//! - Tile lookup and the per-tile height field
//! - Axis-separated collision against blocking tiles
//! - Level registry and layer visibility
//! - Avatars, their motion between levels, and the camera
//!
//! No rendering or platform dependencies.

pub mod avatar;
pub mod camera;
pub mod collision;
pub mod height;
pub mod levels;
pub mod motion;
pub mod rect;
pub mod tick;
pub mod tile_index;
pub mod world;

#[cfg(test)]
pub mod testing;

pub use avatar::{Avatar, AvatarBuilder, AvatarId, Direction, WalkPhase};
pub use camera::Camera;
pub use collision::{Obstacle, blocking_neighbours, resolve};
pub use height::{HeightSample, height_and_slope};
pub use levels::{LayerRole, LevelUpHysteresis, Levels, SpriteLayer};
pub use motion::{LevelChange, MoveOutcome, try_to_move};
pub use rect::Rect;
pub use tick::{TickInput, TickReport, step_for, tick};
pub use tile_index::{TileHit, TileIndex};
pub use world::World;
