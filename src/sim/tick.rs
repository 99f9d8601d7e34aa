//! Per-frame update
//!
//! Turns held directions into a step and moves one avatar.

use glam::{IVec2, Vec2};

use super::avatar::AvatarId;
use super::motion::{MoveOutcome, try_to_move};
use super::world::World;
use crate::error::WorldError;
use crate::settings::Settings;

/// Input for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held direction, each axis in -1..=1 (y grows down the map)
    pub direction: IVec2,
    /// Flip the avatar's membership of this sprite layer
    pub toggle_layer: Option<usize>,
}

/// What a frame did
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: MoveOutcome,
    /// Toggled layer and whether the avatar is now drawn in it
    pub toggled: Option<(usize, bool)>,
}

/// Step for a held direction over `dt_ms` milliseconds.
///
/// Diagonals are normalised so they are no faster than straight moves.
pub fn step_for(direction: IVec2, dt_ms: f32, settings: &Settings) -> Vec2 {
    let dir = direction.clamp(IVec2::NEG_ONE, IVec2::ONE).as_vec2().normalize_or_zero();
    dir * Vec2::new(settings.speed_x, settings.speed_y) * dt_ms
}

/// Advance one avatar by one frame
pub fn tick(
    world: &mut World,
    id: AvatarId,
    input: &TickInput,
    dt_ms: f32,
) -> Result<TickReport, WorldError> {
    let step = step_for(input.direction, dt_ms, &world.settings);
    let outcome = try_to_move(world, id, dt_ms, step)?;

    let mut toggled = None;
    if let Some(layer) = input.toggle_layer {
        match world.toggle_sprite_layer(id, layer) {
            Ok(now_in) => toggled = Some((layer, now_in)),
            Err(WorldError::UnknownLayer(_)) => {
                log::warn!("ignoring toggle of unknown layer {}", layer);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(TickReport { outcome, toggled })
}
