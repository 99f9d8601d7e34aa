//! Moving an avatar for one frame
//!
//! Collision, facing/walk cycle, height and level transitions are all
//! worked out on a copy of the avatar and only written back once every
//! lookup has succeeded. A failed move leaves the world exactly as it was.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::avatar::AvatarId;
use super::collision;
use super::height::HeightSample;
use super::world::World;
use crate::error::WorldError;

/// A level change caused by a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub from: i32,
    pub to: i32,
}

/// What a move did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The step actually taken (after collision)
    pub step: Vec2,
    /// Surface under the avatar after the move (on its final level)
    pub height: HeightSample,
    pub level_change: Option<LevelChange>,
}

/// Move an avatar by a requested step.
///
/// The step is clipped against blocking tiles on the avatar's level, then
/// applied. If the new height reaches a full level the avatar is promoted to
/// the level above (and shifted up the map by one level's pixel height); if
/// it drops below zero it is demoted. Only one transition happens per move.
pub fn try_to_move(
    world: &mut World,
    id: AvatarId,
    dt: f32,
    requested: Vec2,
) -> Result<MoveOutcome, WorldError> {
    let settings = world.settings.clone();
    let mut next = world
        .avatar(id)
        .ok_or(WorldError::UnknownAvatar(id.0))?
        .clone();

    let step = {
        let index = world.metadata_index(next.level)?;
        collision::resolve(next.pos, requested, next.width, next.height, &index)
    };

    next.animate(dt, step, settings.walk_distance_quantum);
    next.pos += step;

    let mut height = world.height_at(next.level, next.pos)?;
    next.z = height.z;

    let level_px = settings.vpixels_per_level();
    let target = if next.z >= level_px {
        Some((next.level + 1, -level_px))
    } else if next.z < 0.0 {
        Some((next.level - 1, level_px))
    } else {
        None
    };

    let mut level_change = None;
    let mut new_avatar_layer = None;
    if let Some((to, shift_y)) = target {
        let (_, avatar_layer) = world.levels().require_walkable(to)?;
        level_change = Some(LevelChange {
            from: next.level,
            to,
        });
        new_avatar_layer = Some(avatar_layer);

        next.level = to;
        next.pos.y += shift_y;
        height = world.height_at(to, next.pos)?;
        next.z = height.z;
    }

    next.show_layer_level_up = settings
        .level_up_hysteresis()
        .update(next.show_layer_level_up, next.z);

    *world.avatar_mut(id)? = next;

    if let (Some(change), Some(layer)) = (level_change, new_avatar_layer) {
        log::debug!(
            "avatar {} level {} -> {} (z={})",
            id,
            change.from,
            change.to,
            height.z
        );
        world.remove_from_all_sprite_layers(id)?;
        world.add_to_sprite_layer(id, layer)?;
    }

    if world.camera().tracked == Some(id) {
        world.follow_tracked();
    }

    Ok(MoveOutcome {
        step,
        height,
        level_change,
    })
}
