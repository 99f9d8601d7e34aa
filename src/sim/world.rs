//! The world: layers, levels, avatars and the camera
//!
//! Built in one pass from a parsed map. Owns everything the simulation
//! touches during a frame; callers share it by `&mut` between the input,
//! movement and render phases.

use std::collections::{BTreeMap, HashMap};

use glam::{Vec2, Vec3};

use super::avatar::{Avatar, AvatarId};
use super::camera::Camera;
use super::height::{HeightSample, height_and_slope, sample_point};
use super::levels::{LayerRole, Levels, SpriteLayer, layer_visible};
use super::tile_index::TileIndex;
use crate::error::WorldError;
use crate::map::{MapLayer, TileMap, TileSet, keys};
use crate::resources::ResourceCache;
use crate::settings::Settings;

/// Object `Type` that spawns an avatar
pub const AVATAR_OBJECT_TYPE: &str = "avatar";

/// Simulation world
#[derive(Debug)]
pub struct World {
    pub settings: Settings,
    pub pixel_width: u32,
    pub pixel_height: u32,
    tiles: TileSet,
    layers: Vec<SpriteLayer>,
    levels: Levels,
    avatars: BTreeMap<AvatarId, Avatar>,
    identifiers: HashMap<String, AvatarId>,
    camera: Camera,
    next_id: u32,
}

fn layer_role(layer: &MapLayer, owner: &str) -> Result<LayerRole, WorldError> {
    if layer.is_object_group() {
        return Ok(LayerRole::Objects);
    }
    if layer.properties.flag(owner, keys::METADATA)?.unwrap_or(false) {
        return Ok(LayerRole::Metadata);
    }
    if layer.properties.flag(owner, keys::AVATAR)?.unwrap_or(false) {
        return Ok(LayerRole::Avatar);
    }
    Ok(LayerRole::Visual)
}

impl World {
    /// Build the world from a parsed map.
    ///
    /// Fails on a non-orthogonal map, malformed properties, a level with two
    /// metadata or avatar layers, or an avatar object whose sheet is missing.
    pub fn from_map(
        map: &TileMap,
        settings: Settings,
        resources: &mut ResourceCache,
    ) -> Result<Self, WorldError> {
        map.check_orientation()?;

        let mut world = Self {
            settings,
            pixel_width: map.pixel_width(),
            pixel_height: map.pixel_height(),
            tiles: map.build_tiles()?,
            layers: Vec::with_capacity(map.layers.len()),
            levels: Levels::new(),
            avatars: BTreeMap::new(),
            identifiers: HashMap::new(),
            camera: Camera::default(),
            next_id: 1,
        };

        let mut spawns = Vec::new();

        for (index, layer) in map.layers.iter().enumerate() {
            let owner = format!("layer '{}'", layer.name);
            let level = layer.properties.integer(&owner, keys::LEVEL)?.unwrap_or(0);
            let role = layer_role(layer, &owner)?;
            let grid = layer.content_grid(map.width, map.height)?;
            let visibility = if layer.visible { "visible" } else { "not visible" };

            if layer.is_object_group() {
                log::info!(
                    "Objects Layer '{}' ({}): level {}, {} objects",
                    layer.name,
                    visibility,
                    level,
                    layer.objects.len()
                );
                for obj in &layer.objects {
                    let obj_id = obj.properties.text(keys::ID);
                    let obj_type = obj.properties.text(keys::TYPE);
                    if obj_type == Some(AVATAR_OBJECT_TYPE) {
                        log::info!(
                            "Avatar '{}' ('{}') at x={}, y={}",
                            obj_id.unwrap_or("-"),
                            AVATAR_OBJECT_TYPE,
                            obj.x,
                            obj.y
                        );
                        spawns.push((obj, level));
                    } else {
                        log::info!(
                            "Object '{}' ('{}') at x={}, y={}",
                            obj_id.unwrap_or("-"),
                            obj_type.unwrap_or("-"),
                            obj.x,
                            obj.y
                        );
                    }
                }
            } else {
                log::info!(
                    "Tiled Layer '{}' ({}): {} layer, level {} ({}x{})",
                    layer.name,
                    visibility,
                    role,
                    level,
                    grid.width,
                    grid.height
                );
            }

            world.levels.register(level, role, index, &layer.name)?;
            world.layers.push(SpriteLayer {
                index,
                name: layer.name.clone(),
                level,
                role,
                map_visible: layer.visible,
                visible: false,
                grid,
                tile_width: map.tile_width as f32,
                tile_height: map.tile_height as f32,
            });
        }

        world.camera.level = world.levels.level_numbers().first().copied().unwrap_or(0);
        world.update_visibility();

        for (obj, level) in spawns {
            let mut builder = Avatar::builder(obj.x, obj.y).level(level);
            if let Some(id) = obj.properties.text(keys::ID) {
                builder = builder.identifier(id);
            }
            if let Some(path) = obj.properties.text(keys::SPRITESHEET) {
                builder = builder.sprite_sheet(resources.sprite_sheet(path)?);
            }
            let avatar = builder.build(&world.settings);
            world.add_avatar(avatar)?;
        }

        Ok(world)
    }

    // === Layers and levels ===

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn layers(&self) -> &[SpriteLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&SpriteLayer, WorldError> {
        self.layers.get(index).ok_or(WorldError::UnknownLayer(index))
    }

    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    /// Tile lookups on a level's metadata layer
    pub fn metadata_index(&self, level: i32) -> Result<TileIndex<'_>, WorldError> {
        let index = self.levels.metadata_layer(level)?;
        Ok(self.layers[index].tile_index(&self.tiles))
    }

    /// Surface height under an avatar anchor on a level
    pub fn height_at(&self, level: i32, anchor: Vec2) -> Result<HeightSample, WorldError> {
        let index = self.metadata_index(level)?;
        let point = sample_point(anchor, self.settings.collision_box_height);
        Ok(height_and_slope(point, &index))
    }

    // === Avatar registry ===

    /// Register an avatar on its level's avatar layer; returns its id.
    ///
    /// Identifiers are unique: a second avatar with a taken identifier is
    /// rejected.
    pub fn add_avatar(&mut self, mut avatar: Avatar) -> Result<AvatarId, WorldError> {
        if let Some(name) = &avatar.identifier {
            if self.identifiers.contains_key(name) {
                return Err(WorldError::DuplicateAvatar(name.clone()));
            }
        }
        let avatar_layer = self.levels.avatar_layer(avatar.level)?;
        let sample = self.height_at(avatar.level, avatar.pos)?;

        let id = AvatarId(self.next_id);
        self.next_id += 1;

        avatar.id = id;
        avatar.z = sample.z;
        avatar.show_layer_level_up = self
            .settings
            .level_up_hysteresis()
            .update(false, sample.z);
        avatar.sprite_layers.insert(avatar_layer);

        if let Some(name) = &avatar.identifier {
            self.identifiers.insert(name.clone(), id);
        }
        log::debug!(
            "Added avatar {} at ({}, {}) level {}",
            id,
            avatar.pos.x,
            avatar.pos.y,
            avatar.level
        );
        self.avatars.insert(id, avatar);
        Ok(id)
    }

    pub fn remove_avatar(&mut self, id: AvatarId) -> Result<Avatar, WorldError> {
        let avatar = self.avatars.remove(&id).ok_or(WorldError::UnknownAvatar(id.0))?;
        if let Some(name) = &avatar.identifier {
            if self.identifiers.get(name) == Some(&id) {
                self.identifiers.remove(name);
            }
        }
        if self.camera.tracked == Some(id) {
            self.camera.tracked = None;
        }
        Ok(avatar)
    }

    pub fn avatar(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.get(&id)
    }

    pub(crate) fn avatar_mut(&mut self, id: AvatarId) -> Result<&mut Avatar, WorldError> {
        self.avatars.get_mut(&id).ok_or(WorldError::UnknownAvatar(id.0))
    }

    /// Look up an avatar by its identifier
    pub fn find_avatar(&self, identifier: &str) -> Option<AvatarId> {
        self.identifiers.get(identifier).copied()
    }

    pub fn avatars(&self) -> impl Iterator<Item = &Avatar> {
        self.avatars.values()
    }

    // === Sprite layer membership ===

    /// Add an avatar to a sprite layer; returns false if it was already there
    pub fn add_to_sprite_layer(&mut self, id: AvatarId, layer: usize) -> Result<bool, WorldError> {
        self.layer(layer)?;
        let added = self.avatar_mut(id)?.sprite_layers.insert(layer);
        if added {
            log::debug!("added avatar {} to layer {}", id, layer);
        }
        Ok(added)
    }

    /// Remove an avatar from a sprite layer; returns false if it wasn't there
    pub fn remove_from_sprite_layer(
        &mut self,
        id: AvatarId,
        layer: usize,
    ) -> Result<bool, WorldError> {
        self.layer(layer)?;
        let removed = self.avatar_mut(id)?.sprite_layers.remove(&layer);
        if removed {
            log::debug!("removed avatar {} from layer {}", id, layer);
        }
        Ok(removed)
    }

    /// Remove an avatar from every sprite layer; returns the layers it left
    pub fn remove_from_all_sprite_layers(&mut self, id: AvatarId) -> Result<Vec<usize>, WorldError> {
        let snapshot: Vec<usize> = self
            .avatar(id)
            .ok_or(WorldError::UnknownAvatar(id.0))?
            .sprite_layers
            .iter()
            .copied()
            .collect();
        for &layer in &snapshot {
            self.remove_from_sprite_layer(id, layer)?;
        }
        Ok(snapshot)
    }

    /// Flip membership; returns whether the avatar is now in the layer
    pub fn toggle_sprite_layer(&mut self, id: AvatarId, layer: usize) -> Result<bool, WorldError> {
        if self.contains_sprite(layer, id) {
            self.remove_from_sprite_layer(id, layer)?;
            Ok(false)
        } else {
            self.add_to_sprite_layer(id, layer)?;
            Ok(true)
        }
    }

    pub fn contains_sprite(&self, layer: usize, id: AvatarId) -> bool {
        self.avatar(id).is_some_and(|a| a.in_sprite_layer(layer))
    }

    /// Avatars drawn in a layer, by id
    pub fn layer_members(&self, layer: usize) -> Vec<AvatarId> {
        self.avatars
            .values()
            .filter(|a| a.in_sprite_layer(layer))
            .map(|a| a.id)
            .collect()
    }

    // === Camera ===

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Move the camera to another level; no-op (false) if already there
    pub fn set_camera_layer_level(&mut self, level: i32) -> bool {
        if self.camera.level == level {
            return false;
        }
        log::debug!("camera level {} -> {}", self.camera.level, level);
        self.camera.level = level;
        self.update_visibility();
        true
    }

    pub fn set_camera_position(&mut self, x: f32, y: f32, z: f32) {
        self.camera.pos = Vec3::new(x, y, z);
    }

    pub fn set_camera_size(&mut self, width: f32, height: f32) {
        self.camera.size = Vec2::new(width, height);
    }

    /// Follow an avatar (or nothing)
    pub fn track(&mut self, id: Option<AvatarId>) -> Result<(), WorldError> {
        if let Some(id) = id {
            if !self.avatars.contains_key(&id) {
                return Err(WorldError::UnknownAvatar(id.0));
            }
        }
        self.camera.tracked = id;
        self.follow_tracked();
        Ok(())
    }

    /// Snap the camera to the tracked avatar and refresh visibility
    pub fn follow_tracked(&mut self) {
        let Some(avatar) = self.camera.tracked.and_then(|id| self.avatars.get(&id)) else {
            return;
        };
        let (pos, z, level) = (avatar.pos, avatar.z, avatar.level);
        self.set_camera_position(pos.x, pos.y, z);
        if !self.set_camera_layer_level(level) {
            self.update_visibility();
        }
    }

    /// Recompute every layer's visibility from the camera state
    pub fn update_visibility(&mut self) {
        let show_level_up = self
            .camera
            .tracked
            .and_then(|id| self.avatars.get(&id))
            .is_some_and(|a| a.show_layer_level_up);
        let camera_level = self.camera.level;
        for layer in &mut self.layers {
            layer.visible = layer_visible(
                layer.level,
                layer.role,
                layer.map_visible,
                camera_level,
                show_level_up,
            );
        }
    }

    /// Layers to draw this frame, in draw order
    pub fn visible_layers(&self) -> impl Iterator<Item = &SpriteLayer> {
        self.layers.iter().filter(|l| l.visible)
    }
}
