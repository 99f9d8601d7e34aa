//! Collision debug overlay
//!
//! Shows what the movement code sees for one avatar: the cell it stands
//! in, the neighbours that currently block it, its footprint and the point
//! its height is sampled at.

use glam::{Vec2, Vec3};

use super::shapes::{circle, filled_rect, rect_outline};
use super::vertex::{Vertex, colors};
use crate::error::WorldError;
use crate::sim::avatar::AvatarId;
use crate::sim::camera::Camera;
use crate::sim::collision::blocking_neighbours;
use crate::sim::height::sample_point;
use crate::sim::rect::Rect;
use crate::sim::world::World;

const OUTLINE_THICKNESS: f32 = 1.0;
const SAMPLE_RADIUS: f32 = 2.0;
const SAMPLE_SEGMENTS: u32 = 8;

/// Projection from world pixels (with height) to screen pixels
pub trait WorldToScreen {
    fn to_screen(&self, p: Vec3) -> Vec2;
}

impl WorldToScreen for Camera {
    fn to_screen(&self, p: Vec3) -> Vec2 {
        self.world_to_screen(p)
    }
}

fn ground_rect(rect: &Rect, view: &impl WorldToScreen) -> (Vec2, Vec2) {
    (
        view.to_screen(rect.min.extend(0.0)),
        view.to_screen(rect.max.extend(0.0)),
    )
}

/// Overlay triangles for one avatar, in screen space
pub fn debug_overlay(
    world: &World,
    id: AvatarId,
    view: &impl WorldToScreen,
) -> Result<Vec<Vertex>, WorldError> {
    let avatar = world.avatar(id).ok_or(WorldError::UnknownAvatar(id.0))?;
    let index = world.metadata_index(avatar.level)?;
    let mut vertices = Vec::new();

    let (cx, cy) = index.cell_coords(avatar.pos);
    let (min, max) = ground_rect(&index.cell_rect(cx, cy), view);
    vertices.extend(filled_rect(min, max, colors::CELL));

    for obstacle in blocking_neighbours(avatar.pos, &index) {
        let (min, max) = ground_rect(&obstacle.rect, view);
        vertices.extend(filled_rect(min, max, colors::OBSTACLE));
    }

    let (min, max) = ground_rect(&avatar.footprint(), view);
    vertices.extend(rect_outline(min, max, OUTLINE_THICKNESS, colors::FOOTPRINT));

    let sample = sample_point(avatar.pos, world.settings.collision_box_height);
    vertices.extend(circle(
        view.to_screen(sample.extend(0.0)),
        SAMPLE_RADIUS,
        colors::SAMPLE_POINT,
        SAMPLE_SEGMENTS,
    ));

    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceCache;
    use crate::settings::Settings;
    use crate::sim::avatar::Avatar;
    use crate::sim::testing::{MapBuilder, TileSpec};

    struct Identity;

    impl WorldToScreen for Identity {
        fn to_screen(&self, p: Vec3) -> Vec2 {
            p.truncate()
        }
    }

    fn world_next_to_wall() -> (World, AvatarId) {
        let map = MapBuilder::new(6, 6, 32, 32)
            .tile(1, TileSpec::flat(0.0))
            .tile(2, TileSpec::wall())
            .metadata_layer("meta", 0, 1)
            .avatar_layer("avatars", 0)
            .cell("meta", 3, 2, 2)
            .build();
        let mut world = World::from_map(&map, Settings::default(), &mut ResourceCache::new()).unwrap();
        let id = world
            .add_avatar(Avatar::builder(80.0, 90.0).footprint_width(20.0).build(&world.settings))
            .unwrap();
        (world, id)
    }

    fn count(vertices: &[Vertex], color: [f32; 4]) -> usize {
        vertices.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_overlay_pieces() {
        let (world, id) = world_next_to_wall();
        let v = debug_overlay(&world, id, &Identity).unwrap();

        assert_eq!(count(&v, colors::CELL), 6);
        assert_eq!(count(&v, colors::OBSTACLE), 6);
        assert_eq!(count(&v, colors::FOOTPRINT), 24);
        assert_eq!(count(&v, colors::SAMPLE_POINT), 3 * SAMPLE_SEGMENTS as usize);

        // Cell (2, 2) in world pixels
        let cell: Vec<[f32; 2]> = v
            .iter()
            .filter(|v| v.color == colors::CELL)
            .map(|v| v.position)
            .collect();
        assert!(cell.contains(&[64.0, 64.0]));
        assert!(cell.contains(&[96.0, 96.0]));
    }

    #[test]
    fn test_overlay_through_camera() {
        let (mut world, id) = world_next_to_wall();
        world.set_camera_size(200.0, 100.0);
        world.track(Some(id)).unwrap();
        let v = debug_overlay(&world, id, world.camera()).unwrap();
        // Sample point sits 2.5 px above screen centre
        assert_eq!(
            v.iter().find(|v| v.color == colors::SAMPLE_POINT).map(|v| v.position),
            Some([100.0, 47.5])
        );
    }

    #[test]
    fn test_overlay_unknown_avatar() {
        let (world, _) = world_next_to_wall();
        assert!(matches!(
            debug_overlay(&world, AvatarId(7), &Identity),
            Err(WorldError::UnknownAvatar(7))
        ));
    }
}
