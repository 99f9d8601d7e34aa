//! Avatars and their facing / walk-cycle state
//!
//! Position is the midbottom anchor (the feet). `z` is the surface height
//! under the avatar on its current level and is refreshed by the world after
//! every position change.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::resources::SpriteSheet;
use crate::settings::Settings;

/// Registry handle for an avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AvatarId(pub u32);

impl fmt::Display for AvatarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    North,
    #[default]
    South,
    East,
    West,
}

impl Direction {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Facing for a step, given the current facing.
    ///
    /// The dominant axis wins. On an exact diagonal an avatar already facing
    /// east or west keeps facing sideways, so diagonal input doesn't make it
    /// flip between facings every frame. A zero step keeps the facing.
    pub fn from_step(step: Vec2, facing: Direction) -> Direction {
        if step == Vec2::ZERO {
            return facing;
        }
        let (ax, ay) = (step.x.abs(), step.y.abs());
        let horizontal = if ax == ay {
            facing.is_horizontal()
        } else {
            ax > ay
        };
        if horizontal {
            if step.x > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if step.y > 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }
}

/// Walk-cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WalkPhase {
    #[default]
    Stand,
    LegRight,
    LegCenter,
    LegLeft,
}

/// Phases cycled while walking, one per distance quantum
pub const WALK_CYCLE: [WalkPhase; 4] = [
    WalkPhase::LegRight,
    WalkPhase::LegCenter,
    WalkPhase::LegLeft,
    WalkPhase::LegCenter,
];

impl WalkPhase {
    /// Phase after travelling `distance` pixels in total
    pub fn from_distance(distance: f32, quantum: f32) -> WalkPhase {
        let step = (distance / quantum.max(f32::EPSILON)).floor() as usize;
        WALK_CYCLE[step % WALK_CYCLE.len()]
    }

    /// Sprite sheet column; the centre stride reuses the standing image
    pub fn frame_column(&self) -> u32 {
        match self {
            WalkPhase::LegRight => 0,
            WalkPhase::Stand | WalkPhase::LegCenter => 1,
            WalkPhase::LegLeft => 2,
        }
    }
}

/// A walking character
#[derive(Debug, Clone, Serialize)]
pub struct Avatar {
    /// Assigned when the avatar is added to a world
    pub id: AvatarId,
    /// Optional name from the map (`Id` property) or the caller
    pub identifier: Option<String>,
    /// Feet position in world pixels
    pub pos: Vec2,
    /// Current level
    pub level: i32,
    pub dir: Direction,
    pub phase: WalkPhase,
    /// Total distance walked (drives the walk cycle)
    pub distance: f32,
    /// Milliseconds spent in the current phase
    pub phase_time: f32,
    /// Surface height under the avatar, in pixels above the level floor
    pub z: f32,
    /// Whether the level above should be drawn while the camera follows us
    pub show_layer_level_up: bool,
    /// Collision footprint width
    pub width: f32,
    /// Collision footprint height
    pub height: f32,
    /// Drawn sprite size
    pub sprite_size: Vec2,
    /// Sprite layers the avatar is drawn in (indices into the world's layers)
    pub sprite_layers: BTreeSet<usize>,
    #[serde(skip)]
    pub sheet: Option<Arc<SpriteSheet>>,
}

impl Avatar {
    pub fn builder(x: f32, y: f32) -> AvatarBuilder {
        AvatarBuilder::new(x, y)
    }

    /// Update facing and walk phase for a step (already collision-corrected)
    pub fn animate(&mut self, dt: f32, step: Vec2, quantum: f32) {
        self.dir = Direction::from_step(step, self.dir);

        let phase = if step == Vec2::ZERO {
            WalkPhase::Stand
        } else {
            self.distance += step.length();
            WalkPhase::from_distance(self.distance, quantum)
        };

        if phase == self.phase {
            self.phase_time += dt;
        } else {
            self.phase = phase;
            self.phase_time = 0.0;
        }
    }

    /// Collision box around the feet
    pub fn footprint(&self) -> Rect {
        Rect::from_midbottom(self.pos, self.width, self.height)
    }

    /// Where the sprite is drawn: raised by the surface height
    pub fn sprite_rect(&self) -> Rect {
        Rect::from_midbottom(
            Vec2::new(self.pos.x, self.pos.y - self.z),
            self.sprite_size.x,
            self.sprite_size.y,
        )
    }

    /// Sheet frame for the current facing and phase
    pub fn current_frame(&self) -> Option<Rect> {
        self.sheet.as_ref().map(|s| s.frame(self.dir, self.phase))
    }

    pub fn in_sprite_layer(&self, layer: usize) -> bool {
        self.sprite_layers.contains(&layer)
    }
}

/// Builds avatars; world defaults fill in whatever is not set
#[derive(Debug, Clone, Default)]
pub struct AvatarBuilder {
    pos: Vec2,
    identifier: Option<String>,
    level: i32,
    dir: Direction,
    footprint_width: Option<f32>,
    sheet: Option<Arc<SpriteSheet>>,
}

impl AvatarBuilder {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn facing(mut self, dir: Direction) -> Self {
        self.dir = dir;
        self
    }

    pub fn footprint_width(mut self, width: f32) -> Self {
        self.footprint_width = Some(width);
        self
    }

    pub fn sprite_sheet(mut self, sheet: Arc<SpriteSheet>) -> Self {
        self.sheet = Some(sheet);
        self
    }

    pub fn build(self, settings: &Settings) -> Avatar {
        let sprite_size = match &self.sheet {
            Some(sheet) => sheet.frame_size(),
            None => Vec2::new(settings.default_avatar_width, settings.default_avatar_height),
        };
        Avatar {
            id: AvatarId::default(),
            identifier: self.identifier,
            pos: self.pos,
            level: self.level,
            dir: self.dir,
            phase: WalkPhase::Stand,
            distance: 0.0,
            phase_time: 0.0,
            z: 0.0,
            show_layer_level_up: false,
            width: self.footprint_width.unwrap_or(sprite_size.x),
            height: settings.collision_box_height,
            sprite_size,
            sprite_layers: BTreeSet::new(),
            sheet: self.sheet,
        }
    }
}
