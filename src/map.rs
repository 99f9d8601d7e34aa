//! Parsed map model
//!
//! This is the narrow surface the map loader hands us: orientation, tile
//! size, ordered layers and a tile dictionary. It deserializes from the JSON
//! export of a Tiled map (or a hand-written fixture with the same shape).
//!
//! Tile properties are parsed into typed fields once, at load time, so a
//! malformed `Height` fails loudly here instead of leaking NaN into physics.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Tiled gid flag: tile flipped horizontally
pub const FLIP_X: u32 = 0x8000_0000;
/// Tiled gid flag: tile flipped vertically
pub const FLIP_Y: u32 = 0x4000_0000;
/// Tiled gid flag: tile flipped across the diagonal (rotation)
pub const FLIP_DIAGONAL: u32 = 0x2000_0000;
const FLIP_MASK: u32 = FLIP_X | FLIP_Y | FLIP_DIAGONAL;

/// Property keys read by the simulation
pub mod keys {
    pub const HEIGHT: &str = "Height";
    pub const X_SLOPE: &str = "XSlope";
    pub const Y_SLOPE: &str = "YSlope";
    pub const BLOCK: &str = "Block";
    pub const BLOCK_IN: &str = "BlockIn";
    pub const LEVEL: &str = "Level";
    pub const METADATA: &str = "Metadata";
    pub const AVATAR: &str = "Avatar";
    pub const ID: &str = "Id";
    pub const TYPE: &str = "Type";
    pub const SPRITESHEET: &str = "Spritesheet";
}

/// A single property value as stored in the map file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// String-keyed property mapping with typed accessors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub BTreeMap<String, PropertyValue>);

impl Properties {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.0.insert(key.into(), value);
    }

    /// Plain text value (numbers and booleans are not converted)
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PropertyValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Finite float, accepting numbers or numeric strings
    pub fn number(&self, owner: &str, key: &str) -> Result<Option<f32>, MapError> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            PropertyValue::Int(i) => Some(*i as f32),
            PropertyValue::Float(x) => Some(*x as f32),
            PropertyValue::Text(s) => s.trim().parse::<f32>().ok(),
            PropertyValue::Bool(_) => None,
        };
        match parsed {
            Some(x) if x.is_finite() => Ok(Some(x)),
            _ => Err(MapError::BadNumber {
                owner: owner.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Whole number, accepting integers, integral floats or numeric strings
    pub fn integer(&self, owner: &str, key: &str) -> Result<Option<i32>, MapError> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            PropertyValue::Int(i) => i32::try_from(*i).ok(),
            PropertyValue::Float(x) if x.fract() == 0.0 && x.abs() <= i64::MAX as f64 => {
                i32::try_from(*x as i64).ok()
            }
            PropertyValue::Text(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| MapError::BadNumber {
            owner: owner.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Boolean, accepting `true`/`false` (any case) and `1`/`0`
    pub fn flag(&self, owner: &str, key: &str) -> Result<Option<bool>, MapError> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Int(0) => Some(false),
            PropertyValue::Int(1) => Some(true),
            PropertyValue::Text(s) => parse_bool(s),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| MapError::BadFlag {
            owner: owner.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Blocking mask: a boolean (all or nothing) or an explicit bitmask
    pub fn block_mask(&self, owner: &str, key: &str) -> Result<Option<BlockMask>, MapError> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            PropertyValue::Bool(true) => Some(BlockMask::ALL),
            PropertyValue::Bool(false) => Some(BlockMask::NONE),
            PropertyValue::Int(i) => mask_bits(*i),
            PropertyValue::Text(s) => match parse_bool(s) {
                Some(true) => Some(BlockMask::ALL),
                Some(false) => Some(BlockMask::NONE),
                None => s.trim().parse::<i64>().ok().and_then(mask_bits),
            },
            PropertyValue::Float(_) => None,
        };
        parsed.map(Some).ok_or_else(|| MapError::BadFlag {
            owner: owner.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Bitmask made only of the four direction bits
fn mask_bits(bits: i64) -> Option<BlockMask> {
    let bits = u8::try_from(bits).ok()?;
    (bits & !BlockMask::ALL.bits() == 0).then(|| BlockMask::from_bits(bits))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Set of travel directions a tile blocks
///
/// A bit names the direction the mover is heading, so `NORTH` blocks an
/// avatar walking north into the tile (entering through its south side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockMask(u8);

impl BlockMask {
    pub const NONE: BlockMask = BlockMask(0);
    pub const NORTH: BlockMask = BlockMask(0b0001);
    pub const EAST: BlockMask = BlockMask(0b0010);
    pub const SOUTH: BlockMask = BlockMask(0b0100);
    pub const WEST: BlockMask = BlockMask(0b1000);
    pub const ALL: BlockMask = BlockMask(0b1111);

    /// Build from raw bits; bits above the four directions are ignored
    pub const fn from_bits(bits: u8) -> Self {
        BlockMask(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: BlockMask) -> Self {
        BlockMask(self.0 | other.0)
    }

    pub const fn intersects(self, other: BlockMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for BlockMask {
    type Output = BlockMask;

    fn bitor(self, rhs: BlockMask) -> BlockMask {
        self.union(rhs)
    }
}

/// A tile record with its properties parsed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub id: u32,
    /// Surface height in tile heights (`None` = no surface data)
    pub height: Option<f32>,
    /// Height change across the tile, left to right, in tile heights
    pub x_slope: f32,
    /// Height change across the tile, top to bottom, in tile heights
    pub y_slope: f32,
    pub block: BlockMask,
    pub properties: Properties,
}

impl Tile {
    pub fn from_properties(id: u32, properties: Properties) -> Result<Self, MapError> {
        let owner = format!("tile {id}");
        let block = properties
            .block_mask(&owner, keys::BLOCK)?
            .unwrap_or_default()
            | properties
                .block_mask(&owner, keys::BLOCK_IN)?
                .unwrap_or_default();
        Ok(Self {
            id,
            height: properties.number(&owner, keys::HEIGHT)?,
            x_slope: properties.number(&owner, keys::X_SLOPE)?.unwrap_or(0.0),
            y_slope: properties.number(&owner, keys::Y_SLOPE)?.unwrap_or(0.0),
            block,
            properties,
        })
    }
}

/// Tile dictionary keyed by tile id
pub type TileSet = HashMap<u32, Tile>;

/// One cell as stored in layer data: a gid or a stack of gids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Gid(u32),
    Stack(Vec<u32>),
}

impl Default for RawCell {
    fn default() -> Self {
        RawCell::Gid(0)
    }
}

/// A populated grid cell
///
/// Holds the raw gids (flip flags included). The first gid is authoritative
/// for tile metadata; the rest are composited on top by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    gids: Vec<u32>,
}

impl Cell {
    /// `None` when the cell holds no tile at all (gid 0)
    pub fn from_raw(raw: &RawCell) -> Option<Self> {
        let gids: Vec<u32> = match raw {
            RawCell::Gid(gid) => vec![*gid],
            RawCell::Stack(gids) => gids.clone(),
        };
        let gids: Vec<u32> = gids.into_iter().filter(|g| g & !FLIP_MASK != 0).collect();
        if gids.is_empty() { None } else { Some(Self { gids }) }
    }

    /// Tile ids with flip flags stripped
    pub fn tile_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.gids.iter().map(|g| g & !FLIP_MASK)
    }

    pub fn primary_tile_id(&self) -> u32 {
        self.gids[0] & !FLIP_MASK
    }

    pub fn flip_x(&self) -> bool {
        self.gids[0] & FLIP_X != 0
    }

    pub fn flip_y(&self) -> bool {
        self.gids[0] & FLIP_Y != 0
    }

    pub fn flip_diagonal(&self) -> bool {
        self.gids[0] & FLIP_DIAGONAL != 0
    }
}

/// Row-major 2D grid of optional cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Option<Cell>>,
}

impl ContentGrid {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Cell at `[tile_y][tile_x]`; anything off the grid is `None`
    pub fn get(&self, tile_x: i64, tile_y: i64) -> Option<&Cell> {
        if tile_x < 0 || tile_y < 0 {
            return None;
        }
        let (x, y) = (tile_x as usize, tile_y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x].as_ref()
    }

    pub fn set(&mut self, tile_x: usize, tile_y: usize, cell: Option<Cell>) {
        if tile_x < self.width && tile_y < self.height {
            self.cells[tile_y * self.width + tile_x] = cell;
        }
    }
}

/// Layer type as written by the map editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    TileLayer,
    ObjectGroup,
}

/// An object placed in an object group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub properties: Properties,
}

fn default_true() -> bool {
    true
}

/// One map layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayer {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LayerKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Width in tiles (0 = map width)
    #[serde(default)]
    pub width: usize,
    /// Height in tiles (0 = map height)
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub data: Vec<RawCell>,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

impl MapLayer {
    pub fn is_object_group(&self) -> bool {
        self.kind == LayerKind::ObjectGroup
    }

    /// Build the content grid, checking the data size against the layer size
    pub fn content_grid(&self, map_width: usize, map_height: usize) -> Result<ContentGrid, MapError> {
        let width = if self.width == 0 { map_width } else { self.width };
        let height = if self.height == 0 { map_height } else { self.height };
        if self.is_object_group() {
            return Ok(ContentGrid::empty(width, height));
        }
        if self.data.len() != width * height {
            return Err(MapError::LayerSize {
                layer: self.name.clone(),
                expected: width * height,
                actual: self.data.len(),
            });
        }
        Ok(ContentGrid {
            width,
            height,
            cells: self.data.iter().map(Cell::from_raw).collect(),
        })
    }
}

/// Raw tile dictionary entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTile {
    #[serde(default)]
    pub properties: Properties,
}

/// A parsed map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub orientation: String,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<MapLayer>,
    #[serde(default)]
    pub tiles: BTreeMap<u32, RawTile>,
}

impl TileMap {
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("~ Map: '{}'", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn pixel_width(&self) -> u32 {
        self.width as u32 * self.tile_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.height as u32 * self.tile_height
    }

    /// Only orthogonal maps are supported
    pub fn check_orientation(&self) -> Result<(), MapError> {
        if self.orientation == "orthogonal" {
            Ok(())
        } else {
            Err(MapError::Orientation(self.orientation.clone()))
        }
    }

    /// Parse every tile record
    pub fn build_tiles(&self) -> Result<TileSet, MapError> {
        self.tiles
            .iter()
            .map(|(id, raw)| Ok((*id, Tile::from_properties(*id, raw.properties.clone())?)))
            .collect()
    }
}
