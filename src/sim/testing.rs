//! Map fixtures for tests

use crate::map::{
    LayerKind, MapLayer, MapObject, Properties, PropertyValue, RawCell, RawTile, TileMap, keys,
};

/// Tile properties for a fixture tile
#[derive(Debug, Clone, Default)]
pub struct TileSpec {
    pub height: Option<f64>,
    pub x_slope: f64,
    pub y_slope: f64,
    pub block: Option<PropertyValue>,
}

impl TileSpec {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn flat(height: f64) -> Self {
        Self {
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn sloped(height: f64, x_slope: f64, y_slope: f64) -> Self {
        Self {
            height: Some(height),
            x_slope,
            y_slope,
            block: None,
        }
    }

    pub fn wall() -> Self {
        Self {
            block: Some(PropertyValue::Bool(true)),
            ..Default::default()
        }
    }

    fn properties(&self) -> Properties {
        let mut p = Properties::default();
        if let Some(h) = self.height {
            p.insert(keys::HEIGHT, PropertyValue::Float(h));
        }
        if self.x_slope != 0.0 {
            p.insert(keys::X_SLOPE, PropertyValue::Float(self.x_slope));
        }
        if self.y_slope != 0.0 {
            p.insert(keys::Y_SLOPE, PropertyValue::Float(self.y_slope));
        }
        if let Some(b) = &self.block {
            p.insert(keys::BLOCK, b.clone());
        }
        p
    }
}

/// Builds small maps layer by layer
#[derive(Debug, Clone)]
pub struct MapBuilder {
    map: TileMap,
}

impl MapBuilder {
    pub fn new(width: usize, height: usize, tile_width: u32, tile_height: u32) -> Self {
        Self {
            map: TileMap {
                orientation: "orthogonal".into(),
                width,
                height,
                tile_width,
                tile_height,
                layers: Vec::new(),
                tiles: Default::default(),
            },
        }
    }

    pub fn tile(mut self, id: u32, spec: TileSpec) -> Self {
        self.map.tiles.insert(
            id,
            RawTile {
                properties: spec.properties(),
            },
        );
        self
    }

    fn tile_layer(mut self, name: &str, level: i32, fill: u32, flag: Option<&str>) -> Self {
        let mut properties = Properties::default();
        properties.insert(keys::LEVEL, PropertyValue::Int(level as i64));
        if let Some(flag) = flag {
            properties.insert(flag, PropertyValue::Text("true".into()));
        }
        self.map.layers.push(MapLayer {
            name: name.into(),
            kind: LayerKind::TileLayer,
            visible: true,
            width: 0,
            height: 0,
            properties,
            data: vec![RawCell::Gid(fill); self.map.width * self.map.height],
            objects: Vec::new(),
        });
        self
    }

    /// Plain layer filled with one gid
    pub fn visual_layer(self, name: &str, level: i32, fill: u32) -> Self {
        self.tile_layer(name, level, fill, None)
    }

    /// Metadata layer filled with one gid
    pub fn metadata_layer(self, name: &str, level: i32, fill: u32) -> Self {
        self.tile_layer(name, level, fill, Some(keys::METADATA))
    }

    /// Empty avatar layer
    pub fn avatar_layer(self, name: &str, level: i32) -> Self {
        self.tile_layer(name, level, 0, Some(keys::AVATAR))
    }

    /// Overwrite one cell of a named layer
    pub fn cell(mut self, layer: &str, x: usize, y: usize, gid: u32) -> Self {
        let width = self.map.width;
        if let Some(l) = self.map.layers.iter_mut().find(|l| l.name == layer) {
            l.data[y * width + x] = RawCell::Gid(gid);
        }
        self
    }

    /// Object group holding one avatar spawn
    pub fn avatar_object(
        mut self,
        layer: &str,
        level: i32,
        id: &str,
        x: f32,
        y: f32,
        sheet: Option<&str>,
    ) -> Self {
        let mut properties = Properties::default();
        properties.insert(keys::TYPE, PropertyValue::Text("avatar".into()));
        properties.insert(keys::ID, PropertyValue::Text(id.into()));
        if let Some(sheet) = sheet {
            properties.insert(keys::SPRITESHEET, PropertyValue::Text(sheet.into()));
        }
        let mut layer_props = Properties::default();
        layer_props.insert(keys::LEVEL, PropertyValue::Int(level as i64));
        self.map.layers.push(MapLayer {
            name: layer.into(),
            kind: LayerKind::ObjectGroup,
            visible: true,
            width: 0,
            height: 0,
            properties: layer_props,
            data: Vec::new(),
            objects: vec![MapObject {
                name: id.into(),
                x,
                y,
                properties,
            }],
        });
        self
    }

    pub fn build(self) -> TileMap {
        self.map
    }
}
