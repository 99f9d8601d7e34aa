//! Error types
//!
//! Lookup misses (positions off the map, unknown tile ids) are not errors;
//! they resolve to "no tile". Everything here is either a broken map, a
//! broken asset, or a caller asking for a level that was never registered.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::levels::LayerRole;

/// Errors raised while reading or validating map data.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("unsupported map orientation '{0}', expected 'orthogonal'")]
    Orientation(String),

    #[error("{owner}: property '{key}' is not a number: {value}")]
    BadNumber {
        owner: String,
        key: String,
        value: String,
    },

    #[error("{owner}: property '{key}' is not a boolean or bitmask: {value}")]
    BadFlag {
        owner: String,
        key: String,
        value: String,
    },

    #[error("layer '{layer}' has {actual} cells, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by world construction and simulation.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("level {level} has no {role} layer")]
    MissingLayer { level: i32, role: LayerRole },

    #[error("level {level} already has a {role} layer ('{name}')")]
    DuplicateLayer {
        level: i32,
        role: LayerRole,
        name: String,
    },

    #[error("sprite sheet not found: {}", .0.display())]
    MissingSpritesheet(PathBuf),

    #[error("no avatar with id {0}")]
    UnknownAvatar(u32),

    #[error("avatar identifier '{0}' is already taken")]
    DuplicateAvatar(String),

    #[error("no sprite layer with index {0}")]
    UnknownLayer(usize),
}
