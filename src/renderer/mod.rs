//! Debug rendering
//!
//! Produces plain triangle lists in screen space; uploading and drawing
//! them is left to the host.

pub mod overlay;
pub mod shapes;
pub mod vertex;

pub use overlay::{WorldToScreen, debug_overlay};
pub use vertex::Vertex;
