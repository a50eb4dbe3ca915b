//! # Corridor View
//!
//! Everything between the world and the pixels:
//! - Camera state (scroll, zoom, fog-of-war focus)
//! - Culling windows per mode
//! - Fog-of-war visibility and tinting
//! - Tile palette and per-frame draw lists

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod culling;
pub mod frame;
pub mod palette;
pub mod visibility;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::culling::*;
    pub use crate::frame::*;
    pub use crate::palette::*;
    pub use crate::visibility::*;
}

pub use prelude::*;
