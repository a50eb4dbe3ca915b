//! # Corridor Gameplay
//!
//! Gameplay systems for Project Corridor.
//!
//! This crate provides:
//! - Movement input mapping (WASD / arrows)
//! - The world actor that walks path tiles and triggers chunk generation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod input;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::input::*;
}

pub use prelude::*;
