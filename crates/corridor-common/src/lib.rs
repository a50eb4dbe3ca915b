//! # Corridor Common
//!
//! Common types, utilities, and shared abstractions for Project Corridor.
//!
//! This crate provides foundational types used across all Corridor subsystems:
//! - Coordinate types (world, chunk, local) and chunk dimensions
//! - Cardinal directions
//! - Tile codes
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod direction;
pub mod error;
pub mod tile;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::direction::*;
    pub use crate::error::*;
    pub use crate::tile::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coords_conversion() {
        let dims = ChunkDims::square(32).expect("valid dims");
        let world = WorldCoord::new(100, 200);
        let chunk = world.to_chunk_coord(dims);
        let local = world.to_local_coord(dims);

        assert_eq!(chunk, ChunkCoord::new(3, 6));
        assert_eq!(local, LocalCoord::new(4, 8));
    }

    #[test]
    fn test_generation_error_wraps_into_world_error() {
        let err: WorldError = GenerationError::Failed("no regions".into()).into();
        assert!(err.to_string().contains("no regions"));

        let top: CorridorError = err.into();
        assert!(matches!(top, CorridorError::World(_)));
    }
}
