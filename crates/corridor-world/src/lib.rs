//! # Corridor World
//!
//! World management for Project Corridor.
//!
//! This crate handles:
//! - Tile grids produced by layout generation
//! - Border classification (connection candidates on a grid's edge)
//! - The layout generator seam and a seeded corridor generator
//! - Lazy chunk generation and neighbour bookkeeping

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod border;
pub mod chunk;
pub mod generation;
pub mod grid;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::border::*;
    pub use crate::chunk::*;
    pub use crate::generation::*;
    pub use crate::grid::*;
    pub use crate::store::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_common::{ChunkCoord, Tile, WorldCoord};

    #[test]
    fn test_store_with_corridor_generator() {
        let params = LayoutParams::new(30, 30, 12, 3);
        let mut store =
            ChunkStore::new(params, CorridorGenerator::with_seed(5)).expect("valid store");

        let chunk = store
            .get_or_generate_chunk(ChunkCoord::ORIGIN)
            .expect("generated");
        assert_eq!(chunk.grid().width(), 30);
        // Exits reach every edge, so there is something to connect to.
        assert!(!chunk.connection_points().is_empty());
    }

    #[test]
    fn test_walk_off_every_outer_tile() {
        let params = LayoutParams::new(20, 20, 8, 3);
        let mut store =
            ChunkStore::new(params, CorridorGenerator::with_seed(11)).expect("valid store");

        let points: Vec<_> = store
            .get_or_generate_chunk(ChunkCoord::ORIGIN)
            .expect("generated")
            .connection_points()
            .to_vec();

        for point in &points {
            let world = store.chunk_local_to_world(ChunkCoord::ORIGIN, point.local);
            assert_eq!(store.tile_at(world).expect("tile"), Tile::Path);
            let step = store
                .on_outer_tile_entered(world)
                .expect("step")
                .expect("outer tile");
            assert_eq!(step.neighbor, ChunkCoord::ORIGIN.neighbor(point.direction));
        }

        let origin = store.chunk(ChunkCoord::ORIGIN).expect("loaded");
        assert!(origin.connection_points().iter().all(|p| p.connected));
        assert!(store.loaded_count() <= 5);
        assert_eq!(
            store.world_to_chunk(WorldCoord::new(-1, -1)),
            ChunkCoord::new(-1, -1)
        );
    }
}
