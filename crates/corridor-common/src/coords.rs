//! Coordinate types for world, chunk, and local positions.
//!
//! Three spaces are in play:
//! - world: a global tile address, unbounded in both axes
//! - chunk: the address of one generated chunk on the chunk lattice
//! - local: a tile address inside one chunk, always in `[0, width) x [0, height)`
//!
//! Conversions from world space use floor division and floor modulo
//! (`div_euclid` / `rem_euclid`), so negative world coordinates land in the
//! chunk to their south-west with a non-negative local offset.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::WorldError;

/// Width and height of every chunk in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    /// Chunk width in tiles
    pub width: u32,
    /// Chunk height in tiles
    pub height: u32,
}

impl ChunkDims {
    /// Creates chunk dimensions, rejecting zero-sized chunks.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidChunkSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Square chunk dimensions.
    pub fn square(size: u32) -> Result<Self, WorldError> {
        Self::new(size, size)
    }

    /// Number of tiles in one chunk.
    #[must_use]
    pub const fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// World coordinate in tiles (global position).
///
/// Chunk coordinates are `i32`, so conversions are exact only while the
/// owning chunk fits in `i32`: `x` within
/// `[i32::MIN * width, (i32::MAX + 1) * width)` and likewise for `y`.
/// Tile-by-tile movement never leaves that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct WorldCoord {
    /// X coordinate in world space
    pub x: i64,
    /// Y coordinate in world space (grows northward)
    pub y: i64,
}

impl WorldCoord {
    /// Creates a new world coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Converts to the coordinate of the chunk containing this tile.
    ///
    /// Outside the supported range the chunk index wraps.
    #[must_use]
    pub const fn to_chunk_coord(self, dims: ChunkDims) -> ChunkCoord {
        ChunkCoord {
            x: self.x.div_euclid(dims.width as i64) as i32,
            y: self.y.div_euclid(dims.height as i64) as i32,
        }
    }

    /// Converts to the local coordinate within the owning chunk.
    ///
    /// Uses floor modulo: `-1` in a chunk of width 50 maps to local `49`.
    #[must_use]
    pub const fn to_local_coord(self, dims: ChunkDims) -> LocalCoord {
        LocalCoord {
            x: self.x.rem_euclid(dims.width as i64) as u32,
            y: self.y.rem_euclid(dims.height as i64) as u32,
        }
    }

    /// Returns the coordinate one tile away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx as i64,
            y: self.y + dy as i64,
        }
    }

    /// Chebyshev distance (`max(|dx|, |dy|)`) to another coordinate.
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> i64 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        if dx > dy {
            dx
        } else {
            dy
        }
    }
}

/// Chunk coordinate (identifies a chunk in the chunk lattice).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Pod,
    Zeroable,
)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// The origin chunk.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World coordinate of this chunk's local `(0, 0)` tile.
    #[must_use]
    pub const fn to_world_coord(self, dims: ChunkDims) -> WorldCoord {
        WorldCoord {
            x: (self.x as i64) * (dims.width as i64),
            y: (self.y as i64) * (dims.height as i64),
        }
    }

    /// Combines this chunk with a local coordinate into a world coordinate.
    ///
    /// Inverse of [`WorldCoord::to_chunk_coord`] + [`WorldCoord::to_local_coord`]
    /// for any local coordinate inside the chunk.
    #[must_use]
    pub const fn local_to_world(self, local: LocalCoord, dims: ChunkDims) -> WorldCoord {
        let origin = self.to_world_coord(dims);
        WorldCoord {
            x: origin.x + local.x as i64,
            y: origin.y + local.y as i64,
        }
    }

    /// Returns the adjacent chunk in `direction`.
    ///
    /// North increments `y`, south decrements it, east increments `x`,
    /// west decrements it.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Local coordinate within a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct LocalCoord {
    /// X coordinate within chunk
    pub x: u32,
    /// Y coordinate within chunk
    pub y: u32,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Converts to linear (row-major) index for array access.
    #[must_use]
    pub const fn to_index(self, width: u32) -> usize {
        (self.y as usize) * (width as usize) + (self.x as usize)
    }

    /// Creates from a linear (row-major) index.
    #[must_use]
    pub const fn from_index(index: usize, width: u32) -> Self {
        let width = width as usize;
        Self {
            x: (index % width) as u32,
            y: (index / width) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dims(width: u32, height: u32) -> ChunkDims {
        ChunkDims::new(width, height).expect("valid dims")
    }

    #[test]
    fn test_round_trip_at_supported_range_edges() {
        let d = dims(32, 16);
        let max_x = (i64::from(i32::MAX) + 1) * 32 - 1;
        let min_y = i64::from(i32::MIN) * 16;
        let min_x = i64::from(i32::MIN) * 32;
        let max_y = (i64::from(i32::MAX) + 1) * 16 - 1;
        for world in [WorldCoord::new(max_x, min_y), WorldCoord::new(min_x, max_y)] {
            let chunk = world.to_chunk_coord(d);
            let local = world.to_local_coord(d);
            assert_eq!(chunk.local_to_world(local, d), world);
        }
        assert_eq!(WorldCoord::new(max_x, 0).to_chunk_coord(d).x, i32::MAX);
        assert_eq!(WorldCoord::new(0, min_y).to_chunk_coord(d).y, i32::MIN);
    }

    #[test]
    fn test_zero_dims_rejected() {
        assert!(ChunkDims::new(0, 10).is_err());
        assert!(ChunkDims::new(10, 0).is_err());
        assert!(ChunkDims::square(1).is_ok());
    }

    #[test]
    fn test_world_to_chunk_positive() {
        let d = dims(50, 50);
        assert_eq!(WorldCoord::new(0, 0).to_chunk_coord(d), ChunkCoord::new(0, 0));
        assert_eq!(WorldCoord::new(49, 49).to_chunk_coord(d), ChunkCoord::new(0, 0));
        assert_eq!(WorldCoord::new(50, 99).to_chunk_coord(d), ChunkCoord::new(1, 1));
    }

    #[test]
    fn test_world_to_chunk_negative() {
        let d = dims(50, 40);
        assert_eq!(WorldCoord::new(-1, -1).to_chunk_coord(d), ChunkCoord::new(-1, -1));
        assert_eq!(WorldCoord::new(-50, -40).to_chunk_coord(d), ChunkCoord::new(-1, -1));
        assert_eq!(WorldCoord::new(-51, -41).to_chunk_coord(d), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_world_to_local_uses_floor_modulo() {
        let d = dims(50, 40);
        assert_eq!(WorldCoord::new(-1, -1).to_local_coord(d), LocalCoord::new(49, 39));
        assert_eq!(WorldCoord::new(-50, -40).to_local_coord(d), LocalCoord::new(0, 0));
        assert_eq!(WorldCoord::new(123, 81).to_local_coord(d), LocalCoord::new(23, 1));
    }

    #[test]
    fn test_neighbor_steps() {
        let c = ChunkCoord::new(2, 3);
        assert_eq!(c.neighbor(Direction::North), ChunkCoord::new(2, 4));
        assert_eq!(c.neighbor(Direction::South), ChunkCoord::new(2, 2));
        assert_eq!(c.neighbor(Direction::East), ChunkCoord::new(3, 3));
        assert_eq!(c.neighbor(Direction::West), ChunkCoord::new(1, 3));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = WorldCoord::new(10, 10);
        assert_eq!(a.chebyshev_distance(WorldCoord::new(13, 8)), 3);
        assert_eq!(a.chebyshev_distance(WorldCoord::new(4, 12)), 6);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn test_local_index_roundtrip() {
        let local = LocalCoord::new(7, 3);
        let index = local.to_index(10);
        assert_eq!(index, 37);
        assert_eq!(LocalCoord::from_index(index, 10), local);
    }

    proptest! {
        #[test]
        fn prop_world_chunk_local_roundtrip(
            x in -1_000_000i64..1_000_000,
            y in -1_000_000i64..1_000_000,
            width in 1u32..200,
            height in 1u32..200,
        ) {
            let d = dims(width, height);
            let world = WorldCoord::new(x, y);
            let chunk = world.to_chunk_coord(d);
            let local = world.to_local_coord(d);

            prop_assert!(local.x < width);
            prop_assert!(local.y < height);
            prop_assert_eq!(chunk.local_to_world(local, d), world);
        }
    }
}
