//! Lazy chunk storage and traversal bookkeeping.

use ahash::AHashMap;
use corridor_common::{
    ChunkCoord, ChunkDims, Direction, GenerationError, LocalCoord, Tile, WorldCoord, WorldError,
    WorldResult,
};
use tracing::{debug, info};

use crate::chunk::Chunk;
use crate::generation::{LayoutGenerator, LayoutParams};

/// Result of stepping onto a chunk's outer tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuterTileStep {
    /// The neighbour did not exist before this step
    pub generated_new_chunk: bool,
    /// Chunk across the crossed edge
    pub neighbor: ChunkCoord,
}

/// Owns every generated chunk, keyed by chunk coordinate.
///
/// Chunks are generated on first access and live until the store is
/// dropped. A failed generation leaves the store exactly as it was.
pub struct ChunkStore {
    dims: ChunkDims,
    params: LayoutParams,
    path_tile: Tile,
    chunks: AHashMap<ChunkCoord, Chunk>,
    generator: Box<dyn LayoutGenerator>,
}

impl ChunkStore {
    /// Creates an empty store. `params.width`/`params.height` become the
    /// chunk size; a region count of 0 is resolved up front.
    pub fn new(params: LayoutParams, generator: impl LayoutGenerator + 'static) -> WorldResult<Self> {
        let dims = ChunkDims::new(params.width, params.height)?;
        let params = LayoutParams {
            region_count: params.resolved_region_count(),
            ..params
        };
        info!(
            "Chunk store ready: {}x{} chunks, {} regions, spacing {}",
            dims.width, dims.height, params.region_count, params.min_region_spacing
        );
        Ok(Self {
            dims,
            params,
            path_tile: Tile::Path,
            chunks: AHashMap::new(),
            generator: Box::new(generator),
        })
    }

    /// Sets which tile code counts as path for border classification.
    #[must_use]
    pub fn with_path_tile(mut self, tile: Tile) -> Self {
        self.path_tile = tile;
        self
    }

    /// Chunk size.
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Parameters passed to the generator for every chunk.
    #[must_use]
    pub const fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Tile code treated as path.
    #[must_use]
    pub const fn path_tile(&self) -> Tile {
        self.path_tile
    }

    /// Returns the chunk at `coord`, generating it if absent.
    pub fn get_or_generate_chunk(&mut self, coord: ChunkCoord) -> WorldResult<&Chunk> {
        use std::collections::hash_map::Entry;

        match self.chunks.entry(coord) {
            Entry::Occupied(e) => Ok(&*e.into_mut()),
            Entry::Vacant(e) => {
                let wrap = |source| WorldError::Generation {
                    x: coord.x,
                    y: coord.y,
                    source,
                };
                let grid = self.generator.generate(&self.params).map_err(wrap)?;
                if grid.dims() != self.dims {
                    return Err(wrap(GenerationError::SizeMismatch {
                        expected: self.dims.area(),
                        actual: grid.dims().area(),
                    }));
                }

                let chunk = Chunk::new(coord, grid, self.path_tile);
                info!(
                    "Generated chunk {coord} with {} connection points",
                    chunk.connection_points().len()
                );
                Ok(&*e.insert(chunk))
            },
        }
    }

    /// Returns a loaded chunk without generating.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Checks if a chunk is loaded.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Returns the number of loaded chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates loaded chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Loaded chunks within `range` chunks of `center` (square window),
    /// column by column.
    #[must_use]
    pub fn chunks_in_range(&self, center: ChunkCoord, range: i32) -> Vec<&Chunk> {
        let mut out = Vec::new();
        for x in center.x - range..=center.x + range {
            for y in center.y - range..=center.y + range {
                if let Some(chunk) = self.chunks.get(&ChunkCoord::new(x, y)) {
                    out.push(chunk);
                }
            }
        }
        out
    }

    /// Chunk containing a world tile.
    #[must_use]
    pub const fn world_to_chunk(&self, world: WorldCoord) -> ChunkCoord {
        world.to_chunk_coord(self.dims)
    }

    /// Position of a world tile inside its chunk (floor modulo).
    #[must_use]
    pub const fn world_to_local(&self, world: WorldCoord) -> LocalCoord {
        world.to_local_coord(self.dims)
    }

    /// World position of a local tile in a chunk.
    #[must_use]
    pub const fn chunk_local_to_world(&self, chunk: ChunkCoord, local: LocalCoord) -> WorldCoord {
        chunk.local_to_world(local, self.dims)
    }

    /// Tile at a world position, generating the owning chunk if needed.
    pub fn tile_at(&mut self, world: WorldCoord) -> WorldResult<Tile> {
        let local = self.world_to_local(world);
        let chunk = self.get_or_generate_chunk(self.world_to_chunk(world))?;
        Ok(chunk.grid().tile_at(local))
    }

    /// Whether a world tile is one of its chunk's connection points.
    pub fn is_outer_tile(&mut self, world: WorldCoord) -> WorldResult<bool> {
        Ok(self.outer_direction(world)?.is_some())
    }

    /// Edge direction of the connection point at a world tile, if any.
    pub fn outer_direction(&mut self, world: WorldCoord) -> WorldResult<Option<Direction>> {
        let local = self.world_to_local(world);
        let chunk = self.get_or_generate_chunk(self.world_to_chunk(world))?;
        Ok(chunk.connection_at(local).map(|p| p.direction))
    }

    /// Handles an actor stepping onto `world`.
    ///
    /// Does nothing unless the tile is an outer tile. Otherwise generates the
    /// chunk across that edge if needed and connects the two chunks: each
    /// records the other as a neighbour and every connection point on the
    /// shared side of both is marked connected.
    pub fn on_outer_tile_entered(&mut self, world: WorldCoord) -> WorldResult<Option<OuterTileStep>> {
        let Some(direction) = self.outer_direction(world)? else {
            return Ok(None);
        };

        let current = self.world_to_chunk(world);
        let neighbor = current.neighbor(direction);
        let generated_new_chunk = !self.is_loaded(neighbor);
        self.get_or_generate_chunk(neighbor)?;
        self.connect(current, neighbor);

        Ok(Some(OuterTileStep {
            generated_new_chunk,
            neighbor,
        }))
    }

    /// Connects two loaded, adjacent chunks.
    fn connect(&mut self, a: ChunkCoord, b: ChunkCoord) {
        let towards_b = Direction::towards((a.x, a.y), (b.x, b.y));
        let towards_a = towards_b.opposite();

        let facing_a = self.chunks.get_mut(&a).map_or(0, |chunk| {
            chunk.add_neighbor(b);
            chunk.mark_side_connected(towards_b)
        });
        let facing_b = self.chunks.get_mut(&b).map_or(0, |chunk| {
            chunk.add_neighbor(a);
            chunk.mark_side_connected(towards_a)
        });

        debug!("Aligning {facing_a} connection points from chunk {a} with {facing_b} connection points from chunk {b}");
    }
}

impl std::fmt::Debug for ChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStore")
            .field("dims", &self.dims)
            .field("params", &self.params)
            .field("path_tile", &self.path_tile)
            .field("loaded", &self.chunks.len())
            .finish_non_exhaustive()
    }
}
