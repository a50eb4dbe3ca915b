//! A single generated chunk and its connection points.

use std::collections::BTreeSet;

use corridor_common::{ChunkCoord, Direction, LocalCoord, Tile};
use serde::{Deserialize, Serialize};

use crate::border::classify_all;
use crate::grid::Grid;

/// A border tile where this chunk may join a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// Position inside the chunk
    pub local: LocalCoord,
    /// Edge of the chunk the point sits on
    pub direction: Direction,
    /// Set once the chunk across this edge has been generated
    pub connected: bool,
}

/// One chunk of the world: a generated grid plus connection bookkeeping.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    grid: Grid,
    connection_points: Vec<ConnectionPoint>,
    neighbors: BTreeSet<ChunkCoord>,
}

impl Chunk {
    /// Wraps a freshly generated grid, deriving its connection points from
    /// the significant border tiles.
    #[must_use]
    pub fn new(coord: ChunkCoord, grid: Grid, path: Tile) -> Self {
        let connection_points = classify_all(&grid, path)
            .into_iter()
            .map(|tile| ConnectionPoint {
                local: LocalCoord::new(tile.x, tile.y),
                direction: tile.direction,
                connected: false,
            })
            .collect();

        Self {
            coord,
            grid,
            connection_points,
            neighbors: BTreeSet::new(),
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the chunk's grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All connection points, in border scan order.
    #[must_use]
    pub fn connection_points(&self) -> &[ConnectionPoint] {
        &self.connection_points
    }

    /// The connection point at `local`, if any.
    #[must_use]
    pub fn connection_at(&self, local: LocalCoord) -> Option<&ConnectionPoint> {
        self.connection_points.iter().find(|p| p.local == local)
    }

    /// Connection points on one side of the chunk.
    pub fn connection_points_on(&self, side: Direction) -> impl Iterator<Item = &ConnectionPoint> {
        self.connection_points
            .iter()
            .filter(move |p| p.direction == side)
    }

    /// Chunks this chunk has been connected to.
    #[must_use]
    pub const fn neighbors(&self) -> &BTreeSet<ChunkCoord> {
        &self.neighbors
    }

    /// Whether this chunk has been connected to `other`.
    #[must_use]
    pub fn is_connected_to(&self, other: ChunkCoord) -> bool {
        self.neighbors.contains(&other)
    }

    pub(crate) fn add_neighbor(&mut self, other: ChunkCoord) {
        self.neighbors.insert(other);
    }

    /// Marks every point on `side` as connected. Returns how many points
    /// face that side.
    pub(crate) fn mark_side_connected(&mut self, side: Direction) -> usize {
        let mut count = 0;
        for point in self
            .connection_points
            .iter_mut()
            .filter(|p| p.direction == side)
        {
            point.connected = true;
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_chunk() -> Chunk {
        let grid = Grid::from_rows(&["##.##", "##.##", ".....", "##.##", "##.##"])
            .expect("valid grid");
        Chunk::new(ChunkCoord::ORIGIN, grid, Tile::Path)
    }

    #[test]
    fn test_connection_points_from_border() {
        let chunk = plus_chunk();
        assert_eq!(chunk.connection_points().len(), 4);
        assert!(chunk.connection_points().iter().all(|p| !p.connected));

        let east = chunk
            .connection_at(LocalCoord::new(4, 2))
            .expect("east point");
        assert_eq!(east.direction, Direction::East);
        assert!(chunk.connection_at(LocalCoord::new(2, 2)).is_none());
    }

    #[test]
    fn test_mark_side_connected() {
        let mut chunk = plus_chunk();
        assert_eq!(chunk.mark_side_connected(Direction::North), 1);
        assert!(chunk
            .connection_points_on(Direction::North)
            .all(|p| p.connected));
        assert!(chunk
            .connection_points_on(Direction::South)
            .all(|p| !p.connected));
    }

    #[test]
    fn test_neighbors() {
        let mut chunk = plus_chunk();
        let east = ChunkCoord::new(1, 0);
        assert!(!chunk.is_connected_to(east));
        chunk.add_neighbor(east);
        chunk.add_neighbor(east);
        assert!(chunk.is_connected_to(east));
        assert_eq!(chunk.neighbors().len(), 1);
    }
}
