//! The world actor: a cooldown-gated, tile-stepping mover.

use std::time::Duration;

use corridor_common::{ChunkCoord, Direction, LocalCoord, Tile, WorldCoord, WorldResult};
use corridor_world::{ChunkStore, Grid, OuterTileStep};
use tracing::{debug, info, warn};

/// Default minimum time between two moves.
pub const DEFAULT_MOVE_COOLDOWN: Duration = Duration::from_millis(150);

/// What the actor walks on.
pub enum Terrain<'a> {
    /// Chunked world; moves may generate chunks.
    Chunks(&'a mut ChunkStore),
    /// A single bounded grid.
    Grid(&'a Grid),
}

impl Terrain<'_> {
    fn tile(&mut self, at: WorldCoord) -> WorldResult<Tile> {
        match self {
            Self::Chunks(store) => store.tile_at(at),
            Self::Grid(grid) => Ok(grid.tile(at.x, at.y)),
        }
    }
}

/// Outcome of a move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The cooldown has not elapsed.
    CoolingDown,
    /// The destination is not walkable.
    Blocked,
    /// The actor moved. `transition` is set when the step entered an outer
    /// tile.
    Moved {
        /// Chunk bookkeeping triggered by the step
        transition: Option<OuterTileStep>,
    },
}

impl MoveResult {
    /// Whether the position changed.
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// A mover in world coordinates that only walks on one tile code.
#[derive(Debug, Clone)]
pub struct WorldActor {
    position: WorldCoord,
    walkable: Tile,
    cooldown: Duration,
    since_last_move: Duration,
}

impl WorldActor {
    /// Creates an actor at `position` that walks on `walkable` tiles.
    #[must_use]
    pub const fn new(position: WorldCoord, walkable: Tile) -> Self {
        Self {
            position,
            walkable,
            cooldown: DEFAULT_MOVE_COOLDOWN,
            since_last_move: DEFAULT_MOVE_COOLDOWN,
        }
    }

    /// Replaces the move cooldown. The actor stays ready to move.
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self.since_last_move = cooldown;
        self
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> WorldCoord {
        self.position
    }

    /// Tile code the actor may stand on.
    #[must_use]
    pub const fn walkable(&self) -> Tile {
        self.walkable
    }

    /// Move cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.since_last_move >= self.cooldown
    }

    /// Advances the cooldown clock.
    pub fn advance(&mut self, dt: Duration) {
        self.since_last_move = self.since_last_move.saturating_add(dt);
    }

    /// Chunk containing the actor.
    #[must_use]
    pub const fn current_chunk(&self, store: &ChunkStore) -> ChunkCoord {
        store.world_to_chunk(self.position)
    }

    /// Actor position inside its chunk.
    #[must_use]
    pub const fn local_position(&self, store: &ChunkStore) -> LocalCoord {
        store.world_to_local(self.position)
    }

    fn can_stand_on(&self, terrain: &mut Terrain<'_>, at: WorldCoord) -> WorldResult<bool> {
        Ok(terrain.tile(at)? == self.walkable)
    }

    /// Tries to take one step.
    ///
    /// Fails without any state change while cooling down or when the
    /// destination is not walkable. In chunked mode, stepping from a
    /// non-outer tile onto an outer tile hands off to
    /// [`ChunkStore::on_outer_tile_entered`]; walking along a run of outer
    /// tiles triggers it only once.
    pub fn try_move(&mut self, direction: Direction, mut terrain: Terrain<'_>) -> WorldResult<MoveResult> {
        if !self.is_ready() {
            return Ok(MoveResult::CoolingDown);
        }
        let target = self.position.step(direction);
        if !self.can_stand_on(&mut terrain, target)? {
            debug!("Move {direction} to ({}, {}) blocked", target.x, target.y);
            return Ok(MoveResult::Blocked);
        }

        let transition = match terrain {
            Terrain::Chunks(store) => {
                let was_outer = store.is_outer_tile(self.position)?;
                let now_outer = store.is_outer_tile(target)?;
                let step = if now_outer && !was_outer {
                    store.on_outer_tile_entered(target)?
                } else {
                    None
                };
                if let Some(step) = step.filter(|s| s.generated_new_chunk) {
                    info!("Entered outer tile, generated chunk {}", step.neighbor);
                }
                step
            },
            Terrain::Grid(_) => None,
        };

        self.position = target;
        self.since_last_move = Duration::ZERO;
        Ok(MoveResult::Moved { transition })
    }

    /// Teleports to `position` if it is walkable. Returns whether it moved.
    pub fn set_position(&mut self, position: WorldCoord, mut terrain: Terrain<'_>) -> WorldResult<bool> {
        if self.can_stand_on(&mut terrain, position)? {
            self.position = position;
            return Ok(true);
        }
        Ok(false)
    }

    /// Moves to the first walkable tile in row-major order (south row first).
    ///
    /// In chunked mode only chunk (0, 0) is searched.
    pub fn find_spawn(&mut self, terrain: Terrain<'_>) -> WorldResult<bool> {
        let spawn = match terrain {
            Terrain::Chunks(store) => {
                let walkable = self.walkable;
                let chunk = store.get_or_generate_chunk(ChunkCoord::ORIGIN)?;
                first_walkable(chunk.grid(), walkable)
                    .map(|local| store.chunk_local_to_world(ChunkCoord::ORIGIN, local))
            },
            Terrain::Grid(grid) => first_walkable(grid, self.walkable)
                .map(|local| WorldCoord::new(i64::from(local.x), i64::from(local.y))),
        };

        match spawn {
            Some(position) => {
                self.position = position;
                info!("Spawned at ({}, {})", position.x, position.y);
                Ok(true)
            },
            None => {
                warn!("No walkable tile to spawn on");
                Ok(false)
            },
        }
    }
}

fn first_walkable(grid: &Grid, walkable: Tile) -> Option<LocalCoord> {
    (0..grid.height())
        .flat_map(|y| (0..grid.width()).map(move |x| LocalCoord::new(x, y)))
        .find(|&local| grid.tile_at(local) == walkable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_common::GenerationError;
    use corridor_world::LayoutParams;
    use proptest::prelude::*;

    fn corridor_store() -> ChunkStore {
        ChunkStore::new(LayoutParams::new(50, 50, 0, 3), |p: &LayoutParams| {
            Grid::from_fn(p.width, p.height, |_, y| {
                if y == 25 {
                    Tile::Path
                } else {
                    Tile::Region
                }
            })
        })
        .expect("valid store")
    }

    fn ready(actor: &mut WorldActor) {
        actor.advance(actor.cooldown());
    }

    #[test]
    fn test_grid_mode_moves_on_path_only() {
        let grid = Grid::from_rows(&["###", "...", "###"]).expect("valid grid");
        let mut actor = WorldActor::new(WorldCoord::new(0, 1), Tile::Path);

        let result = actor
            .try_move(Direction::East, Terrain::Grid(&grid))
            .expect("move");
        assert_eq!(result, MoveResult::Moved { transition: None });
        assert_eq!(actor.position(), WorldCoord::new(1, 1));

        ready(&mut actor);
        let blocked = actor
            .try_move(Direction::North, Terrain::Grid(&grid))
            .expect("move");
        assert_eq!(blocked, MoveResult::Blocked);
        assert_eq!(actor.position(), WorldCoord::new(1, 1));
        // A blocked move does not consume the cooldown.
        assert!(actor.is_ready());

        ready(&mut actor);
        actor.try_move(Direction::East, Terrain::Grid(&grid)).expect("move");
        ready(&mut actor);
        let off_edge = actor
            .try_move(Direction::East, Terrain::Grid(&grid))
            .expect("move");
        assert_eq!(off_edge, MoveResult::Blocked);
    }

    #[test]
    fn test_cooldown_gates_moves() {
        let grid = Grid::filled(5, 5, Tile::Path).expect("valid grid");
        let mut actor = WorldActor::new(WorldCoord::new(2, 2), Tile::Path);

        assert!(actor.try_move(Direction::North, Terrain::Grid(&grid)).expect("move").moved());
        assert_eq!(
            actor.try_move(Direction::North, Terrain::Grid(&grid)).expect("move"),
            MoveResult::CoolingDown
        );

        actor.advance(Duration::from_millis(149));
        assert!(!actor.is_ready());
        actor.advance(Duration::from_millis(1));
        assert!(actor.try_move(Direction::North, Terrain::Grid(&grid)).expect("move").moved());
        assert_eq!(actor.position(), WorldCoord::new(2, 4));
    }

    #[test]
    fn test_stepping_east_onto_outer_tile_generates_neighbor() {
        let mut store = corridor_store();
        let mut actor = WorldActor::new(WorldCoord::new(48, 25), Tile::Path);

        let result = actor
            .try_move(Direction::East, Terrain::Chunks(&mut store))
            .expect("move");
        let MoveResult::Moved {
            transition: Some(step),
        } = result
        else {
            panic!("expected a chunk transition, got {result:?}");
        };
        assert!(step.generated_new_chunk);
        assert_eq!(step.neighbor, ChunkCoord::new(1, 0));
        assert_eq!(actor.current_chunk(&store), ChunkCoord::ORIGIN);
        assert_eq!(actor.local_position(&store), LocalCoord::new(49, 25));

        let origin = store.chunk(ChunkCoord::ORIGIN).expect("loaded");
        assert!(origin.connection_points_on(Direction::East).all(|p| p.connected));
        let east = store.chunk(ChunkCoord::new(1, 0)).expect("loaded");
        assert!(east.connection_points_on(Direction::West).all(|p| p.connected));
    }

    #[test]
    fn test_outer_tile_run_triggers_once() {
        let mut store = corridor_store();
        let mut actor = WorldActor::new(WorldCoord::new(49, 25), Tile::Path);

        // (49, 25) is outer in chunk (0, 0), (50, 25) is outer in chunk (1, 0).
        let result = actor
            .try_move(Direction::East, Terrain::Chunks(&mut store))
            .expect("move");
        assert_eq!(result, MoveResult::Moved { transition: None });
        assert_eq!(actor.current_chunk(&store), ChunkCoord::new(1, 0));

        ready(&mut actor);
        let result = actor
            .try_move(Direction::East, Terrain::Chunks(&mut store))
            .expect("move");
        assert_eq!(result, MoveResult::Moved { transition: None });
    }

    #[test]
    fn test_generation_failure_propagates() {
        let mut store = ChunkStore::new(LayoutParams::new(10, 10, 1, 1), |_: &LayoutParams| -> Result<Grid, GenerationError> {
            Err(GenerationError::Failed("boom".into()))
        })
        .expect("valid store");
        let mut actor = WorldActor::new(WorldCoord::new(0, 0), Tile::Path);

        assert!(actor.try_move(Direction::East, Terrain::Chunks(&mut store)).is_err());
        assert_eq!(actor.position(), WorldCoord::new(0, 0));
        assert!(actor.find_spawn(Terrain::Chunks(&mut store)).is_err());
    }

    #[test]
    fn test_find_spawn_row_major() {
        let grid = Grid::from_rows(&["#.#", "##.", "###"]).expect("valid grid");
        let mut actor = WorldActor::new(WorldCoord::new(-9, -9), Tile::Path);
        assert!(actor.find_spawn(Terrain::Grid(&grid)).expect("spawn"));
        // Row y = 1 is scanned before y = 2.
        assert_eq!(actor.position(), WorldCoord::new(2, 1));

        let solid = Grid::filled(3, 3, Tile::Region).expect("valid grid");
        let mut stuck = WorldActor::new(WorldCoord::new(1, 1), Tile::Path);
        assert!(!stuck.find_spawn(Terrain::Grid(&solid)).expect("spawn"));
        assert_eq!(stuck.position(), WorldCoord::new(1, 1));
    }

    #[test]
    fn test_find_spawn_in_origin_chunk() {
        let mut store = corridor_store();
        let mut actor = WorldActor::new(WorldCoord::new(500, 500), Tile::Path);
        assert!(actor.find_spawn(Terrain::Chunks(&mut store)).expect("spawn"));
        assert_eq!(actor.position(), WorldCoord::new(0, 25));
        assert_eq!(store.loaded_count(), 1);
    }

    #[test]
    fn test_set_position_requires_walkable() {
        let mut store = corridor_store();
        let mut actor = WorldActor::new(WorldCoord::new(0, 25), Tile::Path);
        assert!(!actor
            .set_position(WorldCoord::new(-10, 24), Terrain::Chunks(&mut store))
            .expect("teleport"));
        assert!(actor
            .set_position(WorldCoord::new(-10, 25), Terrain::Chunks(&mut store))
            .expect("teleport"));
        assert_eq!(actor.position(), WorldCoord::new(-10, 25));
        assert_eq!(actor.current_chunk(&store), ChunkCoord::new(-1, 0));
        assert_eq!(actor.local_position(&store), LocalCoord::new(40, 25));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_move_per_cooldown(ticks in proptest::collection::vec(0u64..100, 1..60)) {
            let grid = Grid::filled(200, 1, Tile::Path).expect("valid grid");
            let mut actor = WorldActor::new(WorldCoord::new(0, 0), Tile::Path);
            let mut since_move = u64::MAX;
            for dt in ticks {
                actor.advance(Duration::from_millis(dt));
                since_move = since_move.saturating_add(dt);
                let moved = actor
                    .try_move(Direction::East, Terrain::Grid(&grid))
                    .expect("move")
                    .moved();
                if moved {
                    prop_assert!(since_move >= 150);
                    since_move = 0;
                }
            }
        }
    }
}
