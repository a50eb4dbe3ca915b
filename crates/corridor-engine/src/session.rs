//! A running world: chunk store, actor, camera and render state.

use corridor_common::{ChunkCoord, CorridorResult, Direction, WorldCoord, WorldError};
use corridor_gameplay::{MoveResult, Terrain, WorldActor};
use corridor_view::{
    build_frame, Camera, CullingMode, CullingPlanner, FogFocus, Frame, ViewGeometry,
    VisibilityModel,
};
use corridor_world::{ChunkStore, CorridorGenerator, GeneratorConfig, Grid, LayoutGenerator};
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Additive zoom per unit of wheel delta.
const WHEEL_ZOOM_FACTOR: f32 = 0.001;

/// A chunk generated because the actor crossed an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEvent {
    /// Where the actor was standing
    pub at: WorldCoord,
    /// The new chunk
    pub chunk: ChunkCoord,
}

/// Owns everything needed to simulate and draw one world.
pub struct WorldSession {
    store: ChunkStore,
    actor: WorldActor,
    planner: CullingPlanner,
    visibility: VisibilityModel,
    camera: Camera,
    cell_size: f32,
    seed: u64,
    events: Vec<ChunkEvent>,
}

impl WorldSession {
    /// Builds a session and spawns the actor in chunk (0, 0).
    pub fn new(config: &EngineConfig) -> CorridorResult<Self> {
        let seed = config.world_seed.unwrap_or_else(|| fastrand::u64(..));
        let generator = CorridorGenerator::new(GeneratorConfig {
            seed,
            ..Default::default()
        });
        Self::with_generator(config, seed, generator)
    }

    /// Builds a session over any layout generator.
    ///
    /// Fails with [`WorldError::NoSpawn`] when chunk (0, 0) has no path tile.
    pub fn with_generator(
        config: &EngineConfig,
        seed: u64,
        generator: impl LayoutGenerator + 'static,
    ) -> CorridorResult<Self> {
        let mut store = ChunkStore::new(config.layout_params(), generator)?;

        let mut planner = config.culling_planner();
        planner.set_chunk_dims(store.dims());

        let mut actor = WorldActor::new(WorldCoord::new(0, 0), store.path_tile())
            .with_cooldown(config.move_cooldown());
        if !actor.find_spawn(Terrain::Chunks(&mut store))? {
            return Err(WorldError::NoSpawn {
                x: ChunkCoord::ORIGIN.x,
                y: ChunkCoord::ORIGIN.y,
            }
            .into());
        }

        info!(
            "Session started: seed {seed}, {}x{} chunks, {} culling",
            store.dims().width,
            store.dims().height,
            planner.mode()
        );

        Ok(Self {
            store,
            actor,
            planner,
            visibility: config.visibility_model(),
            camera: config.camera(),
            cell_size: config.cell_size,
            seed,
            events: Vec::new(),
        })
    }

    /// World seed in use.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The actor.
    #[must_use]
    pub const fn actor(&self) -> &WorldActor {
        &self.actor
    }

    /// The chunk store.
    #[must_use]
    pub const fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Chunks generated by traversal so far.
    #[must_use]
    pub fn events(&self) -> &[ChunkEvent] {
        &self.events
    }

    /// Chunk the actor stands in.
    #[must_use]
    pub const fn current_chunk(&self) -> ChunkCoord {
        self.actor.current_chunk(&self.store)
    }

    /// Lets one cooldown pass, then tries to step.
    pub fn step(&mut self, direction: Direction) -> CorridorResult<MoveResult> {
        self.actor.advance(self.actor.cooldown());
        let result = self.actor.try_move(direction, Terrain::Chunks(&mut self.store))?;

        if let MoveResult::Moved {
            transition: Some(step),
        } = result
        {
            if step.generated_new_chunk {
                self.events.push(ChunkEvent {
                    at: self.actor.position(),
                    chunk: step.neighbor,
                });
            }
        }
        Ok(result)
    }

    /// Drag-pans the camera. Ignored in fog-of-war mode, which keeps the
    /// camera on the player.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.planner.mode() != CullingMode::FogOfWar {
            self.camera.pan_by(dx, dy);
        }
    }

    /// Wheel zoom. Ignored in fog-of-war mode.
    pub fn wheel(&mut self, delta_y: f32) {
        if self.planner.mode() != CullingMode::FogOfWar {
            let zoom = self.camera.zoom - delta_y * WHEEL_ZOOM_FACTOR;
            self.camera.set_zoom(zoom);
        }
    }

    /// Builds the frame for the actor's current chunk.
    ///
    /// The chunk is drawn in its own local coordinates.
    pub fn render(&mut self) -> CorridorResult<(Frame, Grid)> {
        let coord = self.current_chunk();
        let local = self.actor.local_position(&self.store);
        let player = WorldCoord::new(i64::from(local.x), i64::from(local.y));
        let grid = self.store.get_or_generate_chunk(coord)?.grid().clone();

        self.planner.set_current_chunk(ChunkCoord::ORIGIN);
        let view = ViewGeometry::centered(
            self.cell_size,
            grid.width(),
            grid.height(),
            self.camera.viewport(),
        );

        let max_tint_radius = self.visibility.max_tint_radius();
        if self.planner.mode() == CullingMode::FogOfWar {
            let r = self.planner.fog_focus_radius(max_tint_radius) as f32;
            let screen_x = player.x as f32 * view.cell_size + view.offset_x;
            let screen_y =
                (i64::from(grid.height()) - 1 - player.y) as f32 * view.cell_size + view.offset_y;
            let half = view.cell_size / 2.0;
            self.camera
                .focus_square((screen_x + half, screen_y + half), 2.0 * r * view.cell_size);
        }

        let window = self.planner.compute_window(
            &grid,
            &self.camera,
            &view,
            Some(FogFocus {
                player,
                max_tint_radius,
            }),
        );
        let frame = build_frame(
            &grid,
            window,
            &self.visibility,
            Some(player),
            self.store.path_tile(),
        );
        debug!("Chunk {coord}: {}", frame.stats);
        Ok((frame, grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_common::{CorridorError, GenerationError, Tile};
    use corridor_world::LayoutParams;

    fn config(mode: CullingMode) -> EngineConfig {
        EngineConfig {
            grid_width: 30,
            grid_height: 30,
            region_count: 12,
            world_seed: Some(7),
            culling_mode: mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_session_spawns_on_path() {
        let session = WorldSession::new(&config(CullingMode::Viewport)).expect("session");
        assert_eq!(session.seed(), 7);
        assert_eq!(session.current_chunk(), ChunkCoord::ORIGIN);
        assert_eq!(session.store().loaded_count(), 1);

        let local = session.actor().local_position(session.store());
        let chunk = session.store().chunk(ChunkCoord::ORIGIN).expect("loaded");
        assert_eq!(chunk.grid().tile_at(local), session.store().path_tile());
    }

    #[test]
    fn test_session_without_walkable_tile_fails() {
        let solid = |params: &LayoutParams| -> Result<Grid, GenerationError> {
            Grid::filled(params.width, params.height, Tile::Region)
        };
        let err = WorldSession::with_generator(&config(CullingMode::Viewport), 7, solid)
            .err()
            .expect("no spawn");
        assert!(matches!(
            err,
            CorridorError::World(WorldError::NoSpawn { x: 0, y: 0 })
        ));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = WorldSession::new(&config(CullingMode::Viewport)).expect("session");
        let b = WorldSession::new(&config(CullingMode::Viewport)).expect("session");
        assert_eq!(a.actor().position(), b.actor().position());
        let grid_a = a.store().chunk(ChunkCoord::ORIGIN).expect("loaded").grid();
        let grid_b = b.store().chunk(ChunkCoord::ORIGIN).expect("loaded").grid();
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn test_fog_render_is_focused() {
        let mut session = WorldSession::new(&config(CullingMode::FogOfWar)).expect("session");
        let (frame, grid) = session.render().expect("render");
        // r = 8 + 5 = 13, so at most 27 tiles per side.
        let side_x = frame.window.end_x - frame.window.start_x + 1;
        assert!(side_x <= 27);
        assert!(frame.stats.rendered <= 27 * 27);
        assert_eq!(frame.stats.total, grid.dims().area());

        let zoom = session.camera().zoom;
        session.wheel(-500.0);
        assert!((session.camera().zoom - zoom).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chunk_render_covers_whole_chunk() {
        let mut session = WorldSession::new(&config(CullingMode::Chunk)).expect("session");
        let (frame, _) = session.render().expect("render");
        assert_eq!(frame.stats.rendered, 900);
    }

    #[test]
    fn test_viewport_wheel_and_pan() {
        let mut session = WorldSession::new(&config(CullingMode::Viewport)).expect("session");
        session.wheel(-500.0);
        assert!((session.camera().zoom - 1.5).abs() < 1e-6);
        session.pan(30.0, 0.0);
        assert!((session.camera().scroll.0 + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_blocked_steps_leave_actor() {
        let mut session = WorldSession::new(&config(CullingMode::Viewport)).expect("session");
        let start = session.actor().position();
        for direction in Direction::ALL {
            let result = session.step(direction).expect("step");
            if result.moved() {
                assert_eq!(session.actor().position(), start.step(direction));
                return;
            }
            assert_eq!(session.actor().position(), start);
        }
    }
}
