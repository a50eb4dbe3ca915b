//! Culling: which tile rectangle to draw this frame.
//!
//! Each [`CullingMode`] has its own window function. Every window is
//! inclusive and clamped into the grid, so it is never empty.

use corridor_common::{ChunkCoord, ChunkDims, WorldCoord};
use corridor_world::Grid;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// Extra tiles drawn beyond the viewport on each side.
pub const CULL_BUFFER_CELLS: i64 = 2;

/// Default extra tiles beyond the max tint radius in fog-of-war mode.
pub const DEFAULT_FOG_FOCUS_BUFFER: u32 = 5;

/// Strategy used to pick the rendered window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CullingMode {
    /// Tiles under the camera view plus a small buffer
    #[default]
    Viewport,
    /// The current chunk
    Chunk,
    /// A square around the player sized by the fog radius
    FogOfWar,
}

impl CullingMode {
    /// Parses `viewport`, `chunk` or `fog-of-war`. Anything else is `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewport" => Some(Self::Viewport),
            "chunk" => Some(Self::Chunk),
            "fog-of-war" | "fog_of_war" | "fog" => Some(Self::FogOfWar),
            _ => None,
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewport => "viewport",
            Self::Chunk => "chunk",
            Self::FogOfWar => "fog-of-war",
        }
    }
}

impl std::fmt::Display for CullingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive tile rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CullingWindow {
    /// First column
    pub start_x: i64,
    /// Last column
    pub end_x: i64,
    /// First row
    pub start_y: i64,
    /// Last row
    pub end_y: i64,
}

impl CullingWindow {
    /// The whole grid.
    #[must_use]
    pub fn full(grid: &Grid) -> Self {
        Self {
            start_x: 0,
            end_x: i64::from(grid.width()) - 1,
            start_y: 0,
            end_y: i64::from(grid.height()) - 1,
        }
    }

    /// Clamps both ends of each axis into the grid.
    fn clamped(start_x: i64, end_x: i64, start_y: i64, end_y: i64, grid: &Grid) -> Self {
        let max_x = i64::from(grid.width()) - 1;
        let max_y = i64::from(grid.height()) - 1;
        let (start_x, end_x) = (start_x.min(end_x), start_x.max(end_x));
        let (start_y, end_y) = (start_y.min(end_y), start_y.max(end_y));
        Self {
            start_x: start_x.clamp(0, max_x),
            end_x: end_x.clamp(0, max_x),
            start_y: start_y.clamp(0, max_y),
            end_y: end_y.clamp(0, max_y),
        }
    }

    /// Number of tiles in the window.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        ((self.end_x - self.start_x + 1) * (self.end_y - self.start_y + 1)) as usize
    }

    /// Whether `(x, y)` is inside the window.
    #[must_use]
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.start_x && x <= self.end_x && y >= self.start_y && y <= self.end_y
    }

    /// Tiles in draw order, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = (i64, i64)> {
        let (start_y, end_y) = (self.start_y, self.end_y);
        (self.start_x..=self.end_x).flat_map(move |x| (start_y..=end_y).map(move |y| (x, y)))
    }
}

/// Screen placement of the grid, in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    /// Side of one tile in pixels
    pub cell_size: f32,
    /// Scene X of the grid's left edge
    pub offset_x: f32,
    /// Scene Y of the grid's top edge
    pub offset_y: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
}

impl ViewGeometry {
    /// Geometry that centers a `grid_w x grid_h` grid in the viewport.
    #[must_use]
    pub fn centered(cell_size: f32, grid_w: u32, grid_h: u32, viewport: (u32, u32)) -> Self {
        let (vw, vh) = (viewport.0 as f32, viewport.1 as f32);
        Self {
            cell_size,
            offset_x: (vw - grid_w as f32 * cell_size) / 2.0,
            offset_y: (vh - grid_h as f32 * cell_size) / 2.0,
            viewport_width: vw,
            viewport_height: vh,
        }
    }
}

/// Player position and fog reach, used by fog-of-war culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FogFocus {
    /// Player tile in grid coordinates
    pub player: WorldCoord,
    /// Current max tint radius
    pub max_tint_radius: u32,
}

/// Current chunk description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Chunk coordinate
    pub coord: ChunkCoord,
    /// Chunk size
    pub dims: ChunkDims,
    /// World coordinate of the chunk's first tile
    pub offset: WorldCoord,
}

/// Picks the tile window to render.
#[derive(Debug, Clone)]
pub struct CullingPlanner {
    enabled: bool,
    mode: CullingMode,
    chunk_dims: ChunkDims,
    current_chunk: ChunkCoord,
    fog_focus_buffer: u32,
}

impl Default for CullingPlanner {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: CullingMode::Viewport,
            chunk_dims: ChunkDims {
                width: 50,
                height: 50,
            },
            current_chunk: ChunkCoord::ORIGIN,
            fog_focus_buffer: DEFAULT_FOG_FOCUS_BUFFER,
        }
    }
}

impl CullingPlanner {
    /// Creates a planner with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable culling. Disabled culling draws the whole grid.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether culling is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the culling mode.
    pub fn set_mode(&mut self, mode: CullingMode) {
        self.mode = mode;
    }

    /// Current culling mode.
    #[must_use]
    pub const fn mode(&self) -> CullingMode {
        self.mode
    }

    /// Switches between chunk and viewport mode.
    pub fn set_chunk_based(&mut self, enabled: bool) {
        self.mode = if enabled {
            CullingMode::Chunk
        } else {
            CullingMode::Viewport
        };
    }

    /// Whether the mode is [`CullingMode::Chunk`].
    #[must_use]
    pub fn is_chunk_based(&self) -> bool {
        self.mode == CullingMode::Chunk
    }

    /// Sets the fog-of-war focus buffer.
    pub fn set_fog_focus_buffer(&mut self, buffer: u32) {
        self.fog_focus_buffer = buffer;
    }

    /// Extra tiles beyond the max tint radius in fog-of-war mode.
    #[must_use]
    pub const fn fog_focus_buffer(&self) -> u32 {
        self.fog_focus_buffer
    }

    /// Half-side of the fog-of-war square: `max_tint_radius + buffer`.
    ///
    /// The camera focus uses the same value.
    #[must_use]
    pub const fn fog_focus_radius(&self, max_tint_radius: u32) -> u32 {
        max_tint_radius.saturating_add(self.fog_focus_buffer)
    }

    /// Sets the chunk size used by chunk mode.
    pub fn set_chunk_dims(&mut self, dims: ChunkDims) {
        self.chunk_dims = dims;
    }

    /// Sets the chunk drawn in chunk mode.
    pub fn set_current_chunk(&mut self, coord: ChunkCoord) {
        self.current_chunk = coord;
    }

    /// Current chunk coordinate, size and world offset.
    #[must_use]
    pub const fn current_chunk_info(&self) -> ChunkInfo {
        ChunkInfo {
            coord: self.current_chunk,
            dims: self.chunk_dims,
            offset: self.current_chunk.to_world_coord(self.chunk_dims),
        }
    }

    /// Computes this frame's window.
    ///
    /// Fog-of-war mode without `focus` falls back to the viewport window.
    #[must_use]
    pub fn compute_window(
        &self,
        grid: &Grid,
        camera: &Camera,
        view: &ViewGeometry,
        focus: Option<FogFocus>,
    ) -> CullingWindow {
        if !self.enabled {
            return CullingWindow::full(grid);
        }
        match self.mode {
            CullingMode::Chunk => self.chunk_window(grid),
            CullingMode::Viewport => Self::viewport_window(grid, camera, view),
            CullingMode::FogOfWar => match focus {
                Some(focus) => self.fog_window(grid, focus),
                None => Self::viewport_window(grid, camera, view),
            },
        }
    }

    fn chunk_window(&self, grid: &Grid) -> CullingWindow {
        let origin = self.current_chunk.to_world_coord(self.chunk_dims);
        CullingWindow::clamped(
            origin.x,
            origin.x + i64::from(self.chunk_dims.width) - 1,
            origin.y,
            origin.y + i64::from(self.chunk_dims.height) - 1,
            grid,
        )
    }

    fn viewport_window(grid: &Grid, camera: &Camera, view: &ViewGeometry) -> CullingWindow {
        let cell = f64::from(view.cell_size.max(f32::EPSILON));
        let zoom = f64::from(camera.zoom);
        let (scroll_x, scroll_y) = (f64::from(camera.scroll.0), f64::from(camera.scroll.1));
        let (offset_x, offset_y) = (f64::from(view.offset_x), f64::from(view.offset_y));

        let left = (scroll_x - offset_x) / cell;
        let right = (scroll_x + f64::from(view.viewport_width) / zoom - offset_x) / cell;
        let top = (scroll_y - offset_y) / cell;
        let bottom = (scroll_y + f64::from(view.viewport_height) / zoom - offset_y) / cell;

        CullingWindow::clamped(
            to_tile(left.floor()) - CULL_BUFFER_CELLS,
            to_tile(right.ceil()) + CULL_BUFFER_CELLS,
            to_tile(top.floor()) - CULL_BUFFER_CELLS,
            to_tile(bottom.ceil()) + CULL_BUFFER_CELLS,
            grid,
        )
    }

    fn fog_window(&self, grid: &Grid, focus: FogFocus) -> CullingWindow {
        let r = i64::from(self.fog_focus_radius(focus.max_tint_radius));
        let p = focus.player;
        CullingWindow::clamped(p.x - r, p.x + r, p.y - r, p.y + r, grid)
    }

    /// Whether a tile belongs to the chunks drawn this frame. Always true
    /// outside chunk mode.
    #[must_use]
    pub const fn is_tile_in_active_chunks(&self, x: i64, y: i64) -> bool {
        if !matches!(self.mode, CullingMode::Chunk) {
            return true;
        }
        let chunk = WorldCoord::new(x, y).to_chunk_coord(self.chunk_dims);
        chunk.x == self.current_chunk.x && chunk.y == self.current_chunk.y
    }
}

/// Saturating float to tile index; NaN maps to 0.
fn to_tile(value: f64) -> i64 {
    const LIMIT: f64 = (1u64 << 40) as f64;
    if value.is_nan() {
        0
    } else {
        value.clamp(-LIMIT, LIMIT) as i64
    }
}
