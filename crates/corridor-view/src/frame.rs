//! Frame assembly: what to draw for each tile in a culling window.

use corridor_common::{Tile, WorldCoord};
use corridor_world::{is_highlighted, Grid};
use tracing::debug;

use crate::culling::CullingWindow;
use crate::palette::{base_color, Color};
use crate::visibility::VisibilityModel;

/// One tile to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDraw {
    /// Grid column
    pub x: i64,
    /// Grid row (0 = south)
    pub y: i64,
    /// Tile code
    pub tile: Tile,
    /// Significant border path tile
    pub highlighted: bool,
    /// Fog intensity scaled to `0..=255`
    pub fog: u8,
    /// Final color after fog
    pub color: Color,
}

/// Rendered versus total tile counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Tiles in the culling window
    pub rendered: usize,
    /// Tiles in the grid
    pub total: usize,
}

impl FrameStats {
    /// Share of the grid that was drawn, in percent.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.rendered as f64 / self.total as f64 * 100.0
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rendering {}/{} tiles ({:.1}%)",
            self.rendered,
            self.total,
            self.percent()
        )
    }
}

/// Draw list for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Window the draws cover
    pub window: CullingWindow,
    /// Per-tile draws, column by column
    pub draws: Vec<TileDraw>,
    /// Counts
    pub stats: FrameStats,
}

impl Frame {
    /// Draw record at `(x, y)`, if it was in the window.
    #[must_use]
    pub fn draw_at(&self, x: i64, y: i64) -> Option<&TileDraw> {
        if !self.window.contains(x, y) {
            return None;
        }
        let rows = self.window.end_y - self.window.start_y + 1;
        let index = (x - self.window.start_x) * rows + (y - self.window.start_y);
        self.draws.get(index as usize)
    }
}

/// Builds the draw list for `window`. Fog is applied only when a player
/// position is given.
#[must_use]
pub fn build_frame(
    grid: &Grid,
    window: CullingWindow,
    visibility: &VisibilityModel,
    player: Option<WorldCoord>,
    path: Tile,
) -> Frame {
    let draws: Vec<TileDraw> = window
        .tiles()
        .map(|(x, y)| {
            let tile = grid.tile(x, y);
            let highlighted = tile == path && is_highlighted(x, y, grid, path);
            let base = base_color(tile, highlighted);
            let intensity = player.map_or(0.0, |p| visibility.intensity(p.x, p.y, x, y));
            TileDraw {
                x,
                y,
                tile,
                highlighted,
                fog: (intensity * 255.0).round() as u8,
                color: VisibilityModel::tint(base, intensity),
            }
        })
        .collect();

    let stats = FrameStats {
        rendered: draws.len(),
        total: grid.dims().area(),
    };
    debug!("{stats}");

    Frame {
        window,
        draws,
        stats,
    }
}
