//! Border tile classification.
//!
//! Finds the path tiles on a grid's outer ring that are structurally
//! significant (intersections, corners, terminals). These are the points where
//! a chunk may connect to its neighbours, and the tiles the renderer draws in
//! the darker "outer path" colour.

use corridor_common::{Direction, Tile};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// 4-connected neighbour offsets, in scan order: left, right, down, up.
const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A significant path tile on the grid border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderTile {
    /// X coordinate in the grid
    pub x: u32,
    /// Y coordinate in the grid
    pub y: u32,
    /// Edge the tile sits on
    pub direction: Direction,
    /// Number of 4-connected path neighbours
    pub path_neighbors: u8,
    /// More than two path neighbours
    pub is_intersection: bool,
    /// Path turns at this tile (or it sits on a literal grid corner)
    pub is_corner: bool,
    /// Exactly one path neighbour
    pub is_terminal: bool,
}

/// Edge a border cell belongs to.
///
/// Corner cells resolve by priority north > south > east > west. North is
/// the top row (`y == height - 1`).
#[must_use]
pub fn border_direction(grid: &Grid, x: i64, y: i64) -> Option<Direction> {
    if !grid.is_border(x, y) {
        return None;
    }
    let max_x = i64::from(grid.width()) - 1;
    let max_y = i64::from(grid.height()) - 1;

    let direction = if y == max_y {
        Direction::North
    } else if y == 0 {
        Direction::South
    } else if x == max_x {
        Direction::East
    } else {
        Direction::West
    };
    Some(direction)
}

/// Classifies the tile at `(x, y)`.
///
/// Returns `None` unless the cell is a border cell holding `path` that is an
/// intersection, a corner, or a terminal.
#[must_use]
pub fn classify(x: i64, y: i64, grid: &Grid, path: Tile) -> Option<BorderTile> {
    if grid.get(x, y)? != path {
        return None;
    }
    let direction = border_direction(grid, x, y)?;

    let mut count = 0usize;
    let mut offsets = [(0i64, 0i64); 4];
    let mut horizontal = false;
    let mut vertical = false;

    for (dx, dy) in NEIGHBOR_OFFSETS {
        if grid.get(x + dx, y + dy) == Some(path) {
            offsets[count] = (dx, dy);
            count += 1;
            horizontal |= dx != 0;
            vertical |= dy != 0;
        }
    }

    let is_intersection = count > 2;
    let spans_both_axes = count >= 2 && horizontal && vertical;
    let is_terminal = count == 1;

    let special_pair = count == 2 && {
        let max_x = i64::from(grid.width()) - 1;
        let max_y = i64::from(grid.height()) - 1;
        let at_grid_corner = (x == 0 || x == max_x) && (y == 0 || y == max_y);
        let (a, b) = (offsets[0], offsets[1]);
        let straight = a.0 == -b.0 && a.1 == -b.1;
        at_grid_corner || !straight
    };

    if !(is_intersection || spans_both_axes || is_terminal || special_pair) {
        return None;
    }

    Some(BorderTile {
        x: x as u32,
        y: y as u32,
        direction,
        path_neighbors: count as u8,
        is_intersection,
        is_corner: spans_both_axes || special_pair,
        is_terminal,
    })
}

/// Whether the tile at `(x, y)` should be drawn as a highlighted border path.
#[must_use]
pub fn is_highlighted(x: i64, y: i64, grid: &Grid, path: Tile) -> bool {
    classify(x, y, grid, path).is_some()
}

/// Classifies every border cell of `grid`.
///
/// Scan order is column by column (`x` outer, `y` inner), so results are
/// deterministic for a given grid.
#[must_use]
pub fn classify_all(grid: &Grid, path: Tile) -> Vec<BorderTile> {
    let width = i64::from(grid.width());
    let height = i64::from(grid.height());
    let mut out = Vec::new();

    for x in 0..width {
        let interior_column = x != 0 && x != width - 1;
        if interior_column {
            // Only the top and bottom cells of an interior column are border.
            out.extend(classify(x, 0, grid, path));
            if height > 1 {
                out.extend(classify(x, height - 1, grid, path));
            }
        } else {
            for y in 0..height {
                out.extend(classify(x, y, grid, path));
            }
        }
    }
    out
}

/// Significant border tiles on one side of the grid.
#[must_use]
pub fn on_side(grid: &Grid, path: Tile, side: Direction) -> Vec<BorderTile> {
    classify_all(grid, path)
        .into_iter()
        .filter(|tile| tile.direction == side)
        .collect()
}
