//! Fixed-size tile grid produced by the layout generator.

use corridor_common::{ChunkDims, GenerationError, LocalCoord, Tile, TileCode};

/// An immutable `width x height` grid of tile codes.
///
/// Storage is row-major with `y = 0` as the southern row. A grid is built
/// once by a generator and never mutated afterwards; border classification
/// and fog are read-only overlays on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<TileCode>,
}

impl Grid {
    /// Creates a grid from a row-major tile buffer.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Result<Self, GenerationError> {
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidSize { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if tiles.len() != expected {
            return Err(GenerationError::SizeMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells: tiles.into_iter().map(TileCode::from).collect(),
        })
    }

    /// Creates a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Tile,
    ) -> Result<Self, GenerationError> {
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                tiles.push(f(x, y));
            }
        }
        Self::from_tiles(width, height, tiles)
    }

    /// Creates a grid with every cell set to `tile`.
    pub fn filled(width: u32, height: u32, tile: Tile) -> Result<Self, GenerationError> {
        Self::from_fn(width, height, |_, _| tile)
    }

    /// Parses ASCII rows (`.` path, `#` region, `O` region center, anything
    /// else empty).
    ///
    /// The first row is the northern edge (highest `y`), matching how
    /// [`Grid::render_ascii`] prints. Short rows are padded with empty tiles.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GenerationError> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let parsed: Vec<Vec<Tile>> = rows
            .iter()
            .map(|row| row.chars().map(Tile::from_glyph).collect())
            .collect();

        Self::from_fn(width, height, |x, y| {
            let row = &parsed[(height - 1 - y) as usize];
            row.get(x as usize).copied().unwrap_or(Tile::Empty)
        })
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid size as chunk dimensions.
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        ChunkDims {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether `(x, y)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Whether `(x, y)` lies on the outermost ring of the grid.
    #[must_use]
    pub fn is_border(&self, x: i64, y: i64) -> bool {
        self.contains(x, y)
            && (x == 0
                || y == 0
                || x == i64::from(self.width) - 1
                || y == i64::from(self.height) - 1)
    }

    /// Bounds-checked tile read.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        if !self.contains(x, y) {
            return None;
        }
        let index = LocalCoord::new(x as u32, y as u32).to_index(self.width);
        self.cells.get(index).map(|&code| Tile::from(code))
    }

    /// Tile read that treats out-of-bounds cells as [`Tile::Empty`].
    #[must_use]
    pub fn tile(&self, x: i64, y: i64) -> Tile {
        self.get(x, y).unwrap_or(Tile::Empty)
    }

    /// Tile at a local coordinate.
    #[must_use]
    pub fn tile_at(&self, local: LocalCoord) -> Tile {
        self.tile(i64::from(local.x), i64::from(local.y))
    }

    /// Raw tile codes, row-major.
    #[must_use]
    pub fn codes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        let code = TileCode::from(tile);
        self.cells.iter().filter(|&&c| c == code).count()
    }

    /// ASCII dump, northern row first.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.tile_at(LocalCoord::new(x, y)).glyph());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_orients_north_up() {
        let grid = Grid::from_rows(&["..#", "#O#"]).expect("valid grid");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        // First row is the top (y = 1).
        assert_eq!(grid.tile(0, 1), Tile::Path);
        assert_eq!(grid.tile(2, 1), Tile::Region);
        assert_eq!(grid.tile(1, 0), Tile::RegionCenter);
        assert_eq!(grid.render_ascii(), "..#\n#O#\n");
    }

    #[test]
    fn test_out_of_bounds_reads() {
        let grid = Grid::filled(4, 4, Tile::Path).expect("valid grid");
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.tile(0, 4), Tile::Empty);
        assert_eq!(grid.get(3, 3), Some(Tile::Path));
    }

    #[test]
    fn test_border_detection() {
        let grid = Grid::filled(5, 5, Tile::Region).expect("valid grid");
        assert!(grid.is_border(0, 2));
        assert!(grid.is_border(4, 4));
        assert!(grid.is_border(2, 0));
        assert!(!grid.is_border(2, 2));
        assert!(!grid.is_border(5, 0));
    }

    #[test]
    fn test_size_validation() {
        assert!(matches!(
            Grid::from_tiles(0, 3, Vec::new()),
            Err(GenerationError::InvalidSize { .. })
        ));
        assert!(matches!(
            Grid::from_tiles(2, 2, vec![Tile::Path; 3]),
            Err(GenerationError::SizeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_codes_and_counts() {
        let grid = Grid::from_rows(&[".#", "O "]).expect("valid grid");
        assert_eq!(grid.codes(), &[3, 0, 1, 2]);
        assert_eq!(grid.count(Tile::Path), 1);
        assert_eq!(grid.count(Tile::Empty), 1);
    }
}
