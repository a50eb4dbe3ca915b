//! Tile codes produced by the layout generator.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Kind of a single tile in a generated grid.
///
/// The numeric codes match the generator's output: `0` empty, `1` path,
/// `2` region, `3` region center. Unknown codes read back as [`Tile::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    /// Uninitialized / outside the grid
    #[default]
    Empty = 0,
    /// Walkable corridor
    Path = 1,
    /// Uncarved region background
    Region = 2,
    /// Seed point a region was grown from
    RegionCenter = 3,
}

impl Tile {
    /// Raw tile code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Tile for a raw code.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Path,
            2 => Self::Region,
            3 => Self::RegionCenter,
            _ => Self::Empty,
        }
    }

    /// ASCII glyph used by grid dumps and fixtures.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Path => '.',
            Self::Region => '#',
            Self::RegionCenter => 'O',
        }
    }

    /// Tile for an ASCII glyph; anything unrecognised is empty.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Self {
        match glyph {
            '.' => Self::Path,
            '#' => Self::Region,
            'O' => Self::RegionCenter,
            _ => Self::Empty,
        }
    }
}

/// Raw tile code as stored in a packed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct TileCode(pub u8);

impl From<Tile> for TileCode {
    fn from(tile: Tile) -> Self {
        Self(tile.code())
    }
}

impl From<TileCode> for Tile {
    fn from(code: TileCode) -> Self {
        Self::from_code(code.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for tile in [Tile::Empty, Tile::Path, Tile::Region, Tile::RegionCenter] {
            assert_eq!(Tile::from_code(tile.code()), tile);
            assert_eq!(Tile::from_glyph(tile.glyph()), tile);
            assert_eq!(Tile::from(TileCode::from(tile)), tile);
        }
    }

    #[test]
    fn test_unknown_code_is_empty() {
        assert_eq!(Tile::from_code(42), Tile::Empty);
        assert_eq!(Tile::from_glyph('x'), Tile::Empty);
    }
}
