//! Tile colors.

use bytemuck::{Pod, Zeroable};
use corridor_common::Tile;
use serde::{Deserialize, Serialize};

/// Packed `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    /// Light green for ordinary path tiles.
    pub const PATH: Self = Self(0x0090_EE90);
    /// Darker green for highlighted border path tiles.
    pub const PATH_OUTSIDE: Self = Self(0x0022_8B22);
    /// Brown for region tiles.
    pub const REGION: Self = Self(0x008B_4513);
    /// Red for region centers.
    pub const REGION_CENTER: Self = Self(0x00FF_0000);
    /// Light gray for empty tiles.
    pub const EMPTY: Self = Self(0x00F0_F0F0);

    /// Creates a color from `0xRRGGBB`; higher bits are dropped.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Creates a color from channels.
    #[must_use]
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Packed `0xRRGGBB` value.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }

    /// `(r, g, b)` channels.
    #[must_use]
    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Base color of a tile before fog. `highlighted` only affects path tiles.
#[must_use]
pub const fn base_color(tile: Tile, highlighted: bool) -> Color {
    match tile {
        Tile::Path if highlighted => Color::PATH_OUTSIDE,
        Tile::Path => Color::PATH,
        Tile::Region => Color::REGION,
        Tile::RegionCenter => Color::REGION_CENTER,
        Tile::Empty => Color::EMPTY,
    }
}
