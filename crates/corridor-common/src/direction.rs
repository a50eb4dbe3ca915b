//! Cardinal directions shared by chunk borders and actor movement.

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
///
/// The world's y axis grows northward: north is `+y`, south is `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards `+y`
    North,
    /// Towards `-y`
    South,
    /// Towards `+x`
    East,
    /// Towards `-x`
    West,
}

impl Direction {
    /// All directions in priority order (north, south, east, west).
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Unit offset `(dx, dy)` for one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// The direction facing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Direction from one lattice cell to another.
    ///
    /// Vertical displacement wins over horizontal; a zero displacement
    /// resolves to west.
    #[must_use]
    pub fn towards(from: (i32, i32), to: (i32, i32)) -> Self {
        if to.1 > from.1 {
            Self::North
        } else if to.1 < from.1 {
            Self::South
        } else if to.0 > from.0 {
            Self::East
        } else {
            Self::West
        }
    }

    /// Lowercase name, as used in logs and config.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_towards() {
        assert_eq!(Direction::towards((0, 0), (0, 1)), Direction::North);
        assert_eq!(Direction::towards((0, 0), (0, -1)), Direction::South);
        assert_eq!(Direction::towards((0, 0), (1, 0)), Direction::East);
        assert_eq!(Direction::towards((0, 0), (-1, 0)), Direction::West);
    }
}
