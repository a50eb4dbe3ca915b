//! Movement input: held keys to a single step direction.
//!
//! Up is north (`+y`). When several movement keys are held, vertical keys
//! win over horizontal ones: up, then down, then left, then right.

use corridor_common::Direction;
use serde::{Deserialize, Serialize};

/// Keys the actor responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
}

impl KeyCode {
    /// Movement direction bound to this key.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::W | Self::ArrowUp => Direction::North,
            Self::S | Self::ArrowDown => Direction::South,
            Self::A | Self::ArrowLeft => Direction::West,
            Self::D | Self::ArrowRight => Direction::East,
        }
    }

    /// Parses a script character (`w`, `a`, `s`, `d`, case-insensitive).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::W),
            'a' => Some(Self::A),
            's' => Some(Self::S),
            'd' => Some(Self::D),
            _ => None,
        }
    }
}

/// Which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl MovementKeys {
    /// Creates a state with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press.
    pub fn press(&mut self, key: KeyCode) {
        self.set(key, true);
    }

    /// Records a key release.
    pub fn release(&mut self, key: KeyCode) {
        self.set(key, false);
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn set(&mut self, key: KeyCode, held: bool) {
        match key.direction() {
            Direction::North => self.up = held,
            Direction::South => self.down = held,
            Direction::West => self.left = held,
            Direction::East => self.right = held,
        }
    }

    /// The single step to take this tick, if any.
    #[must_use]
    pub const fn intent(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::North)
        } else if self.down {
            Some(Direction::South)
        } else if self.left {
            Some(Direction::West)
        } else if self.right {
            Some(Direction::East)
        } else {
            None
        }
    }
}
