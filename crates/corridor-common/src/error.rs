//! Error types for Project Corridor.

use thiserror::Error;

/// Top-level error type for Corridor operations.
#[derive(Debug, Error)]
pub enum CorridorError {
    /// World/chunk errors
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Layout generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Requested grid has a zero dimension
    #[error("Invalid grid size {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Tile buffer does not match the declared size
    #[error("Tile buffer holds {actual} tiles, expected {expected}")]
    SizeMismatch {
        /// Tiles required by the declared size
        expected: usize,
        /// Tiles actually supplied
        actual: usize,
    },

    /// The generator gave up
    #[error("Layout generation failed: {0}")]
    Failed(String),
}

/// World and chunk errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// Chunk dimensions with a zero side
    #[error("Invalid chunk size {width}x{height}")]
    InvalidChunkSize {
        /// Chunk width
        width: u32,
        /// Chunk height
        height: u32,
    },

    /// Generating a chunk failed; the store was left untouched
    #[error("Failed to generate chunk ({x}, {y}): {source}")]
    Generation {
        /// Chunk X coordinate
        x: i32,
        /// Chunk Y coordinate
        y: i32,
        /// Underlying generator error
        #[source]
        source: GenerationError,
    },

    /// A chunk has no tile the actor can stand on
    #[error("No walkable tile to spawn on in chunk ({x}, {y})")]
    NoSpawn {
        /// Chunk X coordinate
        x: i32,
        /// Chunk Y coordinate
        y: i32,
    },

    /// Grid construction failed outside of chunk generation
    #[error("Invalid grid: {0}")]
    Grid(#[from] GenerationError),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Override key is not a known setting
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Override was not in `key=value` form
    #[error("Malformed override '{0}', expected key=value")]
    MalformedOverride(String),
}

/// Result type alias for Corridor operations.
pub type CorridorResult<T> = Result<T, CorridorError>;

/// Result type alias for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
