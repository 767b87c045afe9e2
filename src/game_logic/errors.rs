use crate::game_logic::grid::GridCoord;
use thiserror::Error;
use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum GridhopError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    // Level-related errors
    #[error("Level file not found at path: {path}")]
    LevelFileNotFound { path: PathBuf },

    #[error("Invalid level data: {reason}")]
    InvalidLevelData { reason: String },

    #[error("Level validation failed: {reason}")]
    LevelValidationFailed { reason: String },

    #[error("Conflicting registration at {cell}: {existing} already registered, {incoming} requested")]
    ConflictingRegistration {
        cell: GridCoord,
        existing: String,
        incoming: String,
    },

    // Movement-related errors
    #[error("Invalid teleport target: ({x}, {z}) has no world transform")]
    InvalidTeleportTarget { x: i32, z: i32 },

    #[error("Controller snapshot failed: {reason}")]
    SnapshotFailed { reason: String },
}

/// Result type alias for all operations
pub type GridhopResult<T> = Result<T, GridhopError>;
