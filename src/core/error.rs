//! Error types for terrapaint

use thiserror::Error;

/// Main error type for the crate.
///
/// Only configuration loading, buffer import and editor state transitions can
/// fail. Generation and brush editing never return errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown biome: {0}")]
    UnknownBiome(String),

    #[error("Invalid biome profile '{id}': {reason}")]
    InvalidProfile { id: String, reason: String },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid raster dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid brush: {0}")]
    InvalidBrush(String),

    #[error("Strokes are locked until both terrain surfaces have been refreshed")]
    StrokesLocked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
