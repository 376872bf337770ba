//! Error types for the raster engine.

use thiserror::Error;

/// Errors that can occur during raster operations.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Invalid buffer dimensions (zero width or height, or a pixel count
    /// that overflows index arithmetic).
    #[error("invalid buffer dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A per-pixel operator produced a non-finite color mid-batch.
    ///
    /// Pixels written before the failing callback remain written; the
    /// batch is not rolled back.
    #[error("operator produced an invalid color at ({x}, {y})")]
    InvalidOperatorResult { x: i32, y: i32 },

    /// Image encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// An underlying I/O operation failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;
