//! Error types for tessgrid.

use glam::Vec3;
use thiserror::Error;

use crate::volume::Volume;

/// The main error type for tessgrid operations.
#[derive(Error, Debug)]
pub enum TessError {
    /// The grid domain has a negative or non-finite axis, or is too large to index.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A position lies outside the grid domain.
    #[error("position {position} lies outside the domain {domain}")]
    OutOfDomain { position: Vec3, domain: Volume },

    /// A triangle has (near) zero area, so its plane is undefined.
    #[error("triangle {id} is degenerate (zero-length normal)")]
    DegenerateTriangle { id: u32 },

    /// A cell index is outside the grid.
    #[error("cell index {index} out of range (grid has {count} cells)")]
    CellOutOfRange { index: usize, count: usize },

    /// A vertex index or write-back id is outside its buffer.
    #[error("index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The file extension is not one of the supported geometry formats.
    #[error("unsupported geometry format: {0}")]
    UnsupportedFormat(String),

    /// A geometry file could not be parsed.
    #[error("geometry load error: {0}")]
    LoadError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for tessgrid operations.
pub type Result<T> = std::result::Result<T, TessError>;
