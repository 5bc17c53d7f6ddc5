//! Core value types for tessgrid.
//!
//! This crate provides the building blocks shared by the grid and the
//! displacement pipeline:
//! - [`Volume`] extents for grid domains and resolutions
//! - [`Point`] and [`GridPolygon`] primitives stored in grid cells
//! - The [`surface`] module: plane distance, projection and displacement
//! - [`PipelineOptions`] configuration and the [`TessError`] error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return plain values which don't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod options;
pub mod primitives;
pub mod surface;
pub mod volume;

pub use error::{Result, TessError};
pub use options::{FailurePolicy, Locality, PipelineOptions};
pub use primitives::{GridPolygon, Point};
pub use surface::PlaneQuery;
pub use volume::{Dimension, Volume};

// Re-export glam types for convenience
pub use glam::{UVec3, Vec3};
