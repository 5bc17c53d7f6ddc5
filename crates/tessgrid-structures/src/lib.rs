//! Structures for tessgrid.
//!
//! This crate provides the data structures the displacement pipeline works on:
//! - [`SpatialGrid`] and its [`GridCell`]s
//! - [`ReferenceMesh`] triangle meshes
//! - [`PointCloud`] sample sets
//! - [`DisplacementBuffer`] per-vertex outputs
//! - OBJ/PLY loaders in [`io`]

// Grid code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod displacement;
pub mod grid;
pub mod io;
pub mod mesh;
pub mod point_cloud;

pub use displacement::DisplacementBuffer;
pub use grid::{GridCell, SpatialGrid};
pub use mesh::ReferenceMesh;
pub use point_cloud::PointCloud;
