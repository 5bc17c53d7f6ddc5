//! tessgrid: spatial grid and plane-displacement engine.
//!
//! Given a reference triangle mesh and a point cloud, tessgrid buckets both
//! into a uniform [`SpatialGrid`] and computes, for every point, the vector
//! that moves it onto the plane of a nearby triangle. The resulting
//! [`DisplacementBuffer`] is laid out for upload as a vertex attribute of a
//! tessellation/displacement shader.
//!
//! # Quick Start
//!
//! ```no_run
//! use tessgrid::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mesh = ReferenceMesh::new(
//!         "plane",
//!         vec![Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 1.0, 1.0), Vec3::new(1.0, 2.0, 1.0)],
//!         vec![0, 1, 2],
//!     )?;
//!     let cloud = PointCloud::new("samples", vec![Vec3::new(1.2, 1.2, 1.2)]);
//!
//!     let pipeline = DisplacementPipeline::build(
//!         Volume::new(10.0, 10.0, 10.0),
//!         &mesh,
//!         &cloud,
//!         PipelineOptions::default(),
//!     )?;
//!     let (displacements, _report) = pipeline.displacements_for(&cloud)?;
//!     println!("{:?}", displacements.get(0));
//!
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod init;
mod pipeline;

pub use init::init_logging;
pub use pipeline::{DisplacementPipeline, DisplacementReport, InsertionReport};

// Re-export core types
pub use tessgrid_core::{
    error::{Result, TessError},
    options::{FailurePolicy, Locality, PipelineOptions},
    primitives::{GridPolygon, Point},
    surface,
    surface::PlaneQuery,
    volume::{Dimension, Volume},
    UVec3, Vec3,
};

// Re-export structures
pub use tessgrid_structures::{
    io, DisplacementBuffer, GridCell, PointCloud, ReferenceMesh, SpatialGrid,
};
