//! Plane geometry of a triangle.
//!
//! Every query treats the triangle as the infinite plane through its first
//! vertex with the raw (un-normalized) normal `n = (v1 - v0) x (v2 - v0)`.
//! The signed distance is measured in units of `n`:
//!
//! ```text
//! d = -dot(n, p - v0) / dot(n, n)
//! ```
//!
//! so `p + d * n` is the foot of `p` on the plane whatever the length of `n`.
//! The sign is negative when `p` lies on the side `n` points to.

use glam::Vec3;

use crate::error::{Result, TessError};
use crate::primitives::GridPolygon;

/// Relative threshold below which `dot(n, n)` is treated as zero.
///
/// Compared against `|v1 - v0|^2 * |v2 - v0|^2`, so coincident vertices are
/// always rejected and collinear vertices are rejected up to rounding.
pub const DEGENERATE_TOLERANCE: f32 = 1e-10;

/// The plane normal and signed distance of a point relative to a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneQuery {
    /// Un-normalized triangle normal.
    pub normal: Vec3,
    /// Signed distance in units of `normal`.
    pub distance: f32,
}

impl PlaneQuery {
    /// Offset that moves the queried point onto the plane.
    pub fn displacement(&self) -> Vec3 {
        self.distance * self.normal
    }

    /// Euclidean distance between the point and the plane.
    pub fn euclidean_distance(&self) -> f32 {
        self.displacement().length()
    }
}

/// Returns the raw cross product of the triangle's edges from vertex 0.
pub fn normal(triangle: &GridPolygon) -> Vec3 {
    let [v0, v1, v2] = *triangle.vertices();
    (v1 - v0).cross(v2 - v0)
}

/// Computes the normal and signed distance together.
///
/// # Errors
///
/// Returns [`TessError::DegenerateTriangle`] if the triangle has no
/// well-defined plane.
pub fn plane_query(triangle: &GridPolygon, point: Vec3) -> Result<PlaneQuery> {
    let [v0, v1, v2] = *triangle.vertices();
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let n = e1.cross(e2);

    let sd = n.dot(n);
    let scale = e1.length_squared() * e2.length_squared();
    if !sd.is_finite() || sd <= DEGENERATE_TOLERANCE * scale {
        return Err(TessError::DegenerateTriangle { id: triangle.id() });
    }

    let sn = -n.dot(point - v0);
    let distance = sn / sd;
    if !distance.is_finite() {
        return Err(TessError::DegenerateTriangle { id: triangle.id() });
    }

    Ok(PlaneQuery {
        normal: n,
        distance,
    })
}

/// Signed distance of `point` to the triangle's plane, in units of the raw normal.
///
/// # Errors
///
/// Returns [`TessError::DegenerateTriangle`] for zero-area triangles.
pub fn signed_distance(triangle: &GridPolygon, point: Vec3) -> Result<f32> {
    plane_query(triangle, point).map(|q| q.distance)
}

/// Orthogonal projection of `point` onto the triangle's (unbounded) plane.
///
/// # Errors
///
/// Returns [`TessError::DegenerateTriangle`] for zero-area triangles.
pub fn projection(triangle: &GridPolygon, point: Vec3) -> Result<Vec3> {
    plane_query(triangle, point).map(|q| point + q.displacement())
}

/// Offset moving `point` onto the triangle's plane (`projection - point`).
///
/// # Errors
///
/// Returns [`TessError::DegenerateTriangle`] for zero-area triangles.
pub fn displacement(triangle: &GridPolygon, point: Vec3) -> Result<Vec3> {
    plane_query(triangle, point).map(|q| q.displacement())
}
