//! Primitives stored in grid cells.
//!
//! Both carry a caller-assigned id: for points it is the index into the
//! point cloud's vertex buffer, used to write the displacement back; for
//! triangles it is the triangle's index in the mesh.

use std::fmt;

use glam::Vec3;

/// A point with a caller-assigned id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    id: u32,
    position: Vec3,
}

impl Point {
    /// Creates a point.
    pub fn new(id: u32, position: Vec3) -> Self {
        Self { id, position }
    }

    /// Returns the id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Exact component-wise comparison against a position.
    #[allow(clippy::float_cmp)]
    pub fn equals(&self, position: Vec3) -> bool {
        self.position.x == position.x
            && self.position.y == position.y
            && self.position.z == position.z
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{},{},{}}}",
            self.position.x, self.position.y, self.position.z
        )
    }
}

/// A triangle with a caller-assigned id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPolygon {
    id: u32,
    vertices: [Vec3; 3],
}

impl GridPolygon {
    /// Creates a triangle.
    pub fn new(id: u32, vertices: [Vec3; 3]) -> Self {
        Self { id, vertices }
    }

    /// Returns the id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the three vertex positions.
    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    /// Mean of the three vertices. Determines the cell the triangle lives in.
    pub fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_equals() {
        let p = Point::new(3, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.id(), 3);
        assert!(p.equals(Vec3::new(1.0, 2.0, 3.0)));
        assert!(!p.equals(Vec3::new(1.0, 2.0, 3.0001)));
    }

    #[test]
    fn test_point_display() {
        let p = Point::new(0, Vec3::new(1.0, -2.5, 0.0));
        assert_eq!(p.to_string(), "{1,-2.5,0}");
    }

    #[test]
    fn test_centroid() {
        let tri = GridPolygon::new(
            1,
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(0.0, 3.0, 3.0),
            ],
        );
        assert_eq!(tri.id(), 1);
        assert!((tri.centroid() - Vec3::new(1.0, 1.0, 1.0)).length() < 1e-6);
    }
}
