use glam::UVec3;
use tessgrid_core::{GridPolygon, Point};

/// A bucket of the spatial grid.
///
/// Holds copies of the points and triangles whose position (or centroid)
/// falls inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    coordinates: UVec3,
    id: usize,
    points: Vec<Point>,
    polygons: Vec<GridPolygon>,
}

impl GridCell {
    pub(crate) fn new(coordinates: UVec3, id: usize) -> Self {
        Self {
            coordinates,
            id,
            points: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Integer cell coordinates within the grid.
    pub fn coordinates(&self) -> UVec3 {
        self.coordinates
    }

    /// Linear cell id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Points in insertion order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Triangles in insertion order.
    pub fn polygons(&self) -> &[GridPolygon] {
        &self.polygons
    }

    /// A cell is empty when it holds no points, regardless of triangles.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn push_polygon(&mut self, polygon: GridPolygon) {
        self.polygons.push(polygon);
    }
}
