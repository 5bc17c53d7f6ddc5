//! Point cloud structure.

use glam::Vec3;

/// A set of sample positions to be displaced onto a reference surface.
///
/// A point's index in the cloud is its id in the spatial grid and its slot
/// in the [`DisplacementBuffer`](crate::DisplacementBuffer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    name: String,
    points: Vec<Vec3>,
}

impl PointCloud {
    /// Creates a new point cloud.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Returns the name of this point cloud.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Updates the point positions.
    pub fn update_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
    }

    /// Iterates `(id, position)` pairs in buffer order.
    pub fn indexed_points(&self) -> impl Iterator<Item = (u32, Vec3)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u32, p))
    }

    /// Axis-aligned bounding box, or `None` for an empty cloud.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        bounding_box(&self.points)
    }
}

pub(crate) fn bounding_box(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_points() {
        let pc = PointCloud::new("samples", vec![Vec3::X, Vec3::Y, Vec3::Z]);
        let pairs: Vec<_> = pc.indexed_points().collect();
        assert_eq!(pairs, vec![(0, Vec3::X), (1, Vec3::Y), (2, Vec3::Z)]);
        assert_eq!(pc.name(), "samples");
        assert_eq!(pc.num_points(), 3);
    }

    #[test]
    fn test_bounding_box() {
        let pc = PointCloud::new(
            "pc",
            vec![Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 4.0, 0.5)],
        );
        assert_eq!(
            pc.bounding_box(),
            Some((Vec3::new(-1.0, -2.0, 0.5), Vec3::new(1.0, 4.0, 3.0)))
        );
        assert_eq!(PointCloud::default().bounding_box(), None);
    }
}
