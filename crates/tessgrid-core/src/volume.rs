//! Axis-aligned extents.
//!
//! A [`Volume`] plays two roles: the world-space *domain* a grid covers, and
//! the per-axis cell-count *resolution* derived from it.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Extent along a single axis, from a bounding interval.
///
/// The length is `|min| + |max|`, which equals `max - min` for intervals
/// straddling the origin and measures the distance from the origin otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    min: f32,
    max: f32,
    length: f32,
}

impl Dimension {
    /// Creates a dimension from an interval.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            length: min.abs() + max.abs(),
        }
    }

    /// Returns the lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Returns the upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns the length of the extent.
    pub fn length(&self) -> f32 {
        self.length
    }
}

/// A width/height/depth triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
    width: f32,
    height: f32,
    depth: f32,
}

impl Volume {
    /// Creates a volume from its three extents.
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Creates a volume whose extents are the lengths of per-axis [`Dimension`]s
    /// of the bounding box `min..max`.
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        let x = Dimension::new(min.x, max.x);
        let y = Dimension::new(min.y, max.y);
        let z = Dimension::new(min.z, max.z);
        Self::new(x.length(), y.length(), z.length())
    }

    /// Extent along x.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Extent along y.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Extent along z.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Returns `width * height * depth`.
    pub fn dimension(&self) -> f32 {
        self.width * self.height * self.depth
    }

    /// Returns the extents as a vector (x = width, y = height, z = depth).
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

impl From<Vec3> for Volume {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Volume> for Vec3 {
    fn from(v: Volume) -> Self {
        v.as_vec3()
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_product() {
        let v = Volume::new(2.0, 3.0, 4.0);
        assert_eq!(v.dimension(), 24.0);
        assert_eq!(v.as_vec3(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_dimension_length() {
        let d = Dimension::new(-1.5, 2.0);
        assert_eq!(d.length(), 3.5);
        assert_eq!(d.min(), -1.5);
        assert_eq!(d.max(), 2.0);
    }

    #[test]
    fn test_from_bounds() {
        let v = Volume::from_bounds(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 4.0, 2.0));
        assert_eq!(v, Volume::new(2.0, 4.0, 4.0));
    }

    #[test]
    fn test_vec3_conversion() {
        let v: Volume = Vec3::new(1.0, 2.0, 3.0).into();
        assert_eq!(v.width(), 1.0);
        assert_eq!(v.height(), 2.0);
        assert_eq!(v.depth(), 3.0);
        assert_eq!(Vec3::from(v), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Volume::new(1.0, 2.5, 3.0).to_string(), "1x2.5x3");
    }
}
