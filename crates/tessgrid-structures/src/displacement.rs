//! Per-vertex displacement buffer.

use glam::Vec3;
use tessgrid_core::{Result, TessError};

use crate::point_cloud::PointCloud;

/// One displacement vector per point-cloud vertex, indexed by point id.
///
/// The layout is tightly packed `[f32; 3]`, ready to upload as a vertex
/// attribute through [`DisplacementBuffer::as_bytes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementBuffer {
    values: Vec<Vec3>,
}

impl DisplacementBuffer {
    /// Creates a zeroed buffer with `len` slots.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![Vec3::ZERO; len],
        }
    }

    /// Creates a zeroed buffer sized to a point cloud.
    pub fn for_point_cloud(cloud: &PointCloud) -> Self {
        Self::new(cloud.num_points())
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the buffer has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the displacement stored for a point id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<Vec3> {
        self.values.get(id as usize).copied()
    }

    /// Stores the displacement for a point id.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::IndexOutOfBounds`] if `id` has no slot.
    pub fn set(&mut self, id: u32, displacement: Vec3) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(id as usize)
            .ok_or(TessError::IndexOutOfBounds {
                index: id as usize,
                len,
            })?;
        *slot = displacement;
        Ok(())
    }

    /// Returns all displacements in id order.
    #[must_use]
    pub fn values(&self) -> &[Vec3] {
        &self.values
    }

    /// Raw bytes for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }

    /// Zeroes every slot.
    pub fn reset(&mut self) {
        self.values.fill(Vec3::ZERO);
    }

    /// Returns `positions[i] + displacement[i]` for every point.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::SizeMismatch`] if the lengths differ.
    pub fn apply(&self, positions: &[Vec3]) -> Result<Vec<Vec3>> {
        if positions.len() != self.values.len() {
            return Err(TessError::SizeMismatch {
                expected: self.values.len(),
                actual: positions.len(),
            });
        }
        Ok(positions
            .iter()
            .zip(&self.values)
            .map(|(&p, &d)| p + d)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut buf = DisplacementBuffer::new(3);
        buf.set(2, Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert_eq!(buf.get(2), Some(Vec3::new(0.0, 0.0, -1.0)));
        assert_eq!(buf.get(0), Some(Vec3::ZERO));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut buf = DisplacementBuffer::new(2);
        assert!(matches!(
            buf.set(5, Vec3::ONE),
            Err(TessError::IndexOutOfBounds { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut buf = DisplacementBuffer::new(2);
        buf.set(1, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let bytes = buf.as_bytes();
        assert_eq!(bytes.len(), 2 * 3 * std::mem::size_of::<f32>());
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats, &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_and_reset() {
        let mut buf = DisplacementBuffer::new(2);
        buf.set(0, Vec3::X).unwrap();
        let moved = buf.apply(&[Vec3::ZERO, Vec3::Y]).unwrap();
        assert_eq!(moved, vec![Vec3::X, Vec3::Y]);
        assert!(buf.apply(&[Vec3::ZERO]).is_err());

        buf.reset();
        assert!(buf.values().iter().all(|v| *v == Vec3::ZERO));
    }
}
