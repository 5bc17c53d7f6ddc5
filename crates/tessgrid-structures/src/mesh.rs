//! Indexed triangle mesh used as the displacement reference surface.

use glam::{UVec3, Vec3};
use tessgrid_core::{Result, TessError};

use crate::point_cloud::bounding_box;

/// A triangle mesh: a position buffer and a flat index list where every
/// three consecutive indices form a triangle.
///
/// Indices are validated on construction, so every triangle can be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceMesh {
    name: String,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl ReferenceMesh {
    /// Creates a mesh from positions and a flat triangle index list.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::SizeMismatch`] if the index count is not a
    /// multiple of three, and [`TessError::IndexOutOfBounds`] if an index
    /// does not name a position.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(TessError::SizeMismatch {
                expected: indices.len() - indices.len() % 3,
                actual: indices.len(),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(TessError::IndexOutOfBounds {
                index: bad as usize,
                len: positions.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            positions,
            indices,
        })
    }

    /// Creates a mesh from one index triple per face.
    pub fn from_faces(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        faces: &[UVec3],
    ) -> Result<Self> {
        let indices = faces.iter().flat_map(|f| f.to_array()).collect();
        Self::new(name, positions, indices)
    }

    /// Returns the name of this mesh.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the flat index list.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex positions of triangle `index`, or `None` past the end.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let tri = self.indices.get(3 * index..3 * index + 3)?;
        Some([
            self.positions[tri[0] as usize],
            self.positions[tri[1] as usize],
            self.positions[tri[2] as usize],
        ])
    }

    /// Iterates `(triangle id, vertices)` in index-buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = (u32, [Vec3; 3])> + '_ {
        self.indices.chunks_exact(3).enumerate().map(|(i, tri)| {
            (
                i as u32,
                [
                    self.positions[tri[0] as usize],
                    self.positions[tri[1] as usize],
                    self.positions[tri[2] as usize],
                ],
            )
        })
    }

    /// Axis-aligned bounding box of the positions, or `None` if there are none.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        bounding_box(&self.positions)
    }
}
