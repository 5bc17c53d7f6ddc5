//! Uniform spatial grid indexing points and triangles.
//!
//! The grid covers a world-space domain `[0, domain]` on each axis. Its
//! resolution is a power of two per axis, `2^(ceil(extent) + 2)`, and cells
//! are addressed by the linear id
//!
//! ```text
//! id = y * (res.width * res.depth) + z * res.width + x
//! ```
//!
//! which every lookup in this module uses. Every id in `[0, cell_count)`
//! names a valid cell; only cells that received a primitive hold storage.

mod cell;

pub use cell::GridCell;

use std::collections::BTreeMap;

use glam::{UVec3, Vec3};
use tessgrid_core::{GridPolygon, Point, Result, TessError, Volume};

/// Exponent cap keeping each axis resolution inside `u32`.
const MAX_AXIS_EXPONENT: f32 = 31.0;

/// A uniform 3D grid of [`GridCell`]s.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    domain: Volume,
    resolution: Volume,
    dims: UVec3,
    cell_count: usize,
    cells: BTreeMap<usize, GridCell>,
}

impl SpatialGrid {
    /// Creates a grid covering `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::InvalidDomain`] if an axis is negative or not
    /// finite, or if the resulting grid is too large to index.
    pub fn new(domain: Volume) -> Result<Self> {
        let mut grid = Self {
            domain: Volume::default(),
            resolution: Volume::default(),
            dims: UVec3::ZERO,
            cell_count: 0,
            cells: BTreeMap::new(),
        };
        grid.initialize(domain)?;
        Ok(grid)
    }

    /// Discards all cells and rebuilds the grid for a new domain.
    ///
    /// On error the grid is left unchanged.
    pub fn initialize(&mut self, domain: Volume) -> Result<()> {
        let dims = UVec3::new(
            axis_resolution(domain.width(), "width")?,
            axis_resolution(domain.height(), "height")?,
            axis_resolution(domain.depth(), "depth")?,
        );
        let cell_count = (dims.x as usize)
            .checked_mul(dims.y as usize)
            .and_then(|n| n.checked_mul(dims.z as usize))
            .ok_or_else(|| {
                TessError::InvalidDomain(format!(
                    "domain {domain} needs {}x{}x{} cells, more than can be indexed",
                    dims.x, dims.y, dims.z
                ))
            })?;

        #[allow(clippy::cast_precision_loss)]
        let resolution = Volume::new(dims.x as f32, dims.y as f32, dims.z as f32);

        self.domain = domain;
        self.resolution = resolution;
        self.dims = dims;
        self.cell_count = cell_count;
        self.cells.clear();

        log::debug!("spatial grid initialized: domain {domain}, resolution {resolution}");
        Ok(())
    }

    /// World-space extent covered by the grid.
    pub fn domain(&self) -> Volume {
        self.domain
    }

    /// Cell count per axis.
    pub fn resolution(&self) -> Volume {
        self.resolution
    }

    /// Total number of cells, `res.width * res.height * res.depth`.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// World-space size of one cell.
    pub fn cell_size(&self) -> Vec3 {
        self.domain.as_vec3() / self.resolution.as_vec3()
    }

    /// Returns the id of the cell containing `position`.
    ///
    /// Coordinates are truncated; a position exactly on the upper domain
    /// boundary falls into the last cell of that axis.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::OutOfDomain`] if any axis lies outside `[0, domain]`.
    pub fn cell_index(&self, position: Vec3) -> Result<usize> {
        let extent = self.domain.as_vec3();
        let inside = position.is_finite()
            && position.cmpge(Vec3::ZERO).all()
            && position.cmple(extent).all();
        if !inside {
            return Err(TessError::OutOfDomain {
                position,
                domain: self.domain,
            });
        }

        let x = axis_coordinate(position.x, extent.x, self.dims.x);
        let y = axis_coordinate(position.y, extent.y, self.dims.y);
        let z = axis_coordinate(position.z, extent.z, self.dims.z);
        Ok(self.linear_index(x, y, z))
    }

    /// Returns the id of the cell at integer coordinates, or `None` outside the grid.
    pub fn cell_index_at(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.dims.x)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.dims.y)?;
        let z = u32::try_from(z).ok().filter(|&z| z < self.dims.z)?;
        Some(self.linear_index(x, y, z))
    }

    /// Returns the integer coordinates of a cell id.
    pub fn cell_coordinates(&self, cell_index: usize) -> Result<UVec3> {
        self.check_index(cell_index)?;
        Ok(self.unchecked_coordinates(cell_index))
    }

    /// Inserts a point into the cell containing `position`.
    ///
    /// Returns the cell id. Points are never deduplicated.
    pub fn insert_point(&mut self, id: u32, position: Vec3) -> Result<usize> {
        let cell_index = self.cell_index(position)?;
        self.cell_entry(cell_index).push_point(Point::new(id, position));
        Ok(cell_index)
    }

    /// Inserts a triangle into the cell containing its centroid.
    ///
    /// Returns the cell id. Triangles are never deduplicated.
    pub fn insert_polygon(&mut self, id: u32, vertices: [Vec3; 3]) -> Result<usize> {
        let polygon = GridPolygon::new(id, vertices);
        let cell_index = self.cell_index(polygon.centroid())?;
        self.cell_entry(cell_index).push_polygon(polygon);
        Ok(cell_index)
    }

    /// Returns the cell's contents, or `None` if nothing was ever inserted into it.
    pub fn cell(&self, cell_index: usize) -> Result<Option<&GridCell>> {
        self.check_index(cell_index)?;
        Ok(self.cells.get(&cell_index))
    }

    /// Points stored in a cell.
    pub fn points(&self, cell_index: usize) -> Result<&[Point]> {
        Ok(self.cell(cell_index)?.map_or(&[][..], GridCell::points))
    }

    /// Triangles stored in a cell.
    pub fn polygons(&self, cell_index: usize) -> Result<&[GridPolygon]> {
        Ok(self.cell(cell_index)?.map_or(&[][..], GridCell::polygons))
    }

    /// Position within the cell's point list of a point exactly at `position`.
    pub fn point_index(&self, cell_index: usize, position: Vec3) -> Result<Option<usize>> {
        Ok(self
            .points(cell_index)?
            .iter()
            .position(|p| p.equals(position)))
    }

    /// Ids of the in-bounds cells among the 27 around `cell_index` (itself
    /// included) that hold at least one point.
    pub fn neighbor_cells(&self, cell_index: usize) -> Result<Vec<usize>> {
        let mut neighbors = self.neighborhood(cell_index)?;
        neighbors.retain(|id| self.cells.get(id).is_some_and(|c| !c.is_empty()));
        Ok(neighbors)
    }

    /// Ids of all in-bounds cells among the 27 around `cell_index`, itself included.
    pub fn neighborhood(&self, cell_index: usize) -> Result<Vec<usize>> {
        let c = self.cell_coordinates(cell_index)?;
        let (cx, cy, cz) = (i64::from(c.x), i64::from(c.y), i64::from(c.z));

        let mut ids = Vec::with_capacity(27);
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    if let Some(id) = self.cell_index_at(cx + dx, cy + dy, cz + dz) {
                        ids.push(id);
                    }
                }
            }
        }
        Ok(ids)
    }

    /// Cells holding at least one primitive, in id order.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    /// Total number of stored points.
    pub fn point_count(&self) -> usize {
        self.cells.values().map(|c| c.points().len()).sum()
    }

    /// Total number of stored triangles.
    pub fn polygon_count(&self) -> usize {
        self.cells.values().map(|c| c.polygons().len()).sum()
    }

    fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        let width = self.dims.x as usize;
        let depth = self.dims.z as usize;
        y as usize * (width * depth) + z as usize * width + x as usize
    }

    fn check_index(&self, cell_index: usize) -> Result<()> {
        if cell_index < self.cell_count {
            Ok(())
        } else {
            Err(TessError::CellOutOfRange {
                index: cell_index,
                count: self.cell_count,
            })
        }
    }

    /// Inverse of [`Self::linear_index`] for an id already known to be in range.
    #[allow(clippy::cast_possible_truncation)]
    fn unchecked_coordinates(&self, cell_index: usize) -> UVec3 {
        let width = self.dims.x as usize;
        let layer = width * self.dims.z as usize;

        let y = cell_index / layer;
        let rest = cell_index % layer;
        let z = rest / width;
        let x = rest % width;

        UVec3::new(x as u32, y as u32, z as u32)
    }

    fn cell_entry(&mut self, cell_index: usize) -> &mut GridCell {
        let coordinates = self.unchecked_coordinates(cell_index);
        self.cells
            .entry(cell_index)
            .or_insert_with(|| GridCell::new(coordinates, cell_index))
    }
}

/// Cell count along one axis: `2^(ceil(extent) + 2)`.
fn axis_resolution(extent: f32, axis: &str) -> Result<u32> {
    if !extent.is_finite() || extent < 0.0 {
        return Err(TessError::InvalidDomain(format!(
            "{axis} must be finite and non-negative, got {extent}"
        )));
    }
    let exponent = extent.ceil() + 2.0;
    if exponent > MAX_AXIS_EXPONENT {
        return Err(TessError::InvalidDomain(format!(
            "{axis} {extent} needs 2^{exponent} cells"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let shift = exponent as u32;
    Ok(1_u32 << shift)
}

/// Truncated cell coordinate of an in-domain value, clamped to the last cell.
fn axis_coordinate(value: f32, extent: f32, cells: u32) -> u32 {
    if extent <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss)]
    let cell_size = extent / cells as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let coordinate = (value / cell_size) as u32;
    coordinate.min(cells - 1)
}
