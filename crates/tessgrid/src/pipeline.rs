//! Grid population and the per-point displacement pass.

use std::path::Path;

use glam::Vec3;
use tessgrid_core::surface::{self, PlaneQuery};
use tessgrid_core::{
    FailurePolicy, GridPolygon, Locality, PipelineOptions, Result, TessError, Volume,
};
use tessgrid_structures::{io, DisplacementBuffer, PointCloud, ReferenceMesh, SpatialGrid};

/// Counts from one insertion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionReport {
    /// Primitives stored in the grid.
    pub inserted: usize,
    /// Primitives skipped because they fell outside the domain.
    pub skipped_out_of_domain: usize,
}

/// Counts from one displacement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementReport {
    /// Points visited.
    pub points_visited: usize,
    /// Points that received a displacement.
    pub points_displaced: usize,
    /// Point/triangle pairs skipped because the triangle was degenerate.
    pub skipped_degenerate: usize,
}

/// Builds a spatial grid from a reference mesh and a point cloud and
/// computes the displacement moving each point onto a nearby triangle plane.
#[derive(Debug, Clone)]
pub struct DisplacementPipeline {
    grid: SpatialGrid,
    options: PipelineOptions,
}

impl DisplacementPipeline {
    /// Creates a pipeline with an empty grid over `domain`.
    pub fn new(domain: Volume, options: PipelineOptions) -> Result<Self> {
        Ok(Self {
            grid: SpatialGrid::new(domain)?,
            options,
        })
    }

    /// Creates a pipeline and inserts a mesh and a point cloud.
    pub fn build(
        domain: Volume,
        mesh: &ReferenceMesh,
        cloud: &PointCloud,
        options: PipelineOptions,
    ) -> Result<Self> {
        let mut pipeline = Self::new(domain, options)?;
        pipeline.insert_mesh(mesh)?;
        pipeline.insert_point_cloud(cloud)?;
        Ok(pipeline)
    }

    /// Loads a reference mesh (OBJ or PLY) and a PLY point cloud and builds a pipeline.
    pub fn from_files(
        domain: Volume,
        mesh_path: impl AsRef<Path>,
        cloud_path: impl AsRef<Path>,
        options: PipelineOptions,
    ) -> Result<(Self, PointCloud)> {
        let mesh = io::load_reference_mesh(mesh_path)?;
        let cloud = io::load_ply_points(cloud_path)?;
        let pipeline = Self::build(domain, &mesh, &cloud, options)?;
        Ok((pipeline, cloud))
    }

    /// The grid built so far.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// The options in effect.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Discards the grid contents and starts over with a new domain.
    pub fn reset(&mut self, domain: Volume) -> Result<()> {
        self.grid.initialize(domain)
    }

    /// Inserts every triangle of `mesh`, keyed by its triangle index.
    pub fn insert_mesh(&mut self, mesh: &ReferenceMesh) -> Result<InsertionReport> {
        let mut report = InsertionReport::default();
        for (id, vertices) in mesh.triangles() {
            let inserted = self.grid.insert_polygon(id, vertices);
            self.record_insertion(inserted, &mut report, "triangle", id)?;
        }
        log::info!(
            "inserted {} of {} triangles from '{}'",
            report.inserted,
            mesh.num_triangles(),
            mesh.name()
        );
        Ok(report)
    }

    /// Inserts every point of `cloud`, keyed by its vertex index.
    pub fn insert_point_cloud(&mut self, cloud: &PointCloud) -> Result<InsertionReport> {
        let mut report = InsertionReport::default();
        for (id, position) in cloud.indexed_points() {
            let inserted = self.grid.insert_point(id, position);
            self.record_insertion(inserted, &mut report, "point", id)?;
        }
        log::info!(
            "inserted {} of {} points from '{}'",
            report.inserted,
            cloud.num_points(),
            cloud.name()
        );
        Ok(report)
    }

    /// Computes a displacement for every grid point and writes it at the point's id.
    ///
    /// Points without a candidate triangle keep their previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::IndexOutOfBounds`] if a point id has no slot in
    /// `buffer`, or [`TessError::DegenerateTriangle`] under
    /// [`FailurePolicy::Abort`].
    pub fn compute_displacements(
        &self,
        buffer: &mut DisplacementBuffer,
    ) -> Result<DisplacementReport> {
        let mut report = DisplacementReport::default();

        for cell in self.grid.cells() {
            for point in cell.points() {
                report.points_visited += 1;
                let chosen = match self.options.locality {
                    Locality::SameCell => {
                        self.last_in_cell(cell.polygons(), point.position(), &mut report)?
                    }
                    Locality::Neighborhood => {
                        let mut candidates = Vec::new();
                        for neighbor in self.grid.neighborhood(cell.id())? {
                            candidates.extend(self.grid.polygons(neighbor)?);
                        }
                        self.nearest(candidates, point.position(), &mut report)?
                    }
                    Locality::Global => {
                        let candidates = self.grid.cells().flat_map(|c| c.polygons());
                        self.nearest(candidates, point.position(), &mut report)?
                    }
                };
                if let Some(query) = chosen {
                    buffer.set(point.id(), query.displacement())?;
                    report.points_displaced += 1;
                }
            }
        }

        log::info!(
            "displacement pass: {} points visited, {} displaced, {} degenerate pairs skipped",
            report.points_visited,
            report.points_displaced,
            report.skipped_degenerate
        );
        Ok(report)
    }

    /// Runs [`Self::compute_displacements`] into a fresh buffer sized for `cloud`.
    pub fn displacements_for(
        &self,
        cloud: &PointCloud,
    ) -> Result<(DisplacementBuffer, DisplacementReport)> {
        let mut buffer = DisplacementBuffer::for_point_cloud(cloud);
        let report = self.compute_displacements(&mut buffer)?;
        Ok((buffer, report))
    }

    /// Every triangle of the cell is evaluated in order; the last one wins.
    fn last_in_cell(
        &self,
        polygons: &[GridPolygon],
        point: Vec3,
        report: &mut DisplacementReport,
    ) -> Result<Option<PlaneQuery>> {
        let mut chosen = None;
        for polygon in polygons {
            if let Some(query) = self.query(polygon, point, report)? {
                chosen = Some(query);
            }
        }
        Ok(chosen)
    }

    /// Nearest plane among `candidates`; the first one is kept on exact ties.
    fn nearest<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a GridPolygon>,
        point: Vec3,
        report: &mut DisplacementReport,
    ) -> Result<Option<PlaneQuery>> {
        let mut chosen: Option<PlaneQuery> = None;
        for polygon in candidates {
            let Some(query) = self.query(polygon, point, report)? else {
                continue;
            };
            let closer = chosen.map_or(true, |best| {
                query.euclidean_distance() < best.euclidean_distance()
            });
            if closer {
                chosen = Some(query);
            }
        }
        Ok(chosen)
    }

    fn query(
        &self,
        polygon: &GridPolygon,
        point: Vec3,
        report: &mut DisplacementReport,
    ) -> Result<Option<PlaneQuery>> {
        match surface::plane_query(polygon, point) {
            Ok(query) => Ok(Some(query)),
            Err(err @ TessError::DegenerateTriangle { .. }) => {
                if self.options.degenerate_policy == FailurePolicy::Abort {
                    return Err(err);
                }
                log::warn!("skipping triangle: {err}");
                report.skipped_degenerate += 1;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn record_insertion(
        &self,
        inserted: Result<usize>,
        report: &mut InsertionReport,
        kind: &str,
        id: u32,
    ) -> Result<()> {
        match inserted {
            Ok(_) => {
                report.inserted += 1;
                Ok(())
            }
            Err(err @ TessError::OutOfDomain { .. }) => match self.options.out_of_domain_policy {
                FailurePolicy::Abort => Err(err),
                FailurePolicy::Skip => {
                    log::warn!("skipping {kind} {id}: {err}");
                    report.skipped_out_of_domain += 1;
                    Ok(())
                }
            },
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_triangle(z: f32) -> [Vec3; 3] {
        [
            Vec3::new(1.0, 1.0, z),
            Vec3::new(1.1, 1.0, z),
            Vec3::new(1.0, 1.1, z),
        ]
    }

    fn pipeline(options: PipelineOptions) -> DisplacementPipeline {
        DisplacementPipeline::new(Volume::new(2.0, 2.0, 2.0), options).unwrap()
    }

    #[test]
    fn test_same_cell_last_write_wins() {
        let mut p = pipeline(PipelineOptions::default());
        // Both centroids share a cell (cell size 2/16 = 0.125)
        p.grid.insert_polygon(0, flat_triangle(1.0)).unwrap();
        p.grid.insert_polygon(1, flat_triangle(1.1)).unwrap();
        p.grid.insert_point(0, Vec3::new(1.03, 1.03, 1.05)).unwrap();

        let mut buffer = DisplacementBuffer::new(1);
        let report = p.compute_displacements(&mut buffer).unwrap();
        assert_eq!(report.points_displaced, 1);
        // Second triangle (z = 1.1) overwrote the first
        assert!((buffer.get(0).unwrap() - Vec3::new(0.0, 0.0, 0.05)).length() < 1e-5);
    }

    #[test]
    fn test_neighborhood_picks_nearest() {
        let mut p = pipeline(PipelineOptions {
            locality: Locality::Neighborhood,
            ..PipelineOptions::default()
        });
        p.grid.insert_polygon(0, flat_triangle(1.0)).unwrap();
        p.grid.insert_polygon(1, flat_triangle(1.1)).unwrap();
        p.grid.insert_point(0, Vec3::new(1.03, 1.03, 1.02)).unwrap();

        let mut buffer = DisplacementBuffer::new(1);
        p.compute_displacements(&mut buffer).unwrap();
        assert!((buffer.get(0).unwrap() - Vec3::new(0.0, 0.0, -0.02)).length() < 1e-5);
    }

    #[test]
    fn test_neighborhood_reaches_adjacent_cell() {
        let mut p = pipeline(PipelineOptions {
            locality: Locality::Neighborhood,
            ..PipelineOptions::default()
        });
        // Point one cell above the triangle's cell
        p.grid.insert_polygon(0, flat_triangle(1.0)).unwrap();
        p.grid.insert_point(3, Vec3::new(1.03, 1.03, 1.16)).unwrap();

        let mut buffer = DisplacementBuffer::new(4);
        let report = p.compute_displacements(&mut buffer).unwrap();
        assert_eq!(report.points_displaced, 1);
        assert!((buffer.get(3).unwrap() - Vec3::new(0.0, 0.0, -0.16)).length() < 1e-5);

        // The faithful mode finds nothing in the point's own cell
        let same_cell = DisplacementPipeline {
            grid: p.grid.clone(),
            options: PipelineOptions::default(),
        };
        let mut untouched = DisplacementBuffer::new(4);
        let report = same_cell.compute_displacements(&mut untouched).unwrap();
        assert_eq!(report.points_displaced, 0);
        assert_eq!(untouched.get(3), Some(Vec3::ZERO));
    }

    #[test]
    fn test_global_reaches_distant_cell() {
        let mut p = pipeline(PipelineOptions {
            locality: Locality::Global,
            ..PipelineOptions::default()
        });
        p.grid.insert_polygon(0, flat_triangle(1.0)).unwrap();
        p.grid.insert_polygon(1, flat_triangle(0.2)).unwrap();
        p.grid.insert_point(0, Vec3::new(1.9, 1.9, 1.5)).unwrap();

        let mut buffer = DisplacementBuffer::new(1);
        let report = p.compute_displacements(&mut buffer).unwrap();
        assert_eq!(report.points_displaced, 1);
        assert!((buffer.get(0).unwrap() - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_abort_and_skip() {
        let mut p = pipeline(PipelineOptions::default());
        p.grid.insert_polygon(4, [Vec3::splat(1.0); 3]).unwrap();
        p.grid.insert_point(0, Vec3::splat(1.0)).unwrap();

        let mut buffer = DisplacementBuffer::new(1);
        assert!(matches!(
            p.compute_displacements(&mut buffer),
            Err(TessError::DegenerateTriangle { id: 4 })
        ));

        p.options.degenerate_policy = FailurePolicy::Skip;
        let report = p.compute_displacements(&mut buffer).unwrap();
        assert_eq!(report.skipped_degenerate, 1);
        assert_eq!(report.points_displaced, 0);
        assert!(buffer.get(0).unwrap().is_finite());
    }

    #[test]
    fn test_out_of_domain_policy() {
        let cloud = PointCloud::new("pc", vec![Vec3::splat(0.5), Vec3::splat(5.0)]);

        let mut abort = pipeline(PipelineOptions::default());
        assert!(matches!(
            abort.insert_point_cloud(&cloud),
            Err(TessError::OutOfDomain { .. })
        ));

        let mut skip = pipeline(PipelineOptions {
            out_of_domain_policy: FailurePolicy::Skip,
            ..PipelineOptions::default()
        });
        let report = skip.insert_point_cloud(&cloud).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped_out_of_domain, 1);
        assert_eq!(skip.grid().point_count(), 1);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut p = pipeline(PipelineOptions::default());
        p.grid.insert_polygon(0, flat_triangle(1.0)).unwrap();
        p.grid.insert_point(9, Vec3::new(1.03, 1.03, 1.05)).unwrap();
        let mut buffer = DisplacementBuffer::new(2);
        assert!(matches!(
            p.compute_displacements(&mut buffer),
            Err(TessError::IndexOutOfBounds { index: 9, len: 2 })
        ));
    }

    #[test]
    fn test_reset_clears_grid() {
        let mut p = pipeline(PipelineOptions::default());
        p.grid.insert_point(0, Vec3::ONE).unwrap();
        p.reset(Volume::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(p.grid().point_count(), 0);
        assert_eq!(p.grid().domain(), Volume::new(1.0, 1.0, 1.0));
    }
}
