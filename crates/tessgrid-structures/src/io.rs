//! Loading reference meshes and point clouds from disk.
//!
//! Wavefront OBJ goes through `tobj`, PLY through `ply-rs`. Only positions
//! and triangle connectivity are read; polygons with more than three
//! corners are fan-triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use glam::Vec3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use tessgrid_core::{Result, TessError};

use crate::mesh::ReferenceMesh;
use crate::point_cloud::PointCloud;

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads a reference mesh from an OBJ or PLY file, chosen by extension.
pub fn load_reference_mesh(path: impl AsRef<Path>) -> Result<ReferenceMesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("obj") => load_obj(path),
        Some("ply") => load_ply_mesh(path),
        _ => Err(TessError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Loads every model of an OBJ file into a single mesh.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ReferenceMesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &obj_load_options())
        .map_err(|e| TessError::LoadError(format!("{}: {e}", path.display())))?;
    merge_obj_models(file_stem(path), &models)
}

/// Reads an OBJ document from a buffered reader. Material libraries are ignored.
pub fn read_obj<R: BufRead>(name: &str, reader: &mut R) -> Result<ReferenceMesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &obj_load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| TessError::LoadError(format!("{name}: {e}")))?;
    merge_obj_models(name.to_string(), &models)
}

fn merge_obj_models(name: String, models: &[tobj::Model]) -> Result<ReferenceMesh> {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let offset = positions.len() as u32;
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        indices.extend(model.mesh.indices.iter().map(|&i| i + offset));
    }

    log::debug!(
        "read OBJ '{name}': {} models, {} vertices, {} triangles",
        models.len(),
        positions.len(),
        indices.len() / 3
    );
    ReferenceMesh::new(name, positions, indices)
}

/// Loads a triangle mesh from a PLY file.
pub fn load_ply_mesh(path: impl AsRef<Path>) -> Result<ReferenceMesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    read_ply_mesh(&file_stem(path), &mut reader)
}

/// Reads a triangle mesh from a PLY stream.
pub fn read_ply_mesh<R: Read>(name: &str, reader: &mut R) -> Result<ReferenceMesh> {
    let ply = Parser::<DefaultElement>::new().read_ply(reader)?;
    let positions = ply_positions(ply.payload.get("vertex"))?;

    let mut indices = Vec::new();
    for face in ply.payload.get("face").into_iter().flatten() {
        let corners = face
            .get("vertex_indices")
            .or_else(|| face.get("vertex_index"))
            .and_then(list_as_indices)
            .ok_or_else(|| {
                TessError::LoadError(format!("{name}: face without a vertex index list"))
            })?;
        for i in 1..corners.len().saturating_sub(1) {
            indices.extend([corners[0], corners[i], corners[i + 1]]);
        }
    }

    log::debug!(
        "read PLY mesh '{name}': {} vertices, {} triangles",
        positions.len(),
        indices.len() / 3
    );
    ReferenceMesh::new(name, positions, indices)
}

/// Loads a point cloud from the vertex element of a PLY file.
pub fn load_ply_points(path: impl AsRef<Path>) -> Result<PointCloud> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    read_ply_points(&file_stem(path), &mut reader)
}

/// Reads a point cloud from a PLY stream. Faces, if any, are ignored.
pub fn read_ply_points<R: Read>(name: &str, reader: &mut R) -> Result<PointCloud> {
    let ply = Parser::<DefaultElement>::new().read_ply(reader)?;
    let positions = ply_positions(ply.payload.get("vertex"))?;
    log::debug!("read PLY point cloud '{name}': {} points", positions.len());
    Ok(PointCloud::new(name, positions))
}

fn ply_positions(vertices: Option<&Vec<DefaultElement>>) -> Result<Vec<Vec3>> {
    let vertices = vertices
        .ok_or_else(|| TessError::LoadError("PLY file has no vertex element".to_string()))?;

    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let coord = |key: &str| {
                v.get(key).and_then(property_as_f32).ok_or_else(|| {
                    TessError::LoadError(format!("vertex {i} has no numeric '{key}' property"))
                })
            };
            Ok(Vec3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect()
}

fn property_as_f32(property: &Property) -> Option<f32> {
    match *property {
        Property::Float(v) => Some(v),
        Property::Double(v) => Some(v as f32),
        Property::Char(v) => Some(f32::from(v)),
        Property::UChar(v) => Some(f32::from(v)),
        Property::Short(v) => Some(f32::from(v)),
        Property::UShort(v) => Some(f32::from(v)),
        Property::Int(v) => Some(v as f32),
        Property::UInt(v) => Some(v as f32),
        _ => None,
    }
}

fn list_as_indices(property: &Property) -> Option<Vec<u32>> {
    match property {
        Property::ListUChar(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListChar(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListShort(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListInt(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        _ => None,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLY_POINTS: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property float nx
property float ny
property float nz
end_header
0.5 1.0 1.5 0 0 1
2 0 0 0 0 1
0.25 0.25 4 0 0 1
";

    const PLY_MESH: &str = "ply
format ascii 1.0
element vertex 4
property double x
property double y
property double z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";

    const OBJ_TWO_OBJECTS: &str = "o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 4 5 6 7
";

    #[test]
    fn test_read_ply_points() {
        let cloud = read_ply_points("samples", &mut PLY_POINTS.as_bytes()).unwrap();
        assert_eq!(cloud.name(), "samples");
        assert_eq!(
            cloud.points(),
            &[
                Vec3::new(0.5, 1.0, 1.5),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.25, 0.25, 4.0)
            ]
        );
    }

    #[test]
    fn test_read_ply_mesh_fan_triangulates() {
        let mesh = read_ply_mesh("quad", &mut PLY_MESH.as_bytes()).unwrap();
        assert_eq!(mesh.positions().len(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_read_ply_without_vertices() {
        let ply = "ply\nformat ascii 1.0\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n";
        assert!(matches!(
            read_ply_points("empty", &mut ply.as_bytes()),
            Err(TessError::LoadError(_))
        ));
    }

    #[test]
    fn test_read_obj_merges_models() {
        let mesh = read_obj("pair", &mut OBJ_TWO_OBJECTS.as_bytes()).unwrap();
        assert_eq!(mesh.positions().len(), 7);
        assert_eq!(mesh.num_triangles(), 3);
        // Second object's indices are offset past the first object's vertices
        assert!(mesh.indices()[3..].iter().all(|&i| i >= 3));
        let (_, last) = mesh.triangles().last().unwrap();
        assert!(last.iter().all(|v| (v.z - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_reference_mesh("model.stl"),
            Err(TessError::UnsupportedFormat(_))
        ));
    }
}
