//! STL export of tessellated blades

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use blade_cad::TessellatedMesh;

/// Length unit written to STL files; the model is in meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportUnit {
    /// No scaling
    Meters,
    /// Scale by 1000
    #[default]
    Millimeters,
}

impl ExportUnit {
    pub fn scale_factor(&self) -> f32 {
        match self {
            ExportUnit::Meters => 1.0,
            ExportUnit::Millimeters => 1000.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportUnit::Meters => "Meters",
            ExportUnit::Millimeters => "Millimeters",
        }
    }
}

/// Convert a mesh to STL triangles with per-face normals
pub fn mesh_triangles(mesh: &TessellatedMesh, unit: ExportUnit) -> Vec<stl_io::Triangle> {
    let scale = unit.scale_factor();
    mesh.triangles()
        .map(|[a, b, c]| {
            let (v0, v1, v2) = (
                Vec3::from(a) * scale,
                Vec3::from(b) * scale,
                Vec3::from(c) * scale,
            );
            let normal = (v1 - v0).cross(v2 - v0).try_normalize().unwrap_or(Vec3::Z);
            stl_io::Triangle {
                normal: stl_io::Normal::new(normal.to_array()),
                vertices: [
                    stl_io::Vertex::new(v0.to_array()),
                    stl_io::Vertex::new(v1.to_array()),
                    stl_io::Vertex::new(v2.to_array()),
                ],
            }
        })
        .collect()
}

/// Write a binary STL to any writer
pub fn write_stl<W: Write>(
    writer: &mut W,
    mesh: &TessellatedMesh,
    unit: ExportUnit,
) -> Result<(), StlError> {
    if mesh.triangle_count() == 0 {
        return Err(StlError::EmptyMesh);
    }
    let triangles = mesh_triangles(mesh, unit);
    stl_io::write_stl(writer, triangles.iter()).map_err(|e| StlError::Write(e.to_string()))
}

/// Save a mesh as a binary STL file
pub fn save_stl(
    mesh: &TessellatedMesh,
    path: impl AsRef<Path>,
    unit: ExportUnit,
) -> Result<(), StlError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StlError::Io(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    write_stl(&mut writer, mesh, unit)?;
    writer.flush().map_err(|e| StlError::Io(e.to_string()))?;

    tracing::info!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        unit = unit.name(),
        "saved STL"
    );
    Ok(())
}

/// Load an STL file, converting from `unit` back to model meters
///
/// Vertex normals are the normalized sum of the adjacent face normals.
pub fn load_stl(path: impl AsRef<Path>, unit: ExportUnit) -> Result<TessellatedMesh, StlError> {
    let file = File::open(path.as_ref()).map_err(|e| StlError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let stl = stl_io::read_stl(&mut reader).map_err(|e| StlError::Parse(e.to_string()))?;

    let scale = 1.0 / unit.scale_factor();
    let vertices: Vec<[f32; 3]> = stl
        .vertices
        .iter()
        .map(|v| [v[0] * scale, v[1] * scale, v[2] * scale])
        .collect();

    let mut normals = vec![Vec3::ZERO; vertices.len()];
    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    for face in &stl.faces {
        let normal = Vec3::new(face.normal[0], face.normal[1], face.normal[2]);
        for &index in &face.vertices {
            normals[index] += normal;
            indices.push(index as u32);
        }
    }

    Ok(TessellatedMesh {
        vertices,
        normals: normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z).to_array())
            .collect(),
        indices,
    })
}

/// STL-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StlError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Mesh has no triangles")]
    EmptyMesh,
}
