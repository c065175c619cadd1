//! Primitive mesh generation and the shared triangle buffer

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use super::TessellatedMesh;

/// Fewest segments used for a cylinder, regardless of tolerance
pub const MIN_CYLINDER_SEGMENTS: u32 = 8;

/// Most segments used for a cylinder, regardless of tolerance
pub const MAX_CYLINDER_SEGMENTS: u32 = 256;

/// Indexed triangles in double precision, before conversion to a `TessellatedMesh`
#[derive(Debug, Clone, Default)]
pub(crate) struct MeshBuffers {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshBuffers {
    /// Append another buffer, offsetting its indices
    pub fn append(&mut self, other: MeshBuffers) {
        let offset = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    /// Add a vertex and return its index
    pub fn push_vertex(&mut self, p: DVec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    /// Add a triangle, reversing it when `flip` is set
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32, flip: bool) {
        if flip {
            self.triangles.push([a, c, b]);
        } else {
            self.triangles.push([a, b, c]);
        }
    }

    /// Convert to single precision with area-weighted vertex normals
    pub fn into_tessellated(self) -> TessellatedMesh {
        let mut normals = vec![DVec3::ZERO; self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // Unnormalized: the cross product length weights by area
            let n = (pb - pa).cross(pc - pa);
            normals[a as usize] += n;
            normals[b as usize] += n;
            normals[c as usize] += n;
        }

        TessellatedMesh {
            vertices: self
                .positions
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            normals: normals
                .into_iter()
                .map(|n| {
                    let n = n.try_normalize().unwrap_or(DVec3::Z);
                    [n.x as f32, n.y as f32, n.z as f32]
                })
                .collect(),
            indices: self.triangles.into_iter().flatten().collect(),
        }
    }
}

/// Number of segments keeping a circle's chordal deviation under `tolerance`
pub(crate) fn cylinder_segments(radius: f64, tolerance: f64) -> u32 {
    if tolerance >= radius {
        return MIN_CYLINDER_SEGMENTS;
    }
    // Sagitta of a chord spanning angle a: r * (1 - cos(a / 2))
    let half_angle = (1.0 - tolerance / radius).acos();
    let segments = (PI / half_angle).ceil() as u32;
    segments.clamp(MIN_CYLINDER_SEGMENTS, MAX_CYLINDER_SEGMENTS)
}

/// Generate a closed cylinder mesh along +Z with its base centered at `origin`
///
/// Rings share vertices with the caps so every edge has exactly two faces.
pub(crate) fn cylinder_mesh(radius: f64, height: f64, origin: DVec3, segments: u32) -> MeshBuffers {
    let s = segments;
    let mut mesh = MeshBuffers::default();

    for ring_z in [0.0, height] {
        for i in 0..s {
            let theta = (i as f64 / s as f64) * TAU;
            mesh.push_vertex(origin + DVec3::new(radius * theta.cos(), radius * theta.sin(), ring_z));
        }
    }
    let bottom_center = mesh.push_vertex(origin);
    let top_center = mesh.push_vertex(origin + DVec3::new(0.0, 0.0, height));

    for i in 0..s {
        let j = (i + 1) % s;
        let (b_i, b_j, t_i, t_j) = (i, j, s + i, s + j);

        // Side
        mesh.push_triangle(b_i, b_j, t_j, false);
        mesh.push_triangle(b_i, t_j, t_i, false);

        // Caps
        mesh.push_triangle(bottom_center, b_j, b_i, false);
        mesh.push_triangle(top_center, t_i, t_j, false);
    }

    mesh
}
