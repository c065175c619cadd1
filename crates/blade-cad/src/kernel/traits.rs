//! CAD Kernel trait definitions
//!
//! These traits define the interface that every geometry kernel must implement.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Loft failed: {0}")]
    LoftFailed(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    /// Create a bounding box from its corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |bbox, p| Self {
            min: bbox.min.min(p),
            max: bbox.max.max(p),
        }))
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check whether two boxes overlap (touching counts), with a tolerance
    pub fn intersects(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }

    /// Get the center of the box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extent of the box along each axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }
}

/// A tessellated mesh output from the CAD kernel
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Bounding box of the vertices
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.vertices
                .iter()
                .map(|v| DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64)),
        )
    }
}

/// A polygonal wire in 3D space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    /// Unique identifier
    pub id: Uuid,
    /// Points defining the wire (in order, without a repeated closing point)
    pub points: Vec<DVec3>,
    /// Whether the last point connects back to the first
    pub closed: bool,
}

impl Wire {
    /// Create a new wire from points
    pub fn new(points: Vec<DVec3>, closed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            closed,
        }
    }

    /// Number of distinct vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the wire has no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average of the vertices
    pub fn centroid(&self) -> DVec3 {
        if self.points.is_empty() {
            return DVec3::ZERO;
        }
        self.points.iter().copied().sum::<DVec3>() / self.points.len() as f64
    }

    /// Area vector of the polygon (Newell's method)
    ///
    /// Its direction is the polygon normal following the right-hand rule on
    /// the vertex order; its length is the enclosed area.
    pub fn area_vector(&self) -> DVec3 {
        let c = self.centroid();
        let n = self.points.len();
        let mut sum = DVec3::ZERO;
        for i in 0..n {
            let a = self.points[i] - c;
            let b = self.points[(i + 1) % n] - c;
            sum += a.cross(b);
        }
        sum * 0.5
    }

    /// Total length of the polyline (including the closing segment)
    pub fn length(&self) -> f64 {
        let segments = self.points.windows(2).map(|w| w[0].distance(w[1])).sum::<f64>();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => segments + first.distance(*last),
            _ => segments,
        }
    }
}

/// A 3D solid body
///
/// A handle only: the geometry lives in the kernel that created it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// The main CAD kernel trait
///
/// Implementations of this trait provide the actual geometry operations.
/// Solids are handles; the geometry lives inside the kernel that created them.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Build a polygon wire through an ordered point sequence
    ///
    /// A last point equal to the first closes the wire. Consecutive
    /// duplicates are dropped.
    ///
    /// # Errors
    /// `InvalidProfile` when fewer than 3 distinct points remain.
    fn make_polygon(&self, points: &[DVec3]) -> CadResult<Wire>;

    /// Create a cylinder along +Z with its base centered at `origin`
    fn make_cylinder(&self, radius: f64, height: f64, origin: DVec3) -> CadResult<Solid>;

    /// Loft between multiple wires
    ///
    /// # Arguments
    /// * `wires` - Sections in traversal order
    /// * `solid` - Whether to cap the ends into a closed solid
    /// * `ruled` - Straight rulings between sections instead of a smooth
    ///   interpolation through all of them
    fn loft(&self, wires: &[Wire], solid: bool, ruled: bool) -> CadResult<Solid>;

    /// Boolean union of two solids
    fn fuse(&self, a: &Solid, b: &Solid) -> CadResult<Solid>;

    /// Tessellate a solid into triangles
    ///
    /// # Arguments
    /// * `solid` - The solid to tessellate
    /// * `tolerance` - Maximum deviation from the ideal surface (lower = more triangles)
    fn tessellate(&self, solid: &Solid, tolerance: f64) -> CadResult<TessellatedMesh>;

    /// Axis-aligned bounds of a solid
    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox>;

    /// Drop the kernel data behind a solid
    ///
    /// Solids built from it stay valid. Releasing an unknown solid is a no-op.
    fn release(&self, solid: &Solid);
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>() -> CadResult<T> {
        Err(CadError::KernelNotAvailable("No CAD kernel available".into()))
    }
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn make_polygon(&self, _points: &[DVec3]) -> CadResult<Wire> {
        Self::unavailable()
    }

    fn make_cylinder(&self, _radius: f64, _height: f64, _origin: DVec3) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn loft(&self, _wires: &[Wire], _solid: bool, _ruled: bool) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn fuse(&self, _a: &Solid, _b: &Solid) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn tessellate(&self, _solid: &Solid, _tolerance: f64) -> CadResult<TessellatedMesh> {
        Self::unavailable()
    }

    fn bounding_box(&self, _solid: &Solid) -> CadResult<BoundingBox> {
        Self::unavailable()
    }

    fn release(&self, _solid: &Solid) {}
}

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(super::MeshKernel::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Wire {
        Wire::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            true,
        )
    }

    #[test]
    fn test_wire_area_vector() {
        let area = unit_square().area_vector();
        assert_relative_eq!(area.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(area.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wire_length_closed() {
        assert_relative_eq!(unit_square().length(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let b = BoundingBox::new(DVec3::splat(0.5), DVec3::splat(2.0));
        let c = BoundingBox::new(DVec3::splat(3.0), DVec3::splat(4.0));
        assert!(a.intersects(&b, 0.0));
        assert!(!a.intersects(&c, 0.0));
        assert_eq!(a.union(&c).max, DVec3::splat(4.0));
    }

    #[test]
    fn test_solid_clone_is_same_handle() {
        let solid = Solid::new(Uuid::new_v4());
        assert_eq!(solid.clone(), solid);
        assert_ne!(Solid::new(Uuid::new_v4()), solid);
    }

    #[test]
    fn test_null_kernel_rejects_everything() {
        let kernel = NullKernel;
        assert!(!kernel.is_available());
        assert!(matches!(
            kernel.make_cylinder(1.0, 1.0, DVec3::ZERO),
            Err(CadError::KernelNotAvailable(_))
        ));
        assert!(kernel.make_polygon(&unit_square().points).is_err());
        kernel.release(&Solid::default());
    }
}
