//! Polygonal mesh kernel
//!
//! Pure Rust kernel that keeps shapes as lightweight definitions (primitive
//! parameters, loft sections, compounds) and turns them into triangles on
//! demand. Boolean union produces a compound of the operand shells without
//! trimming the overlap, which is what mesh consumers such as slicers expect.

use std::collections::HashMap;

use glam::DVec3;
use parking_lot::Mutex;
use uuid::Uuid;

use super::loft::{DEFAULT_TENSION, loft_mesh, loft_rings};
use super::primitive::{MeshBuffers, cylinder_mesh, cylinder_segments};
use super::{BoundingBox, CadError, CadKernel, CadResult, Solid, TessellatedMesh, Wire};

/// Points closer than this are treated as the same vertex
const POINT_EPSILON: f64 = 1e-12;

/// Relative tolerance used for bounds of curved shapes
const BOUNDS_RELATIVE_TOLERANCE: f64 = 1e-3;

/// Shape definition stored by the kernel
#[derive(Debug, Clone)]
enum Shape {
    Cylinder {
        radius: f64,
        height: f64,
        origin: DVec3,
    },
    Loft {
        sections: Vec<Vec<DVec3>>,
        closed: bool,
        capped: bool,
        ruled: bool,
        flip: bool,
    },
    Compound(Vec<Shape>),
}

impl Shape {
    fn tessellate(&self, tolerance: f64, tension: f64) -> MeshBuffers {
        match self {
            Shape::Cylinder {
                radius,
                height,
                origin,
            } => cylinder_mesh(*radius, *height, *origin, cylinder_segments(*radius, tolerance)),
            Shape::Loft {
                sections,
                closed,
                capped,
                ruled,
                flip,
            } => {
                let rings = loft_rings(sections, *ruled, tension, tolerance);
                loft_mesh(&rings, *closed, *capped, *flip)
            }
            Shape::Compound(shapes) => {
                let mut mesh = MeshBuffers::default();
                for shape in shapes {
                    mesh.append(shape.tessellate(tolerance, tension));
                }
                mesh
            }
        }
    }

    fn bounding_box(&self, tension: f64) -> Option<BoundingBox> {
        match self {
            Shape::Cylinder {
                radius,
                height,
                origin,
            } => Some(BoundingBox::new(
                *origin - DVec3::new(*radius, *radius, 0.0),
                *origin + DVec3::new(*radius, *radius, *height),
            )),
            Shape::Loft { sections, ruled, .. } => {
                let hull = BoundingBox::from_points(sections.iter().flatten().copied())?;
                if *ruled {
                    return Some(hull);
                }
                // The spline can bulge past the sections
                let tolerance = (hull.diagonal() * BOUNDS_RELATIVE_TOLERANCE).max(POINT_EPSILON);
                let rings = loft_rings(sections, false, tension, tolerance);
                BoundingBox::from_points(rings.into_iter().flatten())
            }
            Shape::Compound(shapes) => shapes
                .iter()
                .filter_map(|s| s.bounding_box(tension))
                .reduce(|a, b| a.union(&b)),
        }
    }

    fn into_parts(self) -> Vec<Shape> {
        match self {
            Shape::Compound(shapes) => shapes,
            other => vec![other],
        }
    }
}

/// Mesh-based CAD kernel
pub struct MeshKernel {
    /// Storage for shape data (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, Shape>>,
    /// Catmull-Rom tension for smooth lofts
    tension: f64,
}

impl MeshKernel {
    /// Create a new mesh kernel
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
            tension: DEFAULT_TENSION,
        }
    }

    /// Override the spline tension used by smooth lofts
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Number of shapes currently stored
    pub fn shape_count(&self) -> usize {
        self.shapes.lock().len()
    }

    /// Store a shape and return a Solid reference
    fn store_shape(&self, shape: Shape) -> Solid {
        let id = Uuid::new_v4();
        self.shapes.lock().insert(id, shape);
        Solid::new(id)
    }

    /// Get a stored shape by ID
    fn get_shape(&self, id: Uuid) -> CadResult<Shape> {
        self.shapes
            .lock()
            .get(&id)
            .cloned()
            .ok_or(CadError::SolidNotFound(id))
    }

    fn shape_bounds(&self, shape: &Shape) -> CadResult<BoundingBox> {
        shape
            .bounding_box(self.tension)
            .ok_or_else(|| CadError::TessellationFailed("Shape has no geometry".into()))
    }
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn make_polygon(&self, points: &[DVec3]) -> CadResult<Wire> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CadError::InvalidParameter(
                "Polygon points must be finite".into(),
            ));
        }

        let mut distinct: Vec<DVec3> = Vec::with_capacity(points.len());
        for &p in points {
            if distinct
                .last()
                .is_none_or(|last: &DVec3| last.distance(p) > POINT_EPSILON)
            {
                distinct.push(p);
            }
        }

        let closed = distinct.len() > 1
            && distinct[0].distance(distinct[distinct.len() - 1]) <= POINT_EPSILON;
        if closed {
            distinct.pop();
        }

        let mut unique: Vec<DVec3> = Vec::with_capacity(distinct.len());
        for &p in &distinct {
            if unique.iter().all(|u| u.distance(p) > POINT_EPSILON) {
                unique.push(p);
            }
        }
        if unique.len() < 3 {
            return Err(CadError::InvalidProfile(format!(
                "Polygon needs at least 3 distinct points, got {}",
                unique.len()
            )));
        }

        Ok(Wire::new(distinct, closed))
    }

    fn make_cylinder(&self, radius: f64, height: f64, origin: DVec3) -> CadResult<Solid> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CadError::InvalidParameter(format!(
                "Cylinder radius must be positive, got {radius}"
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(CadError::InvalidParameter(format!(
                "Cylinder height must be positive, got {height}"
            )));
        }
        if !origin.is_finite() {
            return Err(CadError::InvalidParameter(
                "Cylinder origin must be finite".into(),
            ));
        }

        tracing::debug!(radius, height, "creating cylinder");
        Ok(self.store_shape(Shape::Cylinder {
            radius,
            height,
            origin,
        }))
    }

    fn loft(&self, wires: &[Wire], solid: bool, ruled: bool) -> CadResult<Solid> {
        if wires.len() < 2 {
            return Err(CadError::LoftFailed(format!(
                "Loft requires at least 2 sections, got {}",
                wires.len()
            )));
        }

        let vertex_count = wires[0].len();
        let closed = wires[0].closed;
        for (k, wire) in wires.iter().enumerate() {
            if wire.len() != vertex_count {
                return Err(CadError::LoftFailed(format!(
                    "Section {k} has {} vertices, expected {vertex_count}",
                    wire.len()
                )));
            }
            if wire.closed != closed {
                return Err(CadError::LoftFailed(
                    "Sections mix open and closed wires".into(),
                ));
            }
        }
        if solid && !closed {
            return Err(CadError::LoftFailed(
                "A solid loft requires closed sections".into(),
            ));
        }

        let mut flip = false;
        if closed {
            let areas: Vec<DVec3> = wires.iter().map(Wire::area_vector).collect();
            for (k, (wire, area)) in wires.iter().zip(&areas).enumerate() {
                let scale = wire.length().powi(2).max(POINT_EPSILON);
                if area.length() <= scale * 1e-9 {
                    return Err(CadError::InvalidProfile(format!(
                        "Section {k} encloses no area"
                    )));
                }
            }
            for k in 0..areas.len() - 1 {
                if areas[k].dot(areas[k + 1]) <= 0.0 {
                    return Err(CadError::LoftFailed(format!(
                        "Sections {k} and {} have opposite winding",
                        k + 1
                    )));
                }
            }

            let direction = wires[wires.len() - 1].centroid() - wires[0].centroid();
            if direction.length() <= POINT_EPSILON {
                return Err(CadError::LoftFailed("Sections are coincident".into()));
            }
            flip = areas[0].dot(direction) < 0.0;
        }

        tracing::debug!(
            sections = wires.len(),
            vertices = vertex_count,
            solid,
            ruled,
            "creating loft"
        );

        Ok(self.store_shape(Shape::Loft {
            sections: wires.iter().map(|w| w.points.clone()).collect(),
            closed,
            capped: solid,
            ruled,
            flip,
        }))
    }

    fn fuse(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        let shape_a = self.get_shape(a.id)?;
        let shape_b = self.get_shape(b.id)?;

        let bounds_a = self.shape_bounds(&shape_a)?;
        let bounds_b = self.shape_bounds(&shape_b)?;
        let contact = bounds_a.union(&bounds_b).diagonal() * 1e-9;
        if !bounds_a.intersects(&bounds_b, contact) {
            return Err(CadError::BooleanFailed(
                "Shapes do not touch; their union is not a single solid".into(),
            ));
        }

        let mut parts = shape_a.into_parts();
        parts.extend(shape_b.into_parts());
        tracing::debug!(parts = parts.len(), "fused shapes into compound");

        Ok(self.store_shape(Shape::Compound(parts)))
    }

    fn tessellate(&self, solid: &Solid, tolerance: f64) -> CadResult<TessellatedMesh> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(CadError::InvalidParameter(format!(
                "Tessellation tolerance must be positive, got {tolerance}"
            )));
        }

        let shape = self.get_shape(solid.id)?;
        let mesh = shape.tessellate(tolerance, self.tension).into_tessellated();
        if mesh.is_empty() {
            return Err(CadError::TessellationFailed("Shape has no geometry".into()));
        }
        Ok(mesh)
    }

    fn bounding_box(&self, solid: &Solid) -> CadResult<BoundingBox> {
        let shape = self.get_shape(solid.id)?;
        self.shape_bounds(&shape)
    }

    fn release(&self, solid: &Solid) {
        if self.shapes.lock().remove(&solid.id).is_some() {
            tracing::debug!(id = %solid.id, "released shape");
        }
    }
}
