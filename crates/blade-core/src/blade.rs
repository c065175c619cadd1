//! Blade generation pipeline
//!
//! Stations become airfoil outlines, outlines become kernel wires, wires are
//! lofted and the loft is fused with a hub cylinder. The fused shape is
//! attached to a fresh document whose view is fitted and set axonometric.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use blade_cad::{
    CadContext, CadError, CadKernel, DEFAULT_TESSELLATION_TOLERANCE, DocumentError, Solid,
    TessellatedMesh, ViewCommand,
};

use crate::airfoil::AirfoilProfile;
use crate::constants::{
    DEFAULT_DOCUMENT_NAME, DEFAULT_HUB_LENGTH, DEFAULT_HUB_RADIUS_RATIO, DEFAULT_OBJECT_NAME,
    PART_FEATURE_TYPE,
};
use crate::section::station_section;
use crate::station::{Station, StationError, validate_stations};

/// Blade generation errors
#[derive(Debug, Clone, Error)]
pub enum BladeError {
    #[error("Invalid stations: {0}")]
    Station(#[from] StationError),

    #[error("Geometry error: {0}")]
    Cad(#[from] CadError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Hub cylinder length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HubLength {
    /// Absolute length in model units
    Fixed(f64),
    /// Fraction of the root station radius
    RootRadiusRatio(f64),
}

/// Hub cylinder sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubOptions {
    /// Hub radius as a fraction of the root station radius
    pub radius_ratio: f64,
    pub length: HubLength,
    /// Center of the hub base
    pub origin: DVec3,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            radius_ratio: DEFAULT_HUB_RADIUS_RATIO,
            length: HubLength::Fixed(DEFAULT_HUB_LENGTH),
            origin: DVec3::ZERO,
        }
    }
}

impl HubOptions {
    /// Compact hub: radius `0.1 r` and length `0.3 r` of the root radius `r`
    pub fn compact() -> Self {
        Self {
            radius_ratio: 0.1,
            length: HubLength::RootRadiusRatio(0.3),
            origin: DVec3::ZERO,
        }
    }

    /// Hub radius and length for a blade whose root station sits at `root_radius`
    pub fn dimensions(&self, root_radius: f64) -> (f64, f64) {
        let length = match self.length {
            HubLength::Fixed(length) => length,
            HubLength::RootRadiusRatio(ratio) => root_radius * ratio,
        };
        (root_radius * self.radius_ratio, length)
    }
}

/// Blade generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeOptions {
    pub profile: AirfoilProfile,
    pub hub: HubOptions,
    /// Cap the loft ends into a solid
    pub solid: bool,
    /// Straight rulings between sections instead of a smooth loft
    pub ruled: bool,
    pub document_name: String,
    pub object_name: String,
    /// Chordal tolerance used when the document is recomputed
    pub tessellation_tolerance: f64,
}

impl Default for BladeOptions {
    fn default() -> Self {
        Self {
            profile: AirfoilProfile::default(),
            hub: HubOptions::default(),
            solid: true,
            ruled: false,
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            tessellation_tolerance: DEFAULT_TESSELLATION_TOLERANCE,
        }
    }
}

impl BladeOptions {
    fn validate(&self) -> Result<(), BladeError> {
        if self.profile.samples < 2 {
            return Err(BladeError::InvalidOptions(format!(
                "airfoil needs at least 2 samples per surface, got {}",
                self.profile.samples
            )));
        }
        if !(self.tessellation_tolerance.is_finite() && self.tessellation_tolerance > 0.0) {
            return Err(BladeError::InvalidOptions(format!(
                "tessellation tolerance must be positive, got {}",
                self.tessellation_tolerance
            )));
        }
        Ok(())
    }
}

/// Closed outline of every station, first point repeated at the end
///
/// Stations are validated first, so each loop is non-degenerate.
pub fn section_loops(
    stations: &[Station],
    profile: &AirfoilProfile,
) -> Result<Vec<Vec<DVec3>>, BladeError> {
    validate_stations(stations)?;
    let outline = profile.closed_loop();
    Ok(stations
        .iter()
        .map(|station| station_section(&outline, station))
        .collect())
}

/// Build the fused blade and hub shape in a kernel
///
/// The loft and hub operands are released once fused, leaving only the
/// returned solid in the kernel.
pub fn build_blade_shape(
    kernel: &dyn CadKernel,
    stations: &[Station],
    options: &BladeOptions,
) -> Result<Solid, BladeError> {
    options.validate()?;
    let loops = section_loops(stations, &options.profile)?;

    let wires = loops
        .iter()
        .map(|points| kernel.make_polygon(points))
        .collect::<Result<Vec<_>, _>>()?;
    let loft = kernel.loft(&wires, options.solid, options.ruled)?;

    // Validated above: stations is non-empty
    let root_radius = stations[0].radius;
    let (hub_radius, hub_length) = options.hub.dimensions(root_radius);
    let hub = match kernel.make_cylinder(hub_radius, hub_length, options.hub.origin) {
        Ok(hub) => hub,
        Err(err) => {
            kernel.release(&loft);
            return Err(err.into());
        }
    };

    let fused = kernel.fuse(&loft, &hub);
    kernel.release(&loft);
    kernel.release(&hub);
    let blade = fused?;
    tracing::debug!(
        kernel = kernel.name(),
        sections = wires.len(),
        hub_radius,
        hub_length,
        "built blade shape"
    );
    Ok(blade)
}

/// Handle on a generated blade
#[derive(Debug, Clone)]
pub struct BladeHandle {
    /// Name of the document holding the blade
    pub document: String,
    /// Document object holding the fused shape
    pub object: Uuid,
    pub shape: Solid,
}

impl BladeHandle {
    /// Tessellation of the blade from the last recompute
    pub fn mesh<'a>(&self, ctx: &'a CadContext) -> Result<&'a TessellatedMesh, BladeError> {
        let document = ctx
            .documents()
            .iter()
            .find(|d| d.name == self.document)
            .ok_or_else(|| DocumentError::DocumentNotFound(self.document.clone()))?;
        document
            .object(self.object)
            .and_then(|o| o.mesh())
            .ok_or(BladeError::Document(DocumentError::ObjectNotFound(
                self.object,
            )))
    }
}

/// Generate a blade into a new document of `ctx`
///
/// The document and its object are created first and become active. Once the
/// shape is built the object is recomputed and the view is fitted and set
/// axonometric. A failing kernel step leaves the document in place with the
/// object still empty.
pub fn create_blade(
    ctx: &mut CadContext,
    stations: &[Station],
    options: &BladeOptions,
) -> Result<BladeHandle, BladeError> {
    options.validate()?;

    let document = ctx.new_document(&options.document_name);
    document.tessellation_tolerance = options.tessellation_tolerance;
    let document_name = document.name.clone();
    let object = document.add_object(PART_FEATURE_TYPE, &options.object_name);

    let shape = build_blade_shape(ctx.kernel(), stations, options)?;
    ctx.active_document_mut()?.set_shape(object, shape.clone())?;

    ctx.recompute()?;
    let document = ctx.active_document_mut()?;
    document.send_view_command(ViewCommand::Fit)?;
    document.view_axonometric();

    tracing::info!(
        document = %document_name,
        stations = stations.len(),
        "blade created"
    );

    Ok(BladeHandle {
        document: document_name,
        object,
        shape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blade_cad::{AXONOMETRIC_DIRECTION, MeshKernel, NullKernel};

    fn stations() -> Vec<Station> {
        vec![
            Station::new(0.15, 0.42, 44.0, 0.07),
            Station::new(0.3, 0.36, 26.0, 0.05),
        ]
    }

    fn loop_area(points: &[DVec3]) -> f64 {
        points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            * 0.5
    }

    #[test]
    fn test_two_stations_give_two_closed_loops() {
        let loops = section_loops(&stations(), &AirfoilProfile::default()).unwrap();
        assert_eq!(loops.len(), 2);
        for (points, station) in loops.iter().zip(stations()) {
            assert_eq!(points.len(), 201);
            assert_eq!(points[0], points[200]);
            assert!(points.iter().all(|p| p.z == station.radius));
            assert!(loop_area(points).abs() > 1e-6);
        }
    }

    #[test]
    fn test_section_loops_validate_stations() {
        let result = section_loops(&[], &AirfoilProfile::default());
        assert!(matches!(result, Err(BladeError::Station(StationError::Empty))));
    }

    #[test]
    fn test_hub_dimensions() {
        assert_eq!(HubOptions::default().dimensions(0.5), (0.1, 100.0));
        let (radius, length) = HubOptions::compact().dimensions(0.5);
        assert!((radius - 0.05).abs() < 1e-12);
        assert!((length - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_build_blade_shape() {
        let kernel = MeshKernel::new();
        let shape = build_blade_shape(&kernel, &stations(), &BladeOptions::default()).unwrap();
        let bounds = kernel.bounding_box(&shape).unwrap();
        assert!(bounds.min.z <= 0.0);
        assert!((bounds.max.z - DEFAULT_HUB_LENGTH).abs() < 1e-9);
    }

    #[test]
    fn test_compact_hub_does_not_reach_root() {
        // The hub stops at 0.3 r below a root section sitting at z = r
        let kernel = MeshKernel::new();
        let options = BladeOptions {
            hub: HubOptions::compact(),
            ..Default::default()
        };
        let result = build_blade_shape(&kernel, &stations(), &options);
        assert!(matches!(result, Err(BladeError::Cad(CadError::BooleanFailed(_)))));
    }

    #[test]
    fn test_single_station_cannot_loft() {
        let kernel = MeshKernel::new();
        let result = build_blade_shape(&kernel, &stations()[..1], &BladeOptions::default());
        assert!(matches!(result, Err(BladeError::Cad(CadError::LoftFailed(_)))));
    }

    #[test]
    fn test_zero_root_radius_has_no_hub() {
        let kernel = MeshKernel::new();
        let stations = [
            Station::new(0.0, 0.4, 40.0, 0.07),
            Station::new(0.3, 0.3, 20.0, 0.05),
        ];
        let result = build_blade_shape(&kernel, &stations, &BladeOptions::default());
        assert!(matches!(
            result,
            Err(BladeError::Cad(CadError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_invalid_options() {
        let kernel = MeshKernel::new();
        let options = BladeOptions {
            profile: AirfoilProfile::new(1, Default::default()),
            ..Default::default()
        };
        assert!(matches!(
            build_blade_shape(&kernel, &stations(), &options),
            Err(BladeError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_null_kernel_propagates() {
        let mut ctx = CadContext::new(Box::new(NullKernel));
        let result = create_blade(&mut ctx, &stations(), &BladeOptions::default());
        assert!(matches!(
            result,
            Err(BladeError::Cad(CadError::KernelNotAvailable(_)))
        ));

        // The document and its object exist before the kernel is called
        let document = ctx.active_document().unwrap();
        assert_eq!(document.name, "TurbineBlade");
        let object = document.find_object("TurbineBlade").unwrap();
        assert!(object.shape.is_none());
        assert!(object.mesh().is_none());
    }

    #[test]
    fn test_invalid_options_create_no_document() {
        let mut ctx = CadContext::default();
        let options = BladeOptions {
            tessellation_tolerance: 0.0,
            ..Default::default()
        };
        let result = create_blade(&mut ctx, &stations(), &options);
        assert!(matches!(result, Err(BladeError::InvalidOptions(_))));
        assert!(ctx.documents().is_empty());
    }

    #[test]
    fn test_build_releases_intermediate_shapes() {
        let kernel = MeshKernel::new();
        build_blade_shape(&kernel, &stations(), &BladeOptions::default()).unwrap();
        assert_eq!(kernel.shape_count(), 1);

        // A rejected fuse leaves nothing behind
        let options = BladeOptions {
            hub: HubOptions::compact(),
            ..Default::default()
        };
        assert!(build_blade_shape(&kernel, &stations(), &options).is_err());
        assert_eq!(kernel.shape_count(), 1);
    }

    #[test]
    fn test_create_blade() {
        let mut ctx = CadContext::default();
        let options = BladeOptions {
            tessellation_tolerance: 0.01,
            ..Default::default()
        };
        let handle = create_blade(&mut ctx, &stations(), &options).unwrap();

        let document = ctx.active_document().unwrap();
        assert_eq!(document.name, "TurbineBlade");
        let object = document.find_object("TurbineBlade").unwrap();
        assert_eq!(object.id, handle.object);
        assert_eq!(object.type_name, "Part::Feature");
        assert!(!object.is_touched());

        let mesh = handle.mesh(&ctx).unwrap();
        assert!(mesh.triangle_count() > 0);

        let camera = document.view().camera();
        let expected = AXONOMETRIC_DIRECTION.normalize();
        assert!(camera.eye_direction.distance(expected) < 1e-12);
        let bounds = document.bounding_box().unwrap();
        assert!(camera.target.distance(bounds.center()) < 1e-12);
    }

    #[test]
    fn test_second_blade_gets_new_document() {
        let mut ctx = CadContext::default();
        let options = BladeOptions {
            tessellation_tolerance: 0.01,
            ..Default::default()
        };
        create_blade(&mut ctx, &stations(), &options).unwrap();
        let second = create_blade(&mut ctx, &stations(), &options).unwrap();
        assert_eq!(second.document, "TurbineBlade1");
        assert_eq!(ctx.documents().len(), 2);
    }
}
