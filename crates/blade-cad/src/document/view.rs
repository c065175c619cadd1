//! Document view state
//!
//! The camera is kept as data so callers can render it however they like.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::kernel::BoundingBox;

/// Direction from the target toward the eye in the axonometric (isometric) view:
/// front-right-top, with the front looking along +Y
pub const AXONOMETRIC_DIRECTION: DVec3 = DVec3::new(1.0, -1.0, 1.0);

/// Vertical field of view in radians
pub const DEFAULT_FIELD_OF_VIEW: f64 = FRAC_PI_4;

/// Commands accepted by a document view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCommand {
    /// Fit the camera to the document bounds
    Fit,
    /// Isometric orientation
    Axonometric,
    /// Look along +Y
    Front,
    /// Look along -Z
    Top,
    /// Look along -X
    Right,
}

impl ViewCommand {
    /// Parse a host-style command name such as `"ViewFit"` or `"ViewAxo"`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ViewFit" => Some(Self::Fit),
            "ViewAxo" | "ViewAxonometric" | "ViewIsometric" => Some(Self::Axonometric),
            "ViewFront" => Some(Self::Front),
            "ViewTop" => Some(Self::Top),
            "ViewRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Eye direction and up vector of an orientation command
    fn orientation(self) -> Option<(DVec3, DVec3)> {
        match self {
            Self::Fit => None,
            Self::Axonometric => Some((AXONOMETRIC_DIRECTION, DVec3::Z)),
            Self::Front => Some((DVec3::NEG_Y, DVec3::Z)),
            Self::Top => Some((DVec3::Z, DVec3::Y)),
            Self::Right => Some((DVec3::X, DVec3::Z)),
        }
    }
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Point the camera looks at
    pub target: DVec3,
    /// Unit vector from the target toward the eye
    pub eye_direction: DVec3,
    /// Unit up vector, orthogonal to `eye_direction`
    pub up: DVec3,
    /// Distance from the target to the eye
    pub distance: f64,
    /// Vertical field of view in radians
    pub fov_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: DVec3::ZERO,
            eye_direction: DVec3::NEG_Y,
            up: DVec3::Z,
            distance: 10.0,
            fov_y: DEFAULT_FIELD_OF_VIEW,
        }
    }
}

/// View of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    camera: Camera,
}

impl View {
    /// Get the camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Point the camera from `eye_direction` with the given up hint
    ///
    /// Zero-length directions are ignored. The up vector is made orthogonal
    /// to the viewing direction.
    pub fn set_orientation(&mut self, eye_direction: DVec3, up: DVec3) {
        let Some(direction) = eye_direction.try_normalize() else {
            return;
        };
        let up = (up - direction * up.dot(direction))
            .try_normalize()
            .or_else(|| direction.any_orthonormal_vector().try_normalize())
            .unwrap_or(DVec3::Z);
        self.camera.eye_direction = direction;
        self.camera.up = up;
    }

    /// Switch to the axonometric orientation, keeping target and distance
    pub fn view_axonometric(&mut self) {
        self.set_orientation(AXONOMETRIC_DIRECTION, DVec3::Z);
    }

    /// Center on the box and back off until its bounding sphere fits the field of view
    pub fn fit(&mut self, bounds: &BoundingBox) {
        let radius = (bounds.diagonal() * 0.5).max(f64::EPSILON);
        self.camera.target = bounds.center();
        self.camera.distance = radius / (self.camera.fov_y * 0.5).sin();
    }

    /// Apply an orientation command; `Fit` needs bounds and is a no-op without them
    pub(crate) fn apply(&mut self, command: ViewCommand, bounds: Option<&BoundingBox>) {
        match command.orientation() {
            Some((direction, up)) => self.set_orientation(direction, up),
            None => {
                if let Some(bounds) = bounds {
                    self.fit(bounds);
                }
            }
        }
    }
}
