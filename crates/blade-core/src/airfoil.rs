//! NACA 4412 airfoil profile
//!
//! Normalized outline with the leading edge at the origin and the trailing
//! edge at `x = 1`. The upper surface runs from the leading edge to the
//! trailing edge, the lower surface comes back.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AIRFOIL_SAMPLES, NACA_A4_CLOSED, NACA_A4_OPEN, NACA_COEFFICIENTS, NACA_MAX_THICKNESS,
};

/// Trailing edge variant of the thickness formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrailingEdge {
    /// Zero thickness at `t = 1`
    #[default]
    Closed,
    /// Classic coefficient leaving a small gap at `t = 1`
    Open,
}

impl TrailingEdge {
    /// Fourth-order coefficient of the thickness polynomial
    pub fn a4(&self) -> f64 {
        match self {
            TrailingEdge::Closed => NACA_A4_CLOSED,
            TrailingEdge::Open => NACA_A4_OPEN,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrailingEdge::Closed => "Closed",
            TrailingEdge::Open => "Open",
        }
    }
}

/// Half-thickness of the profile at chordwise position `t`
///
/// Defined for `t` in `[0, 1]`; other inputs are not guarded.
pub fn half_thickness(t: f64, trailing_edge: TrailingEdge) -> f64 {
    let [a0, a1, a2, a3] = NACA_COEFFICIENTS;
    let a4 = trailing_edge.a4();
    (NACA_MAX_THICKNESS / 0.2) * (a0 * t.sqrt() + a1 * t + a2 * t * t + a3 * t.powi(3) + a4 * t.powi(4))
}

/// Sampling of the airfoil outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirfoilProfile {
    /// Chordwise samples per surface
    pub samples: usize,
    pub trailing_edge: TrailingEdge,
}

impl Default for AirfoilProfile {
    fn default() -> Self {
        Self {
            samples: DEFAULT_AIRFOIL_SAMPLES,
            trailing_edge: TrailingEdge::default(),
        }
    }
}

impl AirfoilProfile {
    pub fn new(samples: usize, trailing_edge: TrailingEdge) -> Self {
        Self {
            samples,
            trailing_edge,
        }
    }

    /// Outline points without the closing repeat
    ///
    /// The upper pass keeps `t < 1` and the lower pass keeps `t > 0`, so the
    /// trailing edge comes from the lower pass only and the leading edge from
    /// the upper pass only. With `n` samples this yields `2n` points.
    pub fn points(&self) -> Vec<DVec2> {
        let n = self.samples;
        if n == 0 {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(2 * n);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            if t < 1.0 {
                points.push(DVec2::new(t, half_thickness(t, self.trailing_edge)));
            }
        }
        for i in (0..=n).rev() {
            let t = i as f64 / n as f64;
            if t > 0.0 {
                points.push(DVec2::new(t, -half_thickness(t, self.trailing_edge)));
            }
        }
        points
    }

    /// Outline with the first point repeated at the end
    pub fn closed_loop(&self) -> Vec<DVec2> {
        let mut points = self.points();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        points
    }
}
