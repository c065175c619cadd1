//! Radial blade stations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One radial cross-section of the blade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Distance from the rotor axis
    pub radius: f64,
    /// Chord length
    pub chord: f64,
    /// Twist angle in degrees
    pub setting: f64,
    /// Thickness scale applied to the airfoil half-thickness
    pub thickness: f64,
}

impl Station {
    pub fn new(radius: f64, chord: f64, setting: f64, thickness: f64) -> Self {
        Self {
            radius,
            chord,
            setting,
            thickness,
        }
    }
}

/// Full set of workshop measurements for a station, as produced by the
/// design calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationMeasurements {
    pub radius: f64,
    /// Blade angle in degrees
    pub setting: f64,
    pub chord: f64,
    /// Width of the blank seen from the front
    pub width: f64,
    /// Depth of the blank seen from the side
    pub drop: f64,
    pub thickness: f64,
}

/// Degrees per radian as rounded in the workshop formulas
pub const WORKSHOP_DEGREES_PER_RADIAN: f64 = 57.0;

impl From<StationMeasurements> for Station {
    fn from(m: StationMeasurements) -> Self {
        Self::new(m.radius, m.chord, m.setting, m.thickness)
    }
}

impl From<Station> for StationMeasurements {
    /// Recover the blank width and drop from the blade angle
    fn from(s: Station) -> Self {
        let angle = s.setting / WORKSHOP_DEGREES_PER_RADIAN;
        Self {
            radius: s.radius,
            setting: s.setting,
            chord: s.chord,
            width: s.chord * angle.cos(),
            drop: s.chord * angle.sin(),
            thickness: s.thickness,
        }
    }
}

/// Station validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationError {
    #[error("No stations given")]
    Empty,

    #[error("Station {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("Station {index}: radius {radius} is negative")]
    NegativeRadius { index: usize, radius: f64 },

    #[error("Station {index}: chord {chord} must be positive")]
    NonPositiveChord { index: usize, chord: f64 },

    #[error("Station {index}: thickness {thickness} must be positive")]
    NonPositiveThickness { index: usize, thickness: f64 },

    #[error("Station {index}: radius {radius} does not increase past {previous}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        radius: f64,
    },
}

/// Check that stations can be lofted: non-empty, finite, positive chord and
/// thickness, non-negative and strictly increasing radius
pub fn validate_stations(stations: &[Station]) -> Result<(), StationError> {
    if stations.is_empty() {
        return Err(StationError::Empty);
    }

    let mut previous: Option<f64> = None;
    for (index, s) in stations.iter().enumerate() {
        for (field, value) in [
            ("radius", s.radius),
            ("chord", s.chord),
            ("setting", s.setting),
            ("thickness", s.thickness),
        ] {
            if !value.is_finite() {
                return Err(StationError::NonFinite { index, field });
            }
        }
        if s.radius < 0.0 {
            return Err(StationError::NegativeRadius {
                index,
                radius: s.radius,
            });
        }
        if s.chord <= 0.0 {
            return Err(StationError::NonPositiveChord {
                index,
                chord: s.chord,
            });
        }
        if s.thickness <= 0.0 {
            return Err(StationError::NonPositiveThickness {
                index,
                thickness: s.thickness,
            });
        }
        match previous {
            Some(previous) if s.radius <= previous => {
                return Err(StationError::NotIncreasing {
                    index,
                    previous,
                    radius: s.radius,
                });
            }
            _ => {}
        }
        previous = Some(s.radius);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_stations() {
        let stations = [
            Station::new(0.15, 0.3, 20.0, 0.05),
            Station::new(0.3, 0.2, 12.0, 0.03),
        ];
        assert_eq!(validate_stations(&stations), Ok(()));
    }

    #[test]
    fn test_empty_stations() {
        assert_eq!(validate_stations(&[]), Err(StationError::Empty));
    }

    #[test]
    fn test_radius_must_increase() {
        let stations = [
            Station::new(0.3, 0.3, 20.0, 0.05),
            Station::new(0.3, 0.2, 12.0, 0.03),
        ];
        assert!(matches!(
            validate_stations(&stations),
            Err(StationError::NotIncreasing { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let nan = [Station::new(0.1, f64::NAN, 0.0, 0.1)];
        assert_eq!(
            validate_stations(&nan),
            Err(StationError::NonFinite {
                index: 0,
                field: "chord"
            })
        );

        let negative = [Station::new(-0.1, 0.2, 0.0, 0.1)];
        assert!(matches!(
            validate_stations(&negative),
            Err(StationError::NegativeRadius { .. })
        ));

        let flat = [Station::new(0.1, 0.2, 0.0, 0.0)];
        assert!(matches!(
            validate_stations(&flat),
            Err(StationError::NonPositiveThickness { .. })
        ));

        let no_chord = [Station::new(0.1, 0.0, 0.0, 0.1)];
        assert!(matches!(
            validate_stations(&no_chord),
            Err(StationError::NonPositiveChord { .. })
        ));
    }

    #[test]
    fn test_measurements_round_trip_through_station() {
        let design = crate::design::calculate_design(&Default::default()).unwrap();
        for m in &design.stations {
            let recovered = StationMeasurements::from(Station::from(*m));
            assert!((recovered.width - m.width).abs() < 1e-12);
            assert!((recovered.drop - m.drop).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_radius_root_is_allowed() {
        let stations = [Station::new(0.0, 0.2, 30.0, 0.1)];
        assert!(validate_stations(&stations).is_ok());
    }
}
