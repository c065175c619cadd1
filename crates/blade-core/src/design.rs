//! Turbine design calculator
//!
//! Sizes a small wind turbine rotor from either a chosen diameter or the
//! generator it has to drive, then derives the carving measurements of each
//! blade station. Formulas follow Hugh Piggott's workshop method.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::station::{Station, StationMeasurements, WORKSHOP_DEGREES_PER_RADIAN};

/// How the rotor diameter is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sizing {
    /// Fixed rotor diameter
    Diameter(f64),
    /// Diameter matched to a generator
    Generator {
        /// Rated power in watts
        power: f64,
        /// Generator speed at rated power
        rpm: f64,
        /// Generator revolutions per rotor revolution
        gear_ratio: f64,
    },
}

/// Design inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbineInputs {
    pub tip_speed_ratio: f64,
    pub number_of_blades: u32,
    pub sizing: Sizing,
    pub number_of_stations: u32,
}

impl Default for TurbineInputs {
    fn default() -> Self {
        Self {
            tip_speed_ratio: 6.0,
            number_of_blades: 3,
            sizing: Sizing::Diameter(3.0),
            number_of_stations: 10,
        }
    }
}

/// Design checks that do not stop the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignWarning {
    HighTipSpeedRatio,
    TooManyBlades,
    HighTipSpeed,
    ConsiderGearing,
}

impl DesignWarning {
    pub fn message(&self) -> &'static str {
        match self {
            DesignWarning::HighTipSpeedRatio => "High tip speed ratio - that's ambitious!",
            DesignWarning::TooManyBlades => "Too many blades for this tip speed ratio",
            DesignWarning::HighTipSpeed => "High tip speed - beware of erosion",
            DesignWarning::ConsiderGearing => "Consider using gearing to reduce speed",
        }
    }
}

impl fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Design input errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("Invalid {name}: {value} (must be positive and finite)")]
    InvalidInput { name: &'static str, value: f64 },

    #[error("At least one blade is required")]
    NoBlades,

    #[error("At least one station is required")]
    NoStations,
}

/// Result of a design calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineDesign {
    /// Rotor diameter
    pub diameter: f64,
    /// Wind speed at which the rotor reaches the generator speed, 0 when no
    /// speed is known
    pub rated_windspeed: f64,
    pub torque: f64,
    pub stations: Vec<StationMeasurements>,
    pub warnings: Vec<DesignWarning>,
}

impl TurbineDesign {
    /// Stations reduced to what the lofting pipeline needs
    pub fn blade_stations(&self) -> Vec<Station> {
        self.stations.iter().copied().map(Station::from).collect()
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DesignError::InvalidInput { name, value })
    }
}

/// Rotor diameter matched to a generator: `(P * (47 * tsr / rpm)^3)^0.2`
pub fn generator_diameter(power: f64, rotor_rpm: f64, tip_speed_ratio: f64) -> f64 {
    (power * (47.0 * tip_speed_ratio / rotor_rpm).powi(3)).powf(0.2)
}

/// Starting torque figure: `9 * D^3 / 10 / tsr^2`
pub fn rotor_torque(diameter: f64, tip_speed_ratio: f64) -> f64 {
    9.0 * diameter.powi(3) / 10.0 / tip_speed_ratio.powi(2)
}

/// Measurements of station `index` (1-based) out of `count`
pub fn station_measurements(
    diameter: f64,
    tip_speed_ratio: f64,
    blades: u32,
    index: u32,
    count: u32,
) -> StationMeasurements {
    let n = count as f64;
    let i = index as f64;
    let tsr = tip_speed_ratio;

    let k = WORKSHOP_DEGREES_PER_RADIAN;

    let radius = diameter / 2.0 / n * i;
    let flow = (diameter / 3.0 / tsr / radius).atan();
    let chord =
        1.7 * diameter.powi(2) / (blades as f64 * radius * tsr.powi(2)) * flow.cos().powi(2);

    // Blade angle is the flow angle less 3 degrees of angle of attack
    StationMeasurements {
        radius,
        setting: k * flow - 3.0,
        chord,
        width: chord * (flow - 3.0 / k).cos(),
        drop: chord * (flow - 3.0 / k).sin(),
        thickness: chord / (5.0 + i * 3.0 / n),
    }
}

/// Run the design calculation
pub fn calculate_design(inputs: &TurbineInputs) -> Result<TurbineDesign, DesignError> {
    let tsr = positive("tip speed ratio", inputs.tip_speed_ratio)?;
    if inputs.number_of_blades == 0 {
        return Err(DesignError::NoBlades);
    }
    if inputs.number_of_stations == 0 {
        return Err(DesignError::NoStations);
    }

    let mut warnings = Vec::new();
    if tsr > 15.0 {
        warnings.push(DesignWarning::HighTipSpeedRatio);
    }
    if tsr * inputs.number_of_blades as f64 > 24.0 {
        warnings.push(DesignWarning::TooManyBlades);
    }

    let (diameter, rotor_rpm) = match inputs.sizing {
        Sizing::Diameter(diameter) => (positive("diameter", diameter)?, None),
        Sizing::Generator {
            power,
            rpm,
            gear_ratio,
        } => {
            let power = positive("power", power)?;
            let rpm = positive("rpm", rpm)? / positive("gear ratio", gear_ratio)?;
            (generator_diameter(power, rpm, tsr), Some(rpm))
        }
    };

    let mut rated_windspeed = 0.0;
    if let Some(rpm) = rotor_rpm {
        if rpm * diameter > 1800.0 {
            warnings.push(DesignWarning::HighTipSpeed);
        }
        rated_windspeed = rpm * diameter / (20.0 * tsr);
        if rpm * diameter / tsr > 260.0 {
            warnings.push(DesignWarning::ConsiderGearing);
        }
    }

    let count = inputs.number_of_stations;
    let stations = (1..=count)
        .map(|i| station_measurements(diameter, tsr, inputs.number_of_blades, i, count))
        .collect();

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(diameter, rated_windspeed, stations = count, "design calculated");

    Ok(TurbineDesign {
        diameter,
        rated_windspeed,
        torque: rotor_torque(diameter, tsr),
        stations,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_diameter(tsr: f64, blades: u32, diameter: f64) -> TurbineInputs {
        TurbineInputs {
            tip_speed_ratio: tsr,
            number_of_blades: blades,
            sizing: Sizing::Diameter(diameter),
            number_of_stations: 10,
        }
    }

    #[test]
    fn test_generator_diameter() {
        let inputs = TurbineInputs {
            tip_speed_ratio: 6.0,
            number_of_blades: 3,
            sizing: Sizing::Generator {
                power: 500.0,
                rpm: 400.0,
                gear_ratio: 1.0,
            },
            number_of_stations: 10,
        };
        let design = calculate_design(&inputs).unwrap();
        // (500 * (47 * 6 / 400)^3)^0.2 = 175.2^0.2
        assert_relative_eq!(design.diameter, 2.81, epsilon = 0.001);
        assert!(design.rated_windspeed > 0.0);
        assert_relative_eq!(
            design.rated_windspeed,
            400.0 * design.diameter / 120.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_gearing_slows_rotor() {
        let direct = generator_diameter(500.0, 400.0, 6.0);
        let geared = generator_diameter(500.0, 400.0 / 2.0, 6.0);
        assert!(geared > direct);
    }

    #[test]
    fn test_torque() {
        let design = calculate_design(&with_diameter(6.0, 3, 3.0)).unwrap();
        assert_relative_eq!(design.torque, 0.675, epsilon = 1e-12);
        assert_eq!(design.rated_windspeed, 0.0);
    }

    #[test]
    fn test_station_radii_and_taper() {
        let design = calculate_design(&with_diameter(6.0, 3, 3.0)).unwrap();
        assert_eq!(design.stations.len(), 10);
        assert_relative_eq!(design.stations[0].radius, 0.15, epsilon = 1e-12);
        assert_relative_eq!(design.stations[4].radius, 0.75, epsilon = 1e-12);
        assert_relative_eq!(design.stations[9].radius, 1.5, epsilon = 1e-12);

        for pair in design.stations.windows(2) {
            assert!(pair[0].chord > pair[1].chord);
            assert!(pair[0].setting > pair[1].setting);
            assert!(pair[0].thickness / pair[0].chord > pair[1].thickness / pair[1].chord);
        }
    }

    #[test]
    fn test_width_and_drop_follow_chord() {
        let s = station_measurements(3.0, 6.0, 3, 5, 10);
        assert_relative_eq!(s.width.hypot(s.drop), s.chord, epsilon = 1e-12);
    }

    #[test]
    fn test_blade_stations_are_valid() {
        let design = calculate_design(&with_diameter(6.0, 3, 3.0)).unwrap();
        let stations = design.blade_stations();
        assert!(crate::station::validate_stations(&stations).is_ok());
    }

    #[test]
    fn test_warnings() {
        let high_tsr = calculate_design(&with_diameter(16.0, 1, 3.0)).unwrap();
        assert_eq!(high_tsr.warnings, vec![DesignWarning::HighTipSpeedRatio]);
        assert_eq!(
            high_tsr.warnings[0].to_string(),
            "High tip speed ratio - that's ambitious!"
        );

        let crowded = calculate_design(&with_diameter(7.0, 4, 3.0)).unwrap();
        assert_eq!(crowded.warnings, vec![DesignWarning::TooManyBlades]);

        let fast = TurbineInputs {
            sizing: Sizing::Generator {
                power: 5000.0,
                rpm: 1500.0,
                gear_ratio: 1.0,
            },
            ..with_diameter(6.0, 3, 3.0)
        };
        let warnings = calculate_design(&fast).unwrap().warnings;
        assert!(warnings.contains(&DesignWarning::HighTipSpeed));
        assert!(warnings.contains(&DesignWarning::ConsiderGearing));

        let calm = calculate_design(&with_diameter(6.0, 3, 3.0)).unwrap();
        assert!(calm.warnings.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            calculate_design(&with_diameter(0.0, 3, 3.0)),
            Err(DesignError::InvalidInput { .. })
        ));
        assert!(matches!(
            calculate_design(&with_diameter(6.0, 3, f64::NAN)),
            Err(DesignError::InvalidInput { .. })
        ));
        assert_eq!(
            calculate_design(&with_diameter(6.0, 0, 3.0)),
            Err(DesignError::NoBlades)
        );

        let no_stations = TurbineInputs {
            number_of_stations: 0,
            ..Default::default()
        };
        assert_eq!(calculate_design(&no_stations), Err(DesignError::NoStations));

        let no_gear = TurbineInputs {
            sizing: Sizing::Generator {
                power: 500.0,
                rpm: 400.0,
                gear_ratio: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            calculate_design(&no_gear),
            Err(DesignError::InvalidInput {
                name: "gear ratio",
                ..
            })
        ));
    }
}
