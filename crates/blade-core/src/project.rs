//! Project file serialization

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::blade::BladeOptions;
use crate::constants::PROJECT_VERSION;
use crate::design::{DesignError, TurbineDesign, TurbineInputs, calculate_design};
use crate::station::Station;
use crate::stl::ExportUnit;

/// Project file holding a blade definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeProject {
    /// File format version
    pub version: u32,
    /// Project name, also used for exported file names
    pub name: String,
    /// Design inputs the stations were computed from, if any
    #[serde(default)]
    pub inputs: Option<TurbineInputs>,
    /// Stations in root to tip order
    pub stations: Vec<Station>,
    #[serde(default)]
    pub options: BladeOptions,
    /// Length unit of STL exports
    #[serde(default)]
    pub export_unit: ExportUnit,
}

impl Default for BladeProject {
    fn default() -> Self {
        Self::new("Turbine Blade")
    }
}

impl BladeProject {
    /// Create a project without stations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            inputs: None,
            stations: Vec::new(),
            options: BladeOptions::default(),
            export_unit: ExportUnit::default(),
        }
    }

    /// Create a project with explicit stations
    pub fn with_stations(name: impl Into<String>, stations: Vec<Station>) -> Self {
        Self {
            stations,
            ..Self::new(name)
        }
    }

    /// Create a project whose stations come from a design calculation
    pub fn from_inputs(
        name: impl Into<String>,
        inputs: TurbineInputs,
    ) -> Result<(Self, TurbineDesign), DesignError> {
        let design = calculate_design(&inputs)?;
        let project = Self {
            inputs: Some(inputs),
            stations: design.blade_stations(),
            ..Self::new(name)
        };
        Ok((project, design))
    }

    /// Recalculate the design from the stored inputs
    pub fn design(&self) -> Option<Result<TurbineDesign, DesignError>> {
        self.inputs.as_ref().map(calculate_design)
    }

    /// Save project to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| ProjectError::Io(e.to_string()))?;
        tracing::info!(path = %path.display(), "saved project");
        Ok(())
    }

    /// Serialize project to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProjectError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ProjectError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load project from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| ProjectError::Io(e.to_string()))?;
        Self::load_from_bytes(&content)
    }

    /// Load project from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, ProjectError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        let project: BladeProject =
            ron::from_str(content).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        if project.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }
        Ok(project)
    }
}

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::TrailingEdge;
    use crate::blade::{HubLength, HubOptions};
    use crate::design::Sizing;

    fn generator_inputs() -> TurbineInputs {
        TurbineInputs {
            tip_speed_ratio: 6.0,
            number_of_blades: 3,
            sizing: Sizing::Generator {
                power: 500.0,
                rpm: 400.0,
                gear_ratio: 1.0,
            },
            number_of_stations: 8,
        }
    }

    #[test]
    fn test_from_inputs() {
        let (project, design) = BladeProject::from_inputs("Rotor", generator_inputs()).unwrap();
        assert_eq!(project.stations.len(), 8);
        assert_eq!(project.stations, design.blade_stations());
        assert_eq!(project.design().unwrap().unwrap(), design);
    }

    #[test]
    fn test_round_trip() {
        let (mut project, _) = BladeProject::from_inputs("Rotor", generator_inputs()).unwrap();
        project.options.profile.trailing_edge = TrailingEdge::Open;
        project.options.hub = HubOptions {
            length: HubLength::RootRadiusRatio(0.3),
            ..Default::default()
        };
        project.export_unit = ExportUnit::Meters;

        let bytes = project.to_bytes().unwrap();
        let loaded = BladeProject::load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_save_and_load_file() {
        let project = BladeProject::with_stations(
            "Hand carved",
            vec![
                Station::new(0.2, 0.3, 20.0, 0.05),
                Station::new(0.6, 0.15, 8.0, 0.02),
            ],
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blade.ron");

        project.save(&path).unwrap();
        let loaded = BladeProject::load(&path).unwrap();
        assert_eq!(loaded, project);
        assert!(loaded.design().is_none());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let content = r#"(
            version: 1,
            name: "Minimal",
            stations: [(radius: 0.1, chord: 0.2, setting: 10.0, thickness: 0.05)],
        )"#;
        let project = BladeProject::load_from_bytes(content.as_bytes()).unwrap();
        assert_eq!(project.inputs, None);
        assert_eq!(project.options, BladeOptions::default());
        assert_eq!(project.export_unit, ExportUnit::Millimeters);
    }

    #[test]
    fn test_rejects_future_version() {
        let mut project = BladeProject::new("Future");
        project.version = PROJECT_VERSION + 1;
        let bytes = project.to_bytes().unwrap();
        assert!(matches!(
            BladeProject::load_from_bytes(&bytes),
            Err(ProjectError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            BladeProject::load("/nonexistent/blade.ron"),
            Err(ProjectError::Io(_))
        ));
        assert!(matches!(
            BladeProject::load_from_bytes(b"(version: "),
            Err(ProjectError::Deserialize(_))
        ));
    }
}
