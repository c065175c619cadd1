//! Export options

use std::path::PathBuf;

use crate::constants::DEFAULT_OBJECT_NAME;
use crate::stl::ExportUnit;

/// Export options for blade files
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output directory
    pub output_dir: PathBuf,
    /// File name without extension
    pub base_name: String,
    /// Length unit of the STL file
    pub unit: ExportUnit,
    pub stl: bool,
    pub freecad_macro: bool,
    pub openscad: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_name: DEFAULT_OBJECT_NAME.to_string(),
            unit: ExportUnit::default(),
            stl: true,
            freecad_macro: true,
            openscad: true,
        }
    }
}

/// Replace characters that are unsafe in file names
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
