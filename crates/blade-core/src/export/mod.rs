//! Blade export: STL mesh, FreeCAD macro and OpenSCAD source

mod freecad;
mod openscad;
mod options;

use std::path::PathBuf;

use blade_cad::TessellatedMesh;

use crate::blade::BladeOptions;
use crate::station::Station;
use crate::stl::{StlError, save_stl};

pub use freecad::generate_freecad_macro;
pub use openscad::generate_openscad;
pub use options::{ExportOptions, sanitize_filename};

/// Files written by an export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedFiles {
    pub stl: Option<PathBuf>,
    pub freecad_macro: Option<PathBuf>,
    pub openscad: Option<PathBuf>,
}

impl ExportedFiles {
    /// All written paths
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.stl, &self.freecad_macro, &self.openscad]
            .into_iter()
            .flatten()
    }
}

/// Write the enabled exports of a blade to `options.output_dir`
///
/// Files are named `<base_name>.stl`, `<base_name>.FCMacro` and
/// `<base_name>.scad`.
pub fn export_blade(
    stations: &[Station],
    blade_options: &BladeOptions,
    mesh: &TessellatedMesh,
    options: &ExportOptions,
) -> Result<ExportedFiles, ExportError> {
    std::fs::create_dir_all(&options.output_dir).map_err(|e| ExportError::Io(e.to_string()))?;
    let base = sanitize_filename(&options.base_name);
    let mut files = ExportedFiles::default();

    if options.stl {
        let path = options.output_dir.join(format!("{base}.stl"));
        save_stl(mesh, &path, options.unit)?;
        files.stl = Some(path);
    }

    if options.freecad_macro {
        let path = options.output_dir.join(format!("{base}.FCMacro"));
        let script = generate_freecad_macro(stations, blade_options)?;
        std::fs::write(&path, script).map_err(|e| ExportError::Io(e.to_string()))?;
        files.freecad_macro = Some(path);
    }

    if options.openscad {
        let path = options.output_dir.join(format!("{base}.scad"));
        let scad = generate_openscad(stations)?;
        std::fs::write(&path, scad).map_err(|e| ExportError::Io(e.to_string()))?;
        files.openscad = Some(path);
    }

    for path in files.paths() {
        tracing::debug!(path = %path.display(), "exported");
    }
    Ok(files)
}

/// Export-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Mesh export failed: {0}")]
    Stl(#[from] StlError),
}
