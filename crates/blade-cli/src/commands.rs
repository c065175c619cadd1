//! Command implementations

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use blade_cad::CadContext;
use blade_core::{
    BladeProject, ExportOptions, ExportedFiles, StationMeasurements, create_blade, export_blade,
};

use crate::CliError;
use crate::args::{BuildArgs, InitArgs};

/// Create a project file from design inputs
pub fn init(args: &InitArgs) -> Result<BladeProject, CliError> {
    if args.project.exists() && !args.overwrite {
        return Err(CliError::ProjectExists(args.project.clone()));
    }

    let name = args.name.clone().unwrap_or_else(|| {
        args.project
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Turbine Blade")
            .to_string()
    });

    let (project, design) = BladeProject::from_inputs(name, args.inputs())?;
    project.save(&args.project)?;
    tracing::info!(
        project = %project.name,
        diameter = design.diameter,
        stations = project.stations.len(),
        "project created"
    );
    Ok(project)
}

/// Human readable design summary and station table
pub fn design_report(project: &BladeProject) -> Result<String, CliError> {
    let mut report = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(report, "Project: {}", project.name);

    if let Some(design) = project.design().transpose()? {
        let _ = writeln!(report, "Diameter:        {:.3} m", design.diameter);
        if design.rated_windspeed > 0.0 {
            let _ = writeln!(report, "Rated windspeed: {:.2} m/s", design.rated_windspeed);
        }
        let _ = writeln!(report, "Torque:          {:.3}", design.torque);
        for warning in &design.warnings {
            let _ = writeln!(report, "Warning: {warning}");
        }
    }

    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "{:>3} {:>9} {:>8} {:>9} {:>9} {:>9} {:>9}",
        "#", "radius", "setting", "chord", "width", "drop", "thickness"
    );
    for (index, station) in project.stations.iter().enumerate() {
        let m = StationMeasurements::from(*station);
        let _ = writeln!(
            report,
            "{:>3} {:>9.4} {:>8.2} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
            index + 1,
            m.radius,
            m.setting,
            m.chord,
            m.width,
            m.drop,
            m.thickness
        );
    }
    Ok(report)
}

/// Load a project and print its design report
pub fn design(project_path: &Path) -> Result<(), CliError> {
    let project = BladeProject::load(project_path)?;
    print!("{}", design_report(&project)?);
    Ok(())
}

/// Generate the blade of a project and write its exports
pub fn build(args: &BuildArgs) -> Result<ExportedFiles, CliError> {
    let project = BladeProject::load(&args.project)?;

    let mut ctx = CadContext::default();
    let handle = create_blade(&mut ctx, &project.stations, &project.options)?;
    let mesh = handle.mesh(&ctx)?;

    let document = ctx.active_document()?;
    for object in document.objects() {
        tracing::info!(
            document = %document.name,
            object = %object.name,
            type_name = %object.type_name,
            triangles = object.mesh().map_or(0, |m| m.triangle_count()),
            "document object"
        );
    }
    if let Some(bounds) = document.bounding_box() {
        let size = bounds.size();
        tracing::info!(x = size.x, y = size.y, z = size.z, "blade extents");
    }

    let output_dir = args.out_dir.clone().unwrap_or_else(|| project_dir(&args.project));
    let options = ExportOptions {
        output_dir,
        base_name: project.name.clone(),
        unit: project.export_unit,
        stl: !args.no_stl,
        freecad_macro: !args.no_macro,
        openscad: !args.no_scad,
    };
    let files = export_blade(&project.stations, &project.options, mesh, &options)?;
    for path in files.paths() {
        println!("{}", path.display());
    }
    Ok(files)
}

fn project_dir(project: &Path) -> PathBuf {
    project
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blade_core::{Station, TurbineInputs};

    fn init_args(project: PathBuf) -> InitArgs {
        InitArgs {
            project,
            name: None,
            diameter: None,
            power: Some(500.0),
            rpm: Some(400.0),
            gear_ratio: None,
            tip_speed_ratio: None,
            number_of_blades: None,
            number_of_stations: Some(4),
            overwrite: false,
        }
    }

    #[test]
    fn test_init_writes_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotor.ron");

        let project = init(&init_args(path.clone())).unwrap();
        assert_eq!(project.name, "rotor");
        assert_eq!(BladeProject::load(&path).unwrap(), project);

        // Refuses to clobber without --overwrite
        assert!(matches!(
            init(&init_args(path.clone())),
            Err(CliError::ProjectExists(_))
        ));
        let args = InitArgs {
            overwrite: true,
            ..init_args(path)
        };
        assert!(init(&args).is_ok());
    }

    #[test]
    fn test_design_report() {
        let (project, _) = BladeProject::from_inputs(
            "Rotor",
            TurbineInputs {
                tip_speed_ratio: 16.0,
                ..Default::default()
            },
        )
        .unwrap();
        let report = design_report(&project).unwrap();
        assert!(report.contains("Diameter:        3.000 m"));
        assert!(report.contains("Warning: High tip speed ratio - that's ambitious!"));
        assert!(!report.contains("Rated windspeed"));
        // Header plus one row per station
        assert_eq!(report.lines().filter(|l| l.starts_with(' ')).count(), 11);
    }

    #[test]
    fn test_report_without_inputs() {
        let project =
            BladeProject::with_stations("Manual", vec![Station::new(0.2, 0.3, 20.0, 0.05)]);
        let report = design_report(&project).unwrap();
        assert!(!report.contains("Diameter"));
        assert!(report.contains("  1"));
    }

    #[test]
    fn test_build_writes_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotor.ron");
        let mut project = init(&init_args(path.clone())).unwrap();
        project.options.tessellation_tolerance = 0.01;
        project.save(&path).unwrap();

        let args = BuildArgs {
            project: path,
            out_dir: Some(dir.path().join("out")),
            no_stl: false,
            no_macro: false,
            no_scad: true,
        };
        let files = build(&args).unwrap();
        assert!(files.stl.unwrap().exists());
        assert!(files.freecad_macro.unwrap().exists());
        assert!(files.openscad.is_none());
    }

    #[test]
    fn test_build_reports_invalid_stations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ron");
        BladeProject::new("Empty").save(&path).unwrap();

        let args = BuildArgs {
            project: path,
            out_dir: None,
            no_stl: false,
            no_macro: false,
            no_scad: false,
        };
        assert!(matches!(build(&args), Err(CliError::Blade(_))));
    }

    #[test]
    fn test_project_dir() {
        assert_eq!(project_dir(Path::new("rotor.ron")), PathBuf::from("."));
        assert_eq!(project_dir(Path::new("a/rotor.ron")), PathBuf::from("a"));
    }
}
