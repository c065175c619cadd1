//! OpenSCAD source generation
//!
//! The blade is approximated by hulls of consecutive linearly extruded
//! airfoil stations, in millimeters, with a hub mount at the root.

use crate::airfoil::{AirfoilProfile, TrailingEdge};
use crate::station::{Station, StationMeasurements, validate_stations};

use super::ExportError;

/// Chordwise samples of the polygon used by the `airfoil()` module
const OPENSCAD_AIRFOIL_SAMPLES: usize = 12;

const MM: f64 = 1000.0;

/// Placement of one station, ending with a call to `airfoil()`
fn station_block(station: &StationMeasurements, indent: &str) -> String {
    let mut block = String::new();
    block.push_str(&format!("{indent}translate([{:.3}, 0, 0])\n", station.radius * MM));
    block.push_str(&format!("{indent}rotate([{:.3}, 0, 0])\n", station.setting));
    block.push_str(&format!(
        "{indent}linear_extrude(height={:.3}, center=true)\n",
        station.width * MM
    ));
    block.push_str(&format!(
        "{indent}scale([{:.3}, {:.3}, 1])\n",
        station.chord * MM,
        station.thickness * MM
    ));
    block.push_str(&format!("{indent}translate([-0.5, 0, 0])\n"));
    block.push_str(&format!("{indent}airfoil();\n"));
    block
}

fn airfoil_module() -> String {
    let points = AirfoilProfile::new(OPENSCAD_AIRFOIL_SAMPLES, TrailingEdge::Closed).closed_loop();
    let rows: Vec<String> = points
        .iter()
        .map(|p| format!("        [{:.4}, {:.4}]", p.x, p.y))
        .collect();

    let mut module = String::new();
    module.push_str("// NACA airfoil outline, normalized to unit chord\n");
    module.push_str("module airfoil() {\n");
    module.push_str("    polygon(points=[\n");
    module.push_str(&rows.join(",\n"));
    module.push_str("\n    ]);\n}\n\n");
    module
}

/// Generate OpenSCAD source for one blade
///
/// The blade runs from the rotor axis to the tip station.
pub fn generate_openscad(stations: &[Station]) -> Result<String, ExportError> {
    validate_stations(stations).map_err(|e| ExportError::Validation(e.to_string()))?;
    let stations: Vec<StationMeasurements> =
        stations.iter().copied().map(StationMeasurements::from).collect();
    let (Some(root), Some(tip)) = (stations.first(), stations.last()) else {
        return Err(ExportError::Validation("No stations to export".into()));
    };

    let mut scad = String::new();
    scad.push_str("// Wind turbine blade\n");
    scad.push_str("// Dimensions in millimeters\n\n");
    scad.push_str(&airfoil_module());

    scad.push_str("// Root of the blade joined to a mounting boss\n");
    scad.push_str("module hub_mount() {\n");
    scad.push_str("    union() {\n");
    scad.push_str("        cylinder(h=50, r1=30, r2=25, center=true);\n");
    scad.push_str("        hull() {\n");
    scad.push_str(&format!(
        "            cylinder(h={:.3}, r=25, center=true);\n",
        root.width * MM
    ));
    scad.push_str(&station_block(root, "            "));
    scad.push_str("        }\n    }\n}\n\n");

    scad.push_str("module blade() {\n");
    scad.push_str("    rotate([0, 90, 0])\n");
    scad.push_str("    union() {\n");
    scad.push_str("        hub_mount();\n");
    for (index, pair) in stations.windows(2).enumerate() {
        scad.push_str(&format!(
            "\n        // Stations {} and {}\n",
            index + 1,
            index + 2
        ));
        scad.push_str("        hull() {\n");
        scad.push_str(&station_block(&pair[0], "            "));
        scad.push('\n');
        scad.push_str(&station_block(&pair[1], "            "));
        scad.push_str("        }\n");
    }
    scad.push_str("    }\n}\n\n");
    scad.push_str("blade();\n\n");

    scad.push_str("/*\nBlade specifications:\n");
    scad.push_str(&format!("- Blade length: {:.1}mm\n", tip.radius * MM));
    scad.push_str(&format!("- Stations: {}\n", stations.len()));
    scad.push_str(&format!("- Root chord: {:.1}mm\n", root.chord * MM));
    scad.push_str(&format!("- Tip chord: {:.1}mm\n", tip.chord * MM));
    scad.push_str(&format!("- Root angle: {:.1} deg\n", root.setting));
    scad.push_str(&format!("- Tip angle: {:.1} deg\n", tip.setting));
    scad.push_str("*/\n");

    Ok(scad)
}
