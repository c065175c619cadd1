//! FreeCAD macro generation
//!
//! The macro rebuilds the same blade inside FreeCAD from embedded station
//! data, with the airfoil, hub and loft settings of the given options.

use crate::blade::{BladeOptions, HubLength};
use crate::constants::{NACA_COEFFICIENTS, NACA_MAX_THICKNESS, PART_FEATURE_TYPE};
use crate::station::{Station, validate_stations};

use super::ExportError;

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Python string literal
fn python_str(value: &str) -> String {
    let escaped: String = value
        .chars()
        .flat_map(|c| match c {
            '\\' => vec!['\\', '\\'],
            '"' => vec!['\\', '"'],
            '\n' => vec!['\\', 'n'],
            c => vec![c],
        })
        .collect();
    format!("\"{escaped}\"")
}

/// Generate the text of a `.FCMacro` that builds the blade in FreeCAD
pub fn generate_freecad_macro(
    stations: &[Station],
    options: &BladeOptions,
) -> Result<String, ExportError> {
    validate_stations(stations).map_err(|e| ExportError::Validation(e.to_string()))?;
    let station_data = serde_json::to_string_pretty(stations)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;

    let [a0, a1, a2, a3] = NACA_COEFFICIENTS;
    let a4 = options.profile.trailing_edge.a4();
    let samples = options.profile.samples;
    let hub = &options.hub;
    let hub_length = match hub.length {
        HubLength::Fixed(length) => format!("{length:?}"),
        HubLength::RootRadiusRatio(ratio) => format!("root_radius * {ratio:?}"),
    };

    let mut script = String::new();
    script.push_str("import FreeCAD as App\nimport FreeCADGui as Gui\nimport Part\nimport math\n\n");

    script.push_str(&format!("STATIONS = {station_data}\n\n"));

    script.push_str(&format!("SAMPLES = {samples}\n"));
    script.push_str(&format!(
        "COEFFICIENTS = ({a0:?}, {a1:?}, {a2:?}, {a3:?}, {a4:?})\n\n"
    ));

    script.push_str("def half_thickness(t):\n");
    script.push_str("    a0, a1, a2, a3, a4 = COEFFICIENTS\n");
    script.push_str(&format!(
        "    return ({NACA_MAX_THICKNESS:?} / 0.2) * (a0 * math.sqrt(t) + a1 * t + a2 * t**2 + a3 * t**3 + a4 * t**4)\n\n"
    ));

    script.push_str("def airfoil_outline():\n");
    script.push_str("    points = []\n");
    script.push_str("    for i in range(SAMPLES + 1):\n");
    script.push_str("        t = i / SAMPLES\n");
    script.push_str("        if t < 1.0:\n");
    script.push_str("            points.append((t, half_thickness(t)))\n");
    script.push_str("    for i in range(SAMPLES, -1, -1):\n");
    script.push_str("        t = i / SAMPLES\n");
    script.push_str("        if t > 0.0:\n");
    script.push_str("            points.append((t, -half_thickness(t)))\n");
    script.push_str("    return points\n\n");

    script.push_str("def station_wire(outline, station):\n");
    script.push_str("    chord = station['chord']\n");
    script.push_str("    angle = math.radians(station['setting'])\n");
    script.push_str("    cos_a, sin_a = math.cos(angle), math.sin(angle)\n");
    script.push_str("    vectors = []\n");
    script.push_str("    for x, y in outline:\n");
    script.push_str("        sx = x * chord\n");
    script.push_str("        sy = y * chord * station['thickness']\n");
    script.push_str(
        "        vectors.append(App.Vector(sx * cos_a - sy * sin_a, sx * sin_a + sy * cos_a, station['radius']))\n",
    );
    script.push_str("    return Part.makePolygon(vectors + [vectors[0]])\n\n");

    script.push_str("def hub_cylinder(root_radius):\n");
    script.push_str(&format!(
        "    radius = root_radius * {:?}\n",
        hub.radius_ratio
    ));
    script.push_str(&format!("    length = {hub_length}\n"));
    script.push_str(&format!(
        "    return Part.makeCylinder(radius, length, App.Vector({:?}, {:?}, {:?}))\n\n",
        hub.origin.x, hub.origin.y, hub.origin.z
    ));

    script.push_str("def build_blade(doc):\n");
    script.push_str("    outline = airfoil_outline()\n");
    script.push_str("    wires = [station_wire(outline, s) for s in STATIONS]\n");
    script.push_str(&format!(
        "    loft = Part.makeLoft(wires, {}, {})\n",
        python_bool(options.solid),
        python_bool(options.ruled)
    ));
    script.push_str("    hub = hub_cylinder(STATIONS[0]['radius'])\n");
    script.push_str(&format!(
        "    blade = doc.addObject({}, {})\n",
        python_str(PART_FEATURE_TYPE),
        python_str(&options.object_name)
    ));
    script.push_str("    blade.Shape = loft.fuse(hub)\n");
    script.push_str("    return blade\n\n");

    script.push_str(&format!(
        "doc = App.newDocument({})\n",
        python_str(&options.document_name)
    ));
    script.push_str("build_blade(doc)\n");
    script.push_str("doc.recompute()\n");
    script.push_str("if App.GuiUp:\n");
    script.push_str("    Gui.SendMsgToActiveView(\"ViewFit\")\n");
    script.push_str("    Gui.activeDocument().activeView().viewAxonometric()\n");

    Ok(script)
}
