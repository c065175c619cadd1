//! Placement of normalized airfoil points in blade space

use glam::{DMat2, DVec2, DVec3};

use crate::station::Station;

/// Scale, twist and position a normalized outline
///
/// `x` is scaled by `chord`, `y` by `chord * thickness`, the result is
/// rotated by `setting` degrees about the station axis and lifted to
/// `z = radius`.
pub fn transform_section(
    points: &[DVec2],
    chord: f64,
    setting: f64,
    thickness: f64,
    radius: f64,
) -> Vec<DVec3> {
    let rotation = DMat2::from_angle(setting.to_radians());
    points
        .iter()
        .map(|p| {
            let scaled = DVec2::new(p.x * chord, p.y * chord * thickness);
            rotation.mul_vec2(scaled).extend(radius)
        })
        .collect()
}

/// Outline of a station in blade space
pub fn station_section(points: &[DVec2], station: &Station) -> Vec<DVec3> {
    transform_section(
        points,
        station.chord,
        station.setting,
        station.thickness,
        station.radius,
    )
}
