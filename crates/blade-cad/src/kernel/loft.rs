//! Loft surface generation between compatible polygon sections
//!
//! Sections must have the same vertex count; vertex `i` of one section is
//! joined to vertex `i` of the next. Smooth lofts interpolate every vertex
//! column with a Catmull-Rom spline through all sections, ruled lofts join
//! neighbouring sections with straight lines.

use glam::DVec3;

use super::primitive::MeshBuffers;

/// Upper bound of interpolated rings between two neighbouring sections
pub const MAX_LOFT_STEPS: u32 = 32;

/// Standard Catmull-Rom tension
pub const DEFAULT_TENSION: f64 = 0.5;

/// Catmull-Rom interpolation at parameter t in [0, 1] between p1 and p2.
/// p0 and p3 guide the tangents.
fn catmull_rom_point(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64, tension: f64) -> DVec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let tau = tension;

    let b0 = -tau * t3 + 2.0 * tau * t2 - tau * t;
    let b1 = (2.0 - tau) * t3 + (tau - 3.0) * t2 + 1.0;
    let b2 = (tau - 2.0) * t3 + (3.0 - 2.0 * tau) * t2 + tau * t;
    let b3 = tau * t3 - tau * t2;

    p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
}

fn centroid(points: &[DVec3]) -> DVec3 {
    points.iter().copied().sum::<DVec3>() / points.len().max(1) as f64
}

/// Number of rings per span keeping the spline close to its chord under `tolerance`
fn span_steps(span: f64, tolerance: f64) -> u32 {
    // Deviation of a cubic over a span shrinks with the square of the step
    let steps = (span / tolerance).sqrt().ceil();
    if steps.is_finite() {
        (steps as u32).clamp(1, MAX_LOFT_STEPS)
    } else {
        1
    }
}

/// Expand the sections into the rings actually meshed
///
/// Ruled lofts return the sections unchanged. Smooth lofts insert
/// interpolated rings; the input sections are always reproduced exactly.
pub(crate) fn loft_rings(
    sections: &[Vec<DVec3>],
    ruled: bool,
    tension: f64,
    tolerance: f64,
) -> Vec<Vec<DVec3>> {
    if ruled || sections.len() < 2 {
        return sections.to_vec();
    }

    let count = sections.len();
    let mut rings = Vec::new();

    for k in 0..count - 1 {
        let prev = &sections[k.saturating_sub(1)];
        let start = &sections[k];
        let end = &sections[k + 1];
        let next = &sections[(k + 2).min(count - 1)];

        let steps = span_steps(centroid(start).distance(centroid(end)), tolerance);
        for step in 0..steps {
            if step == 0 {
                rings.push(start.clone());
                continue;
            }
            let t = step as f64 / steps as f64;
            rings.push(
                (0..start.len())
                    .map(|i| catmull_rom_point(prev[i], start[i], end[i], next[i], t, tension))
                    .collect(),
            );
        }
    }
    rings.push(sections[count - 1].clone());

    rings
}

/// Triangulate the side bands between rings and, optionally, the end caps
///
/// `flip` reverses every triangle so the surface faces outward when the
/// ring winding runs against the loft direction. Caps are fans around the
/// ring centroid, which requires star-shaped sections.
pub(crate) fn loft_mesh(rings: &[Vec<DVec3>], closed: bool, capped: bool, flip: bool) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();
    let Some(first) = rings.first() else {
        return mesh;
    };
    let n = first.len() as u32;

    for ring in rings {
        for &p in ring {
            mesh.push_vertex(p);
        }
    }

    let segments = if closed { n } else { n.saturating_sub(1) };
    for k in 0..(rings.len() as u32).saturating_sub(1) {
        let a = k * n;
        let b = (k + 1) * n;
        for i in 0..segments {
            let j = (i + 1) % n;
            mesh.push_triangle(a + i, a + j, b + j, flip);
            mesh.push_triangle(a + i, b + j, b + i, flip);
        }
    }

    if capped && closed && rings.len() > 1 {
        let last = (rings.len() as u32 - 1) * n;

        let start_center = mesh.push_vertex(centroid(first));
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.push_triangle(start_center, j, i, flip);
        }

        let end_center = mesh.push_vertex(centroid(&rings[rings.len() - 1]));
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.push_triangle(end_center, last + i, last + j, flip);
        }
    }

    mesh
}
