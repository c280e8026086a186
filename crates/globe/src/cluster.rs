//! Spreading markers that share an airport around the airport's position.

use foundation::math::{Vec3, project_onto_tangent_plane, tangent_frame};

/// Radius of the ring a cluster is spread over, in unit-sphere units.
pub const CLUSTER_RADIUS: f64 = 0.01;

/// Positions for `count` markers sharing `base`.
///
/// `count <= 1` returns `[base]` unchanged. Otherwise slot `i` sits at angle
/// `i / count * 2π` on a ring of [`CLUSTER_RADIUS`] in the tangent plane at
/// `base` (local x is east, local z is north), pulled back onto the sphere of
/// `base`'s radius. The output is a pure function of the inputs.
pub fn offset_positions(base: Vec3, count: usize) -> Vec<Vec3> {
    if count <= 1 {
        return vec![base];
    }
    (0..count).map(|i| offset_position(base, i, count)).collect()
}

/// A single slot of [`offset_positions`].
pub fn offset_position(base: Vec3, index: usize, count: usize) -> Vec3 {
    if count <= 1 {
        return base;
    }
    let radius = base.length();
    let Some(normal) = base.normalize() else {
        // The origin has no tangent plane; nothing to spread.
        return base;
    };

    let angle = (index as f64 / count as f64) * std::f64::consts::TAU;
    let (east, north) = tangent_frame(normal);
    let local = Vec3::new(angle.cos() * CLUSTER_RADIUS, 0.0, angle.sin() * CLUSTER_RADIUS);
    let offset = east * local.x + normal * local.y + north * local.z;
    let tangent = project_onto_tangent_plane(offset, normal);

    match (base + tangent).normalize() {
        Some(dir) => dir * radius,
        None => base,
    }
}
