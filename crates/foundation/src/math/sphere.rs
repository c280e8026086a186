//! Unit-sphere globe coordinates.
//!
//! Convention: `+y` is the north pole, longitude 0 lies on `+x`, and the globe
//! texture's seam sits at longitude ±180 on `-x`.

use super::Vec3;

/// Radius of the globe surface.
pub const SURFACE_RADIUS: f64 = 1.0;
/// Markers float just above the surface to avoid z-fighting with the texture.
pub const MARKER_RADIUS: f64 = 1.001;
/// Layer used for highlights drawn over markers.
pub const HIGHLIGHT_RADIUS: f64 = 1.008;

/// Project a latitude/longitude pair (degrees) onto a sphere of `radius`.
///
/// Inputs are not clamped: out-of-range angles still produce a point on the
/// sphere, just not a meaningful one.
pub fn lat_lon_to_vec3(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Orthonormal `(east, north)` basis of the tangent plane at `normal`.
///
/// `normal` must be unit length. At the poles, where east is undefined, `+x`
/// stands in for east.
pub fn tangent_frame(normal: Vec3) -> (Vec3, Vec3) {
    let east = Vec3::Y.cross(normal).normalize().unwrap_or(Vec3::X);
    let north = normal.cross(east);
    (east, north)
}

/// Remove the component of `v` along the unit `normal`.
pub fn project_onto_tangent_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

#[cfg(test)]
mod tests {
    use super::{
        MARKER_RADIUS, SURFACE_RADIUS, lat_lon_to_vec3, project_onto_tangent_plane, tangent_frame,
    };
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn projection_stays_on_sphere() {
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(30) {
                for radius in [SURFACE_RADIUS, MARKER_RADIUS, 2.5] {
                    let p = lat_lon_to_vec3(f64::from(lat), f64::from(lon), radius);
                    assert_close(p.length(), radius, 1e-12);
                }
            }
        }
    }

    #[test]
    fn cardinal_points() {
        let north = lat_lon_to_vec3(90.0, 0.0, 1.0);
        assert_close(north.y, 1.0, 1e-12);

        let south = lat_lon_to_vec3(-90.0, 0.0, 1.0);
        assert_close(south.y, -1.0, 1e-12);

        let null_island = lat_lon_to_vec3(0.0, 0.0, 1.0);
        assert_close(null_island.x, 1.0, 1e-12);
        assert_close(null_island.y, 0.0, 1e-12);
        assert_close(null_island.z, 0.0, 1e-12);

        let east = lat_lon_to_vec3(0.0, 90.0, 1.0);
        assert_close(east.z, -1.0, 1e-12);
    }

    #[test]
    fn out_of_range_input_is_not_clamped() {
        let p = lat_lon_to_vec3(120.0, 400.0, 1.0);
        assert!(p.is_finite());
        assert_close(p.length(), 1.0, 1e-12);
    }

    #[test]
    fn tangent_frame_is_orthonormal_everywhere() {
        let normals = [
            lat_lon_to_vec3(37.6, -122.4, 1.0),
            lat_lon_to_vec3(0.0, 0.0, 1.0),
            Vec3::Y,
            -Vec3::Y,
        ];
        for n in normals {
            let (east, north) = tangent_frame(n);
            assert_close(east.length(), 1.0, 1e-12);
            assert_close(north.length(), 1.0, 1e-12);
            assert_close(east.dot(north), 0.0, 1e-12);
            assert_close(east.dot(n), 0.0, 1e-12);
            assert_close(north.dot(n), 0.0, 1e-12);
        }
    }

    #[test]
    fn north_points_toward_the_pole() {
        let n = lat_lon_to_vec3(10.0, 45.0, 1.0);
        let (_, north) = tangent_frame(n);
        assert!(north.y > 0.0);
    }

    #[test]
    fn tangent_projection_drops_normal_component() {
        let v = project_onto_tangent_plane(Vec3::new(0.3, 2.0, -0.1), Vec3::Y);
        assert_eq!(v, Vec3::new(0.3, 0.0, -0.1));
    }
}
