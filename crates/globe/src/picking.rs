use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{SURFACE_RADIUS, Vec3};

use crate::marker::Marker;
use crate::person::PersonId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHit {
    pub index: usize,
    pub person_id: PersonId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// Ignore markers hidden behind the globe surface.
    pub occlude_with_globe: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            occlude_with_globe: true,
        }
    }
}

/// Deterministic ray picking for markers.
///
/// Each marker is treated as a sphere of radius `base_size`; the blink scale
/// is ignored so a marker stays clickable while it is fully shrunk.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - Equal distances go to the lower marker index.
pub fn pick_marker(markers: &[Marker], ray: Ray, opts: PickOptions) -> Option<MarkerHit> {
    let dir = ray.dir.normalize()?;
    let globe_t = if opts.occlude_with_globe {
        ray_sphere_hit_t(ray.origin, dir, Vec3::ZERO, SURFACE_RADIUS)
    } else {
        None
    };

    let mut best: Option<(f64, usize)> = None;
    for (index, marker) in markers.iter().enumerate() {
        let Some(t) = ray_sphere_hit_t(ray.origin, dir, marker.position, marker.base_size) else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }
        if globe_t.is_some_and(|g| g < t) {
            continue;
        }

        best = match best {
            Some((bt, bi)) if stable_total_cmp_f64(t, bt).then_with(|| index.cmp(&bi)).is_ge() => {
                Some((bt, bi))
            }
            _ => Some((t, index)),
        };
    }

    let (t, index) = best?;
    Some(MarkerHit {
        index,
        person_id: markers[index].person_id.clone(),
        distance: t,
        point: ray.origin + dir * t,
    })
}

/// Entry distance of a unit-direction ray into a sphere, clamped to 0 when
/// the origin is inside it.
fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t_near = -b - sqrt_disc;
    let t_far = -b + sqrt_disc;
    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}
