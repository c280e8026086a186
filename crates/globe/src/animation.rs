use crate::marker::Marker;

/// Angular rate of the blink, in radians per second.
pub const BLINK_RATE: f64 = 2.0;

/// Blink multiplier `|sin(2t)|` for `elapsed_s` seconds since mount.
///
/// All markers share the same phase, so they blink in lockstep.
pub fn blink_scale(elapsed_s: f64) -> f64 {
    (BLINK_RATE * elapsed_s).sin().abs()
}

/// Write the current blink scale into every marker. Allocation-free.
pub fn animate(markers: &mut [Marker], elapsed_s: f64) {
    let scale = blink_scale(elapsed_s);
    for marker in markers {
        marker.scale = scale;
    }
}
