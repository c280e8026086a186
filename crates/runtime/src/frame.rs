use foundation::time::Time;

/// Deterministic frame metadata.
///
/// This is the timebase handed to per-frame callbacks. It is small and pure so
/// a sequence of frames can be replayed in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// Seconds between `start` and the beginning of this frame.
    pub fn elapsed_since(self, start: Time) -> f64 {
        self.time.since(start)
    }
}
