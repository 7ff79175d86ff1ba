pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Absolute timestamp on the sequencer's millisecond clock.
///
/// The clock is virtual: hosts feed it whatever monotonic time source they have (a frame
/// counter, `std::time::Instant`, a display-link timestamp) converted to milliseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TimeMs(pub u64);

impl TimeMs {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Timestamp `ms` milliseconds after `self`, saturating at `u64::MAX`.
    pub fn after(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`; zero when `earlier` is in the future.
    pub fn millis_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Seconds elapsed since `earlier`; zero when `earlier` is in the future.
    pub fn secs_since(self, earlier: Self) -> f64 {
        self.millis_since(earlier) as f64 / 1000.0
    }
}

/// Fixed frame cadence used by headless playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRate {
    /// Frames per second, must be non-zero.
    pub fps: u32,
}

impl FrameRate {
    /// Create a validated frame rate.
    pub fn new(fps: u32) -> crate::MorphResult<Self> {
        if fps == 0 {
            return Err(crate::MorphError::validation("frame rate must be > 0"));
        }
        Ok(Self { fps })
    }

    /// Timestamp of frame `index` (0-based), rounded down to whole milliseconds.
    pub fn frame_time(self, index: u64) -> TimeMs {
        TimeMs(index.saturating_mul(1000) / u64::from(self.fps))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
