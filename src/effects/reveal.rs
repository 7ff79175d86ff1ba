use crate::{
    animation::{
        ease::Ease,
        tween::{Lerp, Tween},
    },
    foundation::core::{BezPath, Point, Rect, TimeMs},
    render::directive::ClipDirective,
};

/// Quadrilateral clip aperture with vertices in percent of the stage box.
///
/// Vertices may lie outside `[0, 100]`; the fully open polygon overshoots the box so that eased
/// edges never graze the image border.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipPolygon {
    /// Vertices in percent, in drawing order.
    pub vertices: [Point; 4],
}

impl ClipPolygon {
    /// Degenerate aperture shown before the first trigger.
    pub const COLLAPSED: Self = Self {
        vertices: [
            Point::new(48.0, 50.0),
            Point::new(48.0, 50.0),
            Point::new(48.0, 50.0),
            Point::new(48.0, 50.0),
        ],
    };

    /// Small diamond around the anchor that every reveal snaps back to.
    pub const ANCHOR: Self = Self {
        vertices: [
            Point::new(45.0, 52.0),
            Point::new(48.0, 50.0),
            Point::new(45.0, 48.0),
            Point::new(42.0, 50.0),
        ],
    };

    /// Fully open aperture.
    pub const FULL: Self = Self {
        vertices: [
            Point::new(-20.0, 120.0),
            Point::new(120.0, 120.0),
            Point::new(120.0, -20.0),
            Point::new(-20.0, -20.0),
        ],
    };

    /// Closed path of this polygon mapped onto `frame` (pixel space).
    pub fn to_bez_path(&self, frame: Rect) -> BezPath {
        let map = |p: Point| {
            Point::new(
                frame.x0 + frame.width() * p.x / 100.0,
                frame.y0 + frame.height() * p.y / 100.0,
            )
        };
        let mut path = BezPath::new();
        path.move_to(map(self.vertices[0]));
        for &v in &self.vertices[1..] {
            path.line_to(map(v));
        }
        path.close_path();
        path
    }
}

impl Lerp for ClipPolygon {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let mut vertices = a.vertices;
        for (v, (pa, pb)) in vertices.iter_mut().zip(a.vertices.iter().zip(&b.vertices)) {
            *v = pa.lerp(*pb, t);
        }
        Self { vertices }
    }
}

/// Explicit sub-phases of the reveal.
///
/// Restarting a reveal needs two distinct paints: the aperture snaps to [`ClipPolygon::ANCHOR`]
/// on one frame and starts expanding on the following one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// Never triggered.
    Collapsed,
    /// Snapped to the anchor; the next frame paints the snap.
    Snap,
    /// Snap painted; the next frame starts the expansion.
    Armed,
    /// Expanding since `started_at`; fully open once the timeline completes.
    Expanding {
        /// Timestamp of the frame that began the expansion.
        started_at: TimeMs,
    },
}

/// Reveal phase plus its expansion timeline.
#[derive(Clone, Debug)]
pub struct RevealTrack {
    phase: RevealPhase,
    expand: Tween<ClipPolygon>,
}

impl RevealTrack {
    /// A collapsed reveal that expands over `duration_s` once triggered.
    pub fn new(duration_s: f64) -> Self {
        Self {
            phase: RevealPhase::Collapsed,
            expand: Tween::new(ClipPolygon::ANCHOR, ClipPolygon::FULL, duration_s, Ease::SWEEP),
        }
    }

    /// Current sub-phase.
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Abandon any in-flight expansion and jump back to the anchor.
    pub fn snap(&mut self) {
        self.phase = RevealPhase::Snap;
    }

    /// Expansion progress in `[0, 1]` at `now`; zero unless expanding.
    pub fn progress(&self, now: TimeMs) -> f64 {
        match self.phase {
            RevealPhase::Expanding { started_at } => self.expand.progress(now.secs_since(started_at)),
            RevealPhase::Collapsed | RevealPhase::Snap | RevealPhase::Armed => 0.0,
        }
    }

    /// Return `true` once the aperture is fully open.
    pub fn is_open(&self, now: TimeMs) -> bool {
        self.progress(now) >= 1.0
    }

    /// Produce this frame's clip and advance the snap/begin handshake.
    pub fn on_frame(&mut self, now: TimeMs) -> ClipDirective {
        match self.phase {
            RevealPhase::Collapsed => ClipDirective {
                phase: self.phase,
                polygon: ClipPolygon::COLLAPSED,
                progress: 0.0,
            },
            RevealPhase::Snap => {
                let out = ClipDirective {
                    phase: self.phase,
                    polygon: ClipPolygon::ANCHOR,
                    progress: 0.0,
                };
                self.phase = RevealPhase::Armed;
                out
            }
            RevealPhase::Armed => {
                // Expansion sampled at t = 0: the anchor is painted a second time, so the motion
                // always starts from an aperture the surface has already shown.
                self.phase = RevealPhase::Expanding { started_at: now };
                ClipDirective {
                    phase: self.phase,
                    polygon: ClipPolygon::ANCHOR,
                    progress: 0.0,
                }
            }
            RevealPhase::Expanding { started_at } => {
                let elapsed = now.secs_since(started_at);
                ClipDirective {
                    phase: self.phase,
                    polygon: self.expand.sample(elapsed),
                    progress: self.expand.progress(elapsed),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/reveal.rs"]
mod tests;
