use crate::{
    animation::{
        ease::Ease,
        tween::{Lerp, Tween},
    },
    config::model::GlyphConfig,
    foundation::core::{BezPath, Rect, TimeMs, Vec2},
    foundation::error::{MorphError, MorphResult},
    render::directive::{GlyphDirective, LayerKey},
};

/// Raven silhouette outline, in [`GLYPH_VIEW_BOX`] units.
pub const GLYPH_PATH: &str = "M5 60 C 35 40, 64 14, 120 8 C 98 23, 84 38, 136 36 C 156 18, 192 12, 204 18 C 188 36, 174 62, 212 84 C 178 80, 148 84, 120 96 L 138 116 L 106 106 L 100 132 L 86 108 L 58 118 L 78 94 C 52 88, 30 74, 5 60 Z";

/// Coordinate box of [`GLYPH_PATH`].
pub const GLYPH_VIEW_BOX: Rect = Rect::new(0.0, 0.0, 220.0, 140.0);

/// Parse [`GLYPH_PATH`] into a path renderers can fill.
pub fn glyph_outline() -> MorphResult<BezPath> {
    BezPath::from_svg(GLYPH_PATH)
        .map_err(|e| MorphError::animation(format!("glyph outline is not valid SVG path data: {e}")))
}

/// Placement of the glyph layer.
///
/// Translation is expressed in percent of the glyph's own box, so the flight scales with whatever
/// size the surface gives the layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphPose {
    /// Translation in percent of the layer size.
    pub translate_pct: Vec2,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl GlyphPose {
    /// Off to the lower left, small and invisible.
    pub const HIDDEN: Self = Self {
        translate_pct: Vec2::new(-28.0, -18.0),
        scale: 0.65,
        opacity: 0.0,
    };

    /// End of the entrance flight.
    pub const PERCHED: Self = Self {
        translate_pct: Vec2::new(72.0, -34.0),
        scale: 1.1,
        opacity: 1.0,
    };

    /// Where an exit heads, keeping the scale it left with.
    pub fn departed(scale: f64) -> Self {
        Self {
            translate_pct: Vec2::new(120.0, -50.0),
            scale,
            opacity: 0.0,
        }
    }
}

impl Lerp for GlyphPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate_pct: <Vec2 as Lerp>::lerp(&a.translate_pct, &b.translate_pct, t),
            scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
            opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// Coarse progress of one glyph layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphPhase {
    /// Flying in.
    Entering,
    /// Holding the perched pose.
    Perched,
    /// Flying out; removed once the exit completes.
    Exiting,
}

/// Flight of the glyph belonging to one cycle.
#[derive(Clone, Debug)]
pub struct GlyphFlight {
    cycle: u64,
    entered_at: TimeMs,
    enter: Tween<GlyphPose>,
    draw: Tween<f64>,
    exit: Option<(TimeMs, Tween<GlyphPose>)>,
    exit_duration_s: f64,
}

impl GlyphFlight {
    /// Mount the glyph for `cycle` at `at` and start its entrance.
    pub fn enter(cycle: u64, at: TimeMs, cfg: &GlyphConfig) -> Self {
        Self {
            cycle,
            entered_at: at,
            enter: Tween::new(
                GlyphPose::HIDDEN,
                GlyphPose::PERCHED,
                cfg.enter_duration_s,
                Ease::SWEEP,
            ),
            draw: Tween::new(0.6, 1.0, cfg.draw_duration_s, Ease::SWEEP),
            exit: None,
            exit_duration_s: cfg.exit_duration_s,
        }
    }

    /// Cycle that owns this layer.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Return `true` once an exit was requested.
    pub fn is_exiting(&self) -> bool {
        self.exit.is_some()
    }

    /// Start the exit from wherever the glyph is at `at`. Later calls are ignored.
    pub fn begin_exit(&mut self, at: TimeMs) {
        if self.exit.is_some() {
            return;
        }
        let from = self.enter.sample(at.secs_since(self.entered_at));
        let to = GlyphPose::departed(from.scale);
        self.exit = Some((at, Tween::new(from, to, self.exit_duration_s, Ease::EXIT)));
    }

    /// Return `true` once the exit has fully played.
    pub fn is_gone(&self, now: TimeMs) -> bool {
        self.exit
            .as_ref()
            .is_some_and(|(at, tw)| tw.is_complete(now.secs_since(*at)))
    }

    /// Directive for `now`, or `None` once the layer should be unmounted.
    pub fn sample(&self, now: TimeMs) -> Option<GlyphDirective> {
        if self.is_gone(now) {
            return None;
        }
        let since_enter = now.secs_since(self.entered_at);
        let (phase, pose) = match &self.exit {
            Some((at, tw)) => (GlyphPhase::Exiting, tw.sample(now.secs_since(*at))),
            None if self.enter.is_complete(since_enter) => {
                (GlyphPhase::Perched, self.enter.sample(since_enter))
            }
            None => (GlyphPhase::Entering, self.enter.sample(since_enter)),
        };
        Some(GlyphDirective {
            key: LayerKey::Glyph { cycle: self.cycle },
            phase,
            pose,
            path_length: self.draw.sample(since_enter),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glyph.rs"]
mod tests;
