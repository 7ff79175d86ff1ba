//! Declarative per-frame animation parameters handed to a rendering surface.
//!
//! Directives carry no drawing logic: a surface turns them into clip paths, transforms and
//! filters however its toolkit prefers.

use crate::{
    effects::{
        glyph::{GlyphPhase, GlyphPose},
        reveal::{ClipPolygon, RevealPhase},
    },
    foundation::core::{TimeMs, Vec2},
    sequencer::state::Stage,
};

/// Identity under which a surface mounts a layer.
///
/// Keys embed the cycle, so a replay never reuses a key: surfaces must rebuild a layer whose key
/// they have not seen rather than tween it from a previous cycle's state.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LayerKey {
    /// The flying silhouette of `cycle`.
    Glyph {
        /// Owning cycle.
        cycle: u64,
    },
    /// Feather `id` of `cycle`.
    Particle {
        /// Feather index.
        id: u32,
        /// Owning cycle.
        cycle: u64,
    },
}

impl LayerKey {
    /// Cycle the layer belongs to.
    pub fn cycle(self) -> u64 {
        match self {
            Self::Glyph { cycle } | Self::Particle { cycle, .. } => cycle,
        }
    }
}

/// Clip geometry of the "after" image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipDirective {
    /// Reveal sub-phase that produced this clip.
    pub phase: RevealPhase,
    /// Aperture in percent of the stage box.
    pub polygon: ClipPolygon,
    /// Linear expansion progress in `[0, 1]`.
    pub progress: f64,
}

/// Placement of one glyph layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphDirective {
    /// Layer identity.
    pub key: LayerKey,
    /// Entering, perched or exiting.
    pub phase: GlyphPhase,
    /// Transform and opacity.
    pub pose: GlyphPose,
    /// Fraction of the outline stroked, in `[0, 1]`.
    pub path_length: f64,
}

/// Placement of one feather layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleDirective {
    /// Layer identity.
    pub key: LayerKey,
    /// Offset from the scene origin in pixels.
    pub offset: Vec2,
    /// Rotation in degrees.
    pub rotate_deg: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Hue rotation filter in degrees.
    pub hue_rotate_deg: i32,
    /// Linear progress of this feather's own timeline.
    pub progress: f64,
}

/// Everything a surface needs to paint one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameDirectives {
    /// Frame timestamp.
    pub at: TimeMs,
    /// Sequencer stage when the frame was built.
    pub stage: Stage,
    /// Current cycle.
    pub cycle: u64,
    /// Reveal clip.
    pub reveal: ClipDirective,
    /// Mounted glyph layers; two only while an old glyph exits under a new one.
    pub glyphs: Vec<GlyphDirective>,
    /// Mounted feather layers, empty outside the active stage.
    pub particles: Vec<ParticleDirective>,
}

impl FrameDirectives {
    /// Keys of every mounted layer, glyphs first.
    pub fn layer_keys(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.glyphs
            .iter()
            .map(|g| g.key)
            .chain(self.particles.iter().map(|p| p.key))
    }
}
