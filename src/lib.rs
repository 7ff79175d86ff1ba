//! Raven-morph orchestrates a staged "raven" transition between two images.
//!
//! One performance (a *cycle*) combines three effects:
//!
//! - a polygon **reveal** that snaps to a small anchor and expands until the "after" image is
//!   fully uncovered,
//! - a **glyph** (raven silhouette) that flies in, perches and flies out,
//! - a **feather field** of fourteen particles derived deterministically from the cycle number.
//!
//! # Pipeline overview
//!
//! 1. **Sequence**: [`TransitionSequencer`] owns the `Idle -> Active -> Settled` stage machine
//!    and its timers on a virtual millisecond clock ([`TimeMs`]).
//! 2. **Direct**: [`TransitionSequencer::frame`] turns the state into [`FrameDirectives`], the
//!    declarative per-frame parameters of every mounted layer.
//! 3. **Present**: a [`RenderSurface`] paints or records those directives. [`Player`] drives the
//!    whole loop headlessly.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a feather field is a pure function of its cycle, and the sequencer only
//!   observes time through the timestamps it is handed.
//! - **No drawing**: directives carry geometry and timing, never pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod effects;
mod field;
mod foundation;
mod render;
mod sequencer;

pub use animation::ease::Ease;
pub use animation::tween::{Keyframe, Keyframes, Lerp, Tween};
pub use config::assets::{AssetBinding, AssetRole, SceneAssets};
pub use config::model::{GlyphConfig, GlyphExitPolicy, RevealConfig, SettleMode, TransitionConfig};
pub use effects::dispersal::Dispersal;
pub use effects::glyph::{
    GLYPH_PATH, GLYPH_VIEW_BOX, GlyphFlight, GlyphPhase, GlyphPose, glyph_outline,
};
pub use effects::reveal::{ClipPolygon, RevealPhase, RevealTrack};
pub use field::feather::{
    DELAY_STEP_S, FEATHER_COUNT, FeatherField, ParticleDescriptor, SEED_STRIDE, generate,
};
pub use foundation::core::{BezPath, FrameRate, Point, Rect, TimeMs, Vec2};
pub use foundation::error::{MorphError, MorphResult};
pub use render::directive::{
    ClipDirective, FrameDirectives, GlyphDirective, LayerKey, ParticleDirective,
};
pub use render::pipeline::{PlayOpts, PlayStats, Player, play};
pub use render::surface::{
    InMemorySurface, JsonLinesSurface, LayerChange, LayerEvent, RenderSurface,
};
pub use sequencer::schedule::{Schedule, Timer, TimerHandle, TimerKind};
pub use sequencer::sequencer::TransitionSequencer;
pub use sequencer::state::{
    ReplayOutcome, Stage, StageTransition, TransitionState, TriggerControl,
};
