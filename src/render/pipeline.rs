use crate::{
    config::model::TransitionConfig,
    foundation::core::{FrameRate, TimeMs},
    foundation::error::MorphResult,
    render::surface::RenderSurface,
    sequencer::sequencer::TransitionSequencer,
    sequencer::state::{ReplayOutcome, StageTransition, TransitionState},
};

/// Options of a headless run.
#[derive(Clone, Debug)]
pub struct PlayOpts {
    /// Frames per second on the virtual clock.
    pub fps: u32,
    /// Last timestamp to paint, inclusive.
    pub duration_ms: u64,
    /// Replay presses, in any order.
    pub replay_at: Vec<TimeMs>,
}

impl Default for PlayOpts {
    fn default() -> Self {
        Self {
            fps: 60,
            duration_ms: 8_000,
            replay_at: Vec::new(),
        }
    }
}

/// Outcome of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlayStats {
    /// Frames presented.
    pub frames: u64,
    /// Replays that started a cycle.
    pub replays_started: u64,
    /// Replays ignored during an active cycle.
    pub replays_dropped: u64,
    /// Replays folded into a pending one.
    pub replays_absorbed: u64,
    /// Every stage change, oldest first.
    pub transitions: Vec<StageTransition>,
    /// State after the last frame.
    pub final_state: TransitionState,
}

/// Drives a [`TransitionSequencer`] frame by frame on a virtual clock.
///
/// Per frame at `t`:
/// 1. replay presses due by `t` (timers due before each press fire first),
/// 2. [`TransitionSequencer::advance`] to `t`,
/// 3. [`TransitionSequencer::frame`] and [`RenderSurface::present`].
#[derive(Debug)]
pub struct Player {
    seq: TransitionSequencer,
    rate: FrameRate,
    duration_ms: u64,
    replays: Vec<TimeMs>,
}

impl Player {
    /// Validate `cfg` and prepare a run.
    pub fn new(cfg: TransitionConfig, opts: &PlayOpts) -> MorphResult<Self> {
        let rate = FrameRate::new(opts.fps)?;
        let mut replays = opts.replay_at.clone();
        replays.sort();
        Ok(Self {
            seq: TransitionSequencer::new(cfg)?,
            rate,
            duration_ms: opts.duration_ms,
            replays,
        })
    }

    /// Sequencer being driven.
    pub fn sequencer(&self) -> &TransitionSequencer {
        &self.seq
    }

    /// Mount at time zero, play every frame up to the duration, then tear down.
    #[tracing::instrument(skip_all, fields(fps = self.rate.fps, duration_ms = self.duration_ms))]
    pub fn run(&mut self, surface: &mut dyn RenderSurface) -> MorphResult<PlayStats> {
        let mut stats = PlayStats::default();
        let mut pending = self.replays.iter().copied().peekable();

        surface.attach(&self.seq.config().assets)?;
        self.seq.mount(TimeMs::ZERO);
        for index in 0.. {
            let t = self.rate.frame_time(index);
            if t.0 > self.duration_ms {
                break;
            }
            while let Some(at) = pending.next_if(|at| *at <= t) {
                self.seq.advance(at);
                match self.seq.replay(at) {
                    ReplayOutcome::Started { .. } => stats.replays_started += 1,
                    ReplayOutcome::Dropped => stats.replays_dropped += 1,
                    ReplayOutcome::Absorbed => stats.replays_absorbed += 1,
                }
            }
            self.seq.advance(t);
            let frame = self.seq.frame(t);
            surface.present(&frame)?;
            stats.frames += 1;
        }

        stats.final_state = self.seq.state();
        stats.transitions = self.seq.drain_transitions();
        self.seq.teardown();
        surface.finish()?;

        tracing::info!(
            frames = stats.frames,
            cycle = stats.final_state.cycle,
            replays_started = stats.replays_started,
            "play finished"
        );
        Ok(stats)
    }
}

/// Play `cfg` headlessly onto `surface`.
pub fn play(
    cfg: TransitionConfig,
    opts: &PlayOpts,
    surface: &mut dyn RenderSurface,
) -> MorphResult<PlayStats> {
    Player::new(cfg, opts)?.run(surface)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
