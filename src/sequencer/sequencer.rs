use crate::{
    config::model::{GlyphExitPolicy, SettleMode, TransitionConfig},
    effects::{
        dispersal::Dispersal,
        glyph::GlyphFlight,
        reveal::{RevealPhase, RevealTrack},
    },
    field::feather::{FeatherField, generate},
    foundation::core::TimeMs,
    foundation::error::MorphResult,
    render::directive::FrameDirectives,
    sequencer::schedule::{Schedule, TimerHandle, TimerKind},
    sequencer::state::{ReplayOutcome, Stage, StageTransition, TransitionState, TriggerControl},
};

/// Stage machine coordinating the reveal, the glyph flight and the feather dispersal.
///
/// The sequencer owns no clock. Hosts report time explicitly:
///
/// - [`TransitionSequencer::advance`] fires every timer due by `now`;
/// - [`TransitionSequencer::frame`] builds the directives of the frame painted at `now`.
///
/// All state lives in this struct and is mutated only through its methods, so one instance is one
/// presentation. Nothing here blocks or spawns.
#[derive(Debug)]
pub struct TransitionSequencer {
    cfg: TransitionConfig,
    state: TransitionState,
    field: FeatherField,
    schedule: Schedule,
    auto_start: Option<TimerHandle>,
    replay_trigger: Option<TimerHandle>,
    settle: Option<TimerHandle>,
    reveal: RevealTrack,
    glyphs: Vec<GlyphFlight>,
    dispersal: Dispersal,
    journal: Vec<StageTransition>,
    mounted: bool,
    torn_down: bool,
}

impl TransitionSequencer {
    /// Validate `cfg` and create an idle sequencer at cycle 0. Nothing is scheduled until
    /// [`Self::mount`].
    pub fn new(cfg: TransitionConfig) -> MorphResult<Self> {
        cfg.validate()?;
        let reveal = RevealTrack::new(cfg.reveal.duration_s);
        let dispersal = Dispersal::new()?;
        Ok(Self {
            cfg,
            state: TransitionState::default(),
            field: generate(0),
            schedule: Schedule::new(),
            auto_start: None,
            replay_trigger: None,
            settle: None,
            reveal,
            glyphs: Vec::new(),
            dispersal,
            journal: Vec::new(),
            mounted: false,
            torn_down: false,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &TransitionConfig {
        &self.cfg
    }

    /// Stage and cycle.
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 {
        self.state.cycle
    }

    /// Feather field of the current cycle.
    pub fn field(&self) -> &FeatherField {
        &self.field
    }

    /// Replay control presentation for the current stage.
    pub fn control(&self) -> TriggerControl {
        TriggerControl::for_stage(self.state.stage)
    }

    /// Pending timers.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Reveal sub-phase.
    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    /// Return `true` after [`Self::teardown`].
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Stage changes since the last call, oldest first.
    pub fn drain_transitions(&mut self) -> Vec<StageTransition> {
        std::mem::take(&mut self.journal)
    }

    /// Attach to a surface at `now`: the first trigger fires after the auto-start delay.
    ///
    /// Only the first call arms the auto-start; later calls are ignored.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn mount(&mut self, now: TimeMs) {
        if self.torn_down || self.mounted {
            tracing::debug!(cycle = self.state.cycle, "mount ignored");
            return;
        }
        self.mounted = true;
        let due = now.after(self.cfg.auto_start_delay_ms);
        self.auto_start = Some(self.schedule.arm(TimerKind::AutoStart, self.state.cycle, due));
    }

    /// Start (or restart) the performance of the current cycle at `now`.
    ///
    /// Callable in any stage. The reveal snaps back to its anchor and expands from the next
    /// frame on; any pending auto-start, replay trigger or settle timer is superseded.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn trigger(&mut self, now: TimeMs) {
        if self.torn_down {
            return;
        }
        let cycle = self.state.cycle;
        self.cancel_timer(TimerKind::AutoStart);
        self.cancel_timer(TimerKind::ReplayTrigger);
        self.prune_glyphs(now);

        self.reveal.snap();

        if self.field.cycle() != cycle {
            self.field = generate(cycle);
        }

        // A glyph still perched for this cycle keeps flying; anything else is replaced.
        let keep_current = self
            .glyphs
            .iter()
            .any(|g| g.cycle() == cycle && !g.is_exiting());
        if !keep_current {
            self.glyphs.retain(|g| g.cycle() != cycle);
            self.glyphs
                .push(GlyphFlight::enter(cycle, now, &self.cfg.glyph));
        }
        for g in self.glyphs.iter_mut().filter(|g| g.cycle() != cycle) {
            g.begin_exit(now);
        }

        self.dispersal.start(now);
        self.set_stage(Stage::Active, now);

        self.cancel_timer(TimerKind::Settle);
        if self.cfg.settle_mode == SettleMode::FixedDelay {
            let due = now.after(self.cfg.settle_delay_ms);
            self.settle = Some(self.schedule.arm(TimerKind::Settle, cycle, due));
        }
    }

    /// Request a fresh performance.
    ///
    /// Dropped while [`Stage::Active`], absorbed while an earlier replay is still waiting for its
    /// trigger. Otherwise the cycle advances, the stage resets to [`Stage::Idle`] and the trigger
    /// follows after the replay delay.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn replay(&mut self, now: TimeMs) -> ReplayOutcome {
        if self.torn_down || self.state.stage == Stage::Active {
            tracing::debug!(stage = ?self.state.stage, "replay dropped");
            return ReplayOutcome::Dropped;
        }
        if self.replay_trigger.is_some() {
            tracing::debug!(cycle = self.state.cycle, "replay absorbed by pending trigger");
            return ReplayOutcome::Absorbed;
        }

        self.cancel_timer(TimerKind::AutoStart);
        self.cancel_timer(TimerKind::Settle);

        self.state.cycle += 1;
        let cycle = self.state.cycle;
        self.field = generate(cycle);
        self.dispersal.stop();
        self.prune_glyphs(now);
        for g in &mut self.glyphs {
            g.begin_exit(now);
        }
        self.set_stage(Stage::Idle, now);

        let due = now.after(self.cfg.replay_delay_ms);
        self.replay_trigger = Some(self.schedule.arm(TimerKind::ReplayTrigger, cycle, due));
        ReplayOutcome::Started { cycle }
    }

    /// Fire every timer due at or before `now`, in due order. Returns how many fired.
    pub fn advance(&mut self, now: TimeMs) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.schedule.pop_due(now) {
            fired += 1;
            let slot = self.slot(timer.kind);
            if *slot == Some(timer.handle) {
                *slot = None;
            }
            if timer.cycle != self.state.cycle {
                tracing::debug!(
                    kind = ?timer.kind,
                    timer_cycle = timer.cycle,
                    cycle = self.state.cycle,
                    "stale timer ignored"
                );
                continue;
            }
            tracing::trace!(kind = ?timer.kind, due = timer.due.0, "timer fired");
            match timer.kind {
                TimerKind::AutoStart | TimerKind::ReplayTrigger => self.trigger(timer.due),
                TimerKind::Settle => self.settle_at(timer.due),
            }
        }
        self.prune_glyphs(now);
        fired
    }

    /// Build the directives for the frame painted at `now`.
    ///
    /// Frames drive the reveal handshake: a snap is painted by one frame and the expansion starts
    /// on the next.
    pub fn frame(&mut self, now: TimeMs) -> FrameDirectives {
        let reveal = self.reveal.on_frame(now);

        if self.cfg.settle_mode == SettleMode::RevealComplete
            && self.state.stage == Stage::Active
            && self.reveal.is_open(now)
        {
            self.settle_at(now);
        }

        self.prune_glyphs(now);
        let glyphs = self.glyphs.iter().filter_map(|g| g.sample(now)).collect();

        let particles = if self.state.stage == Stage::Active {
            self.dispersal.sample(&self.field, now)
        } else {
            Vec::new()
        };

        FrameDirectives {
            at: now,
            stage: self.state.stage,
            cycle: self.state.cycle,
            reveal,
            glyphs,
            particles,
        }
    }

    /// Cancel everything and refuse further work. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if !self.schedule.is_empty() {
            tracing::debug!(cycle = self.state.cycle, "teardown cancels pending timers");
        }
        self.schedule.clear();
        self.auto_start = None;
        self.replay_trigger = None;
        self.settle = None;
        self.dispersal.stop();
        self.glyphs.clear();
        self.torn_down = true;
    }

    fn settle_at(&mut self, at: TimeMs) {
        if self.state.stage != Stage::Active {
            return;
        }
        self.cancel_timer(TimerKind::Settle);
        self.dispersal.stop();
        if self.cfg.glyph.exit_policy == GlyphExitPolicy::OnSettle {
            let cycle = self.state.cycle;
            for g in self.glyphs.iter_mut().filter(|g| g.cycle() == cycle) {
                g.begin_exit(at);
            }
        }
        self.set_stage(Stage::Settled, at);
    }

    /// Unmount glyphs whose exit has finished by `now`.
    fn prune_glyphs(&mut self, now: TimeMs) {
        let before = self.glyphs.len();
        self.glyphs.retain(|g| !g.is_gone(now));
        if self.glyphs.len() != before {
            tracing::trace!(removed = before - self.glyphs.len(), "glyphs unmounted");
        }
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::AutoStart => &mut self.auto_start,
            TimerKind::ReplayTrigger => &mut self.replay_trigger,
            TimerKind::Settle => &mut self.settle,
        }
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        if let Some(handle) = self.slot(kind).take() {
            self.schedule.cancel(handle);
        }
    }

    fn set_stage(&mut self, to: Stage, at: TimeMs) {
        let from = self.state.stage;
        self.state.stage = to;
        if from == to {
            return;
        }
        tracing::debug!(cycle = self.state.cycle, ?from, ?to, at = at.0, "stage changed");
        self.journal.push(StageTransition {
            at,
            cycle: self.state.cycle,
            from,
            to,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/sequencer.rs"]
mod tests;
