use super::*;
use crate::effects::{glyph::GlyphPhase, reveal::ClipPolygon};
use crate::render::directive::LayerKey;

fn mounted() -> TransitionSequencer {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    seq.mount(TimeMs::ZERO);
    seq
}

fn settled_at_3700() -> TransitionSequencer {
    let mut seq = mounted();
    seq.advance(TimeMs(900));
    seq.advance(TimeMs(3700));
    assert_eq!(seq.stage(), Stage::Settled);
    seq
}

#[test]
fn auto_start_then_settle() {
    let mut seq = mounted();
    assert_eq!(seq.advance(TimeMs(899)), 0);
    assert_eq!(seq.stage(), Stage::Idle);

    assert_eq!(seq.advance(TimeMs(900)), 1);
    assert_eq!(seq.state(), TransitionState { stage: Stage::Active, cycle: 0 });

    seq.advance(TimeMs(3699));
    assert_eq!(seq.stage(), Stage::Active);
    seq.advance(TimeMs(3700));
    assert_eq!(seq.stage(), Stage::Settled);

    let log = seq.drain_transitions();
    assert_eq!(log.len(), 2);
    assert_eq!((log[0].at, log[0].from, log[0].to), (TimeMs(900), Stage::Idle, Stage::Active));
    assert_eq!((log[1].at, log[1].from, log[1].to), (TimeMs(3700), Stage::Active, Stage::Settled));
    assert!(seq.drain_transitions().is_empty());
}

#[test]
fn late_advance_fires_timers_at_their_due_time() {
    let mut seq = mounted();
    // One late poll covers both the auto-start and the settle it arms.
    assert_eq!(seq.advance(TimeMs(10_000)), 2);
    let log = seq.drain_transitions();
    assert_eq!(log[0].at, TimeMs(900));
    assert_eq!(log[1].at, TimeMs(3700));
}

#[test]
fn replay_after_settle_starts_next_cycle() {
    let mut seq = settled_at_3700();
    let before = seq.field().fingerprint();

    assert_eq!(seq.replay(TimeMs(3700)), ReplayOutcome::Started { cycle: 1 });
    assert_eq!(seq.state(), TransitionState { stage: Stage::Idle, cycle: 1 });
    assert_eq!(seq.field().cycle(), 1);
    assert_ne!(seq.field().fingerprint(), before);

    seq.advance(TimeMs(3919));
    assert_eq!(seq.stage(), Stage::Idle);
    seq.advance(TimeMs(3920));
    assert_eq!(seq.stage(), Stage::Active);
    assert_eq!(seq.schedule().pending(TimerKind::Settle), 1);
    assert_eq!(seq.schedule().next_due(), Some(TimeMs(3920 + 2800)));
}

#[test]
fn replay_while_active_is_dropped() {
    let mut seq = mounted();
    seq.advance(TimeMs(900));
    let before = seq.state();
    assert_eq!(seq.replay(TimeMs(1000)), ReplayOutcome::Dropped);
    assert_eq!(seq.state(), before);
    assert_eq!(seq.schedule().pending(TimerKind::ReplayTrigger), 0);
}

#[test]
fn second_replay_before_trigger_is_absorbed() {
    let mut seq = settled_at_3700();
    assert_eq!(seq.replay(TimeMs(3700)), ReplayOutcome::Started { cycle: 1 });
    assert_eq!(seq.replay(TimeMs(3750)), ReplayOutcome::Absorbed);
    assert_eq!(seq.cycle(), 1);
    assert_eq!(seq.schedule().pending(TimerKind::ReplayTrigger), 1);

    seq.advance(TimeMs(4000));
    assert_eq!(seq.stage(), Stage::Active);
    assert_eq!(seq.schedule().pending(TimerKind::Settle), 1);
}

#[test]
fn replay_before_auto_start_supersedes_it() {
    let mut seq = mounted();
    assert_eq!(seq.replay(TimeMs(100)), ReplayOutcome::Started { cycle: 1 });
    assert_eq!(seq.schedule().pending(TimerKind::AutoStart), 0);
    seq.advance(TimeMs(320));
    assert_eq!(seq.state(), TransitionState { stage: Stage::Active, cycle: 1 });
}

#[test]
fn direct_trigger_cancels_auto_start() {
    let mut seq = mounted();
    seq.trigger(TimeMs(100));
    assert_eq!(seq.stage(), Stage::Active);
    assert_eq!(seq.schedule().pending(TimerKind::AutoStart), 0);
    assert_eq!(seq.schedule().next_due(), Some(TimeMs(2900)));
}

#[test]
fn retrigger_replaces_settle_timer() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    seq.trigger(TimeMs(0));
    seq.trigger(TimeMs(1000));
    assert_eq!(seq.schedule().pending(TimerKind::Settle), 1);

    seq.advance(TimeMs(2800));
    assert_eq!(seq.stage(), Stage::Active);
    seq.advance(TimeMs(3800));
    assert_eq!(seq.stage(), Stage::Settled);
    // Only one Idle -> Active change despite two triggers.
    assert_eq!(seq.drain_transitions().len(), 2);
}

#[test]
fn stale_timer_is_ignored() {
    let mut seq = settled_at_3700();
    seq.replay(TimeMs(3700));
    seq.advance(TimeMs(3920));
    seq.schedule.arm(TimerKind::Settle, 0, TimeMs(4000));

    seq.advance(TimeMs(4000));
    assert_eq!(seq.stage(), Stage::Active);
    assert_eq!(seq.cycle(), 1);
}

#[test]
fn reveal_snaps_then_expands_on_the_next_frame() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    let idle = seq.frame(TimeMs(0));
    assert_eq!(idle.reveal.polygon, ClipPolygon::COLLAPSED);

    seq.trigger(TimeMs(100));
    let snap = seq.frame(TimeMs(100));
    assert_eq!(snap.reveal.phase, RevealPhase::Snap);
    assert_eq!(snap.reveal.polygon, ClipPolygon::ANCHOR);

    let begin = seq.frame(TimeMs(116));
    assert_eq!(begin.reveal.polygon, ClipPolygon::ANCHOR);
    assert_eq!(
        seq.reveal_phase(),
        RevealPhase::Expanding { started_at: TimeMs(116) }
    );

    let open = seq.frame(TimeMs(116 + 2600));
    assert_eq!(open.reveal.polygon, ClipPolygon::FULL);
}

#[test]
fn replay_leaves_reveal_until_next_trigger() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    seq.trigger(TimeMs(0));
    seq.frame(TimeMs(0));
    seq.frame(TimeMs(16));
    seq.advance(TimeMs(2800));
    seq.replay(TimeMs(2900));
    assert!(matches!(seq.reveal_phase(), RevealPhase::Expanding { .. }));
    seq.advance(TimeMs(3120));
    assert_eq!(seq.reveal_phase(), RevealPhase::Snap);
}

#[test]
fn particles_only_while_active() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    assert!(seq.frame(TimeMs(0)).particles.is_empty());

    seq.trigger(TimeMs(0));
    let f = seq.frame(TimeMs(500));
    assert_eq!(f.particles.len(), 14);
    assert!(f.particles.iter().all(|p| p.key.cycle() == 0));

    seq.advance(TimeMs(2800));
    assert!(seq.frame(TimeMs(2800)).particles.is_empty());
}

#[test]
fn particle_keys_follow_the_cycle() {
    let mut seq = settled_at_3700();
    seq.replay(TimeMs(3700));
    seq.advance(TimeMs(3920));
    let f = seq.frame(TimeMs(4000));
    assert_eq!(f.cycle, 1);
    assert!(f.particles.iter().all(|p| matches!(p.key, LayerKey::Particle { cycle: 1, .. })));
}

#[test]
fn glyph_exits_on_settle_and_unmounts() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    seq.trigger(TimeMs(0));
    assert_eq!(seq.frame(TimeMs(100)).glyphs[0].phase, GlyphPhase::Entering);

    seq.advance(TimeMs(2800));
    let exiting = seq.frame(TimeMs(2900));
    assert_eq!(exiting.glyphs.len(), 1);
    assert_eq!(exiting.glyphs[0].phase, GlyphPhase::Exiting);

    assert!(seq.frame(TimeMs(3500)).glyphs.is_empty());
}

#[test]
fn glyph_perches_until_reset_with_on_reset_policy() {
    let mut cfg = TransitionConfig::default();
    cfg.glyph.exit_policy = GlyphExitPolicy::OnReset;
    let mut seq = TransitionSequencer::new(cfg).unwrap();
    seq.trigger(TimeMs(0));
    seq.advance(TimeMs(2800));
    assert_eq!(seq.stage(), Stage::Settled);
    assert_eq!(seq.frame(TimeMs(2900)).glyphs[0].phase, GlyphPhase::Perched);

    seq.replay(TimeMs(3000));
    seq.advance(TimeMs(3220));
    let f = seq.frame(TimeMs(3300));
    let phases: Vec<_> = f.glyphs.iter().map(|g| (g.key, g.phase)).collect();
    assert_eq!(
        phases,
        vec![
            (LayerKey::Glyph { cycle: 0 }, GlyphPhase::Exiting),
            (LayerKey::Glyph { cycle: 1 }, GlyphPhase::Entering),
        ]
    );

    let later = seq.frame(TimeMs(3700));
    assert_eq!(later.glyphs.len(), 1);
    assert_eq!(later.glyphs[0].key, LayerKey::Glyph { cycle: 1 });
}

#[test]
fn reveal_complete_mode_settles_on_open_frame() {
    let mut cfg = TransitionConfig::default();
    cfg.settle_mode = SettleMode::RevealComplete;
    let mut seq = TransitionSequencer::new(cfg).unwrap();
    seq.trigger(TimeMs(0));
    assert_eq!(seq.schedule().pending(TimerKind::Settle), 0);

    seq.frame(TimeMs(0));
    seq.frame(TimeMs(16));
    seq.frame(TimeMs(1500));
    assert_eq!(seq.stage(), Stage::Active);

    let f = seq.frame(TimeMs(2700));
    assert_eq!(f.stage, Stage::Settled);
    assert!(f.particles.is_empty());
}

#[test]
fn control_follows_stage() {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    assert_eq!(seq.control().label, "Replay the Raven");
    assert!(seq.control().enabled);

    seq.trigger(TimeMs(0));
    let c = seq.control();
    assert_eq!(c.label, "Summoning…");
    assert_eq!(c.aria_label, "Replay transition");
    assert!(!c.enabled);
}

#[test]
fn teardown_cancels_everything() {
    let mut seq = mounted();
    seq.trigger(TimeMs(100));
    seq.teardown();

    assert!(seq.is_torn_down());
    assert!(seq.schedule().is_empty());
    assert_eq!(seq.advance(TimeMs(100_000)), 0);
    assert_eq!(seq.replay(TimeMs(100_000)), ReplayOutcome::Dropped);

    seq.trigger(TimeMs(100_000));
    seq.mount(TimeMs(100_000));
    assert!(seq.schedule().is_empty());
    assert!(seq.frame(TimeMs(100_000)).glyphs.is_empty());
    seq.teardown();
}

#[test]
fn cycle_never_decreases() {
    let mut seq = mounted();
    let mut last = seq.cycle();
    let mut now = 0;
    for step in 0..40u64 {
        now += 173 + step * 31;
        seq.advance(TimeMs(now));
        if step % 3 == 0 {
            seq.replay(TimeMs(now));
        }
        seq.frame(TimeMs(now));
        assert!(seq.cycle() >= last);
        assert_eq!(seq.field().cycle(), seq.cycle());
        last = seq.cycle();
    }
}

#[test]
fn finished_glyphs_are_dropped_without_frames() {
    for policy in [GlyphExitPolicy::OnSettle, GlyphExitPolicy::OnReset] {
        let mut cfg = TransitionConfig::default();
        cfg.glyph.exit_policy = policy;
        let mut seq = TransitionSequencer::new(cfg).unwrap();
        seq.mount(TimeMs::ZERO);

        let mut now = 0;
        for _ in 0..50 {
            now += 5_000;
            seq.advance(TimeMs(now));
            assert!(matches!(seq.replay(TimeMs(now)), ReplayOutcome::Started { .. }));
            assert!(seq.glyphs.len() <= 2, "{policy:?}: {} glyphs", seq.glyphs.len());
        }
        assert_eq!(seq.cycle(), 50);
    }
}

#[test]
fn mounting_twice_does_not_restart() {
    let mut seq = mounted();
    seq.advance(TimeMs(900));
    assert_eq!(seq.stage(), Stage::Active);

    seq.mount(TimeMs(1000));
    assert_eq!(seq.schedule().pending(TimerKind::AutoStart), 0);
    seq.advance(TimeMs(1900));
    assert_eq!(seq.state(), TransitionState { stage: Stage::Active, cycle: 0 });
    let starts = seq
        .drain_transitions()
        .iter()
        .filter(|t| t.to == Stage::Active)
        .count();
    assert_eq!(starts, 1);
}
