use super::*;
use crate::{
    config::{assets::AssetRole, model::TransitionConfig},
    sequencer::sequencer::TransitionSequencer,
};

fn frames_through_one_replay() -> Vec<FrameDirectives> {
    let mut seq = TransitionSequencer::new(TransitionConfig::default()).unwrap();
    let mut out = Vec::new();
    seq.trigger(TimeMs(0));
    out.push(seq.frame(TimeMs(0)));
    seq.advance(TimeMs(2800));
    out.push(seq.frame(TimeMs(2800)));
    out.push(seq.frame(TimeMs(3500)));
    seq.replay(TimeMs(3500));
    seq.advance(TimeMs(3720));
    out.push(seq.frame(TimeMs(3720)));
    out
}

#[test]
fn in_memory_surface_tracks_layer_lifecycles() {
    let frames = frames_through_one_replay();
    let mut surface = InMemorySurface::new();
    for f in &frames {
        surface.present(f).unwrap();
    }
    surface.finish().unwrap();
    assert_eq!(surface.frames().len(), frames.len());

    let mounted_at = |at: u64| {
        surface
            .events()
            .iter()
            .filter(|e| e.at == TimeMs(at) && e.change == LayerChange::Mounted)
            .count()
    };
    // Glyph plus fourteen feathers on the first active frame.
    assert_eq!(mounted_at(0), 15);

    let unmounted_at_settle = surface
        .events()
        .iter()
        .filter(|e| e.at == TimeMs(2800) && e.change == LayerChange::Unmounted)
        .count();
    assert_eq!(unmounted_at_settle, 14);

    // The glyph of cycle 0 is gone and cycle 1 mounted fresh keys.
    assert!(surface.mounted().iter().all(|k| k.cycle() == 1));
    assert_eq!(mounted_at(3720), 15);
}

#[test]
fn unmounts_are_reported_before_mounts() {
    let frames = frames_through_one_replay();
    let mut surface = InMemorySurface::new();
    for f in &frames {
        surface.present(f).unwrap();
    }
    let mut seen_mount = None;
    for e in surface.events().iter().filter(|e| e.at == TimeMs(3500)) {
        if e.change == LayerChange::Mounted {
            seen_mount = Some(e.key);
        } else {
            assert!(seen_mount.is_none(), "unmount after mount {seen_mount:?}");
        }
    }
}

#[test]
fn json_lines_surface_writes_one_object_per_frame() {
    let frames = frames_through_one_replay();
    let mut surface = JsonLinesSurface::new(Vec::new());
    for f in &frames {
        surface.present(f).unwrap();
    }
    surface.finish().unwrap();
    assert_eq!(surface.frames_written(), frames.len() as u64);

    let text = String::from_utf8(surface.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), frames.len());

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["stage"], "active");
    assert_eq!(first["cycle"], 0);
    assert_eq!(first["particles"].as_array().unwrap().len(), 14);

    let back: FrameDirectives = serde_json::from_str(lines[3]).unwrap();
    assert_eq!(back, frames[3]);
}

#[test]
fn attach_hands_over_both_images() {
    let cfg = TransitionConfig::default();
    let mut surface = InMemorySurface::new();
    assert!(surface.assets().is_empty());
    surface.attach(&cfg.assets).unwrap();

    let roles: Vec<_> = surface.assets().iter().map(|a| a.role).collect();
    assert_eq!(roles, vec![AssetRole::Before, AssetRole::After]);
    assert_eq!(surface.assets()[0].source, "images/before.svg");
    assert_eq!(surface.assets()[1].alt_text, "After transformation");
}

#[test]
fn json_lines_header_precedes_frames() {
    let frames = frames_through_one_replay();
    let mut surface = JsonLinesSurface::new(Vec::new());
    surface.attach(&TransitionConfig::default().assets).unwrap();
    for f in &frames {
        surface.present(f).unwrap();
    }
    surface.finish().unwrap();
    assert_eq!(surface.frames_written(), frames.len() as u64);

    let text = String::from_utf8(surface.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), frames.len() + 1);

    let header: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(header["assets"][0]["role"], "before");
    assert_eq!(header["assets"][0]["alt_text"], "Before transformation");
    assert_eq!(header["assets"][1]["source"], "images/after.svg");
    let first: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(first["stage"], "active");
}
