use std::collections::BTreeSet;
use std::io::Write;

use crate::{
    config::assets::{AssetBinding, SceneAssets},
    foundation::core::TimeMs,
    foundation::error::MorphResult,
    render::directive::{FrameDirectives, LayerKey},
};

/// Consumer of per-frame directives.
///
/// Ordering contract: `present` is called with strictly non-decreasing timestamps. A layer key
/// absent from the previous frame is a newly mounted layer, never a continuation of another key.
pub trait RenderSurface {
    /// Receive the scene images once, before the first `present`.
    fn attach(&mut self, _assets: &SceneAssets) -> MorphResult<()> {
        Ok(())
    }

    /// Paint (or record) one frame.
    fn present(&mut self, frame: &FrameDirectives) -> MorphResult<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> MorphResult<()> {
        Ok(())
    }
}

/// Whether a layer appeared or disappeared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerChange {
    /// First frame carrying the key.
    Mounted,
    /// First frame no longer carrying the key.
    Unmounted,
}

/// A mount or unmount observed between two frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LayerEvent {
    /// Timestamp of the frame where the change became visible.
    pub at: TimeMs,
    /// Layer concerned.
    pub key: LayerKey,
    /// Kind of change.
    pub change: LayerChange,
}

/// In-memory surface for tests and debugging; records frames and layer lifecycles.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    assets: Vec<AssetBinding>,
    frames: Vec<FrameDirectives>,
    mounted: BTreeSet<LayerKey>,
    events: Vec<LayerEvent>,
}

impl InMemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Images received through `attach`.
    pub fn assets(&self) -> &[AssetBinding] {
        &self.assets
    }

    /// Frames in presentation order.
    pub fn frames(&self) -> &[FrameDirectives] {
        &self.frames
    }

    /// Mount/unmount history in presentation order.
    pub fn events(&self) -> &[LayerEvent] {
        &self.events
    }

    /// Layers mounted as of the last frame.
    pub fn mounted(&self) -> &BTreeSet<LayerKey> {
        &self.mounted
    }
}

impl RenderSurface for InMemorySurface {
    fn attach(&mut self, assets: &SceneAssets) -> MorphResult<()> {
        self.assets = assets.bindings().to_vec();
        Ok(())
    }

    fn present(&mut self, frame: &FrameDirectives) -> MorphResult<()> {
        let now: BTreeSet<LayerKey> = frame.layer_keys().collect();
        for &key in self.mounted.difference(&now) {
            self.events.push(LayerEvent {
                at: frame.at,
                key,
                change: LayerChange::Unmounted,
            });
        }
        for &key in now.difference(&self.mounted) {
            self.events.push(LayerEvent {
                at: frame.at,
                key,
                change: LayerChange::Mounted,
            });
        }
        self.mounted = now;
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Writes one JSON object per frame, preceded by an `{"assets": [...]}` header line when attached.
#[derive(Debug)]
pub struct JsonLinesSurface<W: Write> {
    out: W,
    frames_written: u64,
}

impl<W: Write> JsonLinesSurface<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames_written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for JsonLinesSurface<W> {
    fn attach(&mut self, assets: &SceneAssets) -> MorphResult<()> {
        let header = serde_json::json!({ "assets": assets.bindings() });
        serde_json::to_writer(&mut self.out, &header)?;
        self.out.write_all(b"\n").map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn present(&mut self, frame: &FrameDirectives) -> MorphResult<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n").map_err(anyhow::Error::from)?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> MorphResult<()> {
        self.out.flush().map_err(anyhow::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
