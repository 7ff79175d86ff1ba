use std::path::Path;

use anyhow::Context as _;

use crate::{
    config::assets::SceneAssets,
    foundation::error::{MorphError, MorphResult},
};

/// How the sequencer decides a cycle has settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Settle on a wall-clock timer armed at trigger time.
    #[default]
    FixedDelay,
    /// Settle on the first frame that observes the reveal fully open.
    RevealComplete,
}

/// When the glyph of a cycle flies out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphExitPolicy {
    /// Exit as soon as the cycle settles.
    #[default]
    OnSettle,
    /// Stay perched while settled; exit when a replay resets the stage.
    OnReset,
}

/// Timing of the wipe reveal.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Expansion length in seconds.
    pub duration_s: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { duration_s: 2.6 }
    }
}

/// Timing of the glyph flight.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphConfig {
    /// Entrance flight length in seconds.
    pub enter_duration_s: f64,
    /// Outline draw-in length in seconds.
    pub draw_duration_s: f64,
    /// Exit flight length in seconds.
    pub exit_duration_s: f64,
    /// When the exit starts.
    pub exit_policy: GlyphExitPolicy,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            enter_duration_s: 2.1,
            draw_duration_s: 1.8,
            exit_duration_s: 0.6,
            exit_policy: GlyphExitPolicy::OnSettle,
        }
    }
}

/// Every tunable of a transition. Defaults reproduce the reference performance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Delay between mount and the automatic first trigger.
    pub auto_start_delay_ms: u64,
    /// Delay between a trigger and the settle transition in [`SettleMode::FixedDelay`].
    pub settle_delay_ms: u64,
    /// Delay between a replay's reset and its trigger.
    pub replay_delay_ms: u64,
    /// Settle strategy.
    pub settle_mode: SettleMode,
    /// Wipe reveal timing.
    pub reveal: RevealConfig,
    /// Glyph flight timing.
    pub glyph: GlyphConfig,
    /// Host-supplied images.
    pub assets: SceneAssets,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            auto_start_delay_ms: 900,
            settle_delay_ms: 2800,
            replay_delay_ms: 220,
            settle_mode: SettleMode::FixedDelay,
            reveal: RevealConfig::default(),
            glyph: GlyphConfig::default(),
            assets: SceneAssets::default(),
        }
    }
}

impl TransitionConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> MorphResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> MorphResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Reject timings no timeline can play and invalid asset paths.
    pub fn validate(&self) -> MorphResult<()> {
        for (name, value) in [
            ("reveal.duration_s", self.reveal.duration_s),
            ("glyph.enter_duration_s", self.glyph.enter_duration_s),
            ("glyph.draw_duration_s", self.glyph.draw_duration_s),
            ("glyph.exit_duration_s", self.glyph.exit_duration_s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MorphError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        self.assets.validate()?;

        if self.settle_mode == SettleMode::FixedDelay
            && (self.settle_delay_ms as f64) < self.reveal_duration_ms()
        {
            tracing::warn!(
                settle_delay_ms = self.settle_delay_ms,
                reveal_ms = self.reveal_duration_ms(),
                "settle delay is shorter than the reveal; cycles will settle mid-wipe"
            );
        }
        Ok(())
    }

    fn reveal_duration_ms(&self) -> f64 {
        self.reveal.duration_s * 1000.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
