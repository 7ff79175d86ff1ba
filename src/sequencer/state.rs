use crate::foundation::core::TimeMs;

/// Coarse phase of a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for a trigger; nothing is flying.
    #[default]
    Idle,
    /// Reveal, glyph flight and dispersal are playing.
    Active,
    /// The cycle finished; the revealed image persists until the next trigger.
    Settled,
}

/// The sequencer's observable state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionState {
    /// Current stage.
    pub stage: Stage,
    /// Current cycle; only ever incremented.
    pub cycle: u64,
}

/// One stage change, reported to callers for logging and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StageTransition {
    /// When the change happened.
    pub at: TimeMs,
    /// Cycle after the change.
    pub cycle: u64,
    /// Stage before.
    pub from: Stage,
    /// Stage after.
    pub to: Stage,
}

/// What became of a replay request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayOutcome {
    /// A new cycle was started; its trigger is pending.
    Started {
        /// The new cycle.
        cycle: u64,
    },
    /// Ignored because a performance is in flight.
    Dropped,
    /// Ignored because an earlier replay has not triggered yet.
    Absorbed,
}

/// Presentation of the replay control for the current stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TriggerControl {
    /// Visible caption.
    pub label: &'static str,
    /// Accessible name.
    pub aria_label: &'static str,
    /// Whether pressing the control would be honored.
    pub enabled: bool,
}

impl TriggerControl {
    /// Control state for `stage`.
    pub fn for_stage(stage: Stage) -> Self {
        let active = stage == Stage::Active;
        Self {
            label: if active {
                "Summoning…"
            } else {
                "Replay the Raven"
            },
            aria_label: "Replay transition",
            enabled: !active,
        }
    }
}
