use crate::{
    animation::{
        ease::Ease,
        tween::{Keyframes, Tween},
    },
    field::feather::{FeatherField, ParticleDescriptor},
    foundation::core::{TimeMs, Vec2},
    foundation::error::MorphResult,
    render::directive::{LayerKey, ParticleDirective},
};

/// Vertical drift relative to horizontal drift.
const DRIFT_SLOPE: f64 = 0.4;

/// Feather dispersal, released once per active period.
#[derive(Clone, Debug)]
pub struct Dispersal {
    opacity: Keyframes<f64>,
    started_at: Option<TimeMs>,
}

impl Dispersal {
    /// Build the dispersal timelines; nothing is released until [`Self::start`].
    pub fn new() -> MorphResult<Self> {
        // Fade in, then out, easing both halves.
        let opacity = Keyframes::evenly([0.0, 1.0, 0.0], Ease::SWEEP)?;
        Ok(Self {
            opacity,
            started_at: None,
        })
    }

    /// Release the feathers at `at`, restarting any flight in progress.
    pub fn start(&mut self, at: TimeMs) {
        self.started_at = Some(at);
    }

    /// Take every feather down.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Timestamp the feathers were released, if they are flying.
    pub fn started_at(&self) -> Option<TimeMs> {
        self.started_at
    }

    /// Directives for every feather of `field` at `now`, in id order; empty when stopped.
    pub fn sample(&self, field: &FeatherField, now: TimeMs) -> Vec<ParticleDirective> {
        let Some(started_at) = self.started_at else {
            return Vec::new();
        };
        let elapsed = now.secs_since(started_at);
        field
            .particles()
            .iter()
            .map(|p| self.sample_one(p, field.cycle(), elapsed))
            .collect()
    }

    fn sample_one(&self, p: &ParticleDescriptor, cycle: u64, elapsed_s: f64) -> ParticleDirective {
        let flight = Tween::new(0.0, 1.0, p.duration, Ease::SWEEP).delayed(p.delay);
        let progress = flight.progress(elapsed_s);
        let e = flight.sample(elapsed_s);
        let distance = f64::from(p.travel_distance);

        ParticleDirective {
            key: LayerKey::Particle { id: p.id, cycle },
            offset: p.initial_offset + Vec2::new(distance * e, distance * DRIFT_SLOPE * e),
            rotate_deg: f64::from(p.angle) + p.spin_deg() * e,
            opacity: self.opacity.sample(progress),
            hue_rotate_deg: p.hue_rotate_deg(),
            progress,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dispersal.rs"]
mod tests;
