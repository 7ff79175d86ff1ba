//! Deterministic feather (particle) fields.
//!
//! A field is a pure function of the cycle it belongs to. Every attribute is derived from a
//! per-particle seed with fixed modulo transforms, so no random source is involved and a replayed
//! cycle always reproduces the same field.

use crate::foundation::core::Vec2;
use crate::foundation::math::Fnv1a64;

/// Number of feathers in every field.
pub const FEATHER_COUNT: usize = 14;

/// Multiplier turning a 1-based feather index into its seed.
pub const SEED_STRIDE: u32 = 137;

/// Seconds between the start of consecutive feathers.
pub const DELAY_STEP_S: f64 = 0.07;

/// One feather of a [`FeatherField`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleDescriptor {
    /// Index in `0..FEATHER_COUNT`, unique and stable within a cycle.
    pub id: u32,
    /// Signed starting rotation in degrees; negative for even ids.
    pub angle: i32,
    /// Offset from the scene origin in pixels.
    pub initial_offset: Vec2,
    /// Drift magnitude in pixels.
    pub travel_distance: u32,
    /// Animation length in seconds.
    pub duration: f64,
    /// Start offset in seconds relative to the cycle's trigger.
    pub delay: f64,
    /// Hue in degrees; renderers rotate by `color_shift - 220`.
    pub color_shift: u32,
}

impl ParticleDescriptor {
    fn from_index(index: u32) -> Self {
        let seed = (index + 1) * SEED_STRIDE;
        let sign = if index % 2 == 0 { -1 } else { 1 };
        Self {
            id: index,
            angle: sign * (14 + (seed % 11) as i32),
            initial_offset: Vec2::new(
                -30.0 + f64::from(seed % 60),
                -30.0 + f64::from((seed >> 3) % 40),
            ),
            travel_distance: 120 + (seed >> 5) % 90,
            duration: 1.4 + f64::from(seed % 7) * 0.15,
            delay: f64::from(index) * DELAY_STEP_S,
            color_shift: 215 + (seed >> 4) % 15,
        }
    }

    /// Hue rotation a renderer applies to the feather's base gradient.
    pub fn hue_rotate_deg(&self) -> i32 {
        self.color_shift as i32 - 220
    }

    /// Extra rotation picked up while drifting; far-travelling feathers spin harder.
    pub fn spin_deg(&self) -> f64 {
        if self.travel_distance > 140 { 160.0 } else { 90.0 }
    }
}

/// The ordered feathers owned by one cycle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatherField {
    cycle: u64,
    particles: Vec<ParticleDescriptor>,
}

impl FeatherField {
    /// Generate the field for `cycle`.
    pub fn generate(cycle: u64) -> Self {
        let particles = (0..FEATHER_COUNT as u32)
            .map(ParticleDescriptor::from_index)
            .collect();
        Self { cycle, particles }
    }

    /// Cycle this field belongs to.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Feathers in id order.
    pub fn particles(&self) -> &[ParticleDescriptor] {
        &self.particles
    }

    /// Number of feathers, always [`FEATHER_COUNT`].
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Never true for generated fields.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Stable digest of the cycle and every attribute.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.cycle);
        for p in &self.particles {
            h.write_u32(p.id);
            h.write_i32(p.angle);
            h.write_f64(p.initial_offset.x);
            h.write_f64(p.initial_offset.y);
            h.write_u32(p.travel_distance);
            h.write_f64(p.duration);
            h.write_f64(p.delay);
            h.write_u32(p.color_shift);
        }
        h.finish()
    }
}

/// Produce the feather field for `cycle`.
pub fn generate(cycle: u64) -> FeatherField {
    FeatherField::generate(cycle)
}

#[cfg(test)]
#[path = "../../tests/unit/field/feather.rs"]
mod tests;
