use crate::{
    animation::ease::Ease,
    foundation::core::{Point, Vec2},
    foundation::error::{MorphError, MorphResult},
};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Interpolate from `a` (`t = 0`) to `b` (`t = 1`). `t` may leave `[0, 1]` for overshooting eases.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

/// A single eased transition from `from` to `to`, measured in seconds from its start.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    /// Value before and at the start of the tween.
    pub from: T,
    /// Value at and after the end of the tween.
    pub to: T,
    /// Seconds to hold `from` before interpolation starts.
    pub delay_s: f64,
    /// Interpolation length in seconds.
    pub duration_s: f64,
    /// Timing curve applied to normalized progress.
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// Build a tween with no delay.
    pub fn new(from: T, to: T, duration_s: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay_s: 0.0,
            duration_s,
            ease,
        }
    }

    /// Same tween, starting `delay_s` seconds later.
    pub fn delayed(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    /// Linear progress in `[0, 1]` at `elapsed_s` seconds after the tween was started.
    pub fn progress(&self, elapsed_s: f64) -> f64 {
        let local = elapsed_s - self.delay_s;
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration_s <= 0.0 {
            return 1.0;
        }
        (local / self.duration_s).clamp(0.0, 1.0)
    }

    /// Sample the eased value at `elapsed_s`.
    pub fn sample(&self, elapsed_s: f64) -> T {
        let p = self.progress(elapsed_s);
        if p <= 0.0 {
            return self.from.clone();
        }
        if p >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(p))
    }

    /// Return `true` once the tween has reached `to`.
    pub fn is_complete(&self, elapsed_s: f64) -> bool {
        self.progress(elapsed_s) >= 1.0
    }
}

/// Values placed at normalized offsets of a parent timeline.
///
/// Tracks are validated when built: at least one key, offsets finite within `[0, 1]` and sorted.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>,
}

/// One key of a [`Keyframes`] track.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Normalized position in `[0, 1]`.
    pub offset: f64,
    /// Value at this key.
    pub value: T,
    /// Ease applied toward the next key.
    pub ease: Ease,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    /// Validate and wrap `keys`.
    pub fn new(keys: Vec<Keyframe<T>>) -> MorphResult<Self> {
        if keys.is_empty() {
            return Err(MorphError::animation("Keyframes must have at least one key"));
        }
        if !keys
            .iter()
            .all(|k| k.offset.is_finite() && (0.0..=1.0).contains(&k.offset))
        {
            return Err(MorphError::animation(
                "Keyframes offsets must be finite and within [0, 1]",
            ));
        }
        if !keys.windows(2).all(|w| w[0].offset <= w[1].offset) {
            return Err(MorphError::animation(
                "Keyframes keys must be sorted by offset",
            ));
        }
        Ok(Self { keys })
    }

    /// Spread `values` evenly over `[0, 1]`, easing every segment with `ease`.
    pub fn evenly(values: impl IntoIterator<Item = T>, ease: Ease) -> MorphResult<Self> {
        let values: Vec<T> = values.into_iter().collect();
        let last = values.len().saturating_sub(1).max(1) as f64;
        let keys = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Keyframe {
                offset: i as f64 / last,
                value,
                ease,
            })
            .collect();
        Self::new(keys)
    }

    /// Keys in offset order.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Sample at normalized progress `p`; clamps to the first and last key outside their span.
    pub fn sample(&self, p: f64) -> T {
        // Non-empty by construction.
        let idx = self.keys.partition_point(|k| k.offset <= p);
        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return a.value.clone();
        }
        let local = (p - a.offset) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(local))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
