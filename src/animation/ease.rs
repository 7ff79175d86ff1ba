/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve mapping normalized progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ease {
    /// First control point x, expected in `[0, 1]`.
    pub x1: f64,
    /// First control point y.
    pub y1: f64,
    /// Second control point x, expected in `[0, 1]`.
    pub x2: f64,
    /// Second control point y.
    pub y2: f64,
}

impl Ease {
    /// Fast start, long soft landing. Drives the reveal, the glyph entrance and the feathers.
    pub const SWEEP: Self = Self::new(0.16, 1.0, 0.3, 1.0);

    /// Accelerating departure used when the glyph leaves the scene.
    pub const EXIT: Self = Self::new(0.4, 0.0, 1.0, 1.0);

    /// Curve through control points `(x1, y1)` and `(x2, y2)`.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Apply this curve to normalized progress `t`; `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        cubic_bezier(t.clamp(0.0, 1.0), self.x1, self.y1, self.x2, self.y2)
    }
}

fn cubic_bezier(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    // Solve u such that bx(u) = x, then return by(u).
    fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }
    fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    let mut t = x;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t) - x;
        let d = sample_curve_derivative(x1, x2, t);
        if d.abs() < 1e-7 {
            break;
        }
        t = (t - x_t / d).clamp(0.0, 1.0);
    }

    // Newton can stall on flat segments; tighten with bisection around the estimate.
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..24 {
        let x_t = sample_curve(x1, x2, t);
        if (x_t - x).abs() < 1e-9 {
            break;
        }
        if x_t < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
