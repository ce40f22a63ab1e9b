//! Easing helpers:
//! - lerp (scalar interpolation)
//! - CubicBezier (parametric cubic-bezier timing curve)
//! - progress (clamped elapsed/duration)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic Bezier basis function.
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Timing curve with endpoints fixed at (0,0) and (1,1).
///
/// Serialized as `[x1, y1, x2, y2]`, the same order as CSS `cubic-bezier()`.
/// The curve is sampled parametrically: progress is fed straight in as the
/// bezier parameter and only the y control values shape the output. The x
/// values are kept so the curve round-trips to CSS unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for raw progress `t` in [0,1].
    #[inline]
    pub fn ease(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        cubic_bezier(0.0, self.y1, self.y2, 1.0, t)
    }

    /// `from + (to - from) * ease(t)`.
    #[inline]
    pub fn interpolate(&self, from: f64, to: f64, t: f64) -> f64 {
        lerp(from, to, self.ease(t))
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::new(0.4, 0.0, 0.2, 1.0)
    }
}

impl From<[f64; 4]> for CubicBezier {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<CubicBezier> for [f64; 4] {
    fn from(c: CubicBezier) -> Self {
        [c.x1, c.y1, c.x2, c.y2]
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// `min(elapsed / duration, 1)` with negative elapsed treated as zero.
/// A non-positive duration is already complete.
#[inline]
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if !(duration_ms > 0.0) {
        return 1.0;
    }
    (elapsed_ms.max(0.0) / duration_ms).min(1.0)
}
