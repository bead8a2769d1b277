//! Static transfer curve: envelope level in dB to gain reduction in dB.
//!
//! Given threshold `T`, ratio `R` and knee width `W` (half-knee `h = W/2`):
//!
//! - `L <= T - h`: no reduction.
//! - `L >= T + h`: `(L - T) * (1 - 1/R)`.
//! - Inside the knee the curve blends between the two according to a
//!   [`KneeCurve`]. With `p = (L - (T - h)) / W` in `[0, 1]`:
//!
//! | Curve | Reduction inside the knee |
//! |-------|---------------------------|
//! | [`LinearRatio`](KneeCurve::LinearRatio) | `p*h * (1 - 1/R_eff)`, `R_eff = 1 + (R-1)*p` |
//! | [`QuadraticRatio`](KneeCurve::QuadraticRatio) | `p*h * (1 - 1/R_eff)`, `R_eff = 1 + (R-1)*p²` |
//! | [`QuadraticBlend`](KneeCurve::QuadraticBlend) | `(L - T + h)² / (2W) * (1 - 1/R)` |
//!
//! All three are zero at the lower knee edge, equal the above-knee formula
//! at the upper edge and are non-decreasing in `L`. `QuadraticBlend` is also
//! slope-continuous at both edges.

use core::fmt;
use core::str::FromStr;

use crate::config::ParseConfigError;

/// Interpolation used inside the soft knee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KneeCurve {
    /// Effective ratio rises linearly from 1 to `R` across the knee.
    #[default]
    LinearRatio,
    /// Effective ratio rises with the square of the knee position.
    QuadraticRatio,
    /// Quadratic blend of the full above-knee reduction.
    QuadraticBlend,
}

impl KneeCurve {
    /// All curves, in declaration order.
    pub const ALL: [KneeCurve; 3] = [
        KneeCurve::LinearRatio,
        KneeCurve::QuadraticRatio,
        KneeCurve::QuadraticBlend,
    ];

    /// Name used by settings files and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            KneeCurve::LinearRatio => "linear-ratio",
            KneeCurve::QuadraticRatio => "quadratic-ratio",
            KneeCurve::QuadraticBlend => "quadratic-blend",
        }
    }

    /// Gain reduction in dB (non-negative) for an envelope level in dB.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fidi_core::KneeCurve;
    ///
    /// // Hard knee, 10 dB over a -20 dB threshold at 4:1.
    /// let reduction = KneeCurve::LinearRatio.gain_reduction_db(-10.0, -20.0, 4.0, 0.0);
    /// assert!((reduction - 7.5).abs() < 1e-5);
    /// ```
    #[inline]
    pub fn gain_reduction_db(self, level_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
        let half_knee = knee_db * 0.5;

        if level_db <= threshold_db - half_knee {
            return 0.0;
        }

        if level_db >= threshold_db + half_knee {
            let over = level_db - threshold_db;
            return over - over / ratio;
        }

        // Only reachable with a positive knee width.
        let into_knee = level_db - (threshold_db - half_knee);
        let position = into_knee / knee_db;

        match self {
            KneeCurve::LinearRatio => {
                let over = position * half_knee;
                let effective_ratio = 1.0 + (ratio - 1.0) * position;
                over - over / effective_ratio
            }
            KneeCurve::QuadraticRatio => {
                let over = position * half_knee;
                let effective_ratio = 1.0 + (ratio - 1.0) * position * position;
                over - over / effective_ratio
            }
            KneeCurve::QuadraticBlend => {
                (1.0 - 1.0 / ratio) * into_knee * into_knee / (2.0 * knee_db)
            }
        }
    }
}

/// Static transfer curve, independent of any engine state.
///
/// Same as [`KneeCurve::gain_reduction_db`] with the ratio raised to at least
/// 1 and the knee width to at least 0, so out-of-contract settings still give
/// a non-negative reduction.
///
/// # Example
///
/// ```rust
/// use fidi_core::{KneeCurve, static_curve};
///
/// let reduction = static_curve(-10.0, -20.0, 4.0, 0.0, KneeCurve::LinearRatio);
/// let output_db = -10.0 - reduction;
/// assert!((output_db - (-17.5)).abs() < 1e-4);
/// ```
pub fn static_curve(
    level_db: f32,
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
    curve: KneeCurve,
) -> f32 {
    let ratio = if ratio >= 1.0 { ratio } else { 1.0 };
    let knee_db = if knee_db > 0.0 { knee_db } else { 0.0 };
    curve.gain_reduction_db(level_db, threshold_db, ratio, knee_db).max(0.0)
}

impl fmt::Display for KneeCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KneeCurve {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALIASES: [(&str, KneeCurve); 5] = [
            ("linear-ratio", KneeCurve::LinearRatio),
            ("linear", KneeCurve::LinearRatio),
            ("quadratic-ratio", KneeCurve::QuadraticRatio),
            ("quadratic-blend", KneeCurve::QuadraticBlend),
            ("quadratic", KneeCurve::QuadraticBlend),
        ];
        let s = s.trim();
        ALIASES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, curve)| curve)
            .ok_or(ParseConfigError::UnknownKneeCurve)
    }
}
