//! Level conversions and coefficient math for the compressor.
//!
//! Everything here is pure, allocation-free and `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Coefficients
//!
//! - [`time_to_coefficient`] - One-pole speed coefficient from a time constant
//! - [`percent_to_fraction`] - Mix percent to a blend fraction
//!
//! # Sanitizing
//!
//! - [`finite_or`] / [`sanitize_sample`] - Replace non-finite values with neutral ones
//! - [`parallel_mix`] - Dry/wet blend used by the block loop

use libm::{expf, expm1, logf};

/// Smallest linear level fed to a logarithm (-200 dB).
pub const LEVEL_FLOOR: f32 = 1e-10;

/// [`LEVEL_FLOOR`] expressed in decibels.
pub const LEVEL_FLOOR_DB: f32 = -200.0;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use fidi_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The operand is clamped to [`LEVEL_FLOOR`] first, so silence maps to
/// [`LEVEL_FLOOR_DB`] instead of negative infinity. NaN maps to the floor too.
///
/// # Example
/// ```rust
/// use fidi_core::{linear_to_db, LEVEL_FLOOR_DB};
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert!((linear_to_db(0.0) - LEVEL_FLOOR_DB).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    // `max` returns the non-NaN operand, so NaN lands on the floor as well.
    logf(linear.max(LEVEL_FLOOR)) * FACTOR
}

/// One-pole speed coefficient for a time constant.
///
/// Returns `1 - exp(-1 / (sample_rate * time_ms / 1000))`, the `x` in the
/// recurrence `state += x * (target - state)`. Long times give values near
/// 0 (slow pursuit), short times values near 1 (snap to target).
///
/// Non-positive or non-finite inputs yield `0.0`.
///
/// Computed with `expm1` in `f64` so that long release times at high sample
/// rates (where the coefficient is ~1e-6) keep their precision.
///
/// # Example
/// ```rust
/// use fidi_core::time_to_coefficient;
///
/// let fast = time_to_coefficient(1.0, 48000.0);
/// let slow = time_to_coefficient(100.0, 48000.0);
/// assert!(fast > slow);
/// assert_eq!(time_to_coefficient(0.0, 48000.0), 0.0);
/// ```
#[inline]
pub fn time_to_coefficient(time_ms: f64, sample_rate: f64) -> f64 {
    if !(time_ms > 0.0 && sample_rate > 0.0) {
        return 0.0;
    }
    let samples = sample_rate * time_ms * 0.001;
    let coeff = -expm1(-1.0 / samples);
    if coeff.is_finite() { coeff } else { 0.0 }
}

/// Convert a percentage (0–100) to a fraction (0–1), clamped.
#[inline]
pub fn percent_to_fraction(percent: f32) -> f32 {
    finite_or(percent / 100.0, 1.0).clamp(0.0, 1.0)
}

/// Return `value` if it is finite, otherwise `fallback`.
#[inline]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Replace NaN/Inf output samples with silence.
#[inline]
pub fn sanitize_sample(x: f32) -> f32 {
    finite_or(x, 0.0)
}

/// Values smaller than this are flushed to zero by [`flush_denormal`].
///
/// Leaves a wide margin above the subnormal range of both `f32` and `f64`.
pub const DENORMAL_THRESHOLD: f32 = 1e-20;

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal arithmetic can run up to 100x slower on common CPUs. Use this on
/// state that decays toward zero indefinitely, such as a linear envelope
/// during silence.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD { 0.0 } else { x }
}

/// `f64` variant of [`flush_denormal`] with the same threshold.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal_f64(x: f64) -> f64 {
    if x.abs() < f64::from(DENORMAL_THRESHOLD) { 0.0 } else { x }
}

/// Parallel blend: `dry * (1 - mix) + wet * mix`.
///
/// Written in the two-product form so that `mix = 0` returns `dry` and
/// `mix = 1` returns `wet` bit-exactly.
#[inline]
pub fn parallel_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-38), 0.0);

        assert_eq!(flush_denormal_f64(0.25), 0.25);
        assert_eq!(flush_denormal_f64(1e-19), 1e-19);
        assert_eq!(flush_denormal_f64(1e-21), 0.0);
        assert_eq!(flush_denormal_f64(1e-310), 0.0);
        assert_eq!(flush_denormal_f64(0.0), 0.0);
    }

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!(
            (original - back).abs() < 1e-5,
            "Roundtrip failed: {} -> {} -> {}",
            original,
            db,
            back
        );
    }

    #[test]
    fn test_db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((db_to_linear(6.0206) - 2.0).abs() < 0.001);
    }

    #[test]
    fn linear_to_db_floors_silence_and_nan() {
        assert!((linear_to_db(0.0) - LEVEL_FLOOR_DB).abs() < 1e-3);
        assert!((linear_to_db(-1.0) - LEVEL_FLOOR_DB).abs() < 1e-3);
        assert!((linear_to_db(f32::NAN) - LEVEL_FLOOR_DB).abs() < 1e-3);
    }

    #[test]
    fn coefficient_matches_closed_form() {
        let sr = 44100.0;
        let expected = 1.0 - (-1.0 / (sr * 0.010_f64)).exp();
        let got = time_to_coefficient(10.0, sr);
        assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
    }

    #[test]
    fn coefficient_is_monotonic_in_time() {
        let sr = 48000.0;
        let mut previous = 1.0;
        for time_ms in [0.1, 1.0, 10.0, 100.0, 1000.0, 3000.0] {
            let coeff = time_to_coefficient(time_ms, sr);
            assert!(coeff > 0.0 && coeff < 1.0);
            assert!(coeff < previous, "{time_ms} ms should be slower");
            previous = coeff;
        }
    }

    #[test]
    fn coefficient_degenerate_inputs_are_zero() {
        assert_eq!(time_to_coefficient(0.0, 48000.0), 0.0);
        assert_eq!(time_to_coefficient(-5.0, 48000.0), 0.0);
        assert_eq!(time_to_coefficient(10.0, 0.0), 0.0);
        assert_eq!(time_to_coefficient(10.0, -44100.0), 0.0);
        assert_eq!(time_to_coefficient(f64::NAN, 48000.0), 0.0);
    }

    #[test]
    fn coefficient_keeps_precision_for_long_times() {
        // 3 s at 192 kHz: 1 / 576000 samples.
        let coeff = time_to_coefficient(3000.0, 192_000.0);
        let approx = 1.0 / 576_000.0;
        assert!((coeff - approx).abs() / approx < 1e-5);
    }

    #[test]
    fn percent_conversion_clamps() {
        assert_eq!(percent_to_fraction(50.0), 0.5);
        assert_eq!(percent_to_fraction(150.0), 1.0);
        assert_eq!(percent_to_fraction(-10.0), 0.0);
        assert_eq!(percent_to_fraction(f32::NAN), 1.0);
    }

    #[test]
    fn parallel_mix_extremes_are_exact() {
        let dry = 0.3712;
        let wet = 0.1234;
        assert_eq!(parallel_mix(dry, wet, 0.0), dry);
        assert_eq!(parallel_mix(dry, wet, 1.0), wet);
    }

    #[test]
    fn sanitize_replaces_non_finite() {
        assert_eq!(sanitize_sample(f32::NAN), 0.0);
        assert_eq!(sanitize_sample(f32::INFINITY), 0.0);
        assert_eq!(sanitize_sample(-0.25), -0.25);
    }
}
