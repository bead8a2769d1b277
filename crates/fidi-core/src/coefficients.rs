//! Conversion from user-facing parameters to per-sample DSP values.
//!
//! [`Coefficients`] knows the sample rate and turns a [`CompressorParams`]
//! snapshot (dB, ms, percent) into a [`DerivedParams`] (linear gains,
//! fractions and one-pole coefficients). It is stateless apart from the
//! sample rate and is evaluated once per block.

use crate::math::{db_to_linear, percent_to_fraction, time_to_coefficient};
use crate::params::CompressorParams;

/// Time constant of the parameter smoother.
pub const SMOOTHING_TIME_MS: f64 = 30.0;

/// Sample rate assumed before [`Coefficients::set_sample_rate`] is called.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Per-sample values derived from a [`CompressorParams`] snapshot.
///
/// These are the targets the engine's smoothed copies chase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio, at least 1.
    pub ratio: f32,
    /// Knee width in dB, at least 0.
    pub knee_db: f32,
    /// Wet fraction in `[0, 1]`.
    pub mix: f32,
    /// Makeup gain as a linear multiplier.
    pub makeup_linear: f32,
    /// Attack speed coefficient in `[0, 1)`.
    pub attack_coeff: f64,
    /// Release speed coefficient in `[0, 1)`.
    pub release_coeff: f64,
}

impl Default for DerivedParams {
    fn default() -> Self {
        Coefficients::default().derive(&CompressorParams::default())
    }
}

/// Sample-rate-aware coefficient calculator.
///
/// # Example
///
/// ```rust
/// use fidi_core::{Coefficients, CompressorParams};
///
/// let mut coeffs = Coefficients::new(48000.0);
/// let derived = coeffs.derive(&CompressorParams::default());
/// assert!((derived.makeup_linear - 1.0).abs() < 1e-6);
///
/// coeffs.set_sample_rate(96000.0);
/// let slower = coeffs.derive(&CompressorParams::default());
/// assert!(slower.attack_coeff < derived.attack_coeff);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    sample_rate: f64,
    smoothing_coeff: f64,
}

impl Coefficients {
    /// Create a calculator for `sample_rate`.
    ///
    /// An invalid rate falls back to [`DEFAULT_SAMPLE_RATE`].
    pub fn new(sample_rate: f64) -> Self {
        let mut coeffs = Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            smoothing_coeff: 0.0,
        };
        coeffs.set_sample_rate(sample_rate);
        coeffs.recalculate();
        coeffs
    }

    /// Change the sample rate and recalculate the smoothing coefficient.
    ///
    /// Non-positive or non-finite rates are ignored.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
            self.recalculate();
        }
    }

    /// Current sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Speed coefficient of the 30 ms parameter smoother.
    #[inline]
    pub fn smoothing_coeff(&self) -> f64 {
        self.smoothing_coeff
    }

    /// One-pole coefficient for `time_ms` at the current sample rate.
    #[inline]
    pub fn coefficient(&self, time_ms: f32) -> f64 {
        time_to_coefficient(f64::from(time_ms), self.sample_rate)
    }

    /// Derive per-sample targets from a parameter snapshot.
    ///
    /// The snapshot is clamped first, so the derived ratio is at least 1,
    /// the knee non-negative and the mix inside `[0, 1]`.
    pub fn derive(&self, params: &CompressorParams) -> DerivedParams {
        let params = params.sanitized();
        DerivedParams {
            threshold_db: params.threshold_db,
            ratio: params.ratio,
            knee_db: params.knee_db,
            mix: percent_to_fraction(params.mix_percent),
            makeup_linear: db_to_linear(params.makeup_db),
            attack_coeff: self.coefficient(params.attack_ms),
            release_coeff: self.coefficient(params.release_ms),
        }
    }

    fn recalculate(&mut self) {
        self.smoothing_coeff = time_to_coefficient(SMOOTHING_TIME_MS, self.sample_rate);
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}
