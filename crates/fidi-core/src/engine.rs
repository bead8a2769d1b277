//! Gain-computation engine: parameter smoothing, envelope follower, knee curve.
//!
//! One [`GainComputer`] serves one detection group. Stereo-linked processing
//! feeds it a single level per frame and applies the returned gain to both
//! channels.
//!
//! # Signal Flow
//!
//! ```text
//! |input| → sanitize → Envelope Follower → dB → Knee Curve → 10^(-GR/20) → clamp → gain
//!                           ↑                       ↑
//!              smoothed attack/release     smoothed T, R, W
//! ```
//!
//! # Per-call Steps
//!
//! 1. Smooth every target (threshold, ratio, knee, mix, makeup, attack and
//!    release coefficients) with the 30 ms one-pole smoother, every sample or
//!    once per `smoothing_interval` samples.
//! 2. Follow the level with the smoothed attack coefficient when the input is
//!    above the envelope and the smoothed release coefficient otherwise.
//! 3. Evaluate the [`KneeCurve`](crate::KneeCurve) on the envelope in dB.
//! 4. Convert the reduction to a multiplier; non-finite becomes `1.0`, the
//!    result is clamped to `[0, 1]`.
//!
//! Nothing here allocates, locks or returns an error.

use crate::coefficients::{Coefficients, DerivedParams};
use crate::config::{EngineConfig, EnvelopeDomain};
use crate::math::{LEVEL_FLOOR_DB, db_to_linear, finite_or, flush_denormal_f64, linear_to_db};
use crate::params::CompressorParams;

/// Upper bound of the per-batch smoothing coefficient.
///
/// Batched smoothing scales the per-sample coefficient by the interval; the
/// product must stay below 1 or the smoother would overshoot its target.
pub const MAX_BATCH_SMOOTHING_COEFF: f64 = 0.999;

/// Largest input magnitude the follower accepts (+200 dBFS).
const MAX_INPUT_LEVEL: f32 = 1e10;

/// Stateful gain computer for one detection group.
///
/// # Example
///
/// ```rust
/// use fidi_core::{Coefficients, CompressorParams, EngineConfig, GainComputer};
///
/// let coeffs = Coefficients::new(48000.0);
/// let params = CompressorParams { knee_db: 0.0, ..CompressorParams::default() };
///
/// let mut engine = GainComputer::new(EngineConfig::default());
/// engine.update(&coeffs, &params);
/// engine.reset();
///
/// // -10 dBFS steady input against a -20 dB threshold at 4:1.
/// let level = 10f32.powf(-10.0 / 20.0);
/// let mut gain = 1.0;
/// for _ in 0..48000 {
///     gain = engine.compute_gain_reduction(level);
/// }
/// assert!((gain - 0.4217).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GainComputer {
    config: EngineConfig,
    /// Raw values the smoothed copies chase.
    targets: DerivedParams,
    smoothing_coeff: f64,
    /// dB in [`EnvelopeDomain::Decibel`], linear magnitude otherwise.
    envelope: f64,
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
    mix: f32,
    makeup_linear: f32,
    attack_coeff: f64,
    release_coeff: f64,
    /// Samples left until the next batched smoothing step.
    smoothing_countdown: u32,
    last_gain_reduction_db: f32,
}

impl GainComputer {
    /// Create an engine at the default parameters and 44.1 kHz.
    ///
    /// Call [`update`](Self::update) and [`reset`](Self::reset) before
    /// processing real material.
    pub fn new(config: EngineConfig) -> Self {
        let config = config.with_smoothing_interval(config.smoothing_interval);
        let targets = DerivedParams::default();
        let mut engine = Self {
            config,
            targets,
            smoothing_coeff: Coefficients::default().smoothing_coeff(),
            envelope: 0.0,
            threshold_db: targets.threshold_db,
            ratio: targets.ratio,
            knee_db: targets.knee_db,
            mix: targets.mix,
            makeup_linear: targets.makeup_linear,
            attack_coeff: targets.attack_coeff,
            release_coeff: targets.release_coeff,
            smoothing_countdown: 0,
            last_gain_reduction_db: 0.0,
        };
        engine.reset();
        engine
    }

    /// Engine configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Refresh the smoothing coefficient and targets from a parameter snapshot.
    ///
    /// Called once per block, before the per-sample loop.
    #[inline]
    pub fn update(&mut self, coefficients: &Coefficients, params: &CompressorParams) {
        self.smoothing_coeff = coefficients.smoothing_coeff();
        self.targets = coefficients.derive(params);
    }

    /// Replace the targets directly.
    #[inline]
    pub fn set_targets(&mut self, targets: DerivedParams) {
        self.targets = targets;
    }

    /// Set the per-sample smoothing coefficient (clamped to `[0, 1]`).
    #[inline]
    pub fn set_smoothing_coeff(&mut self, coeff: f64) {
        self.smoothing_coeff = if coeff.is_nan() { 1.0 } else { coeff.clamp(0.0, 1.0) };
    }

    /// Current targets.
    pub fn targets(&self) -> &DerivedParams {
        &self.targets
    }

    /// Return to the initialized state.
    ///
    /// The envelope drops to silence and every smoothed value snaps to its
    /// target. Call before the first block, after a sample-rate change and
    /// on transport restart.
    pub fn reset(&mut self) {
        self.envelope = match self.config.envelope_domain {
            EnvelopeDomain::Decibel => f64::from(LEVEL_FLOOR_DB),
            EnvelopeDomain::Linear => 0.0,
        };
        self.threshold_db = self.targets.threshold_db;
        self.ratio = self.targets.ratio;
        self.knee_db = self.targets.knee_db;
        self.mix = self.targets.mix;
        self.makeup_linear = self.targets.makeup_linear;
        self.attack_coeff = self.targets.attack_coeff;
        self.release_coeff = self.targets.release_coeff;
        self.smoothing_countdown = 0;
        self.last_gain_reduction_db = 0.0;
    }

    /// Gain multiplier in `[0, 1]` for one sample.
    ///
    /// `input_level` is the absolute sample value (or the linked level of a
    /// frame). Negative values are rectified, NaN is treated as silence and
    /// huge values are capped, so the envelope always stays finite.
    #[inline]
    pub fn compute_gain_reduction(&mut self, input_level: f32) -> f32 {
        self.advance_smoothing();

        let level = if input_level.is_nan() {
            0.0
        } else {
            input_level.abs().min(MAX_INPUT_LEVEL)
        };

        let envelope_db = match self.config.envelope_domain {
            EnvelopeDomain::Decibel => {
                let input_db = f64::from(linear_to_db(level));
                self.follow(input_db);
                self.envelope as f32
            }
            EnvelopeDomain::Linear => {
                self.follow(f64::from(level));
                self.envelope = flush_denormal_f64(self.envelope.max(0.0));
                linear_to_db(self.envelope as f32)
            }
        };

        let reduction_db = self.config.knee_curve.gain_reduction_db(
            envelope_db,
            self.threshold_db,
            self.ratio,
            self.knee_db,
        );
        self.last_gain_reduction_db = finite_or(reduction_db, 0.0);

        finite_or(db_to_linear(-reduction_db), 1.0).clamp(0.0, 1.0)
    }

    /// Smoothed wet fraction after the latest smoothing step.
    #[inline]
    pub fn smoothed_mix(&self) -> f32 {
        self.mix
    }

    /// Smoothed linear makeup gain after the latest smoothing step.
    #[inline]
    pub fn smoothed_makeup_linear(&self) -> f32 {
        self.makeup_linear
    }

    /// Smoothed threshold in dB.
    #[inline]
    pub fn smoothed_threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Smoothed ratio.
    #[inline]
    pub fn smoothed_ratio(&self) -> f32 {
        self.ratio
    }

    /// Smoothed knee width in dB.
    #[inline]
    pub fn smoothed_knee_db(&self) -> f32 {
        self.knee_db
    }

    /// Smoothed attack and release coefficients.
    #[inline]
    pub fn smoothed_time_coeffs(&self) -> (f64, f64) {
        (self.attack_coeff, self.release_coeff)
    }

    /// Current envelope in dB regardless of the follower domain.
    pub fn envelope_db(&self) -> f32 {
        match self.config.envelope_domain {
            EnvelopeDomain::Decibel => self.envelope as f32,
            EnvelopeDomain::Linear => linear_to_db(self.envelope as f32),
        }
    }

    /// Gain reduction of the latest call in dB (non-negative).
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_reduction_db
    }

    /// One-pole follow: `envelope += coeff * (input - envelope)`.
    #[inline]
    fn follow(&mut self, input: f64) {
        let coeff = if input > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope += coeff * (input - self.envelope);
    }

    #[inline]
    fn advance_smoothing(&mut self) {
        if self.smoothing_countdown == 0 {
            let interval = self.config.smoothing_interval;
            let coeff = if interval <= 1 {
                self.smoothing_coeff
            } else {
                (self.smoothing_coeff * f64::from(interval)).min(MAX_BATCH_SMOOTHING_COEFF)
            };
            self.smooth_toward_targets(coeff);
            self.smoothing_countdown = interval.max(1);
        }
        self.smoothing_countdown -= 1;
    }

    #[inline]
    fn smooth_toward_targets(&mut self, coeff: f64) {
        let c = coeff as f32;
        let t = &self.targets;
        self.threshold_db += c * (t.threshold_db - self.threshold_db);
        self.ratio += c * (t.ratio - self.ratio);
        self.knee_db += c * (t.knee_db - self.knee_db);
        self.mix += c * (t.mix - self.mix);
        self.makeup_linear += c * (t.makeup_linear - self.makeup_linear);
        self.attack_coeff += coeff * (t.attack_coeff - self.attack_coeff);
        self.release_coeff += coeff * (t.release_coeff - self.release_coeff);
    }
}

impl Default for GainComputer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
