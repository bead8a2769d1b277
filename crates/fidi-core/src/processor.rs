//! Stereo-linked block processor.
//!
//! [`Compressor`] owns one [`GainComputer`] and drives it once per frame.
//! The detection level of a frame is the largest absolute sample across its
//! channels, and the resulting gain is applied to every channel so the
//! stereo image never shifts.
//!
//! # Per-block Steps
//!
//! 1. Snapshot the [`ParamStore`] and refresh the engine targets.
//! 2. Per frame: link, compute gain, blend `dry * (1 - mix) + dry * gain * mix`,
//!    apply makeup, replace non-finite output with silence.
//! 3. Publish the block's minimum gain to the [`GainReductionMeter`].
//!
//! Processing is in place and never allocates, locks or fails.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::coefficients::Coefficients;
use crate::config::EngineConfig;
use crate::engine::GainComputer;
use crate::math::{parallel_mix, sanitize_sample};
use crate::meter::GainReductionMeter;
use crate::store::ParamStore;

/// Stereo-linked compressor driving a [`GainComputer`] over audio blocks.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fidi_core::{Compressor, EngineConfig, GainReductionMeter, ParamIndex, ParamStore};
///
/// let params = Arc::new(ParamStore::new());
/// let meter = Arc::new(GainReductionMeter::new());
/// let mut comp = Compressor::new(Arc::clone(&params), Arc::clone(&meter), EngineConfig::default());
/// params.set(ParamIndex::Threshold, -30.0);
/// params.set(ParamIndex::Attack, 0.1);
/// comp.prepare(48000.0);
///
/// let mut left = vec![0.9_f32; 512];
/// let mut right = vec![0.9_f32; 512];
/// let min_gain = comp.process_stereo_in_place(&mut left, &mut right);
/// assert!(min_gain < 1.0);
/// assert_eq!(left, right);
/// assert!(meter.take() < 1.0);
/// ```
#[derive(Debug)]
pub struct Compressor {
    params: Arc<ParamStore>,
    meter: Arc<GainReductionMeter>,
    coefficients: Coefficients,
    engine: GainComputer,
}

impl Compressor {
    /// Create a compressor at the default sample rate.
    ///
    /// The engine starts reset to the store's current values. Call
    /// [`prepare`](Self::prepare) with the real sample rate before the first
    /// block.
    pub fn new(
        params: Arc<ParamStore>,
        meter: Arc<GainReductionMeter>,
        config: EngineConfig,
    ) -> Self {
        let coefficients = Coefficients::default();
        let mut engine = GainComputer::new(config);
        engine.update(&coefficients, &params.snapshot());
        engine.reset();
        Self {
            params,
            meter,
            coefficients,
            engine,
        }
    }

    /// Prepare for playback at `sample_rate`.
    ///
    /// Re-derives every coefficient, resets the engine and drops any pending
    /// meter reading. An invalid rate keeps the previous one.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.coefficients.set_sample_rate(sample_rate);
        self.reset();
        self.meter.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = self.coefficients.sample_rate(),
            smoothing_coeff = self.coefficients.smoothing_coeff(),
            "compressor prepared"
        );
    }

    /// Reset the engine state (transport restart).
    pub fn reset(&mut self) {
        self.engine.update(&self.coefficients, &self.params.snapshot());
        self.engine.reset();
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.coefficients.sample_rate()
    }

    /// Shared parameter store.
    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    /// Shared meter.
    pub fn meter(&self) -> &Arc<GainReductionMeter> {
        &self.meter
    }

    /// The gain engine, for inspection.
    pub fn engine(&self) -> &GainComputer {
        &self.engine
    }

    /// Process a stereo block in place.
    ///
    /// Channels of different lengths are processed up to the shorter one.
    /// Returns the minimum gain of the block (`1.0` for an empty block),
    /// which is also published to the meter.
    pub fn process_stereo_in_place(&mut self, left: &mut [f32], right: &mut [f32]) -> f32 {
        self.begin_block();

        let mut min_gain = 1.0_f32;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (dry_l, dry_r) = (*l, *r);
            let level = dry_l.abs().max(dry_r.abs());
            let gain = self.engine.compute_gain_reduction(level);
            let mix = self.engine.smoothed_mix();
            let makeup = self.engine.smoothed_makeup_linear();

            *l = sanitize_sample(parallel_mix(dry_l, dry_l * gain, mix) * makeup);
            *r = sanitize_sample(parallel_mix(dry_r, dry_r * gain, mix) * makeup);
            min_gain = min_gain.min(gain);
        }

        self.end_block(min_gain)
    }

    /// Process a mono block in place; detection uses the single channel.
    pub fn process_mono_in_place(&mut self, samples: &mut [f32]) -> f32 {
        self.begin_block();

        let mut min_gain = 1.0_f32;
        for sample in samples.iter_mut() {
            let dry = *sample;
            let gain = self.engine.compute_gain_reduction(dry.abs());
            let mix = self.engine.smoothed_mix();
            let makeup = self.engine.smoothed_makeup_linear();

            *sample = sanitize_sample(parallel_mix(dry, dry * gain, mix) * makeup);
            min_gain = min_gain.min(gain);
        }

        self.end_block(min_gain)
    }

    #[inline]
    fn begin_block(&mut self) {
        let params = self.params.snapshot();
        self.engine.update(&self.coefficients, &params);
    }

    #[inline]
    fn end_block(&self, min_gain: f32) -> f32 {
        if min_gain < 1.0 {
            self.meter.publish_min(min_gain);
        }
        min_gain
    }
}
