//! Cross-thread gain-reduction meter.
//!
//! The audio thread publishes the minimum gain multiplier of each block; a
//! display thread consumes it at its own cadence. Publishing keeps the
//! minimum of whatever has not been consumed yet, so a slow reader still sees
//! the deepest reduction since its last read. Consuming swaps the cell back
//! to neutral (`1.0`, no reduction).
//!
//! ```text
//! audio thread                      display thread
//! ────────────                      ──────────────
//! publish_min(0.6)  ─┐
//! publish_min(0.8)  ─┼─► cell = 0.6 ──► take() → 0.6, cell = 1.0
//! publish_min(0.9)  ─┘                  take() → 1.0 (nothing new)
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use crate::math::linear_to_db;

/// Neutral reading: unity gain.
const NEUTRAL: u32 = 0x3F80_0000; // 1.0f32

/// Minimum-gain cell shared between the audio and display threads.
///
/// Share it with `Arc<GainReductionMeter>`; the audio side only ever calls
/// [`publish_min`](Self::publish_min).
#[derive(Debug)]
pub struct GainReductionMeter {
    min_gain: AtomicU32,
}

impl GainReductionMeter {
    /// Create a meter holding the neutral reading.
    pub const fn new() -> Self {
        Self {
            min_gain: AtomicU32::new(NEUTRAL),
        }
    }

    /// Merge `gain` into the cell, keeping the smaller value.
    ///
    /// Lock-free compare-and-swap loop. Non-finite gains are ignored.
    #[inline]
    pub fn publish_min(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        let gain = gain.clamp(0.0, 1.0);
        let mut current = self.min_gain.load(Ordering::Relaxed);
        while gain < f32::from_bits(current) {
            match self.min_gain.compare_exchange_weak(
                current,
                gain.to_bits(),
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Consume the reading and reset the cell to `1.0`.
    #[inline]
    pub fn take(&self) -> f32 {
        f32::from_bits(self.min_gain.swap(NEUTRAL, Ordering::AcqRel))
    }

    /// Read without consuming.
    #[inline]
    pub fn peek(&self) -> f32 {
        f32::from_bits(self.min_gain.load(Ordering::Acquire))
    }

    /// Drop any unconsumed reading.
    pub fn reset(&self) {
        self.min_gain.store(NEUTRAL, Ordering::Release);
    }

    /// Consume the reading as dB of gain reduction (positive, `0.0` when none).
    pub fn take_reduction_db(&self) -> f32 {
        let gain = self.take();
        if gain >= 1.0 {
            0.0
        } else {
            -linear_to_db(gain)
        }
    }
}

impl Default for GainReductionMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_neutral() {
        let meter = GainReductionMeter::new();
        assert_eq!(meter.peek(), 1.0);
        assert_eq!(meter.take(), 1.0);
    }

    #[test]
    fn keeps_minimum_until_taken() {
        let meter = GainReductionMeter::new();
        meter.publish_min(0.8);
        meter.publish_min(0.5);
        meter.publish_min(0.9);
        assert_eq!(meter.peek(), 0.5);
        assert_eq!(meter.take(), 0.5);
        assert_eq!(meter.take(), 1.0);
    }

    #[test]
    fn ignores_non_finite() {
        let meter = GainReductionMeter::new();
        meter.publish_min(f32::NAN);
        meter.publish_min(f32::NEG_INFINITY);
        assert_eq!(meter.peek(), 1.0);
    }

    #[test]
    fn reset_discards_reading() {
        let meter = GainReductionMeter::new();
        meter.publish_min(0.25);
        meter.reset();
        assert_eq!(meter.take(), 1.0);
    }

    #[test]
    fn reduction_db_readout() {
        let meter = GainReductionMeter::new();
        assert_eq!(meter.take_reduction_db(), 0.0);
        meter.publish_min(0.5);
        assert!((meter.take_reduction_db() - 6.0206).abs() < 1e-3);
        assert_eq!(meter.peek(), 1.0);
    }
}
