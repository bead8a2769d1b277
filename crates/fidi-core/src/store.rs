//! Lock-free parameter store shared between a control thread and the audio thread.
//!
//! [`ParamStore`] holds one `AtomicU32` (f32 bit-cast) per parameter. The
//! control thread calls [`set`](ParamStore::set); the audio thread calls
//! [`snapshot`](ParamStore::snapshot) once at the top of each block.
//!
//! Each value is read independently. A snapshot taken while the control
//! thread is mid-update can mix old and new values; the engine smooths
//! every parameter on its own, so no cross-parameter atomicity is needed.
//!
//! Share it with `Arc<ParamStore>`.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::params::{CompressorParams, ParamIndex};

/// Atomic storage for the seven compressor parameters.
#[derive(Debug)]
pub struct ParamStore {
    values: [AtomicU32; ParamIndex::COUNT],
}

impl ParamStore {
    /// Create a store initialized to the descriptor defaults.
    pub fn new() -> Self {
        Self::from_params(&CompressorParams::default())
    }

    /// Create a store initialized from a snapshot (values are clamped).
    pub fn from_params(params: &CompressorParams) -> Self {
        let params = params.sanitized();
        Self {
            values: ParamIndex::ALL.map(|param| AtomicU32::new(params.get(param).to_bits())),
        }
    }

    /// Read one parameter (lock-free).
    #[inline]
    pub fn get(&self, param: ParamIndex) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Acquire))
    }

    /// Write one parameter (lock-free). Clamps to the descriptor range.
    #[inline]
    pub fn set(&self, param: ParamIndex, value: f32) {
        let clamped = param.descriptor().clamp(value);
        self.values[param.index()].store(clamped.to_bits(), Ordering::Release);
    }

    /// Write every parameter from a snapshot.
    pub fn store_all(&self, params: &CompressorParams) {
        for param in ParamIndex::ALL {
            self.set(param, params.get(param));
        }
    }

    /// Read every parameter once.
    ///
    /// Called by the audio thread at the top of each block.
    #[inline]
    pub fn snapshot(&self) -> CompressorParams {
        CompressorParams {
            threshold_db: self.get(ParamIndex::Threshold),
            ratio: self.get(ParamIndex::Ratio),
            attack_ms: self.get(ParamIndex::Attack),
            release_ms: self.get(ParamIndex::Release),
            knee_db: self.get(ParamIndex::Knee),
            makeup_db: self.get(ParamIndex::Makeup),
            mix_percent: self.get(ParamIndex::Mix),
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}
