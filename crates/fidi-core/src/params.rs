//! The compressor's seven user-facing parameters.
//!
//! [`CompressorParams`] is a plain value snapshot in user units (dB, ms,
//! percent). [`ParamIndex`] names each parameter and maps it to its
//! [`ParamDescriptor`].
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Threshold | -60.0–0.0 dB | -20.0 |
//! | 1 | Ratio | 1.0–20.0 | 4.0 |
//! | 2 | Attack | 0.1–300.0 ms | 10.0 |
//! | 3 | Release | 10.0–3000.0 ms | 100.0 |
//! | 4 | Knee | 0.0–20.0 dB | 6.0 |
//! | 5 | Makeup | -12.0–24.0 dB | 0.0 |
//! | 6 | Mix | 0–100 % | 100 |

use crate::param_info::{ParamDescriptor, ParamId};

const THRESHOLD: ParamDescriptor =
    ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -20.0)
        .with_id(ParamId(1), "threshold_db");

const RATIO: ParamDescriptor = ParamDescriptor::ratio().with_id(ParamId(2), "ratio");

const ATTACK: ParamDescriptor = ParamDescriptor::time_ms("Attack", "Attack", 0.1, 300.0, 10.0)
    .with_id(ParamId(3), "attack_ms");

const RELEASE: ParamDescriptor = ParamDescriptor::time_ms("Release", "Release", 10.0, 3000.0, 100.0)
    .with_step(1.0)
    .with_id(ParamId(4), "release_ms");

const KNEE: ParamDescriptor =
    ParamDescriptor::gain_db("Knee", "Knee", 0.0, 20.0, 6.0).with_id(ParamId(5), "knee_db");

const MAKEUP: ParamDescriptor =
    ParamDescriptor::gain_db("Makeup", "Makeup", -12.0, 24.0, 0.0).with_id(ParamId(6), "makeup_db");

const MIX: ParamDescriptor = ParamDescriptor::mix().with_id(ParamId(7), "mix_percent");

/// Names one of the seven compressor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamIndex {
    /// Threshold in dB.
    Threshold,
    /// Compression ratio (n:1).
    Ratio,
    /// Attack time in ms.
    Attack,
    /// Release time in ms.
    Release,
    /// Knee width in dB.
    Knee,
    /// Makeup gain in dB.
    Makeup,
    /// Wet/dry mix in percent.
    Mix,
}

impl ParamIndex {
    /// Number of parameters.
    pub const COUNT: usize = 7;

    /// All parameters in index order.
    pub const ALL: [ParamIndex; Self::COUNT] = [
        ParamIndex::Threshold,
        ParamIndex::Ratio,
        ParamIndex::Attack,
        ParamIndex::Release,
        ParamIndex::Knee,
        ParamIndex::Makeup,
        ParamIndex::Mix,
    ];

    /// Position of this parameter in [`ALL`](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look a parameter up by its descriptor `string_id`.
    ///
    /// ```rust
    /// use fidi_core::ParamIndex;
    ///
    /// assert_eq!(ParamIndex::from_string_id("knee_db"), Some(ParamIndex::Knee));
    /// assert_eq!(ParamIndex::from_string_id("drive"), None);
    /// ```
    pub fn from_string_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|param| param.descriptor().string_id == id)
    }

    /// Metadata for this parameter.
    pub const fn descriptor(self) -> ParamDescriptor {
        match self {
            ParamIndex::Threshold => THRESHOLD,
            ParamIndex::Ratio => RATIO,
            ParamIndex::Attack => ATTACK,
            ParamIndex::Release => RELEASE,
            ParamIndex::Knee => KNEE,
            ParamIndex::Makeup => MAKEUP,
            ParamIndex::Mix => MIX,
        }
    }
}

/// A snapshot of the seven parameters in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio (n:1), at least 1.
    pub ratio: f32,
    /// Attack time in ms.
    pub attack_ms: f32,
    /// Release time in ms.
    pub release_ms: f32,
    /// Knee width in dB, at least 0.
    pub knee_db: f32,
    /// Makeup gain in dB.
    pub makeup_db: f32,
    /// Wet/dry mix in percent (0–100).
    pub mix_percent: f32,
}

impl CompressorParams {
    /// Read one parameter.
    pub fn get(&self, param: ParamIndex) -> f32 {
        match param {
            ParamIndex::Threshold => self.threshold_db,
            ParamIndex::Ratio => self.ratio,
            ParamIndex::Attack => self.attack_ms,
            ParamIndex::Release => self.release_ms,
            ParamIndex::Knee => self.knee_db,
            ParamIndex::Makeup => self.makeup_db,
            ParamIndex::Mix => self.mix_percent,
        }
    }

    /// Write one parameter, clamped to its descriptor range.
    pub fn set(&mut self, param: ParamIndex, value: f32) {
        let value = param.descriptor().clamp(value);
        match param {
            ParamIndex::Threshold => self.threshold_db = value,
            ParamIndex::Ratio => self.ratio = value,
            ParamIndex::Attack => self.attack_ms = value,
            ParamIndex::Release => self.release_ms = value,
            ParamIndex::Knee => self.knee_db = value,
            ParamIndex::Makeup => self.makeup_db = value,
            ParamIndex::Mix => self.mix_percent = value,
        }
    }

    /// Copy with every value clamped to its descriptor range.
    ///
    /// Out-of-range and NaN values from a misbehaving caller are pulled back
    /// into range instead of being rejected.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for param in ParamIndex::ALL {
            self.set(param, self.get(param));
        }
        self
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold_db: THRESHOLD.default,
            ratio: RATIO.default,
            attack_ms: ATTACK.default,
            release_ms: RELEASE.default,
            knee_db: KNEE.default,
            makeup_db: MAKEUP.default,
            mix_percent: MIX.default,
        }
    }
}
