//! Shared CLI helpers used across multiple commands.

use crate::settings::Settings;
use clap::Args;
use fidi_core::{CompressorParams, EngineConfig, EnvelopeDomain, KneeCurve, ParamIndex};
use std::path::PathBuf;

/// Compressor parameter flags, each overriding the settings file.
#[derive(Args, Debug, Default)]
pub struct ParamFlags {
    /// Threshold in dB (-60 to 0)
    #[arg(short, long, allow_hyphen_values = true)]
    pub threshold: Option<f32>,

    /// Ratio n:1 (1 to 20)
    #[arg(short, long)]
    pub ratio: Option<f32>,

    /// Attack time in ms (0.1 to 300)
    #[arg(short, long)]
    pub attack: Option<f32>,

    /// Release time in ms (10 to 3000)
    #[arg(long)]
    pub release: Option<f32>,

    /// Knee width in dB (0 to 20)
    #[arg(short, long)]
    pub knee: Option<f32>,

    /// Makeup gain in dB (-12 to 24)
    #[arg(short, long, allow_hyphen_values = true)]
    pub makeup: Option<f32>,

    /// Dry/wet mix in percent (0 to 100)
    #[arg(long)]
    pub mix: Option<f32>,

    /// Settings file (TOML) applied before the flags
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

/// Engine configuration flags.
#[derive(Args, Debug, Default)]
pub struct EngineFlags {
    /// Samples between parameter-smoothing steps (1 = every sample)
    #[arg(long, value_name = "N")]
    pub smoothing_interval: Option<u32>,

    /// Envelope follower domain (db or linear)
    #[arg(long, value_name = "DOMAIN")]
    pub envelope: Option<EnvelopeDomain>,

    /// Soft-knee curve (linear-ratio, quadratic-ratio, quadratic-blend)
    #[arg(long = "knee-curve", value_name = "CURVE")]
    pub knee_curve: Option<KneeCurve>,
}

impl ParamFlags {
    fn overrides(&self) -> [(ParamIndex, Option<f32>); ParamIndex::COUNT] {
        [
            (ParamIndex::Threshold, self.threshold),
            (ParamIndex::Ratio, self.ratio),
            (ParamIndex::Attack, self.attack),
            (ParamIndex::Release, self.release),
            (ParamIndex::Knee, self.knee),
            (ParamIndex::Makeup, self.makeup),
            (ParamIndex::Mix, self.mix),
        ]
    }
}

/// Resolve parameters and engine configuration.
///
/// Order: defaults, then the settings file, then flags.
pub fn resolve(
    params: &ParamFlags,
    engine: &EngineFlags,
) -> anyhow::Result<(CompressorParams, EngineConfig)> {
    let settings = match &params.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut resolved = CompressorParams::default();
    settings.apply_params(&mut resolved)?;
    for (param, value) in params.overrides() {
        if let Some(value) = value {
            let descriptor = param.descriptor();
            if !descriptor.contains(value) {
                tracing::warn!(
                    param = descriptor.string_id,
                    value,
                    clamped = descriptor.clamp(value),
                    "value out of range, clamping"
                );
            }
            resolved.set(param, value);
        }
    }

    let mut config = settings.apply_engine(EngineConfig::default())?;
    if let Some(interval) = engine.smoothing_interval {
        config = config.with_smoothing_interval(interval);
    }
    if let Some(domain) = engine.envelope {
        config = config.with_envelope_domain(domain);
    }
    if let Some(curve) = engine.knee_curve {
        config = config.with_knee_curve(curve);
    }

    Ok((resolved, config))
}

/// Convert linear amplitude to dB for display, with a -120 dB floor.
pub fn display_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        fidi_core::linear_to_db(linear).max(-120.0)
    }
}
