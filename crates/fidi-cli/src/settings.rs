//! Settings file format.
//!
//! Settings are TOML files with two optional tables. Parameter keys are the
//! descriptor string ids; engine keys select the smoothing schedule,
//! envelope domain and knee curve.
//!
//! ```toml
//! [params]
//! threshold_db = -24.0
//! ratio = 6.0
//! attack_ms = 5.0
//! mix_percent = 60.0
//!
//! [engine]
//! smoothing_interval = 32
//! envelope = "linear"
//! knee = "quadratic-blend"
//! ```

use fidi_core::{CompressorParams, EngineConfig, EnvelopeDomain, KneeCurve, ParamIndex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors raised while loading a settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unexpected keys.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `[params]` key does not name a parameter.
    #[error("unknown parameter '{0}' (run `fidi params` for the list)")]
    UnknownParam(String),

    /// An `[engine]` value could not be interpreted.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Parsed settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Parameter values keyed by string id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineSection,
}

/// The `[engine]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Samples between smoothing steps.
    pub smoothing_interval: Option<u32>,
    /// Envelope domain name (`db` or `linear`).
    pub envelope: Option<String>,
    /// Knee curve name.
    pub knee: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), params = settings.params.len(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the `[params]` table on top of `base`.
    ///
    /// Out-of-range values are clamped with a warning.
    pub fn apply_params(&self, base: &mut CompressorParams) -> Result<(), SettingsError> {
        for (key, &value) in &self.params {
            let param = ParamIndex::from_string_id(key)
                .ok_or_else(|| SettingsError::UnknownParam(key.clone()))?;
            let descriptor = param.descriptor();
            if !descriptor.contains(value) {
                tracing::warn!(
                    param = key.as_str(),
                    value,
                    min = descriptor.min,
                    max = descriptor.max,
                    "value out of range, clamping"
                );
            }
            base.set(param, value);
        }
        Ok(())
    }

    /// Apply the `[engine]` table on top of `base`.
    pub fn apply_engine(&self, base: EngineConfig) -> Result<EngineConfig, SettingsError> {
        let mut config = base;
        if let Some(interval) = self.engine.smoothing_interval {
            config = config.with_smoothing_interval(interval);
        }
        if let Some(name) = &self.engine.envelope {
            let domain = name
                .parse::<EnvelopeDomain>()
                .map_err(|e| SettingsError::InvalidValue {
                    key: "engine.envelope",
                    message: e.to_string(),
                })?;
            config = config.with_envelope_domain(domain);
        }
        if let Some(name) = &self.engine.knee {
            let curve = name
                .parse::<KneeCurve>()
                .map_err(|e| SettingsError::InvalidValue {
                    key: "engine.knee",
                    message: e.to_string(),
                })?;
            config = config.with_knee_curve(curve);
        }
        Ok(config)
    }
}
