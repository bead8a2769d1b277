//! Engine configuration: smoothing schedule, envelope domain, knee curve.

use core::fmt;
use core::str::FromStr;

use crate::knee::KneeCurve;

/// Domain in which the envelope follower runs.
///
/// Steady-state behavior is identical; attack and release trajectories
/// differ slightly because a one-pole filter in dB moves exponentially in
/// level, while a linear-domain one moves exponentially in amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeDomain {
    /// Convert the input to dB first, then follow.
    #[default]
    Decibel,
    /// Follow the raw magnitude, convert the followed value to dB.
    Linear,
}

impl EnvelopeDomain {
    /// Name used by settings files and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            EnvelopeDomain::Decibel => "db",
            EnvelopeDomain::Linear => "linear",
        }
    }
}

impl fmt::Display for EnvelopeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvelopeDomain {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("db") || s.eq_ignore_ascii_case("decibel") {
            Ok(EnvelopeDomain::Decibel)
        } else if s.eq_ignore_ascii_case("linear") {
            Ok(EnvelopeDomain::Linear)
        } else {
            Err(ParseConfigError::UnknownEnvelopeDomain)
        }
    }
}

/// Error returned when parsing an [`EnvelopeDomain`] or [`KneeCurve`] name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseConfigError {
    /// Not one of `db`, `linear`.
    UnknownEnvelopeDomain,
    /// Not one of `linear-ratio`, `quadratic-ratio`, `quadratic-blend`.
    UnknownKneeCurve,
}

impl fmt::Display for ParseConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseConfigError::UnknownEnvelopeDomain => {
                f.write_str("unknown envelope domain (expected `db` or `linear`)")
            }
            ParseConfigError::UnknownKneeCurve => f.write_str(
                "unknown knee curve (expected `linear-ratio`, `quadratic-ratio` or `quadratic-blend`)",
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseConfigError {}

/// Static configuration of a [`GainComputer`](crate::GainComputer).
///
/// # Example
///
/// ```rust
/// use fidi_core::{EngineConfig, EnvelopeDomain, KneeCurve};
///
/// let config = EngineConfig::default()
///     .with_smoothing_interval(32)
///     .with_envelope_domain(EnvelopeDomain::Linear)
///     .with_knee_curve(KneeCurve::QuadraticBlend);
/// assert_eq!(config.smoothing_interval, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Samples between parameter-smoothing steps. `1` smooths every sample;
    /// `N > 1` smooths once per `N` samples with an `N`-times larger step.
    pub smoothing_interval: u32,
    /// Envelope follower domain.
    pub envelope_domain: EnvelopeDomain,
    /// Soft-knee interpolation.
    pub knee_curve: KneeCurve,
}

impl EngineConfig {
    /// Set the smoothing interval (0 is treated as 1).
    pub const fn with_smoothing_interval(mut self, interval: u32) -> Self {
        self.smoothing_interval = if interval == 0 { 1 } else { interval };
        self
    }

    /// Set the envelope domain.
    pub const fn with_envelope_domain(mut self, domain: EnvelopeDomain) -> Self {
        self.envelope_domain = domain;
        self
    }

    /// Set the knee curve.
    pub const fn with_knee_curve(mut self, curve: KneeCurve) -> Self {
        self.knee_curve = curve;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_interval: 1,
            envelope_domain: EnvelopeDomain::Decibel,
            knee_curve: KneeCurve::LinearRatio,
        }
    }
}
