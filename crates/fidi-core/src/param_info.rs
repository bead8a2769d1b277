//! Parameter metadata for host, CLI and settings-file integration.
//!
//! Each compressor parameter is described by a [`ParamDescriptor`] carrying
//! its display name, unit, range, default and a stable [`ParamId`]. The
//! descriptors are the single source of truth for range validation: the
//! parameter store and the settings loader both clamp through
//! [`ParamDescriptor::clamp`].
//!
//! # no_std Support
//!
//! This module is fully `no_std` compatible with no heap allocations required.

/// Scaling curve for parameter normalization.
///
/// Determines how a parameter's plain value maps to normalized \[0.0, 1.0\] space.
///
/// # Normalization Formulas
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Straight line from `min` to `max`.
    #[default]
    Linear,
    /// `normalized = linear^(1/exp)`; exponents above 1 spread the low end.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Describes a single parameter: name, unit, range, default.
///
/// # Example
///
/// ```rust
/// use fidi_core::{ParamDescriptor, ParamId};
///
/// let thresh = ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -20.0)
///     .with_id(ParamId(1), "threshold");
/// assert_eq!(thresh.clamp(-90.0), -60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name.
    pub name: &'static str,

    /// Abbreviated name (at most 8 characters).
    pub short_name: &'static str,

    /// Display unit.
    pub unit: ParamUnit,

    /// Lower bound (inclusive).
    pub min: f32,

    /// Upper bound (inclusive).
    pub max: f32,

    /// Value at construction and after a NaN write.
    pub default: f32,

    /// Increment for stepped controls.
    pub step: f32,

    /// Stable numeric ID.
    pub id: ParamId,

    /// Human-readable stable ID, used as the settings-file key.
    pub string_id: &'static str,

    /// Knob-travel curve used by [`normalize`](Self::normalize).
    pub scale: ParamScale,
}

impl ParamDescriptor {
    const fn base(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        (min, max, default): (f32, f32, f32),
        step: f32,
        scale: ParamScale,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            scale,
        }
    }

    /// Decibel-valued parameter (threshold, knee, makeup).
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamUnit::Decibels,
            (min, max, default),
            0.1,
            ParamScale::Linear,
        )
    }

    /// Millisecond-valued time parameter (attack, release).
    ///
    /// Uses a 2.5 power curve so short times get most of the knob travel.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamUnit::Milliseconds,
            (min, max, default),
            0.1,
            ParamScale::Power(2.5),
        )
    }

    /// Compression ratio (1:1 to 20:1, default 4:1).
    ///
    /// Squared knob travel keeps the musically common 1.5–6 range wide.
    pub const fn ratio() -> Self {
        Self::base(
            "Ratio",
            "Ratio",
            ParamUnit::Ratio,
            (1.0, 20.0, 4.0),
            0.1,
            ParamScale::Power(2.0),
        )
    }

    /// Wet/dry mix (0–100%, default 100%).
    pub const fn mix() -> Self {
        Self::base(
            "Mix",
            "Mix",
            ParamUnit::Percent,
            (0.0, 100.0, 100.0),
            1.0,
            ParamScale::Linear,
        )
    }

    /// Attach a stable numeric and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Override the step increment.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Clamp a value to this parameter's range.
    ///
    /// NaN clamps to the default.
    ///
    /// ```rust
    /// use fidi_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0);
    /// assert_eq!(desc.clamp(0.0), 0.0);
    /// assert_eq!(desc.clamp(-100.0), -60.0);
    /// assert_eq!(desc.clamp(100.0), 12.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Whether `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Knob position in `[0, 1]` for a plain value.
    ///
    /// ```rust
    /// use fidi_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::mix();
    /// assert_eq!(desc.normalize(0.0), 0.0);
    /// assert_eq!(desc.normalize(50.0), 0.5);
    /// assert_eq!(desc.normalize(100.0), 1.0);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let linear = ((self.clamp(value) - self.min) / range).clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => linear,
            ParamScale::Power(exp) => libm::powf(linear, 1.0 / exp),
        }
    }

    /// Plain value for a knob position in `[0, 1]`.
    ///
    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let curved = match self.scale {
            ParamScale::Linear => normalized,
            ParamScale::Power(exp) => libm::powf(normalized, exp),
        };
        self.min + curved * (self.max - self.min)
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,
    /// Milliseconds (ms).
    Milliseconds,
    /// Percentage (%).
    Percent,
    /// Ratio (n:1).
    Ratio,
}

impl ParamUnit {
    /// Suffix appended to formatted values.
    ///
    /// ```rust
    /// use fidi_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
        }
    }
}
