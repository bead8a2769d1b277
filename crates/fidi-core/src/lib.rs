//! Fidi Core - stereo-linked dynamic range compressor
//!
//! This crate holds everything that runs on the audio thread: coefficient
//! derivation, the gain-computation engine and the block processing loop,
//! plus the lock-free parameter store and meter that connect them to the
//! outside world.
//!
//! # Core Abstractions
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Range, default and unit metadata
//! - [`CompressorParams`] - Plain snapshot of the seven user parameters
//! - [`ParamStore`] - Atomic per-value storage written by a control thread
//!
//! ## Engine
//!
//! - [`Coefficients`] - Sample-rate aware conversion to [`DerivedParams`]
//! - [`GainComputer`] - Smoothing, envelope follower and soft-knee curve
//! - [`KneeCurve`] - Named soft-knee interpolation strategies
//! - [`EngineConfig`] - Smoothing interval, envelope domain, knee curve
//!
//! ## Processing
//!
//! - [`Compressor`] - Stereo-linked in-place block loop with parallel mix
//! - [`GainReductionMeter`] - Minimum-gain cell for a display thread
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`time_to_coefficient`], etc.
//! - [`static_curve`] - Transfer curve without engine state
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for `Arc`).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fidi-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fidi_core::{Compressor, EngineConfig, GainReductionMeter, ParamIndex, ParamStore};
//!
//! let params = Arc::new(ParamStore::new());
//! let meter = Arc::new(GainReductionMeter::new());
//! let mut comp = Compressor::new(Arc::clone(&params), Arc::clone(&meter), EngineConfig::default());
//! comp.prepare(44100.0);
//!
//! // Control thread
//! params.set(ParamIndex::Ratio, 8.0);
//!
//! // Audio thread
//! let mut left = vec![0.0_f32; 256];
//! let mut right = vec![0.0_f32; 256];
//! comp.process_stereo_in_place(&mut left, &mut right);
//!
//! // Display thread
//! let reduction_db = meter.take_reduction_db();
//! assert_eq!(reduction_db, 0.0);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or errors in the audio path
//! - **Sanitized**: Non-finite values are replaced with neutral ones inline
//! - **Linked**: One gain per frame for every channel

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod coefficients;
pub mod config;
pub mod engine;
pub mod knee;
pub mod math;
pub mod meter;
pub mod param_info;
pub mod params;
pub mod processor;
pub mod store;

// Re-export main types at crate root
pub use coefficients::{Coefficients, DEFAULT_SAMPLE_RATE, DerivedParams, SMOOTHING_TIME_MS};
pub use config::{EngineConfig, EnvelopeDomain, ParseConfigError};
pub use engine::{GainComputer, MAX_BATCH_SMOOTHING_COEFF};
pub use knee::{KneeCurve, static_curve};
pub use math::{
    DENORMAL_THRESHOLD, LEVEL_FLOOR, LEVEL_FLOOR_DB, db_to_linear, finite_or, flush_denormal,
    flush_denormal_f64, linear_to_db, parallel_mix, percent_to_fraction, sanitize_sample,
    time_to_coefficient,
};
pub use meter::GainReductionMeter;
pub use param_info::{ParamDescriptor, ParamId, ParamScale, ParamUnit};
pub use params::{CompressorParams, ParamIndex};
pub use processor::Compressor;
pub use store::ParamStore;
