//! Audio file I/O for the fidi compressor.
//!
//! This crate provides:
//!
//! - **WAV metadata**: [`read_wav_info`] for format details without decoding
//! - **Channel-preserving I/O**: [`read_audio`] and [`write_audio`] keep mono
//!   files mono and stereo files stereo, as [`AudioBuffer`]
//! - **Stereo interchange**: [`StereoSamples`] with interleave helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fidi_io::{AudioBuffer, read_audio, write_audio};
//!
//! let (mut audio, spec) = read_audio("input.wav")?;
//! if let AudioBuffer::Stereo(samples) = &mut audio {
//!     compressor.process_stereo_in_place(&mut samples.left, &mut samples.right);
//! }
//! write_audio("output.wav", &audio, spec)?;
//! ```

mod stereo;
mod wav;

pub use stereo::{AudioBuffer, StereoSamples};
pub use wav::{
    SUPPORTED_BIT_DEPTHS, WavFormat, WavInfo, WavSpec, read_audio, read_wav_info, write_audio,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
