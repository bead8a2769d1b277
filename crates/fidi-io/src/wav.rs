//! WAV file reading and writing.

use crate::stereo::{AudioBuffer, StereoSamples};
use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

/// Bit depths accepted by [`write_audio`]: 16/24-bit PCM and 32-bit float.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate.max(1));

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Channel count, sample rate and bit depth of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// Same spec with a different bit depth.
    pub fn with_bits_per_sample(mut self, bits_per_sample: u16) -> Self {
        self.bits_per_sample = bits_per_sample;
        self
    }

    fn to_hound(self) -> Result<hound::WavSpec> {
        let sample_format = match self.bits_per_sample {
            16 | 24 => SampleFormat::Int,
            32 => SampleFormat::Float,
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "{other}-bit output (expected 16, 24 or 32)"
                )));
            }
        };
        Ok(hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format,
        })
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

/// Decode every sample as f32 in `[-1, 1)`, interleaved.
fn read_interleaved<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Read a WAV file, keeping mono files mono and stereo files stereo.
///
/// Files with more than two channels keep only the first two.
///
/// # Example
/// ```ignore
/// let (audio, spec) = read_audio("input.wav")?;
/// println!("{} frames at {} Hz", audio.frames(), spec.sample_rate);
/// ```
pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<(AudioBuffer, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let samples = read_interleaved(reader)?;
    let channels = spec.channels as usize;

    let audio = match channels {
        0 => {
            return Err(Error::UnsupportedFormat("file declares no channels".into()));
        }
        1 => AudioBuffer::Mono(samples),
        2 => AudioBuffer::Stereo(StereoSamples::from_interleaved(&samples)),
        _ => {
            tracing::warn!(channels, "keeping only the first two channels");
            let (left, right) = samples
                .chunks_exact(channels)
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            AudioBuffer::Stereo(StereoSamples::new(left, right))
        }
    };

    let spec = WavSpec {
        channels: audio.channel_count(),
        ..spec
    };
    Ok((audio, spec))
}

/// Write audio to a WAV file.
///
/// The channel count comes from `audio`; `spec` supplies the sample rate and
/// bit depth. 16/24-bit output is clamped to full scale, 32-bit is float.
/// Missing parent directories are created.
///
/// # Example
/// ```ignore
/// let audio = AudioBuffer::Mono(vec![0.0; 48000]); // 1 second of silence
/// write_audio("output.wav", &audio, WavSpec::default())?;
/// ```
pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioBuffer, spec: WavSpec) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: audio.channel_count(),
        ..spec
    };
    let hound_spec = spec.to_hound()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WavWriter::create(path, hound_spec)?;
    let interleaved = match audio {
        AudioBuffer::Mono(samples) => std::borrow::Cow::Borrowed(samples.as_slice()),
        AudioBuffer::Stereo(samples) => std::borrow::Cow::Owned(samples.to_interleaved()),
    };

    if hound_spec.sample_format == SampleFormat::Float {
        for &sample in interleaved.iter() {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for &sample in interleaved.iter() {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        bits = spec.bits_per_sample,
        frames = audio.frames(),
        "wrote wav"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_roundtrip_mono_f32() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        };

        let file = NamedTempFile::new().unwrap();
        write_audio(file.path(), &AudioBuffer::Mono(samples.clone()), spec).unwrap();

        let (loaded, loaded_spec) = read_audio(file.path()).unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded, AudioBuffer::Mono(samples));
    }

    #[test]
    fn test_roundtrip_stereo_i16() {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin() * 0.9).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        let audio = AudioBuffer::Stereo(StereoSamples::new(left.clone(), right.clone()));
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
        };

        let file = NamedTempFile::new().unwrap();
        write_audio(file.path(), &audio, spec).unwrap();

        let (loaded, loaded_spec) = read_audio(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 44100);
        assert_eq!(loaded_spec.bits_per_sample, 16);
        let AudioBuffer::Stereo(loaded) = loaded else {
            panic!("expected stereo");
        };
        // 16-bit has less precision
        for (a, b) in left.iter().zip(loaded.left.iter()) {
            assert!((a - b).abs() < 0.001);
        }
        for (a, b) in right.iter().zip(loaded.right.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_integer_output_clamps() {
        let audio = AudioBuffer::Mono(vec![2.0, -2.0]);
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 24,
        };
        let file = NamedTempFile::new().unwrap();
        write_audio(file.path(), &audio, spec).unwrap();

        let (loaded, _) = read_audio(file.path()).unwrap();
        let AudioBuffer::Mono(loaded) = loaded else {
            panic!("expected mono");
        };
        assert!(loaded[0] < 1.0 && loaded[0] > 0.999);
        assert_eq!(loaded[1], -1.0);
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec::default().with_bits_per_sample(12);
        let err = write_audio(file.path(), &AudioBuffer::Mono(vec![0.0]), spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
