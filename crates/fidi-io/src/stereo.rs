//! In-memory audio buffers for file-level processing.
//!
//! [`StereoSamples`] holds a pair of `Vec<f32>` buffers (left/right) with
//! interleave helpers. [`AudioBuffer`] wraps either that or a single mono
//! channel so a file keeps its channel layout through processing.

/// A pair of stereo audio buffers (left and right channels).
///
/// Each channel is a `Vec<f32>` of equal length.
///
/// # Example
///
/// ```rust
/// use fidi_io::StereoSamples;
///
/// let samples = StereoSamples::from_interleaved(&[1.0, 0.5, 1.0, 0.5]);
/// assert_eq!(samples.len(), 2);
/// assert_eq!(samples.right, vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create new stereo samples from left and right channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len(), "Channels must have same length");
        Self { left, right }
    }

    /// Get the number of frames.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// Check if the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to interleaved format (L, R, L, R, ...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            interleaved.push(*l);
            interleaved.push(*r);
        }
        interleaved
    }

    /// Create from interleaved format (L, R, L, R, ...).
    ///
    /// A trailing unpaired sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let (left, right) = interleaved
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();
        Self { left, right }
    }
}

/// Decoded audio with its channel layout preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    /// One channel.
    Mono(Vec<f32>),
    /// Two channels.
    Stereo(StereoSamples),
}

impl AudioBuffer {
    /// Number of channels (1 or 2).
    pub fn channel_count(&self) -> u16 {
        match self {
            AudioBuffer::Mono(_) => 1,
            AudioBuffer::Stereo(_) => 2,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        match self {
            AudioBuffer::Mono(samples) => samples.len(),
            AudioBuffer::Stereo(samples) => samples.len(),
        }
    }

    /// Check if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Borrow every channel as a slice.
    pub fn channels(&self) -> Vec<&[f32]> {
        match self {
            AudioBuffer::Mono(samples) => vec![samples.as_slice()],
            AudioBuffer::Stereo(samples) => vec![samples.left.as_slice(), samples.right.as_slice()],
        }
    }
}
