//! Read-only access to the decoded mono track.

mod wav;

use std::sync::Arc;

pub use wav::{load_wav, DecodedAudio};

/// Result of a [`SampleSource::read`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleChunk<'a> {
    pub samples: &'a [f32],
    /// Set when fewer samples than requested were available.
    pub short: bool,
}

impl SampleChunk<'_> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Immutable view over a normalised mono sample buffer.
///
/// Cloning is cheap: clones share the same backing buffer.
#[derive(Debug, Clone)]
pub struct SampleSource {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleSource {
    pub fn new(samples: impl Into<Arc<[f32]>>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns up to `count` samples starting at `offset`.
    ///
    /// Offsets past the end yield an empty, short chunk.
    pub fn read(&self, offset: usize, count: usize) -> SampleChunk<'_> {
        let start = offset.min(self.samples.len());
        let end = start.saturating_add(count).min(self.samples.len());
        let samples = &self.samples[start..end];
        SampleChunk {
            samples,
            short: samples.len() < count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleSource {
        let samples: Vec<f32> = (0..len).map(|i| i as f32 / len as f32).collect();
        SampleSource::new(samples, 10)
    }

    #[test]
    fn full_read_is_not_short() {
        let source = ramp(10);
        let chunk = source.read(2, 4);
        assert_eq!(chunk.len(), 4);
        assert!(!chunk.short);
        assert_eq!(chunk.samples[0], 0.2);
    }

    #[test]
    fn read_across_end_is_short() {
        let source = ramp(10);
        let chunk = source.read(8, 4);
        assert_eq!(chunk.len(), 2);
        assert!(chunk.short);
    }

    #[test]
    fn read_ending_exactly_at_end_is_full() {
        let source = ramp(10);
        let chunk = source.read(6, 4);
        assert_eq!(chunk.len(), 4);
        assert!(!chunk.short);
    }

    #[test]
    fn out_of_range_offset_returns_empty_short_chunk() {
        let source = ramp(10);
        let chunk = source.read(50, 4);
        assert!(chunk.is_empty());
        assert!(chunk.short);

        let chunk = source.read(usize::MAX, usize::MAX);
        assert!(chunk.is_empty());
        assert!(chunk.short);
    }

    #[test]
    fn every_offset_and_count_returns_the_available_minimum() {
        let source = ramp(10);
        for offset in 0..=12 {
            for count in 0..=12 {
                let chunk = source.read(offset, count);
                let expected = count.min(10usize.saturating_sub(offset));
                assert_eq!(chunk.len(), expected, "offset {offset}, count {count}");
                assert_eq!(chunk.short, expected < count);
            }
        }
    }

    #[test]
    fn reports_duration() {
        let source = SampleSource::new(vec![0.0; 44_100], 22_050);
        assert_eq!(source.duration_seconds(), 2.0);
    }
}
