/// Default width of the moving-average window applied to bar amplitudes.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 6;

/// Reduces a block of samples into integer bar heights.
///
/// The pipeline is: absolute value, decimation down to roughly one sample per
/// bar, centred moving average, then a linear rescale of `[0, 1]` onto
/// `[0, max_level - 1]` with truncation.
#[derive(Debug, Clone)]
pub struct AmplitudeProfiler {
    smoothing_window: usize,
    decimated: Vec<f32>,
    smoothed: Vec<f32>,
}

impl Default for AmplitudeProfiler {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

impl AmplitudeProfiler {
    pub fn new(smoothing_window: usize) -> Self {
        Self {
            smoothing_window: smoothing_window.max(1),
            decimated: Vec::new(),
            smoothed: Vec::new(),
        }
    }

    pub fn smoothing_window(&self) -> usize {
        self.smoothing_window
    }

    /// Computes `min(bar_count, chunk.len())` levels in `[0, max_level - 1]`.
    pub fn levels(&mut self, chunk: &[f32], bar_count: usize, max_level: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(bar_count.min(chunk.len()));
        self.levels_into(chunk, bar_count, max_level, &mut out);
        out
    }

    /// Same as [`Self::levels`] but reuses the caller's buffer.
    pub fn levels_into(
        &mut self,
        chunk: &[f32],
        bar_count: usize,
        max_level: usize,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        if chunk.is_empty() || bar_count == 0 {
            return;
        }

        let stride = (chunk.len() / bar_count).max(1);
        self.decimated.clear();
        self.decimated.extend(
            chunk
                .iter()
                .step_by(stride)
                .take(bar_count)
                .map(|sample| sample.abs()),
        );

        smooth_into(&self.decimated, self.smoothing_window, &mut self.smoothed);

        let top = max_level.saturating_sub(1) as f32;
        out.extend(
            self.smoothed
                .iter()
                .map(|value| (value.clamp(0.0, 1.0) * top) as usize),
        );
    }
}

/// Centred moving average with zero padding; output length equals input length.
///
/// For even windows the extra tap sits before the centre. Inputs shorter than
/// the window are copied through untouched.
fn smooth_into(values: &[f32], window: usize, out: &mut Vec<f32>) {
    out.clear();
    if window <= 1 || values.len() < window {
        out.extend_from_slice(values);
        return;
    }

    let before = window / 2;
    let after = (window - 1) / 2;
    let scale = 1.0 / window as f32;

    for index in 0..values.len() {
        let lo = index.saturating_sub(before);
        let hi = (index + after).min(values.len() - 1);
        let sum: f32 = values[lo..=hi].iter().sum();
        out.push(sum * scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth(values: &[f32], window: usize) -> Vec<f32> {
        let mut out = Vec::new();
        smooth_into(values, window, &mut out);
        out
    }

    #[test]
    fn returns_exactly_bar_count_levels() {
        let mut profiler = AmplitudeProfiler::default();
        let chunk: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.01).sin()).collect();

        for bars in [1, 7, 60, 200, 1024] {
            let levels = profiler.levels(&chunk, bars, 6);
            assert_eq!(levels.len(), bars);
            assert!(levels.iter().all(|level| *level <= 5));
        }
    }

    #[test]
    fn short_chunk_yields_one_bar_per_sample() {
        let mut profiler = AmplitudeProfiler::default();
        let levels = profiler.levels(&[1.0, -1.0, 0.5], 60, 6);
        assert_eq!(levels.len(), 3);
    }

    #[test]
    fn full_scale_signal_reaches_top_level() {
        let mut profiler = AmplitudeProfiler::new(1);
        let levels = profiler.levels(&[1.0; 64], 8, 6);
        assert_eq!(levels, vec![5; 8]);
    }

    #[test]
    fn silence_is_flat() {
        let mut profiler = AmplitudeProfiler::default();
        let levels = profiler.levels(&[0.0; 256], 16, 6);
        assert_eq!(levels, vec![0; 16]);
    }

    #[test]
    fn decimation_picks_every_stride_sample() {
        let mut profiler = AmplitudeProfiler::new(1);
        let chunk = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let levels = profiler.levels(&chunk, 2, 6);
        assert_eq!(levels, vec![5, 5]);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let mut profiler = AmplitudeProfiler::new(1);
        let levels = profiler.levels(&[3.0, -2.5], 2, 6);
        assert_eq!(levels, vec![5, 5]);
    }

    #[test]
    fn empty_inputs_produce_no_levels() {
        let mut profiler = AmplitudeProfiler::default();
        assert!(profiler.levels(&[], 10, 6).is_empty());
        assert!(profiler.levels(&[0.5; 10], 0, 6).is_empty());
    }

    #[test]
    fn smoothing_preserves_length_and_zero_pads_edges() {
        let values = [6.0; 8];
        let smoothed = smooth(&values, 6);
        assert_eq!(smoothed.len(), 8);
        // Index 0 sees taps [-3, 2]: three padded zeros and three sixes.
        assert!((smoothed[0] - 3.0).abs() < 1e-6);
        assert!((smoothed[3] - 6.0).abs() < 1e-6);
        // Index 7 sees taps [4, 9]: four sixes and two padded zeros.
        assert!((smoothed[7] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn smoothing_skips_sequences_shorter_than_window() {
        let values = [0.1, 0.9, 0.3];
        assert_eq!(smooth(&values, 6), values.to_vec());
    }
}
