//! Timestamped lyric lines and the monotonic lyric cursor.

mod lrc;

use std::cmp::Ordering;

pub use lrc::{load_lrc, parse_lrc};

/// Display window given to the final line when no successor bounds it.
pub const DEFAULT_LYRIC_WINDOW: f64 = 5.0;

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricEntry {
    /// Seconds from the start of the track.
    pub timestamp: f64,
    pub text: String,
}

impl LyricEntry {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Time span `[start, end)` during which a line is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LyricWindow {
    pub start: f64,
    pub end: f64,
}

impl LyricWindow {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Lyric lines sorted once at construction.
///
/// Lookups assume the order established by [`LyricTimeline::new`] and never
/// re-sort.
#[derive(Debug, Clone)]
pub struct LyricTimeline {
    entries: Vec<LyricEntry>,
    default_window: f64,
}

impl Default for LyricTimeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LyricTimeline {
    pub fn new(entries: Vec<LyricEntry>) -> Self {
        Self::with_default_window(entries, DEFAULT_LYRIC_WINDOW)
    }

    pub fn with_default_window(mut entries: Vec<LyricEntry>, default_window: f64) -> Self {
        entries.sort_by(|a, b| {
            a.timestamp
                .total_cmp(&b.timestamp)
                .then_with(|| a.text.cmp(&b.text))
        });
        Self {
            entries,
            default_window,
        }
    }

    pub fn entries(&self) -> &[LyricEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&LyricEntry> {
        self.entries.get(index)
    }

    /// Index of the last entry starting at or before `start_time`, or 0.
    pub fn initial_index(&self, start_time: f64) -> usize {
        self.entries
            .partition_point(|entry| {
                entry.timestamp.partial_cmp(&start_time) != Some(Ordering::Greater)
            })
            .saturating_sub(1)
    }

    /// Advances the lyric cursor from `prior` to the line active at `time`.
    ///
    /// The scan only moves forward, so a `time` that goes backwards leaves the
    /// cursor at `prior`.
    pub fn current_index(&self, time: f64, prior: usize) -> usize {
        if self.entries.is_empty() {
            return 0;
        }

        let mut index = prior.min(self.entries.len() - 1);
        while index + 1 < self.entries.len() && time >= self.entries[index + 1].timestamp {
            index += 1;
        }
        index.max(prior)
    }

    /// Display window of the line at `index`.
    ///
    /// Returns `None` for an empty timeline or an index past the end.
    pub fn window_for(&self, index: usize) -> Option<LyricWindow> {
        let start = self.entries.get(index)?.timestamp;
        let end = self
            .entries
            .get(index + 1)
            .map(|next| next.timestamp)
            .unwrap_or(start + self.default_window);
        Some(LyricWindow { start, end })
    }
}
