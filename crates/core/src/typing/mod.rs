use crate::LyricWindow;

/// Share of a line's window spent typing; the rest holds the full line.
pub const TYPING_SHARE: f64 = 0.8;
/// Shortest typing duration.
pub const MIN_TYPING_DURATION: f64 = 0.05;

/// Character-by-character reveal of the active lyric line.
///
/// The revealed prefix is a pure function of the line, the playback time and
/// the line's window, so a new line or a replay from the window start always
/// begins from empty. The animator only owns the buffer the engine borrows the
/// revealed text from each cycle.
#[derive(Debug, Default, Clone)]
pub struct TypingAnimator {
    typed: String,
}

impl TypingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything typed so far.
    pub fn reset(&mut self) {
        self.typed.clear();
    }

    /// Text revealed by the last call to [`Self::reveal`].
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Returns the prefix of `line` visible at `time` within `window`.
    pub fn reveal(&mut self, line: &str, time: f64, window: LyricWindow) -> &str {
        let cutoff = reveal_count(line.chars().count(), time, window);
        let end = line
            .char_indices()
            .nth(cutoff)
            .map(|(byte, _)| byte)
            .unwrap_or(line.len());

        self.typed.clear();
        self.typed.push_str(&line[..end]);
        &self.typed
    }
}

/// Number of characters visible out of `total` at `time`.
pub fn reveal_count(total: usize, time: f64, window: LyricWindow) -> usize {
    let duration = (window.duration() * TYPING_SHARE).max(MIN_TYPING_DURATION);
    let progress = ((time - window.start) / duration).clamp(0.0, 1.0);
    (total as f64 * progress) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> LyricWindow {
        LyricWindow { start, end }
    }

    #[test]
    fn empty_line_reveals_nothing() {
        let mut animator = TypingAnimator::new();
        assert_eq!(animator.reveal("", 3.0, window(0.0, 2.0)), "");
    }

    #[test]
    fn reveals_one_character_early_in_window() {
        let mut animator = TypingAnimator::new();
        // duration = 1.6s, progress = 0.3125, floor(5 * 0.3125) = 1
        assert_eq!(animator.reveal("hello", 0.5, window(0.0, 2.0)), "h");
    }

    #[test]
    fn reveals_full_line_once_typing_share_elapses() {
        let mut animator = TypingAnimator::new();
        assert_eq!(animator.reveal("hello", 1.6, window(0.0, 2.0)), "hello");
        assert_eq!(animator.reveal("hello", 1.99, window(0.0, 2.0)), "hello");
        assert_eq!(animator.reveal("hello", 30.0, window(0.0, 2.0)), "hello");
    }

    #[test]
    fn prefix_grows_with_time() {
        let mut animator = TypingAnimator::new();
        let line = "abcdefghij";
        let mut last = 0;
        for step in 1..=10 {
            let time = step as f64 * 0.16 + 0.01;
            let len = animator.reveal(line, time, window(0.0, 2.0)).chars().count();
            assert!(len > last, "step {step}: {len} <= {last}");
            last = len;
        }
        assert_eq!(last, 10);
    }

    #[test]
    fn time_before_window_reveals_nothing() {
        let mut animator = TypingAnimator::new();
        assert_eq!(animator.reveal("hello", -1.0, window(0.0, 2.0)), "");
    }

    #[test]
    fn short_windows_use_minimum_duration() {
        assert_eq!(reveal_count(10, 1.03, window(1.0, 1.01)), 6);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut animator = TypingAnimator::new();
        let typed = animator.reveal("héllo wörld", 0.8, window(0.0, 2.0));
        assert_eq!(typed, "héllo");
    }

    #[test]
    fn restarts_when_line_changes_or_replays() {
        let mut animator = TypingAnimator::new();
        animator.reveal("hello", 1.0, window(0.0, 2.0));
        assert_eq!(animator.typed(), "hel");

        assert_eq!(animator.reveal("world", 2.0, window(2.0, 4.0)), "");

        animator.reveal("world", 3.6, window(2.0, 4.0));
        assert_eq!(animator.typed(), "world");
        assert_eq!(animator.reveal("world", 2.01, window(2.0, 4.0)), "");

        animator.reset();
        assert_eq!(animator.typed(), "");
    }

    #[test]
    fn reused_animator_matches_a_fresh_one() {
        let mut reused = TypingAnimator::new();
        let steps = [
            ("hello", 1.5, window(0.0, 2.0)),
            ("world", 2.0, window(2.0, 4.0)),
            ("world", 3.0, window(2.0, 4.0)),
            ("world", 2.02, window(2.0, 4.0)),
            ("hello", 0.3, window(0.0, 2.0)),
        ];

        for (line, time, window) in steps {
            let expected = TypingAnimator::new().reveal(line, time, window).to_string();
            assert_eq!(reused.reveal(line, time, window), expected);
        }
    }
}
