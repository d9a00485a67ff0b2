use std::{path::Path, sync::OnceLock};

use regex::Regex;

use super::LyricEntry;
use crate::Result;

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\[(\d+):(\d+\.\d+)\](.*)$").expect("lrc line pattern is valid")
    })
}

/// Parses `[MM:SS.ss]text` lines, skipping anything that does not match.
///
/// Entries come back in file order; [`super::LyricTimeline::new`] sorts them.
pub fn parse_lrc(input: &str) -> Vec<LyricEntry> {
    let mut entries = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None if line.is_empty() => {}
            None => tracing::debug!(line = number + 1, content = line, "skipping lyric line"),
        }
    }

    entries
}

/// Reads and parses a lyric file.
pub fn load_lrc(path: impl AsRef<Path>) -> Result<Vec<LyricEntry>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let entries = parse_lrc(&raw);
    tracing::info!(
        path = %path.as_ref().display(),
        lines = entries.len(),
        "loaded lyrics"
    );
    Ok(entries)
}

fn parse_line(line: &str) -> Option<LyricEntry> {
    let captures = line_pattern().captures(line)?;
    let minutes: u64 = captures[1].parse().ok()?;
    let seconds: f64 = captures[2].parse().ok()?;
    Some(LyricEntry::new(
        minutes as f64 * 60.0 + seconds,
        captures[3].trim(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LyricTimeline;

    const SAMPLE: &str = "\
[ar:Somebody]
[ti:Some Song]
[00:12.50]  second line
[00:01.00]first line

not a lyric
[01:02.25]third line
[00:30]missing fraction
";

    #[test]
    fn parses_matching_lines_and_skips_others() {
        let entries = parse_lrc(SAMPLE);
        assert_eq!(
            entries,
            vec![
                LyricEntry::new(12.5, "second line"),
                LyricEntry::new(1.0, "first line"),
                LyricEntry::new(62.25, "third line"),
            ]
        );
    }

    #[test]
    fn timestamps_are_ordered_after_sorting() {
        let timeline = LyricTimeline::new(parse_lrc(SAMPLE));
        let stamps: Vec<f64> = timeline.entries().iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(stamps, vec![1.0, 12.5, 62.25]);
    }

    #[test]
    fn keeps_empty_text_lines() {
        let entries = parse_lrc("[00:05.00]");
        assert_eq!(entries, vec![LyricEntry::new(5.0, "")]);
    }

    #[test]
    fn loads_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[00:00.00]hello\n[00:02.00]world\n").unwrap();

        let entries = load_lrc(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, "world");
    }
}
