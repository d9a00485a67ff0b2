use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{LyricVizError, Result};

/// Upper bound applied to the terminal width when no bar count is configured.
pub const MAX_AUTO_BARS: usize = 60;

/// Session configuration for the player.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seek point in seconds for both the playback and the lyric cursor.
    pub start_time: f64,
    /// Number of amplitude bars. `None` follows the terminal width.
    pub bar_count: Option<usize>,
    /// Rows drawn on each side of the centre line.
    pub center: usize,
    /// Samples requested from the source per device callback.
    pub block_size: usize,
    /// Moving-average window applied to the decimated amplitudes.
    pub smoothing_window: usize,
    /// Display window in seconds given to the final lyric line.
    pub default_lyric_window: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            bar_count: None,
            center: 6,
            block_size: 1024,
            smoothing_window: 6,
            default_lyric_window: 5.0,
        }
    }
}

impl PlayerConfig {
    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.start_time.is_finite() || self.start_time < 0.0 {
            return Err(LyricVizError::InvalidInput(
                "start time must be a non-negative number of seconds",
            ));
        }
        if self.bar_count == Some(0) {
            return Err(LyricVizError::InvalidInput("bar count must be at least 1"));
        }
        if self.center == 0 {
            return Err(LyricVizError::InvalidInput("center must be at least 1 row"));
        }
        if self.block_size == 0 {
            return Err(LyricVizError::InvalidInput("block size must be at least 1 sample"));
        }
        if self.smoothing_window == 0 {
            return Err(LyricVizError::InvalidInput("smoothing window must be at least 1"));
        }
        if !(self.default_lyric_window.is_finite() && self.default_lyric_window > 0.0) {
            return Err(LyricVizError::InvalidInput(
                "default lyric window must be a positive number of seconds",
            ));
        }
        Ok(())
    }

    /// Resolves the bar count against the width of the attached terminal.
    pub fn resolve_bar_count(&self, terminal_width: usize) -> usize {
        self.bar_count
            .unwrap_or_else(|| terminal_width.min(MAX_AUTO_BARS))
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PlayerConfig::default();
        assert_eq!(config.start_time, 0.0);
        assert_eq!(config.bar_count, None);
        assert_eq!(config.center, 6);
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.smoothing_window, 6);
        assert_eq!(config.default_lyric_window, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = PlayerConfig::from_json_str(r#"{ "start_time": 12.5, "bar_count": 40 }"#)
            .unwrap();
        assert_eq!(config.start_time, 12.5);
        assert_eq!(config.bar_count, Some(40));
        assert_eq!(config.block_size, 1024);
    }

    #[test]
    fn rejects_zero_block_size() {
        let err = PlayerConfig::from_json_str(r#"{ "block_size": 0 }"#).unwrap_err();
        assert!(matches!(err, LyricVizError::InvalidInput(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = PlayerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LyricVizError::Config(_)));
    }

    #[test]
    fn bar_count_follows_terminal_width_up_to_cap() {
        let config = PlayerConfig::default();
        assert_eq!(config.resolve_bar_count(200), 60);
        assert_eq!(config.resolve_bar_count(42), 42);
        assert_eq!(config.resolve_bar_count(0), 1);

        let fixed = PlayerConfig {
            bar_count: Some(80),
            ..Default::default()
        };
        assert_eq!(fixed.resolve_bar_count(20), 80);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{ "center": 4 }"#).unwrap();

        let config = PlayerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.center, 4);
    }
}
