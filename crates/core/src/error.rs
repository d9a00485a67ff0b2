/// Result alias that carries the custom [`LyricVizError`] type.
pub type Result<T> = std::result::Result<T, LyricVizError>;

/// Common error type for the core crate.
///
/// Only session setup (loading files, opening the device, validating the
/// configuration) produces these. Failures inside a playback cycle are logged
/// and swallowed by the engine.
#[derive(Debug, thiserror::Error)]
pub enum LyricVizError {
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// A configuration value or argument is outside its accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The audio file could not be decoded.
    #[error("wav decoding failed: {0}")]
    Wav(#[from] hound::Error),
    /// The configuration file is not valid JSON for [`crate::PlayerConfig`].
    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
    /// The audio output device could not be opened or started.
    #[error("audio device error: {0}")]
    Device(String),
}

impl LyricVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn device<T: std::fmt::Display>(err: T) -> Self {
        Self::Device(err.to_string())
    }
}

impl From<&str> for LyricVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for LyricVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
