//! Core library for the Lyric Visualiser player.
//!
//! A mono track is played through a pull-based audio callback. Every buffer
//! request runs one [`PlaybackEngine`] cycle: the next block of samples is
//! handed to the device, the playback clock advances, the active lyric line is
//! resolved and typed out, and a frame of amplitude bars is presented on a
//! [`RenderSurface`].
//!
//! File decoding, lyric parsing, the terminal surface and the device drivers
//! live alongside the engine but only meet it through [`SampleSource`],
//! [`LyricTimeline`] and [`RenderSurface`].

pub mod analysis;
pub mod audio;
pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod record;
pub mod render;
pub mod timeline;
pub mod typing;

pub use analysis::AmplitudeProfiler;
pub use audio::{load_wav, DecodedAudio, SampleChunk, SampleSource};
pub use config::PlayerConfig;
pub use device::{CpalDriver, HeadlessDriver};
pub use engine::{CycleOutcome, EngineState, PlaybackEngine, PlaybackReport};
pub use error::{LyricVizError, Result};
pub use record::{FrameRecorder, RecordingSettings};
pub use render::{Frame, FrameRenderer, Hsv, RenderSurface, Rgb, TerminalSurface};
pub use timeline::{load_lrc, parse_lrc, LyricEntry, LyricTimeline, LyricWindow};
pub use typing::TypingAnimator;
