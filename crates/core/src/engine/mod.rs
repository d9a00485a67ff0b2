//! Per-callback playback cycle tying the audio cursor to the visualisation.

use crate::{
    render::{FrameRenderer, Hsv, RenderSurface},
    AmplitudeProfiler, LyricTimeline, PlayerConfig, SampleSource, TypingAnimator,
};

/// Lifecycle of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Full blocks are still available.
    Running,
    /// The source returned a short block; the current cycle is the last one.
    Draining,
    /// The stream is finished. Further cycles only emit silence.
    Stopped,
}

/// What the device adapter should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    Stop,
}

/// Summary of a finished (or interrupted) session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackReport {
    pub cycles: u64,
    pub samples_emitted: usize,
    /// Playback position in seconds when the report was taken.
    pub playback_time: f64,
}

/// Real-time playback engine.
///
/// The device runtime calls [`PlaybackEngine::process`] once per buffer
/// request. Each call copies the next block of samples into the device buffer,
/// advances the lyric cursor, and presents a freshly rendered frame.
pub struct PlaybackEngine<S> {
    source: SampleSource,
    timeline: LyricTimeline,
    profiler: AmplitudeProfiler,
    animator: TypingAnimator,
    renderer: FrameRenderer,
    surface: S,
    block_size: usize,
    bar_count: usize,
    start_cursor: usize,
    cursor: usize,
    lyric_index: usize,
    state: EngineState,
    cycles: u64,
    levels: Vec<usize>,
}

impl<S: RenderSurface> PlaybackEngine<S> {
    /// Builds an engine positioned at `config.start_time`.
    ///
    /// A start time past the end of the track leaves the cursor at the end, so
    /// the first cycle completes the session.
    pub fn new(
        source: SampleSource,
        timeline: LyricTimeline,
        config: &PlayerConfig,
        bar_count: usize,
        surface: S,
    ) -> Self {
        let start_time = config.start_time.max(0.0);
        let start_sample = (start_time * source.sample_rate() as f64) as usize;
        let cursor = start_sample.min(source.len());
        let lyric_index = timeline.initial_index(start_time);

        tracing::info!(
            start_time,
            cursor,
            lyric_index,
            bar_count,
            block_size = config.block_size,
            "playback engine ready"
        );

        Self {
            source,
            timeline,
            profiler: AmplitudeProfiler::new(config.smoothing_window),
            animator: TypingAnimator::new(),
            renderer: FrameRenderer::new(config.center),
            surface,
            block_size: config.block_size.max(1),
            bar_count,
            start_cursor: cursor,
            cursor,
            lyric_index,
            state: EngineState::Running,
            cycles: 0,
            levels: Vec::with_capacity(bar_count),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn lyric_index(&self) -> usize {
        self.lyric_index
    }

    pub fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Seconds of audio emitted so far, measured from the start of the track.
    pub fn playback_time(&self) -> f64 {
        match self.source.sample_rate() {
            0 => 0.0,
            rate => self.cursor as f64 / rate as f64,
        }
    }

    /// Seconds of audio left after the cursor.
    pub fn remaining_seconds(&self) -> f64 {
        match self.source.sample_rate() {
            0 => 0.0,
            rate => (self.source.len() - self.cursor) as f64 / rate as f64,
        }
    }

    pub fn report(&self) -> PlaybackReport {
        PlaybackReport {
            cycles: self.cycles,
            samples_emitted: self.cursor - self.start_cursor,
            playback_time: self.playback_time(),
        }
    }

    /// Runs one cycle: fills `output` and presents the matching frame.
    ///
    /// `status` carries a problem reported by the device for this cycle; it is
    /// logged and the cycle goes ahead regardless.
    pub fn process(&mut self, output: &mut [f32], status: Option<&str>) -> CycleOutcome {
        if let Some(status) = status {
            tracing::error!(status, cursor = self.cursor, "audio device reported a problem");
        }

        if self.state == EngineState::Stopped {
            output.fill(0.0);
            return CycleOutcome::Stop;
        }

        let time = self.playback_time();
        let chunk = self.source.read(self.cursor, output.len());
        let written = chunk.len();
        output[..written].copy_from_slice(chunk.samples);
        output[written..].fill(0.0);
        if chunk.short {
            tracing::debug!(written, requested = output.len(), "short read, draining");
            self.state = EngineState::Draining;
        }

        self.lyric_index = self.timeline.current_index(time, self.lyric_index);
        self.profiler.levels_into(
            chunk.samples,
            self.bar_count,
            self.renderer.center(),
            &mut self.levels,
        );

        let typed = match (
            self.timeline.line(self.lyric_index),
            self.timeline.window_for(self.lyric_index),
        ) {
            (Some(entry), Some(window)) => self.animator.reveal(&entry.text, time, window),
            _ => {
                self.animator.reset();
                ""
            }
        };

        let frame = self.renderer.render(&self.levels, Hsv::cycling(time), typed);
        if let Err(err) = self.surface.present(&frame) {
            tracing::warn!(%err, "failed to present frame");
        }

        self.cursor += written;
        self.cycles += 1;

        if self.state == EngineState::Draining {
            self.state = EngineState::Stopped;
            if let Err(err) = self.surface.finish() {
                tracing::warn!(%err, "failed to finish render surface");
            }
            tracing::info!(
                cycles = self.cycles,
                playback_time = self.playback_time(),
                "playback finished"
            );
            return CycleOutcome::Stop;
        }

        CycleOutcome::Continue
    }
}

impl<S> std::fmt::Debug for PlaybackEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("samples", &self.source.len())
            .field("sample_rate", &self.source.sample_rate())
            .field("lyrics", &self.timeline.len())
            .field("block_size", &self.block_size)
            .field("bar_count", &self.bar_count)
            .field("cursor", &self.cursor)
            .field("lyric_index", &self.lyric_index)
            .field("state", &self.state)
            .finish()
    }
}
