//! Adapters that pull blocks from a [`PlaybackEngine`].

use std::{
    sync::mpsc::{self, RecvTimeoutError},
    time::Duration,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{
    engine::{CycleOutcome, PlaybackEngine, PlaybackReport},
    render::RenderSurface,
    LyricVizError, Result,
};

/// Extra time allowed past the end of the track before giving up on the
/// device's completion signal.
pub const COMPLETION_GRACE: Duration = Duration::from_secs(2);

/// Plays the engine through the default output device.
#[derive(Debug, Clone, Default)]
pub struct CpalDriver;

impl CpalDriver {
    pub fn new() -> Self {
        Self
    }

    /// Opens the default output stream and blocks until the engine stops.
    ///
    /// The device is opened at the track's sample rate in whichever of the
    /// f32, i16 or u16 formats it offers. The mono block is copied to every
    /// channel. Errors raised by the stream while playing are handed to the
    /// next cycle as its device status.
    pub fn run<S>(&self, engine: PlaybackEngine<S>) -> Result<PlaybackReport>
    where
        S: RenderSurface + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| LyricVizError::Device("no audio output device available".into()))?;
        let supported = negotiate_config(&device, engine.sample_rate())?;

        let channels = supported.channels().max(1);
        let block_size = engine.block_size();
        let buffer_size = match supported.buffer_size() {
            cpal::SupportedBufferSize::Range { min, max }
                if (*min as usize..=*max as usize).contains(&block_size) =>
            {
                cpal::BufferSize::Fixed(block_size as u32)
            }
            _ => cpal::BufferSize::Default,
        };
        let sample_format = supported.sample_format();
        let config = cpal::StreamConfig {
            channels,
            sample_rate: supported.sample_rate(),
            buffer_size,
        };

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            channels,
            sample_rate = engine.sample_rate(),
            ?sample_format,
            ?buffer_size,
            "opening output stream"
        );

        let wait = Duration::from_secs_f64(engine.remaining_seconds()) + COMPLETION_GRACE;
        let (status_tx, status_rx) = mpsc::channel::<String>();
        let (done_tx, done_rx) = mpsc::sync_channel::<PlaybackReport>(1);
        let callback = OutputCallback::new(engine, channels as usize, status_rx, done_tx);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream(&device, &config, callback, status_tx, to_f32)?,
            cpal::SampleFormat::I16 => build_stream(&device, &config, callback, status_tx, to_i16)?,
            cpal::SampleFormat::U16 => build_stream(&device, &config, callback, status_tx, to_u16)?,
            other => {
                return Err(LyricVizError::Device(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        };

        stream.play().map_err(LyricVizError::device)?;

        match done_rx.recv_timeout(wait) {
            Ok(report) => Ok(report),
            Err(RecvTimeoutError::Timeout) => Err(LyricVizError::msg(
                "audio device stopped requesting samples before the track finished",
            )),
            Err(RecvTimeoutError::Disconnected) => {
                Err(LyricVizError::msg("audio stream closed unexpectedly"))
            }
        }
    }
}

fn is_playable_format(format: cpal::SampleFormat) -> bool {
    matches!(
        format,
        cpal::SampleFormat::F32 | cpal::SampleFormat::I16 | cpal::SampleFormat::U16
    )
}

/// Picks an output config running at `sample_rate`, preferring the device's
/// default format and channel count.
fn negotiate_config(
    device: &cpal::Device,
    sample_rate: u32,
) -> Result<cpal::SupportedStreamConfig> {
    let preferred = device
        .default_output_config()
        .map_err(LyricVizError::device)?;
    if preferred.sample_rate().0 == sample_rate && is_playable_format(preferred.sample_format()) {
        return Ok(preferred);
    }

    let rate = cpal::SampleRate(sample_rate);
    let mut candidates: Vec<_> = device
        .supported_output_configs()
        .map_err(LyricVizError::device)?
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .filter(|range| is_playable_format(range.sample_format()))
        .collect();
    candidates.sort_by_key(|range| {
        (
            range.sample_format() != preferred.sample_format(),
            range.channels() != preferred.channels(),
        )
    });

    candidates
        .into_iter()
        .next()
        .map(|range| range.with_sample_rate(rate))
        .ok_or_else(|| {
            LyricVizError::Device(format!(
                "output device cannot play at {sample_rate} Hz in f32, i16 or u16"
            ))
        })
}

fn build_stream<T, S>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut callback: OutputCallback<S>,
    status_tx: mpsc::Sender<String>,
    convert: fn(f32) -> T,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + 'static,
    S: RenderSurface + Send + 'static,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| callback.fill(data, convert),
            move |err| {
                tracing::error!(%err, "audio stream error");
                let _ = status_tx.send(err.to_string());
            },
            None,
        )
        .map_err(LyricVizError::device)
}

fn to_f32(sample: f32) -> f32 {
    sample
}

fn to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}

fn to_u16(sample: f32) -> u16 {
    (sample * 32767.0 + 32768.0).clamp(0.0, 65535.0) as u16
}

/// Copies each mono sample to every channel of its interleaved frame.
///
/// Samples past the last complete frame covered by `mono` are set to silence.
fn fan_out<T: Copy>(mono: &[f32], data: &mut [T], channels: usize, convert: fn(f32) -> T) {
    let channels = channels.max(1);
    let mut filled = 0;
    for (frame, sample) in data.chunks_exact_mut(channels).zip(mono) {
        frame.fill(convert(*sample));
        filled += channels;
    }
    data[filled..].fill(convert(0.0));
}

/// State owned by the device callback: the engine, its mono scratch block and
/// the channels linking it to the main thread.
struct OutputCallback<S> {
    engine: PlaybackEngine<S>,
    mono: Vec<f32>,
    channels: usize,
    status: mpsc::Receiver<String>,
    done: Option<mpsc::SyncSender<PlaybackReport>>,
}

impl<S: RenderSurface> OutputCallback<S> {
    fn new(
        engine: PlaybackEngine<S>,
        channels: usize,
        status: mpsc::Receiver<String>,
        done: mpsc::SyncSender<PlaybackReport>,
    ) -> Self {
        let mono = vec![0.0; engine.block_size()];
        Self {
            engine,
            mono,
            channels: channels.max(1),
            status,
            done: Some(done),
        }
    }

    /// Runs one engine cycle for an interleaved device buffer.
    fn fill<T: Copy>(&mut self, data: &mut [T], convert: fn(f32) -> T) {
        let frames = data.len() / self.channels;
        if self.mono.len() < frames {
            self.mono.resize(frames, 0.0);
        }

        let status = self.status.try_recv().ok();
        let outcome = self
            .engine
            .process(&mut self.mono[..frames], status.as_deref());
        fan_out(&self.mono[..frames], data, self.channels, convert);

        if outcome == CycleOutcome::Stop {
            if let Some(done) = self.done.take() {
                let _ = done.try_send(self.engine.report());
            }
        }
    }
}

/// Drives the pull contract without audio hardware.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDriver {
    /// Sleep for the duration of each block between cycles.
    pub realtime: bool,
}

impl HeadlessDriver {
    pub fn new(realtime: bool) -> Self {
        Self { realtime }
    }

    /// Calls the engine with `block_size` buffers until it stops.
    pub fn run<S: RenderSurface>(&self, engine: &mut PlaybackEngine<S>) -> PlaybackReport {
        let mut buffer = vec![0.0_f32; engine.block_size()];
        let period = match engine.sample_rate() {
            0 => Duration::ZERO,
            rate => Duration::from_secs_f64(buffer.len() as f64 / rate as f64),
        };

        while engine.process(&mut buffer, None) == CycleOutcome::Continue {
            if self.realtime {
                std::thread::sleep(period);
            }
        }

        engine.report()
    }
}
