use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lyric_visualiser_core::{
    load_lrc, load_wav, render::terminal_size, CpalDriver, HeadlessDriver, LyricTimeline,
    PlaybackEngine, PlayerConfig, TerminalSurface,
};
use tracing_subscriber::EnvFilter;

fn main() -> lyric_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => run_play(args),
        Commands::Lyrics { path, lyric_window } => run_lyrics(&path, lyric_window),
    }
}

fn run_play(args: PlayArgs) -> lyric_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    tracing::info!(audio = ?args.audio, lyrics = ?args.lyrics, "starting playback");

    let audio = load_wav(&args.audio)?;
    let entries = match &args.lyrics {
        Some(path) => load_lrc(path)?,
        None => Vec::new(),
    };
    let timeline = LyricTimeline::with_default_window(entries, config.default_lyric_window);

    let (columns, _) = terminal_size();
    let bar_count = config.resolve_bar_count(columns as usize);
    let mut engine = PlaybackEngine::new(
        audio.into_source(),
        timeline,
        &config,
        bar_count,
        TerminalSurface::stdout(),
    );

    let report = if args.headless {
        HeadlessDriver::new(true).run(&mut engine)
    } else {
        CpalDriver::new().run(engine)?
    };

    tracing::info!(
        cycles = report.cycles,
        samples = report.samples_emitted,
        seconds = report.playback_time,
        "playback complete"
    );
    Ok(())
}

fn run_lyrics(path: &Path, lyric_window: Option<f64>) -> lyric_visualiser_core::Result<()> {
    let window = lyric_window.unwrap_or(PlayerConfig::default().default_lyric_window);
    let timeline = LyricTimeline::with_default_window(load_lrc(path)?, window);

    for (index, entry) in timeline.entries().iter().enumerate() {
        if let Some(window) = timeline.window_for(index) {
            println!(
                "{:>4}  {:>8.2}s - {:>8.2}s  {}",
                index, window.start, window.end, entry.text
            );
        }
    }
    Ok(())
}

fn init_tracing() {
    // stdout carries the frames, so logs go to stderr and stay quiet by default.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal amplitude bars with time-synced lyrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a WAV file with the visualiser and optional lyrics.
    Play(PlayArgs),
    /// Print the parsed timeline of an LRC file.
    Lyrics {
        /// Path to the `.lrc` file.
        path: PathBuf,
        /// Display window in seconds for the final line.
        #[arg(long)]
        lyric_window: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Path to the WAV file to play.
    audio: PathBuf,
    /// Lyric file in `[MM:SS.ss]text` format.
    #[arg(short, long)]
    lyrics: Option<PathBuf>,
    /// JSON configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Start position in seconds.
    #[arg(short, long)]
    start: Option<f64>,
    /// Number of bars (defaults to the terminal width, at most 60).
    #[arg(long)]
    bars: Option<usize>,
    /// Rows drawn on each side of the centre line.
    #[arg(long)]
    center: Option<usize>,
    /// Samples per audio callback.
    #[arg(long)]
    block_size: Option<usize>,
    /// Moving-average window for the bars.
    #[arg(long)]
    smoothing: Option<usize>,
    /// Display window in seconds for the final lyric line.
    #[arg(long)]
    lyric_window: Option<f64>,
    /// Drive the visualiser without opening an audio device.
    #[arg(long)]
    headless: bool,
}

impl PlayArgs {
    fn resolve_config(&self) -> lyric_visualiser_core::Result<PlayerConfig> {
        let mut config = match &self.config {
            Some(path) => PlayerConfig::from_json_file(path)?,
            None => PlayerConfig::default(),
        };

        if let Some(start) = self.start {
            config.start_time = start;
        }
        if let Some(bars) = self.bars {
            config.bar_count = Some(bars);
        }
        if let Some(center) = self.center {
            config.center = center;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(window) = self.smoothing {
            config.smoothing_window = window;
        }
        if let Some(window) = self.lyric_window {
            config.default_lyric_window = window;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "lyric-visualiser",
            "play",
            "song.wav",
            "--lyrics",
            "song.lrc",
            "--start",
            "12.5",
            "--bars",
            "32",
            "--block-size",
            "512",
        ]);
        let Commands::Play(args) = cli.command else {
            panic!("expected play subcommand");
        };

        let config = args.resolve_config().unwrap();
        assert_eq!(config.start_time, 12.5);
        assert_eq!(config.bar_count, Some(32));
        assert_eq!(config.block_size, 512);
        assert_eq!(config.center, 6);
        assert_eq!(args.lyrics, Some(PathBuf::from("song.lrc")));
        assert!(!args.headless);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli::parse_from(["lyric-visualiser", "play", "song.wav", "--center", "0"]);
        let Commands::Play(args) = cli.command else {
            panic!("expected play subcommand");
        };
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
