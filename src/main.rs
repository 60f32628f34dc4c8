// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod audio_extractor;
mod errors;
mod file_utils;
mod subtitle_converter;
mod transcriber;
mod transcript;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe a folder of videos into subtitles (default command)
    #[command(alias = "transcribe")]
    Transcribe(TranscribeArgs),

    /// Generate shell completions for vidscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct TranscribeArgs {
    /// Directory of video files to process (overrides config)
    #[arg(value_name = "VIDEOS_DIR")]
    videos_dir: Option<PathBuf>,

    /// Directory for extracted audio files
    #[arg(short, long)]
    audio_dir: Option<PathBuf>,

    /// Directory for transcript JSON documents
    #[arg(short, long)]
    transcript_dir: Option<PathBuf>,

    /// Directory for generated SRT subtitles
    #[arg(short, long)]
    subtitle_dir: Option<PathBuf>,

    /// Spoken language of the source audio (e.g. 'Chinese', 'Japanese')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Initial batch size for the transcription engine
    #[arg(short, long)]
    batch_size: Option<u32>,

    /// Device target for the engine (e.g. 'mps', '0')
    #[arg(short, long)]
    device: Option<String>,

    /// Model identifier for the engine
    #[arg(short, long)]
    model: Option<String>,

    /// Force overwrite of existing subtitle files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// vidscribe - Batch video transcription to subtitles
///
/// Extracts audio from video files, transcribes it with an external
/// speech-to-text engine, and converts the transcripts to SRT subtitles.
#[derive(Parser, Debug)]
#[command(name = "vidscribe")]
#[command(version = "1.0.0")]
#[command(about = "Batch video-to-subtitle transcription tool")]
#[command(long_about = "vidscribe extracts audio from videos, transcribes it with an external
speech-to-text engine, and converts the transcripts into SRT subtitles.

EXAMPLES:
    vidscribe /movies/                       # Transcribe every video in a folder
    vidscribe -L Japanese /movies/           # Transcribe Japanese speech
    vidscribe -b 16 /movies/                 # Start with a larger engine batch size
    vidscribe -f /movies/                    # Force overwrite existing subtitles
    vidscribe --log-level debug /movies/     # Verbose engine output
    vidscribe completions bash > vs.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

RETRY BEHAVIOR:
    When the engine runs out of memory (or fails for any other reason), the
    batch size is reduced by 4 and the file is retried. A file fails
    permanently once the batch size would drop to zero.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    transcribe: TranscribeArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vidscribe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        None => run_transcribe(cli.transcribe).await,
    }
}

async fn run_transcribe(options: TranscribeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(videos_dir) = &options.videos_dir {
        config.directories.videos = videos_dir.clone();
    }
    if let Some(audio_dir) = &options.audio_dir {
        config.directories.audio = audio_dir.clone();
    }
    if let Some(transcript_dir) = &options.transcript_dir {
        config.directories.transcripts = transcript_dir.clone();
    }
    if let Some(subtitle_dir) = &options.subtitle_dir {
        config.directories.subtitles = subtitle_dir.clone();
    }
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.initial_batch_size = batch_size;
    }
    if let Some(device) = &options.device {
        config.engine.device_id = device.clone();
    }
    if let Some(model) = &options.model {
        config.engine.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let videos_path = config.directories.videos.clone();
    let controller = Controller::with_config(config)?;

    if videos_path.is_file() {
        // Process a single file
        controller.run(&videos_path, options.force_overwrite).await?;
    } else if videos_path.is_dir() {
        // Process a directory
        controller.run_folder(options.force_overwrite).await?;
    } else {
        return Err(anyhow::anyhow!("Input path does not exist: {:?}", videos_path));
    }

    Ok(())
}
