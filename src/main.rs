// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::{Controller, RunOptions};
use crate::file_utils::FileManager;
use crate::jobs::JobStore;
use crate::pipeline::SubtitlePipeline;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod jobs;
mod line_wrap;
mod media;
mod pipeline;
mod subtitle_processor;
mod timing;
mod transcriber;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate subtitles for a video or a directory of videos (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Reflow an existing SRT file: wrap lines and split oversized cues
    Format(FormatArgs),

    /// Burn an SRT file into a video with the configured style
    Render(RenderArgs),

    /// Inspect or clean the job registry
    Jobs {
        #[command(subcommand)]
        command: JobsCommands,
    },

    /// Generate shell completions for subgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommands {
    /// List recorded jobs and their states
    List,
    /// Delete a job together with its artifacts
    Clean {
        /// Job id to delete
        id: String,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Language hint for transcription (e.g. 'en', 'pl')
    #[arg(short, long)]
    language: Option<String>,

    /// Also burn the subtitles into a rendered copy of the video
    #[arg(short, long)]
    render: bool,

    /// Limit the render to the first N seconds (implies --render)
    #[arg(long, value_name = "SECONDS")]
    preview: Option<u32>,

    /// Output directory for generated artifacts
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct FormatArgs {
    /// SRT file to reflow, or '-' for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Where to write the result (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum characters per display line
    #[arg(short, long, default_value_t = line_wrap::DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input video file
    #[arg(value_name = "VIDEO")]
    video: PathBuf,

    /// Subtitle file to burn in
    #[arg(value_name = "SUBTITLES")]
    subtitles: PathBuf,

    /// Output video path (defaults to <video>_subtitled.mp4 next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Limit the render to the first N seconds
    #[arg(long, value_name = "SECONDS")]
    preview: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,
}

/// subgen - subtitle generation and burn-in tool
///
/// Extracts audio from video, transcribes it through a speech-to-text
/// service, wraps the transcript into well-formed SRT cues and optionally
/// burns the result back into the video.
#[derive(Parser, Debug)]
#[command(name = "subgen")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle generation and burn-in tool")]
#[command(long_about = "subgen extracts audio from video files, transcribes it through a \
speech-to-text service and produces well-formed SRT subtitles, optionally burned back into the video.

EXAMPLES:
    subgen movie.mp4                         # Generate subtitles using default config
    subgen -f movie.mp4                      # Force overwrite existing output
    subgen -l en movie.mp4                   # Transcribe with an English language hint
    subgen -r movie.mp4                      # Generate and burn in subtitles
    subgen --preview 10 -r movie.mp4         # Burn in, first 10 seconds only
    subgen format captions.srt               # Reflow an existing SRT to 38-char lines
    subgen render movie.mp4 captions.srt     # Burn an existing SRT into a video
    subgen jobs list                         # Show recorded jobs
    subgen completions bash > subgen.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Language hint for transcription (e.g. 'en', 'pl')
    #[arg(short, long)]
    language: Option<String>,

    /// Also burn the subtitles into a rendered copy of the video
    #[arg(short, long)]
    render: bool,

    /// Limit the render to the first N seconds (implies --render)
    #[arg(long, value_name = "SECONDS")]
    preview: Option<u32>,

    /// Output directory for generated artifacts
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subgen", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        Some(Commands::Format(args)) => run_format(args),
        Some(Commands::Render(args)) => run_render(args).await,
        Some(Commands::Jobs { command }) => run_jobs(command),
        None => {
            // Default behavior - use top-level args for convenience
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let generate_args = GenerateArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                language: cli.language,
                render: cli.render,
                preview: cli.preview,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_generate(generate_args).await
        }
    }
}

/// Load the config file, creating a default one if it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(language) = &options.language {
        config.language = Some(language.clone());
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let run_options = RunOptions {
        force_overwrite: options.force_overwrite,
        render: options.render || options.preview.is_some(),
        preview_secs: options.preview,
    };

    if options.input_path.is_file() {
        controller.run(options.input_path.clone(), &run_options).await
    } else if options.input_path.is_dir() {
        controller.run_folder(options.input_path.clone(), &run_options).await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}

fn run_format(options: FormatArgs) -> Result<()> {
    let input_text = if options.input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        FileManager::read_to_string(&options.input)?
    };

    let pipeline = SubtitlePipeline::new(options.max_line_length);
    let output_text = pipeline.reflow(&input_text);

    match &options.output {
        Some(path) => {
            FileManager::write_to_file(path, &output_text)?;
            info!("Wrote reflowed subtitles to {:?}", path);
        }
        None => {
            print!("{}", output_text);
        }
    }

    Ok(())
}

async fn run_render(options: RenderArgs) -> Result<()> {
    if !options.video.exists() {
        return Err(anyhow!("Video file does not exist: {:?}", options.video));
    }
    if !options.subtitles.exists() {
        return Err(anyhow!("Subtitle file does not exist: {:?}", options.subtitles));
    }

    let config = load_or_create_config(&options.config_path)?;

    let output = options.output.clone().unwrap_or_else(|| {
        let parent = options.video.parent().unwrap_or(Path::new(".")).to_path_buf();
        FileManager::generate_output_path(&options.video, parent, "_subtitled", "mp4")
    });

    media::render_subtitles(
        &options.video,
        &options.subtitles,
        &output,
        &config.style,
        options.preview,
    )
    .await?;

    info!("Rendered video to {:?}", output);
    Ok(())
}

fn run_jobs(command: JobsCommands) -> Result<()> {
    let store = JobStore::new_default()?;

    match command {
        JobsCommands::List => {
            let records = store.list()?;
            if records.is_empty() {
                info!("No jobs recorded");
                return Ok(());
            }
            for record in records {
                println!(
                    "{}  {:15}  {}  {}",
                    record.id,
                    record.state.to_string(),
                    record.created_at,
                    record.video_path
                );
            }
            Ok(())
        }
        JobsCommands::Clean { id } => {
            store.delete_with_artifacts(&id)?;
            info!("Removed job {}", id);
            Ok(())
        }
    }
}
