// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use shortcaps::app_config::{self, Config, OutputFormat, TimingStrategy};
use shortcaps::app_controller::{Controller, RunOutcome};
use shortcaps::file_utils::{FileManager, FileType};
use shortcaps::speech::{AudioProbe, KnownDuration, RenderedAudio, SpeechSynthesizer};
use shortcaps::timing::trim::sentence_estimates;
use shortcaps::timing::{fit_to_duration, LengthVerdict};

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

/// CLI Wrapper for TimingStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTimingStrategy {
    Estimate,
    Measured,
}

impl From<CliTimingStrategy> for TimingStrategy {
    fn from(cli_strategy: CliTimingStrategy) -> Self {
        match cli_strategy {
            CliTimingStrategy::Estimate => TimingStrategy::Estimate,
            CliTimingStrategy::Measured => TimingStrategy::Measured,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate timed captions for a script or a folder of scripts (default command)
    Captions(CaptionArgs),

    /// Show the estimated narration length of a script
    Estimate {
        /// Script file
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Maximum narration length in seconds (defaults to the config value)
        #[arg(long)]
        max_duration: Option<f64>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Drop sentences until a script fits a duration
    Trim {
        /// Script file
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Maximum narration length in seconds (defaults to the config value)
        #[arg(long)]
        max_duration: Option<f64>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Stretch an SRT file to a measured narration length
    Rescale {
        /// SRT file to rescale
        #[arg(value_name = "SRT")]
        srt: PathBuf,

        /// Measured narration length in seconds
        #[arg(long)]
        duration: f64,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Replace speech-recognized caption text with the script's sentences
    Align {
        /// SRT file, or JSON array of recognized words with timings
        #[arg(value_name = "RECOGNIZED")]
        recognized: PathBuf,

        /// Original script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Narration length in seconds to stretch recognized words to
        #[arg(long)]
        duration: Option<f64>,

        /// Output file (defaults to overwriting an SRT input, or
        /// `<stem>.aligned.<format>` next to a word list)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for shortcaps
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by commands that load the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone)]
struct CaptionArgs {
    /// Script file or directory of scripts to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Rendered narration to measure (single script only)
    #[arg(short, long, conflicts_with = "audio_duration")]
    audio: Option<PathBuf>,

    /// Narration length in seconds, when already known
    #[arg(long)]
    audio_duration: Option<f64>,

    /// Output directory (defaults to the script's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Timing strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliTimingStrategy>,

    /// Caption file format
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    #[command(flatten)]
    common: CommonArgs,
}

/// shortcaps - Captions for short-form narration
///
/// Times captions for narrated short videos from the script alone, and
/// stretches them to the narration when its length is known.
#[derive(Parser, Debug)]
#[command(name = "shortcaps")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Caption timing for narrated short videos")]
#[command(long_about = "shortcaps splits narration scripts into caption-sized clauses and times them from estimated speech durations.

EXAMPLES:
    shortcaps script.txt                          # Captions from estimates only
    shortcaps script.txt --audio narration.mp3    # Rescale to the rendered narration
    shortcaps script.txt --audio-duration 42.5    # Rescale to a known length
    shortcaps -s measured script.txt -a voice.wav # Sentence shares of the narration
    shortcaps /scripts/                           # Every .txt script, with same-named audio
    shortcaps estimate script.txt                 # Per-sentence estimates and verdict
    shortcaps trim --max-duration 45 script.txt   # Fit a script into 45 seconds
    shortcaps rescale captions.srt --duration 30  # Stretch an SRT file
    shortcaps align stt.srt script.txt            # Put the script text into STT captions
    shortcaps align words.json script.txt --duration 41.8
                                                  # Group recognized words, then align
    shortcaps completions bash > shortcaps.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    captions: CaptionArgs,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @applies: Log level from the command line, or from the config when absent
fn apply_log_level(cli_level: Option<&CliLogLevel>, config: Option<&Config>) {
    let level = match (cli_level, config) {
        (Some(cli_level), _) => app_config::LogLevel::from(cli_level.clone()),
        (None, Some(config)) => config.log_level.clone(),
        (None, None) => return,
    };
    log::set_max_level(level.to_level_filter());
}

// @loads: Configuration file, then command-line log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    apply_log_level(common.log_level.as_ref(), None);

    let mut config = Config::load_or_create(&common.config_path)?;
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    apply_log_level(common.log_level.as_ref(), Some(&config));
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "shortcaps", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Captions(args)) => run_captions(args).await,
        Some(Commands::Estimate { script, max_duration, common }) => run_estimate(&script, max_duration, &common),
        Some(Commands::Trim { script, max_duration, output, common }) => {
            run_trim(&script, max_duration, output.as_deref(), &common)
        }
        Some(Commands::Rescale { srt, duration, output, common }) => {
            let controller = Controller::with_config(load_config(&common)?)?;
            let output = output.unwrap_or_else(|| srt.clone());
            let outcome = controller.rescale_file(&srt, duration, &output)?;
            info!("{:?}, written to {:?}", outcome, output);
            Ok(())
        }
        Some(Commands::Align { recognized, script, duration, output, common }) => {
            run_align(&recognized, &script, duration, output, &common)
        }
        None => run_captions(cli.captions).await,
    }
}

async fn run_captions(args: CaptionArgs) -> Result<()> {
    let input_path = args.input_path.clone().ok_or_else(|| {
        anyhow!("INPUT_PATH is required when no subcommand is specified")
    })?;

    let mut config = load_config(&args.common)?;

    // Override config with CLI options if provided
    if let Some(strategy) = &args.strategy {
        config.timing.strategy = strategy.clone().into();
    }
    if let Some(format) = &args.format {
        config.captions.format = format.clone().into();
    }

    let controller = Controller::with_config(config.clone())?;

    if FileManager::dir_exists(&input_path) {
        if args.audio.is_some() || args.audio_duration.is_some() {
            warn!("Narration options are ignored in folder mode; same-named audio files are used instead");
        }
        let summary = controller.run_folder(input_path, args.force_overwrite).await?;
        if summary.errors > 0 {
            return Err(anyhow!("{} script(s) failed", summary.errors));
        }
        return Ok(());
    }

    match FileManager::detect_file_type(&input_path)? {
        FileType::Script | FileType::Unknown => {}
        FileType::Subtitle => {
            return Err(anyhow!("{:?} is a subtitle file; use the rescale or align command", input_path));
        }
        FileType::Transcript => {
            return Err(anyhow!("{:?} is a word list; use the align command", input_path));
        }
        FileType::Audio => {
            return Err(anyhow!("{:?} is audio; pass it with --audio next to its script", input_path));
        }
    }

    let output_dir = args.output_dir.clone()
        .or_else(|| input_path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let probe = AudioProbe::new(&config.audio.ffprobe_path, config.audio.probe_timeout_secs);
    let synthesizer: Option<Box<dyn SpeechSynthesizer>> = match (&args.audio, args.audio_duration) {
        (Some(audio), _) => Some(Box::new(RenderedAudio::new(audio, probe))),
        (None, Some(duration)) => Some(Box::new(KnownDuration::new(duration))),
        (None, None) => None,
    };

    match controller.run(input_path, output_dir, synthesizer.as_deref(), args.force_overwrite).await? {
        RunOutcome::Written { output_path, .. } => info!("Success: {:?}", output_path),
        RunOutcome::Skipped(output_path) => info!("Kept existing {:?}", output_path),
    }

    Ok(())
}

fn run_estimate(script_path: &Path, max_duration: Option<f64>, common: &CommonArgs) -> Result<()> {
    let mut config = load_config(common)?;
    if let Some(max_duration) = max_duration {
        config.max_duration_secs = max_duration;
    }
    let controller = Controller::with_config(config)?;

    let script = FileManager::read_to_string(script_path)?;

    println!("{:>4}  {:>7}  {}", "#", "seconds", "sentence");
    for sentence in sentence_estimates(&script) {
        println!("{:>4}  {:>7.2}  {}", sentence.index + 1, sentence.duration_secs, sentence.text);
    }

    let report = controller.estimate_report(&script);
    let verdict = match report.verdict {
        LengthVerdict::TooShort => "too short",
        LengthVerdict::Fits => "fits",
        LengthVerdict::TooLong => "too long",
    };
    println!(
        "\nTotal: {:.2}s ({}; accepted range {:.0}-{:.0}s)",
        report.estimated_secs, verdict, report.min_secs, report.max_secs
    );

    Ok(())
}

fn run_trim(script_path: &Path, max_duration: Option<f64>, output: Option<&Path>, common: &CommonArgs) -> Result<()> {
    let mut config = load_config(common)?;
    if let Some(max_duration) = max_duration {
        config.max_duration_secs = max_duration;
    }
    config.validate().context("Invalid --max-duration")?;

    let script = FileManager::read_to_string(script_path)?;
    let fitted = fit_to_duration(&script, config.max_duration_secs);
    if fitted.was_trimmed() {
        info!("Kept {} of {} sentences", fitted.kept, fitted.original);
    }

    match output {
        Some(path) => {
            FileManager::write_to_file(path, &fitted.text)
                .with_context(|| format!("Failed to write trimmed script to {:?}", path))?;
            info!("Trimmed script written to {:?}", path);
        }
        None => println!("{}", fitted.text),
    }

    Ok(())
}

fn run_align(
    recognized: &Path,
    script: &Path,
    duration: Option<f64>,
    output: Option<PathBuf>,
    common: &CommonArgs,
) -> Result<()> {
    let config = load_config(common)?;
    let controller = Controller::with_config(config.clone())?;

    match FileManager::detect_file_type(recognized)? {
        FileType::Subtitle => {
            if duration.is_some() {
                warn!("--duration is ignored for SRT input; use the rescale command");
            }
            let output = output.unwrap_or_else(|| recognized.to_path_buf());
            let outcome = controller.align_file(recognized, script, &output)?;
            info!("{:?}, written to {:?}", outcome, output);
        }
        FileType::Transcript => {
            let output = output.unwrap_or_else(|| {
                let dir = recognized.parent().map(Path::to_path_buf).unwrap_or_default();
                let suffix = format!("aligned.{}", config.captions.format.extension());
                FileManager::generate_output_path(recognized, dir, &suffix)
            });
            let (aligned, rescaled) = controller.align_words_file(recognized, script, duration, &output)?;
            info!("{:?}, {:?}, written to {:?}", aligned, rescaled, output);
        }
        other => {
            return Err(anyhow!("Expected an SRT file or a JSON word list, got {:?} for {:?}", other, recognized));
        }
    }

    Ok(())
}
