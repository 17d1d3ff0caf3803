use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::formatting::{BASE_FONT_SIZE, DEFAULT_MAX_CHARS_PER_LINE};
use crate::speech::probe::{DEFAULT_FFPROBE, DEFAULT_PROBE_TIMEOUT_SECS};

/// Application configuration module
/// This module handles loading, validating and saving the settings that
/// drive caption generation.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Longest narration allowed, in seconds
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: f64,

    /// Timing config
    #[serde(default)]
    pub timing: TimingConfig,

    /// Caption output config
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Audio measurement config
    #[serde(default)]
    pub audio: AudioConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How captions are placed on the timeline
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimingStrategy {
    // @strategy: Clause estimates, rescaled to measured audio when available
    #[default]
    Estimate,
    // @strategy: Sentence shares of a measured duration
    Measured,
}

impl std::fmt::Display for TimingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Estimate => write!(f, "estimate"),
            Self::Measured => write!(f, "measured"),
        }
    }
}

/// Caption file format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Srt,
    Json,
}

impl OutputFormat {
    // @returns: File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Json => "json",
        }
    }
}

/// Timing configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    // @field: Timeline strategy
    #[serde(default)]
    pub strategy: TimingStrategy,

    // @field: Trim scripts that exceed max_duration_secs
    #[serde(default = "default_true")]
    pub auto_trim: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            strategy: TimingStrategy::default(),
            auto_trim: true,
        }
    }
}

/// Caption output configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionConfig {
    // @field: Characters per line at the base font size
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    // @field: Font size captions are rendered with
    #[serde(default = "default_font_size")]
    pub font_size: Option<u32>,

    // @field: Wrap caption text into lines
    #[serde(default = "default_true")]
    pub wrap_lines: bool,

    // @field: Output file format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            font_size: default_font_size(),
            wrap_lines: true,
            format: OutputFormat::default(),
        }
    }
}

/// Audio measurement configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AudioConfig {
    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    // @field: Probe timeout seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Upper bound accepted for max_duration_secs
const MAX_ALLOWED_DURATION_SECS: f64 = 180.0;

/// Narrowest caption line the wrapper supports
const MIN_CHARS_PER_LINE: usize = 10;

fn default_max_duration_secs() -> f64 {
    60.0 // YouTube Shorts limit
}

fn default_max_chars_per_line() -> usize {
    DEFAULT_MAX_CHARS_PER_LINE
}

fn default_font_size() -> Option<u32> {
    Some(BASE_FONT_SIZE)
}

fn default_ffprobe_path() -> String {
    DEFAULT_FFPROBE.to_string()
}

fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.max_duration_secs > 0.0 && self.max_duration_secs <= MAX_ALLOWED_DURATION_SECS) {
            return Err(AppError::Config(format!(
                "max_duration_secs must be in (0, {}], got {}",
                MAX_ALLOWED_DURATION_SECS,
                self.max_duration_secs
            )));
        }

        if self.captions.max_chars_per_line < MIN_CHARS_PER_LINE {
            return Err(AppError::Config(format!(
                "captions.max_chars_per_line must be at least {}, got {}",
                MIN_CHARS_PER_LINE,
                self.captions.max_chars_per_line
            )));
        }

        if self.captions.font_size == Some(0) {
            return Err(AppError::Config("captions.font_size must be greater than 0".to_string()));
        }

        if self.audio.ffprobe_path.trim().is_empty() {
            return Err(AppError::Config("audio.ffprobe_path must not be empty".to_string()));
        }

        if self.audio.probe_timeout_secs == 0 {
            return Err(AppError::Config("audio.probe_timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Load a configuration file, writing the defaults there first when
    /// the file does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Self {
            max_duration_secs: default_max_duration_secs(),
            timing: TimingConfig::default(),
            captions: CaptionConfig::default(),
            audio: AudioConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
