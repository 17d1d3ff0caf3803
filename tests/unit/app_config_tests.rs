/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use shortcaps::app_config::{Config, LogLevel, OutputFormat, TimingStrategy};
use shortcaps::errors::AppError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.max_duration_secs, 60.0);
    assert_eq!(config.timing.strategy, TimingStrategy::Estimate);
    assert!(config.timing.auto_trim);
    assert_eq!(config.captions.max_chars_per_line, 30);
    assert_eq!(config.captions.font_size, Some(70));
    assert!(config.captions.wrap_lines);
    assert_eq!(config.captions.format, OutputFormat::Srt);
    assert_eq!(config.audio.ffprobe_path, "ffprobe");
    assert_eq!(config.audio.probe_timeout_secs, 60);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.max_duration_secs = 0.0;
    assert!(config.validate().is_err());
    config.max_duration_secs = 181.0;
    assert!(config.validate().is_err());
    config.max_duration_secs = f64::NAN;
    assert!(config.validate().is_err());
    config.max_duration_secs = 180.0;
    assert!(config.validate().is_ok());

    config.captions.max_chars_per_line = 9;
    assert!(config.validate().is_err());
    config.captions.max_chars_per_line = 10;
    assert!(config.validate().is_ok());

    config.captions.font_size = Some(0);
    assert!(config.validate().is_err());
    config.captions.font_size = None;
    assert!(config.validate().is_ok());

    config.audio.ffprobe_path = "  ".to_string();
    assert!(config.validate().is_err());
    config.audio.ffprobe_path = "ffprobe".to_string();

    config.audio.probe_timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path)?, config);

    Ok(())
}

/// Test that partial config files fall back to defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "max_duration_secs": 45.0, "timing": { "strategy": "measured" }, "captions": { "format": "json" } }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.max_duration_secs, 45.0);
    assert_eq!(config.timing.strategy, TimingStrategy::Measured);
    assert!(config.timing.auto_trim);
    assert_eq!(config.captions.format, OutputFormat::Json);
    assert_eq!(config.captions.max_chars_per_line, 30);
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test that a broken config file is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test saving and reloading a customized config
#[test]
fn test_save_withCustomConfig_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.max_duration_secs = 30.0;
    config.captions.font_size = None;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

/// Test that validation failures are configuration errors
#[test]
fn test_config_validation_withBadValue_shouldReturnConfigError() {
    let mut config = Config::default();
    config.audio.probe_timeout_secs = 0;

    let error = config.validate().unwrap_err();

    assert!(matches!(error, AppError::Config(_)));
    assert!(error.to_string().contains("probe_timeout_secs"));
}

/// Test printing strategies
#[test]
fn test_timingStrategy_display_shouldUseConfigNames() {
    assert_eq!(TimingStrategy::Estimate.to_string(), "estimate");
    assert_eq!(TimingStrategy::Measured.to_string(), "measured");
}

/// Test log level mapping and output extensions
#[test]
fn test_logLevel_and_outputFormat_shouldMapCorrectly() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    assert_eq!(OutputFormat::Srt.extension(), "srt");
    assert_eq!(OutputFormat::Json.extension(), "json");
}
