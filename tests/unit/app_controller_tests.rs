/*!
 * Tests for the application controller
 */

use std::path::Path;
use anyhow::Result;
use shortcaps::app_config::{Config, OutputFormat, TimingStrategy};
use shortcaps::app_controller::Controller;
use shortcaps::timing::{
    build, estimate_script_duration, timeline_end, LengthVerdict, RescaleOutcome, TimingMode,
};
use crate::common::{self, SAMPLE_SCRIPT};

fn controller_with(configure: impl FnOnce(&mut Config)) -> Result<Controller> {
    let mut config = Config::default();
    configure(&mut config);
    Controller::with_config(config)
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let result = controller_with(|c| c.max_duration_secs = -1.0);
    assert!(result.is_err());
}

/// Test the length report
#[test]
fn test_estimate_report_withShortScript_shouldBeTooShort() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let report = controller.estimate_report(SAMPLE_SCRIPT);

    assert_eq!(report.verdict, LengthVerdict::TooShort);
    assert!(report.estimated_secs > 0.0);
    Ok(())
}

/// Test that fitting leaves short scripts alone and trims long ones
#[test]
fn test_fit_script_withShortAndLongScripts_shouldTrimOnlyLong() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let (fitted, trimmed) = controller.fit_script(SAMPLE_SCRIPT);
    assert_eq!(fitted, SAMPLE_SCRIPT);
    assert!(!trimmed);

    let (fitted, trimmed) = controller.fit_script(&common::long_script());
    assert!(trimmed);
    assert!(estimate_script_duration(&fitted) <= 60.0);

    Ok(())
}

/// Test that an overlong single sentence is not reported as trimmed
#[test]
fn test_fit_script_withSingleOverlongSentence_shouldNotReportTrim() -> Result<()> {
    let controller = controller_with(|c| c.max_duration_secs = 1.0)?;
    let script = "이 문장 하나만으로도 이미 허용 시간을 넘어가는 아주 긴 문장입니다.\n";

    let (fitted, trimmed) = controller.fit_script(script);

    assert!(!trimmed);
    assert_eq!(fitted, script.trim());
    Ok(())
}

/// Test that auto trim can be turned off
#[test]
fn test_fit_script_withAutoTrimDisabled_shouldKeepScript() -> Result<()> {
    let controller = controller_with(|c| c.timing.auto_trim = false)?;
    let script = common::long_script();

    let (fitted, trimmed) = controller.fit_script(&script);

    assert_eq!(fitted, script);
    assert!(!trimmed);
    Ok(())
}

/// Test estimate timing without narration
#[test]
fn test_prepare_captions_withEstimateAndNoNarration_shouldNotRescale() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let prepared = controller.prepare_captions(SAMPLE_SCRIPT, None)?;

    assert_eq!(prepared.rescale, RescaleOutcome::Skipped);
    assert!(!prepared.trimmed);
    assert_eq!(prepared.captions[0].start_time, 0.0);
    assert!((timeline_end(&prepared.captions) - prepared.estimated_secs).abs() < 1.0);
    Ok(())
}

/// Test estimate timing rescaled to narration
#[test]
fn test_prepare_captions_withEstimateAndNarration_shouldRescale() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let prepared = controller.prepare_captions(SAMPLE_SCRIPT, Some(20.0))?;

    assert!(prepared.rescale.changed());
    assert!((timeline_end(&prepared.captions) - 20.0).abs() < 1e-6);
    Ok(())
}

/// Test measured timing
#[test]
fn test_prepare_captions_withMeasuredStrategy_shouldUseSentences() -> Result<()> {
    let controller = controller_with(|c| c.timing.strategy = TimingStrategy::Measured)?;

    assert!(controller.prepare_captions(SAMPLE_SCRIPT, None).is_err());

    let prepared = controller.prepare_captions(SAMPLE_SCRIPT, Some(9.0))?;
    assert_eq!(prepared.captions.len(), 3);
    assert_eq!(prepared.captions[2].text, "저는 공원에 가려고 합니다.");
    assert!((timeline_end(&prepared.captions) - 9.0).abs() < 1e-6);
    Ok(())
}

/// Test the mapping from strategy and narration length to a timing mode
#[test]
fn test_timing_mode_withEachStrategy_shouldSelectMode() -> Result<()> {
    let estimate = Controller::new_for_test()?;
    assert_eq!(estimate.timing_mode(None)?, TimingMode::EstimateBased);
    assert_eq!(estimate.timing_mode(Some(12.0))?, TimingMode::EstimateBased);

    let measured = controller_with(|c| c.timing.strategy = TimingStrategy::Measured)?;
    assert_eq!(measured.timing_mode(Some(12.0))?, TimingMode::ExternallyMeasured { total_secs: 12.0 });
    assert!(measured.timing_mode(None).is_err());
    Ok(())
}

/// Test that prepared captions come from the selected timing mode
#[test]
fn test_prepare_captions_withMeasuredStrategy_shouldMatchModeTimeline() -> Result<()> {
    let controller = controller_with(|c| c.timing.strategy = TimingStrategy::Measured)?;

    let prepared = controller.prepare_captions(SAMPLE_SCRIPT, Some(9.0))?;

    let expected = build(SAMPLE_SCRIPT, TimingMode::ExternallyMeasured { total_secs: 9.0 });
    assert_eq!(prepared.captions, expected);
    assert_eq!(prepared.rescale, RescaleOutcome::Skipped);
    Ok(())
}

/// Test that blank scripts are rejected
#[test]
fn test_prepare_captions_withBlankScript_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert!(controller.prepare_captions("  \n ", None).is_err());
    Ok(())
}

/// Test output naming per format
#[test]
fn test_caption_output_path_withJsonFormat_shouldUseJsonExtension() -> Result<()> {
    let controller = controller_with(|c| c.captions.format = OutputFormat::Json)?;

    let path = controller.caption_output_path(Path::new("/scripts/story.txt"), Path::new("/out"));

    assert_eq!(path, Path::new("/out/story.json"));
    Ok(())
}
