use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OutputFormat, TimingStrategy};
use crate::file_utils::FileManager;
use crate::speech::{AudioProbe, RenderedAudio, SpeechSynthesizer};
use crate::subtitle_processor::{SubtitleCollection, WrapOptions};
use crate::timing::{
    align_with_script, build, estimate_script_duration, fit_to_duration, group_recognized_words,
    rescale, timeline_end, AlignOutcome, Caption, RecognizedWord, RescaleOutcome,
    ScriptLengthReport, TimingMode,
};
use crate::validation::TimecodeValidator;

// @module: Application controller for caption generation

/// Suffix of the file holding a trimmed script
const TRIMMED_SCRIPT_SUFFIX: &str = "trimmed.txt";

/// Captions ready to be written, with what happened on the way
#[derive(Debug, Clone)]
pub struct PreparedCaptions {
    /// Script the captions were built from, after trimming
    pub script: String,
    /// Whether sentences were dropped to fit the duration limit
    pub trimmed: bool,
    /// Estimated narration length of the script in seconds
    pub estimated_secs: f64,
    /// The caption timeline
    pub captions: Vec<Caption>,
    /// What rescaling to the measured narration did
    pub rescale: RescaleOutcome,
}

/// Result of processing one script
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Captions were written
    Written {
        /// Caption file
        output_path: PathBuf,
        /// Number of captions in the file
        caption_count: usize,
        /// End of the last caption in seconds
        duration_secs: f64,
    },
    /// Output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts from processing a folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for caption generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Configuration the controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the script's estimated length falls against the duration limit
    pub fn estimate_report(&self, script: &str) -> ScriptLengthReport {
        ScriptLengthReport::assess(script, self.config.max_duration_secs)
    }

    /// Trim the script when enabled and too long; returns the script and
    /// whether any sentence was dropped
    pub fn fit_script(&self, script: &str) -> (String, bool) {
        if !self.config.timing.auto_trim {
            return (script.to_string(), false);
        }

        let fitted = fit_to_duration(script, self.config.max_duration_secs);
        let trimmed = fitted.was_trimmed();
        (fitted.text, trimmed)
    }

    /// Timing mode for the configured strategy and the narration length, if known
    pub fn timing_mode(&self, measured_secs: Option<f64>) -> Result<TimingMode> {
        match self.config.timing.strategy {
            TimingStrategy::Estimate => Ok(TimingMode::EstimateBased),
            TimingStrategy::Measured => measured_secs
                .map(|total_secs| TimingMode::ExternallyMeasured { total_secs })
                .ok_or_else(|| anyhow!("The {} timing strategy needs the narration duration", TimingStrategy::Measured)),
        }
    }

    /// Build the caption timeline for a script.
    ///
    /// `measured_secs` is the length of the narration when it is known.
    /// The measured strategy cannot work without it.
    pub fn prepare_captions(&self, script: &str, measured_secs: Option<f64>) -> Result<PreparedCaptions> {
        let (fitted, trimmed) = self.fit_script(script);
        self.prepare_fitted(fitted, trimmed, measured_secs)
    }

    fn prepare_fitted(&self, script: String, trimmed: bool, measured_secs: Option<f64>) -> Result<PreparedCaptions> {
        if script.trim().is_empty() {
            return Err(anyhow!("Script is empty"));
        }

        let estimated_secs = estimate_script_duration(&script);

        let mode = self.timing_mode(measured_secs)?;
        debug!("Timing captions with the {} strategy: {:?}", self.config.timing.strategy, mode);

        let mut captions = build(&script, mode);
        // Measured timelines already span the narration
        let rescale_outcome = match (mode, measured_secs) {
            (TimingMode::EstimateBased, Some(actual)) => rescale(&mut captions, actual),
            _ => RescaleOutcome::Skipped,
        };

        if let RescaleOutcome::Rescaled { estimated_secs: from_secs, ratio } = rescale_outcome {
            info!("Rescaled captions from {:.2}s to the narration (ratio {:.3})", from_secs, ratio);
        }

        self.log_timeline_issues(&captions);

        Ok(PreparedCaptions {
            script,
            trimmed,
            estimated_secs,
            captions,
            rescale: rescale_outcome,
        })
    }

    /// Validate the timeline and log what looks wrong; never fatal
    fn log_timeline_issues(&self, captions: &[Caption]) {
        let collection = SubtitleCollection::from_captions(PathBuf::new(), captions, None);
        let report = TimecodeValidator::new().validate(&collection.entries);
        if !report.passed() {
            warn!("Caption timeline has {} timing issue(s)", report.total_issues());
        }
        report.log_warnings();
    }

    fn wrap_options(&self) -> Option<WrapOptions> {
        self.config.captions.wrap_lines.then_some(WrapOptions {
            max_chars_per_line: self.config.captions.max_chars_per_line,
            font_size: self.config.captions.font_size,
        })
    }

    /// Write captions in the configured format
    pub fn write_captions(&self, captions: &[Caption], output_path: &Path) -> Result<()> {
        let collection = SubtitleCollection::from_captions(output_path.to_path_buf(), captions, self.wrap_options());
        match self.config.captions.format {
            OutputFormat::Srt => collection.write_to_srt(output_path),
            OutputFormat::Json => collection.write_to_json(output_path),
        }
    }

    /// Caption file path for a script
    pub fn caption_output_path(&self, script_path: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(script_path, output_dir, self.config.captions.format.extension())
    }

    /// Run the main workflow for one script file
    ///
    /// When a synthesizer is given, its narration length drives the
    /// timeline. A failing synthesizer only degrades the estimate
    /// strategy to estimates, but aborts the measured strategy.
    pub async fn run(
        &self,
        script_path: PathBuf,
        output_dir: PathBuf,
        speech: Option<&dyn SpeechSynthesizer>,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&script_path) {
            return Err(anyhow!("Script file does not exist: {:?}", script_path));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = self.caption_output_path(&script_path, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, captions already exist (use -f to force overwrite)");
            return Ok(RunOutcome::Skipped(output_path));
        }

        let raw_script = FileManager::read_to_string(&script_path)?;
        let (script, trimmed) = self.fit_script(&raw_script);

        let measured_secs = match speech {
            Some(synthesizer) => match synthesizer.synthesize(&script).await {
                Ok(narration) => {
                    debug!("{} narration: {:.2}s", synthesizer.name(), narration.duration_secs);
                    Some(narration.duration_secs)
                }
                Err(e) if self.config.timing.strategy == TimingStrategy::Measured => {
                    return Err(e).with_context(|| format!("Narration failed for {:?}", script_path));
                }
                Err(e) => {
                    warn!("Narration unavailable ({}), using estimated timing", e);
                    None
                }
            },
            None => None,
        };

        let prepared = self.prepare_fitted(script, trimmed, measured_secs)
            .with_context(|| format!("Failed to time captions for {:?}", script_path))?;

        self.write_captions(&prepared.captions, &output_path)?;

        if prepared.trimmed {
            let trimmed_path = FileManager::generate_output_path(&script_path, &output_dir, TRIMMED_SCRIPT_SUFFIX);
            FileManager::write_to_file(&trimmed_path, &prepared.script)?;
            info!("Script trimmed to fit {:.0}s, saved to {:?}", self.config.max_duration_secs, trimmed_path);
        }

        let duration_secs = timeline_end(&prepared.captions);
        info!(
            "Wrote {} captions ({:.1}s) to {:?} in {}",
            prepared.captions.len(),
            duration_secs,
            output_path,
            Self::format_duration(start_time.elapsed())
        );

        Ok(RunOutcome::Written {
            output_path,
            caption_count: prepared.captions.len(),
            duration_secs,
        })
    }

    /// Format a duration for log output
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode over every `.txt` script in a directory
    ///
    /// Scripts with a same-named audio file next to them are timed against
    /// that narration. Per-file failures are logged and counted.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let scripts: Vec<PathBuf> = FileManager::find_files(&input_dir, "txt")?
            .into_iter()
            .filter(|path| !path.to_string_lossy().ends_with(TRIMMED_SCRIPT_SUFFIX))
            .collect();

        if scripts.is_empty() {
            return Err(anyhow!("No script files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(scripts.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scripts ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        let probe = AudioProbe::new(&self.config.audio.ffprobe_path, self.config.audio.probe_timeout_secs);
        let mut summary = FolderSummary::default();

        for script_path in &scripts {
            let file_name = script_path.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = script_path.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone());
            let narration = FileManager::find_companion_audio(script_path)
                .map(|audio| RenderedAudio::new(audio, probe.clone()));
            let speech = narration.as_ref().map(|n| n as &dyn SpeechSynthesizer);

            match self.run(script_path.clone(), output_dir, speech, force_overwrite).await {
                Ok(RunOutcome::Written { .. }) => summary.processed += 1,
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.errors
        );

        Ok(summary)
    }

    /// Stretch an existing SRT file to a measured narration length
    pub fn rescale_file(&self, srt_path: &Path, actual_secs: f64, output_path: &Path) -> Result<RescaleOutcome> {
        let collection = SubtitleCollection::read_srt(srt_path)?;
        let mut captions = collection.to_captions();

        let outcome = rescale(&mut captions, actual_secs);
        if outcome == RescaleOutcome::Skipped {
            warn!("Nothing to rescale in {:?}", srt_path);
        }

        self.write_captions(&captions, output_path)?;
        Ok(outcome)
    }

    /// Replace recognized caption text in an SRT file with the script's sentences
    pub fn align_file(&self, srt_path: &Path, script_path: &Path, output_path: &Path) -> Result<AlignOutcome> {
        let collection = SubtitleCollection::read_srt(srt_path)?;
        let script = FileManager::read_to_string(script_path)?;
        let mut captions = collection.to_captions();

        let outcome = align_with_script(&mut captions, &script);

        self.write_captions(&captions, output_path)?;
        Ok(outcome)
    }

    /// Build captions from recognized words, put the script text into them
    /// and stretch them to the narration length when it is known
    pub fn align_words_file(
        &self,
        words_path: &Path,
        script_path: &Path,
        actual_secs: Option<f64>,
        output_path: &Path,
    ) -> Result<(AlignOutcome, RescaleOutcome)> {
        let words: Vec<RecognizedWord> = serde_json::from_str(&FileManager::read_to_string(words_path)?)
            .with_context(|| format!("Failed to parse recognized words: {:?}", words_path))?;
        let script = FileManager::read_to_string(script_path)?;

        let mut captions = group_recognized_words(&words);
        if captions.is_empty() {
            return Err(anyhow!("No recognized words in {:?}", words_path));
        }

        let aligned = align_with_script(&mut captions, &script);
        let rescaled = match actual_secs {
            Some(actual) => rescale(&mut captions, actual),
            None => RescaleOutcome::Skipped,
        };

        self.log_timeline_issues(&captions);
        self.write_captions(&captions, output_path)?;
        Ok((aligned, rescaled))
    }
}
