/*!
 * Caption timelines.
 *
 * Two ways of timing a script are provided:
 * - [`build_timeline`] estimates every clause bottom-up and chains the
 *   estimates into a gapless timeline starting at zero
 * - [`build_proportional_timeline`] spreads an already known total duration
 *   over whole sentences in proportion to their length
 *
 * Estimated timelines are later corrected against the real audio length
 * with [`rescale`].
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::duration::estimate;
use super::segment::{split_clauses, split_sentences};

/// Shortest time a sentence stays on screen in proportional mode
pub const MIN_SENTENCE_SECS: f64 = 1.5;

/// Longest time a sentence stays on screen in proportional mode
pub const MAX_SENTENCE_SECS: f64 = 7.0;

/// Estimates closer than this to the real duration are left alone
pub const RESCALE_TOLERANCE_SECS: f64 = 0.5;

/// One timed caption, in seconds from the start of the narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Trimmed, non-empty text to display
    pub text: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
}

impl Caption {
    /// Create a caption
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// Time on screen in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// How caption timestamps are obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingMode {
    /// Clause-level estimates chained bottom-up
    EstimateBased,
    /// Sentence-level shares of a duration measured elsewhere
    ExternallyMeasured { total_secs: f64 },
}

/// Build a timeline with the given mode
pub fn build(script: &str, mode: TimingMode) -> Vec<Caption> {
    match mode {
        TimingMode::EstimateBased => build_timeline(script),
        TimingMode::ExternallyMeasured { total_secs } => build_proportional_timeline(script, total_secs),
    }
}

/// Build a clause-level timeline from duration estimates.
///
/// Captions are contiguous: each one starts exactly where the previous
/// one ended, and the first starts at zero.
pub fn build_timeline(script: &str) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut clock = 0.0;

    for sentence in split_sentences(script) {
        for clause in split_clauses(&sentence) {
            let duration = estimate(&clause);
            if duration <= 0.0 {
                continue;
            }

            let end = clock + duration;
            captions.push(Caption::new(clause, clock, end));
            clock = end;
        }
    }

    debug!("Estimated timeline: {} captions, {:.2}s", captions.len(), clock);
    captions
}

/// Build a sentence-level timeline over a known total duration.
///
/// Each sentence gets a share proportional to its character count,
/// clamped to [`MIN_SENTENCE_SECS`, `MAX_SENTENCE_SECS`]. End times never
/// run past `total_secs`; sentences that would start at or after it are
/// left out.
pub fn build_proportional_timeline(script: &str, total_secs: f64) -> Vec<Caption> {
    if !total_secs.is_finite() || total_secs <= 0.0 {
        warn!("Cannot distribute captions over a duration of {}s", total_secs);
        return Vec::new();
    }

    let sentences = split_sentences(script);
    let total_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    if total_chars == 0 {
        return Vec::new();
    }

    let secs_per_char = total_secs / total_chars as f64;
    let mut captions = Vec::with_capacity(sentences.len());
    let mut clock = 0.0;
    let sentence_count = sentences.len();

    for sentence in sentences {
        if clock >= total_secs {
            break;
        }

        let share = sentence.chars().count() as f64 * secs_per_char;
        let duration = share.clamp(MIN_SENTENCE_SECS, MAX_SENTENCE_SECS);
        let end = (clock + duration).min(total_secs);

        captions.push(Caption::new(sentence, clock, end));
        clock = end;
    }

    if captions.len() < sentence_count {
        warn!(
            "Only {} of {} sentences fit in {:.2}s",
            captions.len(),
            sentence_count,
            total_secs
        );
    }

    captions
}

/// What [`rescale`] did to a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescaleOutcome {
    /// Nothing to scale: empty timeline, zero estimate or unusable target
    Skipped,
    /// Estimate already within tolerance of the target
    WithinTolerance { estimated_secs: f64 },
    /// Every timestamp was multiplied by `ratio`
    Rescaled { estimated_secs: f64, ratio: f64 },
}

impl RescaleOutcome {
    /// Whether timestamps were changed
    pub fn changed(&self) -> bool {
        matches!(self, Self::Rescaled { .. })
    }
}

/// Stretch or compress a timeline so it ends at `actual_secs`.
///
/// The last caption's end time is taken as the estimated duration. When
/// the two differ by less than [`RESCALE_TOLERANCE_SECS`] nothing changes,
/// so calling this twice with the same target is a no-op the second time.
pub fn rescale(captions: &mut [Caption], actual_secs: f64) -> RescaleOutcome {
    let Some(last) = captions.last() else {
        return RescaleOutcome::Skipped;
    };

    let estimated_secs = last.end_time;
    if estimated_secs <= 0.0 || !actual_secs.is_finite() || actual_secs <= 0.0 {
        debug!("Skipping rescale (estimated {:.2}s, actual {:.2}s)", estimated_secs, actual_secs);
        return RescaleOutcome::Skipped;
    }

    if (actual_secs - estimated_secs).abs() < RESCALE_TOLERANCE_SECS {
        return RescaleOutcome::WithinTolerance { estimated_secs };
    }

    let ratio = actual_secs / estimated_secs;
    for caption in captions.iter_mut() {
        caption.start_time *= ratio;
        caption.end_time *= ratio;
    }

    debug!(
        "Rescaled {} captions from {:.2}s to {:.2}s (ratio {:.3})",
        captions.len(),
        estimated_secs,
        actual_secs,
        ratio
    );

    RescaleOutcome::Rescaled { estimated_secs, ratio }
}

/// Total length of a timeline, zero when empty
pub fn timeline_end(captions: &[Caption]) -> f64 {
    captions.last().map_or(0.0, |c| c.end_time)
}
