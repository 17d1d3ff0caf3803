/*!
 * Fitting scripts into a duration budget.
 *
 * Trimming works on whole sentences. The first and last sentences always
 * survive; the ones in between are ranked by how many words they deliver
 * per second of speech and kept greedily while the budget allows.
 */

use log::{debug, info};

use super::duration::estimate;
use super::segment::split_sentences;

/// Fraction of the budget actually targeted when trimming
pub const TRIM_SAFETY_MARGIN: f64 = 0.95;

/// Floor for the duration used when ranking sentences by density
const DENSITY_MIN_SECS: f64 = 0.5;

/// Shortest script the length gate accepts, in seconds
pub const MIN_SCRIPT_SECS: f64 = 30.0;

/// Share of the maximum below which a script counts as too short
pub const MIN_SCRIPT_SHARE: f64 = 0.7;

/// Estimated duration of a whole script: the sum of its sentence estimates
pub fn estimate_script_duration(script: &str) -> f64 {
    split_sentences(script).iter().map(|s| estimate(s)).sum()
}

/// A sentence with its estimate, as seen by the trimmer
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceEstimate {
    /// Position in the original script
    pub index: usize,
    /// Sentence text
    pub text: String,
    /// Estimated spoken duration in seconds
    pub duration_secs: f64,
}

impl SentenceEstimate {
    /// Words delivered per second of speech
    pub fn density(&self) -> f64 {
        self.text.split_whitespace().count() as f64 / self.duration_secs.max(DENSITY_MIN_SECS)
    }
}

/// Per-sentence estimates in script order
pub fn sentence_estimates(script: &str) -> Vec<SentenceEstimate> {
    split_sentences(script)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let duration_secs = estimate(&text);
            SentenceEstimate { index, text, duration_secs }
        })
        .collect()
}

/// A script after fitting, with how many sentences survived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedScript {
    /// Script text, unchanged when nothing was dropped
    pub text: String,
    /// Sentences kept
    pub kept: usize,
    /// Sentences in the original script
    pub original: usize,
}

impl TrimmedScript {
    /// Whether any sentence was dropped
    pub fn was_trimmed(&self) -> bool {
        self.kept < self.original
    }
}

/// Shorten a script so its estimate fits in `max_duration` seconds.
///
/// Scripts already within budget are returned unchanged. Otherwise the
/// result is a subsequence of the original sentences, joined by single
/// spaces, that always keeps the first and last sentence even when those
/// alone exceed the budget.
pub fn trim_script(script: &str, max_duration: f64) -> String {
    fit_to_duration(script, max_duration).text
}

/// Same as [`trim_script`], also reporting how many sentences were dropped
pub fn fit_to_duration(script: &str, max_duration: f64) -> TrimmedScript {
    let sentences = sentence_estimates(script);
    let original = sentences.len();
    let unchanged = || TrimmedScript {
        text: script.to_string(),
        kept: original,
        original,
    };

    let estimated: f64 = sentences.iter().map(|s| s.duration_secs).sum();
    if estimated <= max_duration {
        debug!("Script fits: {:.1}s estimated, {:.1}s allowed", estimated, max_duration);
        return unchanged();
    }

    let target = max_duration * TRIM_SAFETY_MARGIN;
    info!("Script too long: {:.1}s estimated, trimming to {:.1}s", estimated, target);

    let Some(first) = sentences.first() else {
        return unchanged();
    };
    if original == 1 {
        return TrimmedScript {
            text: first.text.clone(),
            kept: 1,
            original,
        };
    }

    let last_index = original - 1;
    let mut keep = vec![false; original];
    keep[0] = true;
    keep[last_index] = true;
    let mut reserved = first.duration_secs + sentences[last_index].duration_secs;

    let mut middle: Vec<&SentenceEstimate> = sentences[1..last_index].iter().collect();
    // Stable sort keeps script order among equally dense sentences
    middle.sort_by(|a, b| b.density().total_cmp(&a.density()));

    for sentence in middle {
        if reserved + sentence.duration_secs <= target {
            keep[sentence.index] = true;
            reserved += sentence.duration_secs;
        } else {
            debug!(
                "Dropping sentence {} ({:.1}s): {}",
                sentence.index + 1,
                sentence.duration_secs,
                sentence.text.chars().take(30).collect::<String>()
            );
        }
    }

    let kept: Vec<&str> = sentences
        .iter()
        .filter(|s| keep[s.index])
        .map(|s| s.text.as_str())
        .collect();

    info!(
        "Trimmed script from {} to {} sentences ({:.1}s)",
        original,
        kept.len(),
        reserved
    );

    TrimmedScript {
        kept: kept.len(),
        original,
        text: kept.join(" "),
    }
}

/// Where an estimated script length falls relative to the allowed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthVerdict {
    TooShort,
    Fits,
    TooLong,
}

/// Length gate for a script against a maximum video duration
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLengthReport {
    /// Estimated narration length in seconds
    pub estimated_secs: f64,
    /// Lower bound of the accepted window
    pub min_secs: f64,
    /// Upper bound of the accepted window
    pub max_secs: f64,
    /// Verdict for the estimate
    pub verdict: LengthVerdict,
}

impl ScriptLengthReport {
    /// Assess a script. The lower bound is 70% of the maximum but never
    /// below 30 seconds, capped at the maximum itself.
    pub fn assess(script: &str, max_secs: f64) -> Self {
        let estimated_secs = estimate_script_duration(script);
        let min_secs = (max_secs * MIN_SCRIPT_SHARE).max(MIN_SCRIPT_SECS).min(max_secs);

        let verdict = if estimated_secs > max_secs {
            LengthVerdict::TooLong
        } else if estimated_secs < min_secs {
            LengthVerdict::TooShort
        } else {
            LengthVerdict::Fits
        };

        Self {
            estimated_secs,
            min_secs,
            max_secs,
            verdict,
        }
    }
}
