/*!
 * Speech collaborator seam.
 *
 * Captions are timed from text alone, but when narration audio exists its
 * measured length is the ground truth the timeline is rescaled to. This
 * module hides where that audio comes from:
 * - `sources`: narration rendered elsewhere, or a duration known up front
 * - `probe`: measuring audio files with ffprobe
 * - `mock`: deterministic synthesizers for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::errors::SpeechError;

/// Narration produced for a script
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSpeech {
    /// Audio file, when the narration exists on disk
    pub audio_path: Option<PathBuf>,
    /// Measured length of the narration in seconds
    pub duration_secs: f64,
}

/// Common trait for everything that can turn a script into narration
///
/// Implementations must report a finite, positive duration on success.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Produce (or locate) narration for the text and measure it
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, SpeechError>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

/// Reject durations that cannot drive a rescale
pub(crate) fn checked_duration(duration_secs: f64) -> Result<f64, SpeechError> {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        Ok(duration_secs)
    } else {
        Err(SpeechError::InvalidDuration(format!("{} seconds", duration_secs)))
    }
}

pub mod probe;
pub mod sources;
pub mod mock;

pub use probe::AudioProbe;
pub use sources::{KnownDuration, RenderedAudio};
pub use mock::MockSynthesizer;
