/*!
 * Narration sources that do not synthesize anything themselves.
 *
 * - `RenderedAudio`: the narration was rendered by an external TTS engine
 *   and only needs to be measured
 * - `KnownDuration`: the caller already knows how long the narration is
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::errors::SpeechError;
use super::{checked_duration, AudioProbe, SpeechSynthesizer, SynthesizedSpeech};

/// Narration that already exists as an audio file
#[derive(Debug, Clone)]
pub struct RenderedAudio {
    audio_path: PathBuf,
    probe: AudioProbe,
}

impl RenderedAudio {
    /// Wrap an audio file, measured with the given probe
    pub fn new(audio_path: impl Into<PathBuf>, probe: AudioProbe) -> Self {
        Self {
            audio_path: audio_path.into(),
            probe,
        }
    }

    /// Audio file this source measures
    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }
}

#[async_trait]
impl SpeechSynthesizer for RenderedAudio {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech, SpeechError> {
        let duration_secs = self.probe.duration_secs(&self.audio_path).await?;
        Ok(SynthesizedSpeech {
            audio_path: Some(self.audio_path.clone()),
            duration_secs,
        })
    }

    fn name(&self) -> &str {
        "rendered-audio"
    }
}

/// Narration whose length is supplied directly
#[derive(Debug, Clone, Copy)]
pub struct KnownDuration {
    duration_secs: f64,
}

impl KnownDuration {
    /// Use the given length in seconds
    pub fn new(duration_secs: f64) -> Self {
        Self { duration_secs }
    }
}

#[async_trait]
impl SpeechSynthesizer for KnownDuration {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech, SpeechError> {
        Ok(SynthesizedSpeech {
            audio_path: None,
            duration_secs: checked_duration(self.duration_secs)?,
        })
    }

    fn name(&self) -> &str {
        "known-duration"
    }
}
