/*!
 * Mock synthesizers for testing.
 *
 * - `MockSynthesizer::fixed(secs)` - Always reports the same duration
 * - `MockSynthesizer::per_char(rate)` - Duration proportional to the text length
 * - `MockSynthesizer::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::SpeechError;
use super::{checked_duration, SpeechSynthesizer, SynthesizedSpeech};

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Reports a fixed duration regardless of the text
    Fixed { duration_secs: f64 },
    /// Reports `rate` seconds per non-whitespace character
    PerChar { secs_per_char: f64 },
    /// Always fails
    Failing,
}

/// Mock synthesizer that never touches audio
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock reporting a fixed duration
    pub fn fixed(duration_secs: f64) -> Self {
        Self::new(MockBehavior::Fixed { duration_secs })
    }

    /// Mock reporting a duration proportional to the text
    pub fn per_char(secs_per_char: f64) -> Self {
        Self::new(MockBehavior::PerChar { secs_per_char })
    }

    /// Mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of synthesize calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, SpeechError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let duration_secs = match self.behavior {
            MockBehavior::Fixed { duration_secs } => duration_secs,
            MockBehavior::PerChar { secs_per_char } => {
                text.chars().filter(|c| !c.is_whitespace()).count() as f64 * secs_per_char
            }
            MockBehavior::Failing => {
                return Err(SpeechError::SynthesisFailed("mock synthesizer failure".to_string()));
            }
        };

        Ok(SynthesizedSpeech {
            audio_path: None,
            duration_secs: checked_duration(duration_secs)?,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
