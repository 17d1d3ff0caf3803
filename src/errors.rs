/*!
 * Error types for the shortcaps application.
 *
 * The timing engine itself is infallible. Errors come from the seams
 * around it: measuring narration audio, reading subtitle files, and the
 * file system and configuration of the application.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when synthesizing or measuring narration audio
#[derive(Error, Debug)]
pub enum SpeechError {
    /// The audio file to measure does not exist
    #[error("Audio file not found: {0}")]
    AudioNotFound(PathBuf),

    /// The probe process could not be started or exited with an error
    #[error("Audio probe failed: {0}")]
    ProbeFailed(String),

    /// The probe did not finish in time
    #[error("Audio probe timed out after {0} seconds")]
    Timeout(u64),

    /// The probe output did not contain a usable duration
    #[error("Failed to read audio duration: {0}")]
    InvalidDuration(String),

    /// The synthesizer itself reported a failure
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),
}

/// Errors that can occur when reading subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// No entry in the content could be parsed
    #[error("No valid subtitle entries were found in the SRT content")]
    NoEntries,

    /// A timestamp did not follow `HH:MM:SS,mmm`
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// An entry ends before it starts
    #[error("Invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Start of the entry in milliseconds
        start_ms: u64,
        /// End of the entry in milliseconds
        end_ms: u64,
    },

    /// An entry has no text
    #[error("Empty subtitle text for entry {0}")]
    EmptyText(usize),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the speech seam
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
