/*!
 * # shortcaps - Captions for short-form narration
 *
 * A Rust library that times captions for narrated short videos without
 * listening to the audio.
 *
 * ## Features
 *
 * - Estimate how long a TTS voice takes to read Korean and English text
 * - Split scripts into caption-sized clauses at natural pauses
 * - Build contiguous caption timelines from the estimates
 * - Rescale timelines to the measured length of rendered narration
 * - Trim scripts to fit a maximum video duration
 * - Align speech-recognized captions with the original script
 * - Write captions as SRT or JSON
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timing`: The caption timing engine:
 *   - `timing::duration`: Spoken duration estimation
 *   - `timing::segment`: Sentence and clause segmentation
 *   - `timing::timeline`: Timeline construction and rescaling
 *   - `timing::trim`: Script trimming and the length gate
 *   - `timing::align`: Recognized caption alignment
 * - `formatting`: Caption line wrapping
 * - `subtitle_processor`: SRT and JSON caption files
 * - `validation`: Timeline checks
 * - `speech`: Narration sources and audio measurement
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod timing;
pub mod formatting;
pub mod subtitle_processor;
pub mod validation;
pub mod speech;
pub mod app_config;
pub mod file_utils;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use timing::{estimate, Caption, RescaleOutcome, TimingMode};
pub use speech::{SpeechSynthesizer, SynthesizedSpeech};
pub use errors::{AppError, SpeechError, SubtitleError};
