/*!
 * Caption timing engine.
 *
 * Turns narration scripts into timed captions without hearing the audio:
 * - `duration`: spoken duration estimation for clauses and sentences
 * - `segment`: sentence and clause segmentation with Korean particle awareness
 * - `timeline`: contiguous caption timelines and rescaling to measured audio
 * - `trim`: fitting scripts into a maximum duration
 * - `align`: grouping recognized words into captions and replacing their
 *   text with the original script
 */

pub mod duration;
pub mod segment;
pub mod timeline;
pub mod trim;
pub mod align;

// Re-export main types
pub use duration::{estimate, contains_hangul, TextProfile};
pub use segment::{split_sentences, split_clauses, split_by_particles};
pub use timeline::{
    build, build_timeline, build_proportional_timeline, rescale, timeline_end,
    Caption, RescaleOutcome, TimingMode,
};
pub use trim::{
    estimate_script_duration, fit_to_duration, trim_script, LengthVerdict, ScriptLengthReport,
    TrimmedScript,
};
pub use align::{align_with_script, group_recognized_words, AlignOutcome, RecognizedWord};
