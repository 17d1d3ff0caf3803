/*!
 * Validation of generated caption timelines.
 *
 * - `timecodes`: range, duration, reading speed, overlap and gap checks
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeReport, TimecodeValidator, TimecodeValidatorConfig};
