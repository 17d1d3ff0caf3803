/*!
 * Spoken duration estimation for caption-sized text.
 *
 * The estimator predicts how long a TTS voice takes to read a clause:
 * - Characters other than the space are read at a baseline of 6.5 per second
 * - Punctuation adds short pauses
 * - Hangul syllables with a trailing consonant (batchim) slow reading down
 * - Digits and Latin letters add a small penalty
 * - Longer clauses are spoken faster, with a ceiling for very long ones
 *
 * The estimate is a pure function of the text.
 */

/// Baseline reading speed in characters per second, spaces excluded
pub const CHARS_PER_SECOND: f64 = 6.5;

/// Lower bound for any non-empty clause, in seconds
pub const MIN_CLAUSE_DURATION: f64 = 0.7;

/// Complexity weight added per Hangul syllable with a batchim
const BATCHIM_WEIGHT: f64 = 0.3;

const COMPLEXITY_SCALE: f64 = 0.15;
const DIGIT_SCALE: f64 = 0.15;
const LATIN_SCALE: f64 = 0.1;

/// Clauses longer than this many characters get the ceiling clamp
const CEILING_MIN_CHARS: usize = 15;
const CEILING_BASE_SECS: f64 = 3.0;
const CEILING_SECS_PER_CHAR: f64 = 0.1;

const HANGUL_SYLLABLE_FIRST: u32 = 0xAC00;
const HANGUL_SYLLABLE_LAST: u32 = 0xD7A3;
const HANGUL_FINAL_COUNT: u32 = 28;
const HANGUL_MEDIAL_COUNT: u32 = 21;

/// Pause added after each punctuation mark, in seconds
fn pause_for(c: char) -> f64 {
    match c {
        ',' | ';' | ':' => 0.1,
        '.' | '!' | '?' => 0.15,
        _ => 0.0,
    }
}

/// Jamo indices of a precomposed Hangul syllable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HangulSyllable {
    /// Leading consonant index (0..19)
    pub initial: u32,
    /// Vowel index (0..21)
    pub medial: u32,
    /// Trailing consonant index (0 = none, 1..28)
    pub final_consonant: u32,
}

impl HangulSyllable {
    /// Decompose a character in the Hangul syllable block, `None` otherwise
    pub fn decompose(c: char) -> Option<Self> {
        let code = c as u32;
        if !(HANGUL_SYLLABLE_FIRST..=HANGUL_SYLLABLE_LAST).contains(&code) {
            return None;
        }

        let offset = code - HANGUL_SYLLABLE_FIRST;
        Some(Self {
            initial: offset / (HANGUL_MEDIAL_COUNT * HANGUL_FINAL_COUNT),
            medial: (offset % (HANGUL_MEDIAL_COUNT * HANGUL_FINAL_COUNT)) / HANGUL_FINAL_COUNT,
            final_consonant: offset % HANGUL_FINAL_COUNT,
        })
    }

    /// Whether the syllable closes with a trailing consonant
    pub fn has_batchim(&self) -> bool {
        self.final_consonant > 0
    }
}

/// Whether the text contains at least one Hangul syllable
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| HangulSyllable::decompose(c).is_some())
}

/// Character statistics the estimate is computed from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProfile {
    /// Characters left after removing spaces
    pub char_count: usize,
    /// Space characters (U+0020) in the original text
    pub space_count: usize,
    /// Characters in the original text
    pub total_chars: usize,
    /// Accumulated punctuation pause in seconds
    pub pause_secs: f64,
    /// Accumulated batchim weight
    pub complexity: f64,
    /// Numeric characters
    pub digit_count: usize,
    /// ASCII Latin letters
    pub latin_count: usize,
}

impl TextProfile {
    /// Collect the statistics of a text in a single pass
    pub fn analyze(text: &str) -> Self {
        let mut profile = Self::default();

        for c in text.chars() {
            profile.total_chars += 1;
            profile.pause_secs += pause_for(c);

            // Line breaks and tabs are read as characters
            if c == ' ' {
                profile.space_count += 1;
                continue;
            }

            profile.char_count += 1;

            if let Some(syllable) = HangulSyllable::decompose(c) {
                if syllable.has_batchim() {
                    profile.complexity += BATCHIM_WEIGHT;
                }
            } else if c.is_numeric() {
                profile.digit_count += 1;
            } else if c.is_ascii_alphabetic() {
                profile.latin_count += 1;
            }
        }

        profile
    }
}

/// Speed-up applied to longer clauses; only the highest matching tier applies
fn length_speedup(char_count: usize) -> f64 {
    if char_count > 30 {
        0.75
    } else if char_count > 20 {
        0.8
    } else if char_count > 10 {
        0.85
    } else {
        1.0
    }
}

/// Estimate the spoken duration of a clause or sentence in seconds.
///
/// Returns exactly 0 for empty or whitespace-only text and at least
/// [`MIN_CLAUSE_DURATION`] for anything else.
pub fn estimate(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    estimate_profile(&TextProfile::analyze(text))
}

/// Estimate from precomputed statistics
pub fn estimate_profile(profile: &TextProfile) -> f64 {
    if profile.char_count == 0 {
        return 0.0;
    }

    let n = profile.char_count as f64;
    let n_guard = profile.char_count.max(1) as f64;
    let base = n / CHARS_PER_SECOND;

    let complexity_factor = 1.0 + (profile.complexity / n_guard) * COMPLEXITY_SCALE;
    let mut duration = base * complexity_factor + profile.pause_secs;
    duration += (profile.digit_count as f64 / n_guard) * base * DIGIT_SCALE;
    duration += (profile.latin_count as f64 / n_guard) * base * LATIN_SCALE;

    if profile.space_count > 0 {
        let density = profile.space_count as f64 / profile.total_chars.max(1) as f64;
        let space_factor = f64::min(0.95, 0.98 - density * 0.02);
        duration *= space_factor;
    }

    duration *= length_speedup(profile.char_count);

    if duration > CEILING_BASE_SECS && profile.char_count > CEILING_MIN_CHARS {
        let ceiling = CEILING_BASE_SECS + (profile.char_count - CEILING_MIN_CHARS) as f64 * CEILING_SECS_PER_CHAR;
        duration = duration.min(ceiling);
    }

    duration.max(MIN_CLAUSE_DURATION)
}
