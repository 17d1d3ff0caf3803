/*!
 * Aligning recognized captions with the original script.
 *
 * Speech recognition gets the timing right but the wording wrong.
 * Recognized words are first grouped into sentence captions at terminal
 * punctuation. When the caption count is close enough to the script's
 * sentence count, caption texts are replaced by the script sentences
 * while timings stay untouched.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::segment::split_sentences;
use super::timeline::Caption;

/// Marks that close a recognized sentence, ASCII and full-width
const SENTENCE_END_MARKS: [char; 6] = ['.', '?', '!', '。', '？', '！'];

/// One word from a speech recognizer with its time offsets in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl RecognizedWord {
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
        }
    }
}

/// Group recognized words into sentence captions.
///
/// A caption starts at its first word and ends at its last. It is closed
/// by a word ending in `.`, `?`, `!` or their full-width forms; words
/// left over at the end form a final caption. Blank words are ignored.
pub fn group_recognized_words(words: &[RecognizedWord]) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut current: Option<Caption> = None;

    for recognized in words {
        let word = recognized.word.trim();
        if word.is_empty() {
            continue;
        }

        match current.as_mut() {
            Some(caption) => {
                caption.text.push(' ');
                caption.text.push_str(word);
                caption.end_time = recognized.end_time;
            }
            None => current = Some(Caption::new(word, recognized.start_time, recognized.end_time)),
        }

        if word.ends_with(&SENTENCE_END_MARKS[..]) {
            captions.extend(current.take());
        }
    }

    // Trailing words without closing punctuation
    if let Some(caption) = current {
        captions.push(caption);
    }

    debug!("Grouped {} recognized words into {} captions", words.len(), captions.len());
    captions
}

/// Result of an alignment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOutcome {
    /// Texts replaced for this many leading captions
    Aligned { replaced: usize },
    /// Counts too far apart; captions left unchanged
    Skipped { captions: usize, sentences: usize },
}

/// Replace caption texts with script sentences, position by position.
///
/// Alignment is skipped when the caption count differs from the sentence
/// count by more than half the sentence count. Otherwise the first
/// `min(captions, sentences)` captions take the matching sentence text and
/// every timing is preserved.
pub fn align_with_script(captions: &mut [Caption], script: &str) -> AlignOutcome {
    let sentences = split_sentences(script);
    let caption_count = captions.len();
    let sentence_count = sentences.len();

    let difference = caption_count.abs_diff(sentence_count) as f64;
    if sentence_count == 0 || difference > sentence_count as f64 / 2.0 {
        warn!(
            "Caption count ({}) and script sentence count ({}) differ too much, keeping recognized text",
            caption_count, sentence_count
        );
        return AlignOutcome::Skipped {
            captions: caption_count,
            sentences: sentence_count,
        };
    }

    let replaced = caption_count.min(sentence_count);
    for (caption, sentence) in captions.iter_mut().zip(sentences) {
        caption.text = sentence;
    }

    debug!("Aligned {} captions with the script", replaced);
    AlignOutcome::Aligned { replaced }
}
