/*!
 * Sentence and clause segmentation for caption timing.
 *
 * Scripts are split into sentences at terminal punctuation, and sentences
 * into caption-sized clauses. Clause splitting understands Korean word
 * endings (case particles, connective endings, quotative endings) so that
 * captions break where a narrator would naturally pause.
 *
 * Every function here fails open: non-empty input never produces an empty
 * result, and no characters other than whitespace are ever dropped.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences at or below this many characters are never split
pub const MIN_SPLIT_CHARS: usize = 10;

/// First-pass fragments at or below this many characters are kept whole
pub const MAX_PRIMARY_FRAGMENT_CHARS: usize = 20;

/// Upper bound for recombined caption fragments
pub const MAX_CLAUSE_CHARS: usize = 25;

/// Terminal punctuation followed by whitespace
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+").unwrap()
});

/// Delimiters a clause may end on; the delimiter stays with the left side
static CLAUSE_DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[,;:"']"#).unwrap()
});

/// Word-final particles and endings after which a caption may break:
/// subject, topic, object and locative particles, connective endings,
/// and quotative endings
static BREAKABLE_ENDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:이|가|은|는|을|를|에서|에|께|한테|에게",
        r"|고|며|서|되|자|면|니까|지만",
        r"|라고|하고|하며|하자|하면)$",
    ))
    .unwrap()
});

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split free text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` when whitespace follows.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Punctuation is ASCII, so the sentence ends one byte into the match
        let end = boundary.start() + 1;
        push_trimmed(&mut sentences, &text[last..end]);
        last = boundary.end();
    }
    push_trimmed(&mut sentences, &text[last..]);

    if sentences.is_empty() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            sentences.push(trimmed.to_string());
        }
    }

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Split a sentence into caption-sized clauses, left to right.
pub fn split_clauses(sentence: &str) -> Vec<String> {
    if char_len(sentence) <= MIN_SPLIT_CHARS {
        return vec![sentence.to_string()];
    }

    let mut fragments = Vec::new();
    for piece in split_on_delimiters(sentence) {
        if char_len(&piece) <= MAX_PRIMARY_FRAGMENT_CHARS {
            fragments.push(piece);
        } else {
            fragments.extend(split_by_particles(&piece));
        }
    }

    let clauses: Vec<String> = merge_short_fragments(fragments)
        .into_iter()
        .filter(|clause| !clause.trim().is_empty())
        .collect();

    if clauses.is_empty() {
        return vec![sentence.to_string()];
    }

    clauses
}

/// Split right after every clause delimiter, trimming and dropping blanks
fn split_on_delimiters(sentence: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for delimiter in CLAUSE_DELIMITER.find_iter(sentence) {
        push_trimmed(&mut pieces, &sentence[last..delimiter.end()]);
        last = delimiter.end();
    }
    push_trimmed(&mut pieces, &sentence[last..]);

    pieces
}

/// Break a long fragment after words that end on a particle or ending.
///
/// Fragments of three words or fewer are returned whole. A break happens
/// once three words have accumulated, or after a second (or later) word
/// with a breakable ending as long as it is not the final word.
pub fn split_by_particles(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 3 {
        return vec![text.to_string()];
    }

    let mut fragments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        current.push(word);
        let is_last = i == words.len() - 1;

        let should_split = current.len() >= 3
            || (current.len() >= 2 && !is_last && BREAKABLE_ENDING.is_match(word));

        if should_split {
            fragments.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        fragments.push(current.join(" "));
    }

    if fragments.is_empty() {
        return vec![text.to_string()];
    }

    fragments
}

/// Greedily join neighbouring fragments while they fit in a caption
fn merge_short_fragments(fragments: Vec<String>) -> Vec<String> {
    let mut merged = Vec::new();
    let mut current = String::new();

    for fragment in fragments {
        if current.is_empty() {
            current = fragment;
            continue;
        }

        let combined_len = char_len(&current) + 1 + char_len(&fragment);
        if combined_len > MAX_CLAUSE_CHARS {
            merged.push(std::mem::replace(&mut current, fragment));
        } else {
            current.push(' ');
            current.push_str(&fragment);
        }
    }

    if !current.is_empty() {
        merged.push(current);
    }

    merged
}
