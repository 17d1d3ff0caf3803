/*!
 * Caption line wrapping.
 *
 * Captions on vertical video have little horizontal room. Lines are
 * wrapped on word boundaries, the line width shrinks as the font grows,
 * and Hangul captions get shorter lines because each syllable is wider
 * than a Latin letter.
 */

use log::trace;

use crate::timing::duration::contains_hangul;

/// Font size the default line width is calibrated for
pub const BASE_FONT_SIZE: u32 = 70;

/// Default characters per caption line at the base font size
pub const DEFAULT_MAX_CHARS_PER_LINE: usize = 30;

const MIN_LINE_CHARS: usize = 10;
const MAX_LINE_CHARS: usize = 40;

/// Exponent relating font size to line width
const FONT_SCALE_EXPONENT: f64 = 1.2;

/// Line width multiplier for text containing Hangul
const HANGUL_WIDTH_FACTOR: f64 = 0.8;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Line width adjusted for a font size, clamped to 10..=40 characters
pub fn chars_per_line_for_font(max_chars_per_line: usize, font_size: u32) -> usize {
    if font_size == 0 {
        return max_chars_per_line;
    }

    let ratio = (BASE_FONT_SIZE as f64 / font_size as f64).powf(FONT_SCALE_EXPONENT);
    let adjusted = (max_chars_per_line as f64 * ratio).floor() as usize;
    adjusted.clamp(MIN_LINE_CHARS, MAX_LINE_CHARS)
}

/// Wrap caption text into lines joined by `\n`.
///
/// Text that is already broken into lines which all fit is returned as is.
/// Only whitespace is ever removed or replaced.
pub fn wrap_caption(text: &str, max_chars_per_line: usize, font_size: Option<u32>) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut max_chars = match font_size {
        Some(size) => chars_per_line_for_font(max_chars_per_line, size),
        None => max_chars_per_line,
    };

    if text.contains('\n') && text.split('\n').all(|line| char_len(line) <= max_chars) {
        return text.to_string();
    }

    if contains_hangul(text) {
        max_chars = (max_chars as f64 * HANGUL_WIDTH_FACTOR).floor() as usize;
    }
    trace!("Wrapping caption at {} characters per line", max_chars);

    let mut lines = Vec::new();
    for line in greedy_wrap(text, max_chars) {
        if contains_hangul(&line) && char_len(&line) as isize > max_chars as isize - 10 {
            lines.extend(split_near_middle(&line));
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Fill lines word by word; a word longer than the width gets its own line
fn greedy_wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Split a line at a space close to its middle, or keep it whole
fn split_near_middle(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mid = chars.len() / 2;

    let before = chars[..(mid + 5).min(chars.len())]
        .iter()
        .rposition(|c| *c == ' ');
    let split_at = before.or_else(|| {
        let from = mid.saturating_sub(5);
        chars[from..].iter().position(|c| *c == ' ').map(|i| from + i)
    });

    match split_at {
        Some(index) => {
            let left: String = chars[..index].iter().collect();
            let right: String = chars[index + 1..].iter().collect();
            [left, right].into_iter().filter(|part| !part.is_empty()).collect()
        }
        None => vec![line.to_string()],
    }
}
