/*!
 * Tests for caption line wrapping
 */

use shortcaps::formatting::{chars_per_line_for_font, wrap_caption, BASE_FONT_SIZE, DEFAULT_MAX_CHARS_PER_LINE};

/// Test line width scaling with font size
#[test]
fn test_charsPerLineForFont_withFontSizes_shouldScaleInverse() {
    assert_eq!(chars_per_line_for_font(DEFAULT_MAX_CHARS_PER_LINE, BASE_FONT_SIZE), 30);
    assert_eq!(chars_per_line_for_font(30, 140), 13);
    assert_eq!(chars_per_line_for_font(30, 35), 40);
    assert_eq!(chars_per_line_for_font(30, 1000), 10);
    assert_eq!(chars_per_line_for_font(30, 0), 30);
}

/// Test word wrapping for Latin text without a font size
#[test]
fn test_wrapCaption_withEnglishSentence_shouldBreakOnSpaces() {
    let wrapped = wrap_caption("The quick brown fox jumps over the lazy dog", 20, None);

    assert_eq!(wrapped, "The quick brown fox\njumps over the lazy\ndog");
}

/// Test that wrapping only touches whitespace
#[test]
fn test_wrapCaption_withHangul_shouldKeepAllCharacters() {
    let text = "저는 친구와 함께 공원에 가서 산책을 하고 점심을 먹으려고 합니다";
    let wrapped = wrap_caption(text, DEFAULT_MAX_CHARS_PER_LINE, Some(BASE_FONT_SIZE));

    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(strip(&wrapped), strip(text));
    assert!(wrapped.lines().count() > 1);
    assert!(wrapped.lines().all(|line| !line.is_empty()));
}

/// Test that fitting pre-wrapped text is left alone
#[test]
fn test_wrapCaption_withFittingLines_shouldReturnUnchanged() {
    assert_eq!(wrap_caption("첫 줄\n둘째 줄", 30, None), "첫 줄\n둘째 줄");
}

/// Test empty input
#[test]
fn test_wrapCaption_withEmptyText_shouldReturnEmpty() {
    assert_eq!(wrap_caption("", 30, Some(70)), "");
}
