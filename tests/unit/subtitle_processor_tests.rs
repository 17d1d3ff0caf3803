/*!
 * Tests for SRT and JSON caption files
 */

use anyhow::Result;
use shortcaps::errors::SubtitleError;
use shortcaps::subtitle_processor::{SubtitleCollection, SubtitleEntry, WrapOptions};
use shortcaps::timing::Caption;
use crate::common;

/// Test timestamp formatting
#[test]
fn test_formatTimestamp_withVariousValues_shouldFormatCorrectly() {
    assert_eq!(SubtitleEntry::format_timestamp(0), "00:00:00,000");
    assert_eq!(SubtitleEntry::format_timestamp(62_345), "00:01:02,345");
    assert_eq!(SubtitleEntry::format_timestamp(3_723_004), "01:02:03,004");
}

/// Test timestamp parsing, including the dot separator
#[test]
fn test_parseTimestamp_withValidAndInvalidInput_shouldParseOrFail() {
    assert_eq!(SubtitleEntry::parse_timestamp("00:01:02,345").unwrap(), 62_345);
    assert_eq!(SubtitleEntry::parse_timestamp("01:00:00.500").unwrap(), 3_600_500);
    assert!(matches!(
        SubtitleEntry::parse_timestamp("00:61:00,000"),
        Err(SubtitleError::InvalidTimestamp(_))
    ));
    assert!(SubtitleEntry::parse_timestamp("abc").is_err());
}

/// Test entry validation
#[test]
fn test_newValidated_withBadEntries_shouldFail() {
    assert!(matches!(
        SubtitleEntry::new_validated(1, 2000, 1000, "텍스트".to_string()),
        Err(SubtitleError::InvalidTimeRange { start_ms: 2000, end_ms: 1000 })
    ));
    assert!(matches!(
        SubtitleEntry::new_validated(3, 0, 1000, "  ".to_string()),
        Err(SubtitleError::EmptyText(3))
    ));

    let entry = SubtitleEntry::new_validated(1, 0, 1000, " 안녕 ".to_string()).unwrap();
    assert_eq!(entry.text, "안녕");
}

/// Test reading a sample file
#[test]
fn test_readSrt_withSampleFile_shouldParseAllEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let collection = SubtitleCollection::read_srt(&path)?;

    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[1].start_time_ms, 1000);
    assert_eq!(collection.entries[1].text, "오늘은 날씨가 정말 좋네요");
    assert_eq!(collection.end_time_ms(), 8000);
    assert_eq!(collection.source_file, path);

    Ok(())
}

/// Test that a byte order mark does not hide the first entry
#[test]
fn test_parseSrtString_withByteOrderMark_shouldParseFirstEntry() {
    let content = "\u{feff}1\n00:00:00,000 --> 00:00:01,500\n안녕하세요.\n";

    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].end_time_ms, 1500);
}

/// Test that an SRT without entries is rejected
#[test]
fn test_readSrt_withEmptyFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.srt", "")?;

    assert!(SubtitleCollection::read_srt(&path).is_err());
    Ok(())
}

/// Test that written SRT reads back to the same timeline
#[test]
fn test_writeToSrt_withCaptions_shouldReadBackSameTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("captions.srt");
    let captions = vec![
        Caption::new("안녕하세요.", 0.0, 1.0869),
        Caption::new("오늘은 날씨가 정말 좋네요!", 1.0869, 3.2),
    ];

    let wrap = WrapOptions { max_chars_per_line: 30, font_size: Some(70) };
    SubtitleCollection::from_captions(path.clone(), &captions, Some(wrap)).write_to_srt(&path)?;
    let read_back = SubtitleCollection::read_srt(&path)?.to_captions();

    assert_eq!(read_back.len(), 2);
    assert_eq!(read_back[0].end_time, 1.087);
    assert_eq!(read_back[1].start_time, 1.087);
    assert_eq!(read_back[1].text, "오늘은 날씨가 정말 좋네요!");

    Ok(())
}

/// Test JSON output shape
#[test]
fn test_writeToJson_withCaptions_shouldWriteCaptionArray() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("captions.json");
    let captions = vec![Caption::new("안녕하세요.", 0.0, 1.5)];

    SubtitleCollection::from_captions(path.clone(), &captions, None).write_to_json(&path)?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(json[0]["text"], "안녕하세요.");
    assert_eq!(json[0]["start_time"], 0.0);
    assert_eq!(json[0]["end_time"], 1.5);

    Ok(())
}
