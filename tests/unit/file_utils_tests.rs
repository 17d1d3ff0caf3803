/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use shortcaps::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "script.txt", "안녕하세요.")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withSuffixes_shouldReplaceExtension() {
    let input_file = Path::new("/tmp/input/story.txt");
    let output_dir = Path::new("/tmp/output");

    assert_eq!(
        FileManager::generate_output_path(input_file, output_dir, "srt"),
        Path::new("/tmp/output/story.srt")
    );
    assert_eq!(
        FileManager::generate_output_path(input_file, output_dir, "trimmed.txt"),
        Path::new("/tmp/output/story.trimmed.txt")
    );
}

/// Test that find_files returns matching files in sorted order
#[test]
fn test_find_files_withMixedFiles_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.txt", "둘")?;
    common::create_test_file(temp_dir.path(), "a.txt", "하나")?;
    common::create_test_file(temp_dir.path(), "c.srt", "")?;

    let files = FileManager::find_files(temp_dir.path(), "txt")?;

    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("a.txt"));
    assert!(files[1].ends_with("b.txt"));

    Ok(())
}

/// Test companion audio lookup
#[test]
fn test_find_companion_audio_withAudioNextToScript_shouldFindIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "story.txt")?;

    assert_eq!(FileManager::find_companion_audio(&script), None);

    let audio = common::create_test_file(temp_dir.path(), "story.wav", "")?;
    assert_eq!(FileManager::find_companion_audio(&script), Some(audio));

    Ok(())
}

/// Test writing creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&path, "내용")?;

    assert_eq!(FileManager::read_to_string(&path)?, "내용");
    Ok(())
}

/// Test file type detection by extension and content
#[test]
fn test_detect_file_type_withVariousFiles_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_subtitle(temp_dir.path(), "captions.srt")?;
    let script = common::create_test_script(temp_dir.path(), "story.txt")?;
    let audio = common::create_test_file(temp_dir.path(), "story.mp3", "")?;
    let words = common::create_test_file(temp_dir.path(), "words.json", "[]")?;
    let unnamed_srt = common::create_test_file(
        temp_dir.path(),
        "captions",
        "1\n00:00:00,000 --> 00:00:01,000\n안녕\n",
    )?;

    assert_eq!(FileManager::detect_file_type(&srt)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&script)?, FileType::Script);
    assert_eq!(FileManager::detect_file_type(&audio)?, FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&words)?, FileType::Transcript);
    assert_eq!(FileManager::detect_file_type(&unnamed_srt)?, FileType::Subtitle);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.txt")).is_err());

    Ok(())
}
