/*!
 * Common test utilities for the shortcaps test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Korean narration script with three sentences
pub const SAMPLE_SCRIPT: &str = "안녕하세요. 오늘은 날씨가 정말 좋네요! 저는 공원에 가려고 합니다.";

/// Routes library log output through the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the sample script file for testing
pub fn create_test_script(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SCRIPT)
}

/// Creates a sample subtitle file for testing, as a recognizer would emit it
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:00,000 --> 00:00:01,000
안녕 하세요

2
00:00:01,000 --> 00:00:04,000
오늘은 날씨가 정말 좋네요

3
00:00:04,000 --> 00:00:08,000
저는 공원에 가려고 합니다
"#;
    create_test_file(dir, filename, content)
}

/// Creates a recognized word list (JSON) ending 5 seconds in, last sentence unpunctuated
pub fn create_test_words(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"[
  {"word": "안녕", "start_time": 0.0, "end_time": 0.4},
  {"word": "하세요.", "start_time": 0.4, "end_time": 1.0},
  {"word": "오늘", "start_time": 1.2, "end_time": 1.6},
  {"word": "날씨가", "start_time": 1.6, "end_time": 2.4},
  {"word": "좋네요!", "start_time": 2.4, "end_time": 3.5},
  {"word": "공원에", "start_time": 3.8, "end_time": 4.4},
  {"word": "가요", "start_time": 4.4, "end_time": 5.0}
]"#;
    create_test_file(dir, filename, content)
}

/// Script long enough to need trimming for a 60 second limit
pub fn long_script() -> String {
    let sentences = [
        "오늘은 서울의 숨은 명소를 소개해 드리겠습니다.",
        "첫 번째 장소는 북촌 한옥마을입니다.",
        "이곳에서는 전통 가옥 사이로 골목길을 천천히 걸을 수 있습니다.",
        "두 번째 장소는 익선동입니다.",
        "작은 카페와 식당이 좁은 골목마다 숨어 있습니다.",
    ];
    let mut script = Vec::new();
    for _ in 0..6 {
        script.extend(sentences.iter().copied());
    }
    script.join(" ")
}
