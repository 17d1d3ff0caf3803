use std::fs;
use std::fs::File;
use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{warn, debug};

use crate::errors::SubtitleError;
use crate::formatting::wrap_caption;
use crate::timing::Caption;

// @module: Caption files in SRT and JSON form

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, lines separated by '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self, SubtitleError> {
        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(SubtitleError::EmptyText(seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut values = [0u64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| invalid())?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Convert back to a caption in seconds, joining wrapped lines
    pub fn to_caption(&self) -> Caption {
        let text = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        Caption::new(
            text,
            self.start_time_ms as f64 / 1000.0,
            self.end_time_ms as f64 / 1000.0,
        )
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Line wrapping applied when captions become subtitle entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    /// Characters per line at the base font size
    pub max_chars_per_line: usize,
    /// Font size the captions are rendered with
    pub font_size: Option<u32>,
}

fn seconds_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}

/// Collection of subtitle entries with metadata
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File the entries came from or are written to
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Build numbered entries from a caption timeline.
    ///
    /// Times are rounded to whole milliseconds. An entry whose rounded
    /// range would be empty is stretched to one millisecond.
    pub fn from_captions(source_file: PathBuf, captions: &[Caption], wrap: Option<WrapOptions>) -> Self {
        let entries = captions
            .iter()
            .enumerate()
            .map(|(i, caption)| {
                let start_time_ms = seconds_to_ms(caption.start_time);
                let end_time_ms = seconds_to_ms(caption.end_time).max(start_time_ms + 1);
                let text = match wrap {
                    Some(options) => wrap_caption(&caption.text, options.max_chars_per_line, options.font_size),
                    None => caption.text.clone(),
                };
                SubtitleEntry::new(i + 1, start_time_ms, end_time_ms, text)
            })
            .collect();

        SubtitleCollection { source_file, entries }
    }

    /// Convert entries back to captions in seconds
    pub fn to_captions(&self) -> Vec<Caption> {
        self.entries.iter().map(SubtitleEntry::to_caption).collect()
    }

    /// Read and parse an SRT file
    pub fn read_srt<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        debug!("Wrote {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Write captions as a JSON array of `{text, start_time, end_time}`
    pub fn write_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let json = serde_json::to_string_pretty(&self.to_captions())
            .context("Failed to serialize captions")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write caption file: {}", path.display()))?;

        debug!("Wrote {} captions to {}", self.entries.len(), path.display());
        Ok(())
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }

    /// Parse SRT format string into subtitle entries
    ///
    /// Malformed entries are skipped with a warning. The result is sorted
    /// by start time and renumbered from 1.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |seq_num: usize, (start_ms, end_ms): (u64, u64), text: &str| {
            match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        // Byte order marks show up in files saved by some editors
        let content = content.trim_start_matches('\u{feff}');

        for (line_number, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
                    if !current_text.is_empty() {
                        add_current_entry(seq_num, times, &current_text);
                        current_seq_num = None;
                        current_times = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            // Sequence number starts a new entry
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            if current_seq_num.is_some() && current_times.is_none() {
                if let Some(times) = Self::parse_time_range(trimmed) {
                    current_times = Some(times);
                    continue;
                }
                warn!("Expected timestamp at line {}: {}", line_number + 1, trimmed);
                current_seq_num = None;
                continue;
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_number + 1, trimmed);
            }
        }

        if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
            if !current_text.is_empty() {
                add_current_entry(seq_num, times, &current_text);
            }
        }

        if entries.is_empty() {
            return Err(SubtitleError::NoEntries);
        }

        entries.sort_by_key(|entry| entry.start_time_ms);

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }

    /// Start and end in milliseconds from a `start --> end` line
    fn parse_time_range(line: &str) -> Option<(u64, u64)> {
        let caps = TIMESTAMP_REGEX.captures(line)?;
        let start = SubtitleEntry::parse_timestamp(&caps[1]);
        let end = SubtitleEntry::parse_timestamp(&caps[2]);
        match (start, end) {
            (Ok(start), Ok(end)) => Some((start, end)),
            (Err(e), _) | (_, Err(e)) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Time of the last entry's end in milliseconds
    pub fn end_time_ms(&self) -> u64 {
        self.entries.iter().map(|e| e.end_time_ms).max().unwrap_or(0)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        writeln!(f, "Ends at: {}", SubtitleEntry::format_timestamp(self.end_time_ms()))?;
        Ok(())
    }
}
