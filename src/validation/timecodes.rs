/*!
 * Timecode validation for caption timelines.
 *
 * A generated timeline is checked for:
 * - Entries whose range is empty or reversed
 * - Captions flashing by too quickly or lingering too long
 * - Reading speeds viewers cannot follow
 * - Overlaps, and optionally long silences between captions
 *
 * Findings are advisory. Callers log them; nothing here rejects a timeline.
 */

use log::{debug, warn};

use crate::subtitle_processor::SubtitleEntry;

/// Maximum characters per second a viewer can comfortably read
const DEFAULT_MAX_CPS: f64 = 25.0;

/// Minimum duration for a caption in milliseconds
const MIN_CAPTION_DURATION_MS: u64 = 500;

/// Maximum duration for a single caption in milliseconds (30 seconds)
const MAX_CAPTION_DURATION_MS: u64 = 30_000;

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End time is not after start time
    InvalidTimeRange {
        start_ms: u64,
        end_ms: u64,
    },
    /// Caption is on screen too briefly
    DurationTooShort {
        duration_ms: u64,
        min_duration_ms: u64,
    },
    /// Caption stays on screen too long
    DurationTooLong {
        duration_ms: u64,
        max_duration_ms: u64,
    },
    /// Reading speed exceeds limit
    ReadingSpeedTooHigh {
        cps: f64,
        max_cps: f64,
    },
    /// Starts before the previous caption ends
    OverlapsWithEntry {
        other_seq_num: usize,
        overlap_ms: u64,
    },
    /// Long silence after the previous caption
    LargeGap {
        prev_seq_num: usize,
        gap_ms: u64,
    },
}

impl TimecodeIssue {
    /// Whether the issue makes the entry fail; gaps are only informational
    pub fn is_failure(&self) -> bool {
        !matches!(self, TimecodeIssue::LargeGap { .. })
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms, end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::DurationTooShort { duration_ms, min_duration_ms } => {
                write!(f, "Duration too short: {}ms (min: {}ms)", duration_ms, min_duration_ms)
            }
            TimecodeIssue::DurationTooLong { duration_ms, max_duration_ms } => {
                write!(f, "Duration too long: {}ms (max: {}ms)", duration_ms, max_duration_ms)
            }
            TimecodeIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
            TimecodeIssue::OverlapsWithEntry { other_seq_num, overlap_ms } => {
                write!(f, "Overlaps with entry {} by {}ms", other_seq_num, overlap_ms)
            }
            TimecodeIssue::LargeGap { prev_seq_num, gap_ms } => {
                write!(f, "Gap of {}ms after entry {}", gap_ms, prev_seq_num)
            }
        }
    }
}

/// Issues found for one entry
#[derive(Debug, Clone)]
pub struct EntryFindings {
    /// Sequence number of the entry
    pub seq_num: usize,
    /// Issues found, in detection order
    pub issues: Vec<TimecodeIssue>,
}

impl EntryFindings {
    /// Whether any issue is a failure
    pub fn failed(&self) -> bool {
        self.issues.iter().any(TimecodeIssue::is_failure)
    }
}

/// Result of validating a whole timeline
#[derive(Debug, Clone, Default)]
pub struct TimecodeReport {
    /// Entries with at least one issue
    pub findings: Vec<EntryFindings>,
    /// Number of entries checked
    pub entry_count: usize,
    /// Number of overlapping neighbours
    pub overlap_count: usize,
}

impl TimecodeReport {
    /// True when no entry failed
    pub fn passed(&self) -> bool {
        self.findings.iter().all(|f| !f.failed())
    }

    /// Total number of issues across all entries
    pub fn total_issues(&self) -> usize {
        self.findings.iter().map(|f| f.issues.len()).sum()
    }

    /// Log every issue as a warning
    pub fn log_warnings(&self) {
        for finding in &self.findings {
            for issue in &finding.issues {
                warn!("Caption {}: {}", finding.seq_num, issue);
            }
        }
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Maximum characters per second
    pub max_cps: f64,
    /// Minimum caption duration in ms
    pub min_duration_ms: u64,
    /// Maximum caption duration in ms
    pub max_duration_ms: u64,
    /// Whether to check for overlaps
    pub check_overlaps: bool,
    /// Gap in ms above which a gap is reported (0 = disabled)
    pub max_gap_warning_ms: u64,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            max_cps: DEFAULT_MAX_CPS,
            min_duration_ms: MIN_CAPTION_DURATION_MS,
            max_duration_ms: MAX_CAPTION_DURATION_MS,
            check_overlaps: true,
            max_gap_warning_ms: 0,
        }
    }
}

/// Timecode validator for caption entries
#[derive(Debug, Clone, Default)]
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Check a single entry in isolation
    pub fn check_entry(&self, entry: &SubtitleEntry) -> Vec<TimecodeIssue> {
        if entry.end_time_ms <= entry.start_time_ms {
            return vec![TimecodeIssue::InvalidTimeRange {
                start_ms: entry.start_time_ms,
                end_ms: entry.end_time_ms,
            }];
        }

        let mut issues = Vec::new();
        let duration_ms = entry.end_time_ms - entry.start_time_ms;

        if duration_ms < self.config.min_duration_ms {
            issues.push(TimecodeIssue::DurationTooShort {
                duration_ms,
                min_duration_ms: self.config.min_duration_ms,
            });
        }

        if duration_ms > self.config.max_duration_ms {
            issues.push(TimecodeIssue::DurationTooLong {
                duration_ms,
                max_duration_ms: self.config.max_duration_ms,
            });
        }

        let cps = Self::calculate_cps(entry);
        if cps > self.config.max_cps {
            issues.push(TimecodeIssue::ReadingSpeedTooHigh {
                cps,
                max_cps: self.config.max_cps,
            });
        }

        issues
    }

    /// Validate a timeline, entries taken in start-time order
    pub fn validate(&self, entries: &[SubtitleEntry]) -> TimecodeReport {
        let mut per_entry: Vec<Vec<TimecodeIssue>> = entries.iter().map(|e| self.check_entry(e)).collect();
        let mut overlap_count = 0;

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&i| entries[i].start_time_ms);

        for pair in order.windows(2) {
            let (current, next) = (&entries[pair[0]], &entries[pair[1]]);

            if self.config.check_overlaps && current.end_time_ms > next.start_time_ms {
                overlap_count += 1;
                per_entry[pair[1]].push(TimecodeIssue::OverlapsWithEntry {
                    other_seq_num: current.seq_num,
                    overlap_ms: current.end_time_ms - next.start_time_ms,
                });
            }

            if self.config.max_gap_warning_ms > 0 && next.start_time_ms > current.end_time_ms {
                let gap_ms = next.start_time_ms - current.end_time_ms;
                if gap_ms > self.config.max_gap_warning_ms {
                    per_entry[pair[1]].push(TimecodeIssue::LargeGap {
                        prev_seq_num: current.seq_num,
                        gap_ms,
                    });
                }
            }
        }

        let findings: Vec<EntryFindings> = entries
            .iter()
            .zip(per_entry)
            .filter(|(_, issues)| !issues.is_empty())
            .map(|(entry, issues)| EntryFindings { seq_num: entry.seq_num, issues })
            .collect();

        let report = TimecodeReport {
            findings,
            entry_count: entries.len(),
            overlap_count,
        };

        debug!(
            "Timecode validation: {} entries, {} issues, {} overlaps",
            report.entry_count,
            report.total_issues(),
            report.overlap_count
        );

        report
    }

    /// Reading speed in non-whitespace characters per second
    pub fn calculate_cps(entry: &SubtitleEntry) -> f64 {
        if entry.end_time_ms <= entry.start_time_ms {
            return f64::INFINITY;
        }

        let char_count = entry.text.chars().filter(|c| !c.is_whitespace()).count() as f64;
        let duration_secs = (entry.end_time_ms - entry.start_time_ms) as f64 / 1000.0;

        char_count / duration_secs
    }
}
