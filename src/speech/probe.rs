/*!
 * Audio duration measurement with ffprobe.
 */

use log::debug;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::SpeechError;
use super::checked_duration;

/// Default ffprobe executable
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Default time allowed for a single probe, in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;

/// Measures audio files by running ffprobe
#[derive(Debug, Clone)]
pub struct AudioProbe {
    /// Path or name of the ffprobe executable
    ffprobe_path: String,
    /// Seconds before a probe is abandoned
    timeout_secs: u64,
}

impl Default for AudioProbe {
    fn default() -> Self {
        Self::new(DEFAULT_FFPROBE, DEFAULT_PROBE_TIMEOUT_SECS)
    }
}

impl AudioProbe {
    /// Create a probe using the given executable and timeout
    pub fn new(ffprobe_path: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout_secs,
        }
    }

    /// Duration of an audio file in seconds
    pub async fn duration_secs(&self, audio_path: &Path) -> Result<f64, SpeechError> {
        if !audio_path.exists() {
            return Err(SpeechError::AudioNotFound(audio_path.to_path_buf()));
        }

        let ffprobe_future = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(audio_path)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| SpeechError::ProbeFailed(format!("failed to run {}: {}", self.ffprobe_path, e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(SpeechError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::ProbeFailed(format!(
                "{} exited with {}: {}",
                self.ffprobe_path,
                output.status,
                stderr.trim()
            )));
        }

        let duration = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!("Measured {}: {:.3}s", audio_path.display(), duration);
        Ok(duration)
    }
}

/// Read `format.duration` from ffprobe's JSON output
pub fn parse_probe_output(stdout: &str) -> Result<f64, SpeechError> {
    let json: Value = serde_json::from_str(stdout)
        .map_err(|e| SpeechError::InvalidDuration(format!("unparseable probe output: {}", e)))?;

    let duration = json
        .get("format")
        .and_then(|format| format.get("duration"))
        .ok_or_else(|| SpeechError::InvalidDuration("probe output has no format.duration".to_string()))?;

    // ffprobe prints the duration as a string; accept plain numbers too
    let seconds = match duration {
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| SpeechError::InvalidDuration(format!("not a number: {}", text)))?,
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| SpeechError::InvalidDuration(number.to_string()))?,
        other => return Err(SpeechError::InvalidDuration(other.to_string())),
    };

    checked_duration(seconds)
}
