use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::LoggerError;

/// Configuration for the sound logger.
///
/// Durations are stored in milliseconds so the JSON form stays flat:
/// ```json
/// { "sample_rate": 22050, "slot_capacity": 8192, "output_directory": "/sd" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Sample rate of the audio source in Hz (default: 22050).
    pub sample_rate: u32,

    /// Bit depth of the PCM stream. Only 16 is supported.
    pub bits_per_sample: u16,

    /// Channel count of the PCM stream. Only mono is supported.
    pub channels: u16,

    /// Size in bytes of each of the two capture slots (default: 8192).
    pub slot_capacity: usize,

    /// Directory where recordings and the index file are written.
    pub output_directory: PathBuf,

    /// File name of the persisted sequence index, relative to `output_directory`.
    pub index_file_name: String,

    /// Cadence at which the monitor samples the enable/trigger inputs.
    pub poll_interval_ms: u64,

    /// Reader pause after a read that returned no data.
    pub idle_backoff_ms: u64,

    /// Pause after a transient source or storage error.
    pub error_backoff_ms: u64,

    /// Longest the writer waits for a ready slot before re-checking for stop.
    pub writer_idle_wait_ms: u64,

    /// Attempts per slot before the writer gives up on a failing storage write.
    pub write_retries: u32,

    /// Log a warning every N dropped frames.
    pub drop_log_interval: u64,
}

/// Highest accepted sample rate; keeps header fields well inside `u32`.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(format!(
                "sample rate must be between 1 and {} Hz, got {}",
                MAX_SAMPLE_RATE, self.sample_rate
            ));
        }
        if self.bits_per_sample != 16 {
            return Err(format!("unsupported bit depth: {}", self.bits_per_sample));
        }
        if self.channels != 1 {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.slot_capacity == 0 || self.slot_capacity % self.block_align() as usize != 0 {
            return Err(format!(
                "slot capacity must be a non-zero multiple of {} bytes, got {}",
                self.block_align(),
                self.slot_capacity
            ));
        }
        if self.drop_log_interval == 0 {
            return Err("drop log interval must be positive".into());
        }
        if self.index_file_name.trim().is_empty() {
            return Err("index file name must not be empty".into());
        }
        Ok(())
    }

    /// Parse a JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, LoggerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LoggerError::ConfigurationFailed(format!("invalid config: {}", e)))?;
        config.validate().map_err(LoggerError::ConfigurationFailed)?;
        Ok(config)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, LoggerError> {
        let json = fs::read_to_string(path).map_err(|e| {
            LoggerError::ConfigurationFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// Bytes of PCM produced per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn writer_idle_wait(&self) -> Duration {
        Duration::from_millis(self.writer_idle_wait_ms)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            bits_per_sample: 16,
            channels: 1,
            slot_capacity: 8192,
            output_directory: PathBuf::from("/sd"),
            index_file_name: "last_index.txt".into(),
            poll_interval_ms: 30,
            idle_backoff_ms: 5,
            error_backoff_ms: 10,
            writer_idle_wait_ms: 2,
            write_retries: 3,
            drop_log_interval: 10,
        }
    }
}
