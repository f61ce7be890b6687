use std::path::PathBuf;

use super::stats::PipelineStats;

/// Result of a recording that was finalized and renamed to its durable name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub sequence: u32,
    pub file_name: String,
    pub file_path: PathBuf,
    /// Whole seconds between session start and finalization.
    pub duration_secs: u64,
    /// PCM bytes in the data chunk (file size minus the 44-byte header).
    pub data_bytes: u64,
    pub stats: PipelineStats,
    /// False when the index file could not be updated. The recording itself
    /// is intact; only the next boot may reuse this sequence number.
    pub index_persisted: bool,
    /// RFC 3339 UTC timestamp of finalization.
    pub finished_at: String,
}
