/// Counters for one capture session.
///
/// After the pipeline drains:
/// `bytes_read == bytes_written + dropped_bytes + lost_bytes`, where lost
/// bytes only come from writes that failed after every retry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Read calls issued against the audio source, including empty ones.
    pub total_reads: u64,
    pub empty_reads: u64,
    pub read_errors: u64,
    /// Frames discarded because the writer had not consumed them in time.
    pub dropped_frames: u64,
    pub dropped_bytes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
    pub lost_bytes: u64,
}

impl PipelineStats {
    /// Percentage of reads whose data was dropped.
    pub fn drop_ratio(&self) -> f64 {
        100.0 * self.dropped_frames as f64 / self.total_reads.max(1) as f64
    }
}
