use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use crate::models::config::LoggerConfig;
use crate::models::error::LoggerError;
use crate::models::recording_result::RecordingResult;
use crate::models::stats::PipelineStats;
use crate::processing::wav_format;
use crate::session::naming;
use crate::session::recording::RecordingSession;
use crate::storage::index_store::IndexStore;
use crate::traits::storage::Storage;

/// Turns a drained temp recording into a durable WAV file.
///
/// Steps, in order: flush and close, patch the 44-byte header with the real
/// data size, rename to `rec_<seq>_<mm>-<ss>.wav`, then persist the sequence
/// index. If the header patch or rename fails the temp file is left in place
/// and the index is not touched.
pub struct Finalizer<S: Storage> {
    storage: Arc<S>,
    index: Arc<IndexStore<S>>,
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
}

impl<S: Storage> Finalizer<S> {
    pub fn new(storage: Arc<S>, index: Arc<IndexStore<S>>, config: &LoggerConfig) -> Self {
        Self {
            storage,
            index,
            sample_rate: config.sample_rate,
            bits_per_sample: config.bits_per_sample,
            channels: config.channels,
        }
    }

    pub fn finalize(
        &self,
        session: RecordingSession<S::File>,
        finished_at: Instant,
        stats: PipelineStats,
    ) -> Result<RecordingResult, LoggerError> {
        let RecordingSession {
            sequence,
            temp_name,
            mut file,
            started_at,
            bytes_written,
        } = session;
        log::info!("Finalizing {}... Total bytes: {}", temp_name, bytes_written);

        if let Err(e) = file.flush() {
            log::warn!("Flush of {} failed before finalization: {}", temp_name, e);
        }
        drop(file);

        let header = wav_format::generate_wav_header(
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
            wav_format::header_data_size(bytes_written),
        );
        self.storage
            .patch(&temp_name, 0, &header)
            .map_err(|e| LoggerError::FinalizationFailed(format!("header patch of {} failed: {}", temp_name, e)))?;

        let duration_secs = finished_at.saturating_duration_since(started_at).as_secs();
        let final_name = naming::final_file_name(sequence, duration_secs);
        if self.storage.exists(&final_name) {
            return Err(LoggerError::FinalizationFailed(format!(
                "{} already exists, keeping {}",
                final_name, temp_name
            )));
        }
        self.storage
            .rename(&temp_name, &final_name)
            .map_err(|e| LoggerError::FinalizationFailed(format!("rename to {} failed: {}", final_name, e)))?;

        let index_persisted = match self.index.save(sequence) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error writing {}: {}", self.index.file_name(), e);
                false
            }
        };

        log::info!("Saved: {} ({} s, index {})", final_name, duration_secs, sequence);

        Ok(RecordingResult {
            sequence,
            file_path: self.storage.path_of(&final_name),
            file_name: final_name,
            duration_secs,
            data_bytes: bytes_written,
            stats,
            index_persisted,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
