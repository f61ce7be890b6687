use std::time::Instant;

/// Resources of the recording in flight.
///
/// Created by the recorder when a recording starts, then moved into the
/// capture writer thread, which hands it to the finalizer once drained.
pub struct RecordingSession<F> {
    pub sequence: u32,
    pub temp_name: String,
    pub file: F,
    pub started_at: Instant,
    pub bytes_written: u64,
}

impl<F> RecordingSession<F> {
    pub fn new(sequence: u32, temp_name: String, file: F, started_at: Instant) -> Self {
        Self {
            sequence,
            temp_name,
            file,
            started_at,
            bytes_written: 0,
        }
    }
}
