use crate::models::error::LoggerError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;

/// Event delegate for recorder notifications.
///
/// Called from the monitor thread for transitions it causes and from the
/// capture writer thread for finalization. Implementations must not block.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the recorder state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called after a recording has been renamed to its final name.
    fn on_recording_finished(&self, result: &RecordingResult);

    /// Called when a recording fails to start or to finalize.
    fn on_error(&self, error: &LoggerError);
}
