use thiserror::Error;

/// Errors that can occur while capturing, storing, or finalizing a recording.
///
/// None of these terminate the host process. Callers log them and keep the
/// logger running; the variant tells them which subsystem degraded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggerError {
    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("audio source error: {0}")]
    SourceError(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("finalization failed: {0}")]
    FinalizationFailed(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}
