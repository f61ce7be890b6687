use crate::models::error::LoggerError;

/// Pull-style PCM source (e.g. an I2S microphone peripheral).
///
/// The sample rate and bit depth are fixed when the source is initialized;
/// the logger only moves bytes.
pub trait AudioSource: Send {
    /// Read up to `buf.len()` bytes of PCM into `buf`.
    ///
    /// Returns `Ok(0)` when no data is ready yet. Should not block for more
    /// than a short period; the source sets the pace of the whole pipeline.
    /// Errors are treated as transient and the read is retried after a pause.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError>;
}
