use std::io::Write;
use std::path::PathBuf;

use crate::models::error::LoggerError;

/// Byte-oriented storage on a mounted filesystem (e.g. an SD card).
///
/// Names are relative to the storage root. Implemented by `FsStorage`.
pub trait Storage: Send + Sync {
    /// Handle returned by `create`, owned by the capture writer while recording.
    type File: Write + Send;

    /// Create (or truncate) a file for appending.
    fn create(&self, name: &str) -> Result<Self::File, LoggerError>;

    /// Overwrite `bytes` at `offset` of an existing, closed file.
    fn patch(&self, name: &str, offset: u64, bytes: &[u8]) -> Result<(), LoggerError>;

    fn rename(&self, from: &str, to: &str) -> Result<(), LoggerError>;

    fn remove(&self, name: &str) -> Result<(), LoggerError>;

    fn exists(&self, name: &str) -> bool;

    /// Size of a file in bytes.
    fn size(&self, name: &str) -> Result<u64, LoggerError>;

    fn read_to_string(&self, name: &str) -> Result<String, LoggerError>;

    /// Replace the contents of a file with `contents`.
    fn write_string(&self, name: &str, contents: &str) -> Result<(), LoggerError>;

    /// Full path of a stored file, for reporting.
    fn path_of(&self, name: &str) -> PathBuf;
}
