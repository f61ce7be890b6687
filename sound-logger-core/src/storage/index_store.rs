use std::sync::Arc;

use crate::models::error::LoggerError;
use crate::traits::storage::Storage;

/// Outcome of loading the persisted sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLoad {
    Loaded(u32),
    /// No index file yet; numbering starts from zero.
    Missing,
    /// The file exists but does not hold a number; numbering restarts from zero.
    Corrupt(String),
}

impl IndexLoad {
    /// The last used sequence number to continue from.
    pub fn value(&self) -> u32 {
        match self {
            Self::Loaded(n) => *n,
            Self::Missing | Self::Corrupt(_) => 0,
        }
    }
}

/// Last used recording sequence number, persisted as decimal text.
///
/// Loading never fails, so a device with a damaged card still boots; saving
/// reports errors for the caller to log.
pub struct IndexStore<S: Storage> {
    storage: Arc<S>,
    file_name: String,
}

impl<S: Storage> IndexStore<S> {
    pub fn new(storage: Arc<S>, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn load(&self) -> IndexLoad {
        if !self.storage.exists(&self.file_name) {
            return IndexLoad::Missing;
        }
        match self.storage.read_to_string(&self.file_name) {
            Ok(text) => match text.trim().parse::<u32>() {
                Ok(n) => IndexLoad::Loaded(n),
                Err(e) => IndexLoad::Corrupt(format!("{:?}: {}", text.trim(), e)),
            },
            Err(e) => IndexLoad::Corrupt(e.to_string()),
        }
    }

    /// Overwrite the index with `sequence`.
    pub fn save(&self, sequence: u32) -> Result<(), LoggerError> {
        self.storage.write_string(&self.file_name, &sequence.to_string())
    }
}
