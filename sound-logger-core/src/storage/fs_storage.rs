use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::LoggerError;
use crate::traits::storage::Storage;

/// `Storage` over a directory of the local filesystem (e.g. the SD card mount).
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LoggerError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| LoggerError::StorageError(format!("failed to create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn storage_err(action: &str, name: &str, e: std::io::Error) -> LoggerError {
    LoggerError::StorageError(format!("failed to {} {}: {}", action, name, e))
}

impl Storage for FsStorage {
    type File = File;

    fn create(&self, name: &str) -> Result<File, LoggerError> {
        File::create(self.path_of(name)).map_err(|e| storage_err("create", name, e))
    }

    fn patch(&self, name: &str, offset: u64, bytes: &[u8]) -> Result<(), LoggerError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.path_of(name))
            .map_err(|e| storage_err("open", name, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| storage_err("seek", name, e))?;
        file.write_all(bytes).map_err(|e| storage_err("patch", name, e))?;
        file.sync_all().map_err(|e| storage_err("sync", name, e))?;
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), LoggerError> {
        fs::rename(self.path_of(from), self.path_of(to)).map_err(|e| storage_err("rename", from, e))
    }

    fn remove(&self, name: &str) -> Result<(), LoggerError> {
        fs::remove_file(self.path_of(name)).map_err(|e| storage_err("remove", name, e))
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).exists()
    }

    fn size(&self, name: &str) -> Result<u64, LoggerError> {
        fs::metadata(self.path_of(name))
            .map(|m| m.len())
            .map_err(|e| storage_err("stat", name, e))
    }

    fn read_to_string(&self, name: &str) -> Result<String, LoggerError> {
        fs::read_to_string(self.path_of(name)).map_err(|e| storage_err("read", name, e))
    }

    fn write_string(&self, name: &str, contents: &str) -> Result<(), LoggerError> {
        fs::write(self.path_of(name), contents).map_err(|e| storage_err("write", name, e))
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
