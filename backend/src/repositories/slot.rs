//! Key-value slots holding the serialized state document
//!
//! A slot stores exactly one document under a fixed key. Reads return the
//! raw text so that parsing (and the seed fallback) stays with the store.

use fitpulse_shared::errors::StorageError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A durable single-key slot
pub trait StateSlot: Send + Sync {
    /// Read the stored document, `None` when nothing was ever written
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored document
    fn write(&self, document: &str) -> Result<(), StorageError>;
}

/// Slot backed by a JSON file at `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file first, then renames it over the document
    fn write(&self, document: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(document.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// In-process slot for tests and ephemeral runs
///
/// Clones share the same underlying document.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    document: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `document`
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document.into()))),
        }
    }
}

impl StateSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn write(&self, document: &str) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".to_string()))?;
        *guard = Some(document.to_string());
        Ok(())
    }
}
