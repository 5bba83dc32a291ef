//! Storage backends for the whisper collection.
//!
//! The collection is one JSON blob in one well-known slot. A backend only
//! needs to read, replace, or remove that blob; [`crate::RecordStore`] does
//! everything else and swaps in a [`MemoryBackend`] when a persistent backend
//! starts failing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A single-slot string store.
pub trait StorageBackend: Send {
    /// Read the current blob, `None` if the slot has never been written.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the blob.
    fn write(&mut self, value: &str) -> Result<()>;

    /// Empty the slot. Removing an already-empty slot is not an error.
    fn remove(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileBackend
// ---------------------------------------------------------------------------

/// Persistent backend keeping the blob in a single file on disk.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Filesystem path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-write never truncates the
        // previous collection.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// Volatile backend holding the blob in process memory. Used directly in
/// tests and as the degraded fallback when a persistent backend fails.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_owned());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}
