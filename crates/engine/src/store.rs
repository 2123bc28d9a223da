//! Save storage backends.
//!
//! A store holds at most one saved game as an opaque string under a fixed
//! key. The session layer decides what goes in; stores only move bytes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::SAVE_KEY;

/// Storage failure.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Encode(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "io_error",
            StoreError::Encode(_) => "encode_error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "save storage is not accessible",
            StoreError::Encode(_) => "game could not be serialized",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "{}: {}", self.message(), e),
            StoreError::Encode(e) => write!(f, "{}: {}", self.message(), e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Encode(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Durable slot for one saved game
pub trait SaveStore {
    /// Stored payload, or `None` if nothing is saved.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored payload.
    fn save(&mut self, data: &str) -> Result<(), StoreError>;

    /// Remove the stored payload. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-process store, used by tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    data: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a payload
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &str) -> Result<(), StoreError> {
        self.data = Some(data.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.data = None;
        Ok(())
    }
}

/// One JSON file in a directory, named after the storage key.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous save intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store `<dir>/blockfall-game-state.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, SAVE_KEY)
    }

    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SaveStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, data: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.temp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "blockfall-store-{}-{}-{}",
            tag,
            std::process::id(),
            n
        ))
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("{\"score\":1}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"score\":1}"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn file_store_uses_save_key_name() {
        let store = FileStore::new("/tmp/somewhere");
        assert_eq!(
            store.path(),
            Path::new("/tmp/somewhere/blockfall-game-state.json")
        );
    }

    #[test]
    fn file_store_roundtrip_and_clear() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir);

        assert_eq!(store.load().unwrap(), None);
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
        assert!(!store.temp_path().exists());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn store_error_codes() {
        let err = StoreError::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.code(), "io_error");
        assert!(err.to_string().contains("boom"));
        assert_eq!(StoreError::Encode("x".into()).code(), "encode_error");
    }
}
