//! JSON file-backed preference store.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tempfile::NamedTempFile;

use super::PreferenceStore;
use crate::error::StoreError;

static DEFAULT_PATH: Lazy<Option<PathBuf>> = Lazy::new(|| {
    dirs::config_dir().map(|dir| dir.join("themepref").join("preferences.json"))
});

/// A store that keeps a flat JSON object of strings in one file.
///
/// The file is read on every access and rewritten on every change, so
/// several processes sharing it see each other's writes. A missing file is
/// an empty store; the parent directory is created on first write.
///
/// # Example
///
/// ```rust,no_run
/// use themepref::{FileStore, PreferenceStore};
///
/// let store = FileStore::new("/tmp/themepref.json");
/// store.set("theme", "dark").unwrap();
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at [`default_path`](Self::default_path).
    ///
    /// Returns `None` on platforms without a user configuration directory.
    pub fn open_default() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// `<config dir>/themepref/preferences.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        DEFAULT_PATH.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the whole map to a sibling temp file, then renames it over the
    /// store so readers never observe a half-written file.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        staged.write_all(json.as_bytes()).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&self.path)
            .map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
