//! Settings persistence
//!
//! [`SettingsStore`] is the narrow key/value surface a host exposes for
//! per-script settings. Two stores ship here: [`MemorySettings`] and the
//! file-backed [`JsonFileSettings`].

use crate::error::SettingsError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key/value settings persisted by the host
///
/// Writes are all-or-nothing: on `Err` the previous value stays visible.
pub trait SettingsStore {
    /// Read the value stored under `key`
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    /// Store `value` under `key`
    ///
    /// # Errors
    /// Returns error if the value was not persisted
    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        (**self).write(key, value)
    }
}

/// In-process settings
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: Mutex<Map<String, Value>>,
}

impl MemorySettings {
    /// Create empty settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create settings pre-populated from a JSON object
    #[inline]
    #[must_use]
    pub fn with_values(values: Map<String, Value>) -> Self {
        Self {
            inner: Mutex::new(values),
        }
    }

    /// Copy of every stored value
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.inner.lock().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.inner.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings stored as one JSON object in a file
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// failed write never leaves a truncated document behind.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettings {
    /// Settings backed by `path`; the file is created on first write
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject),
        }
    }

    fn store(&self, map: &Map<String, Value>) -> Result<(), SettingsError> {
        let body = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }
}

impl SettingsStore for JsonFileSettings {
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load()?;
        map.insert(key.to_string(), value);
        self.store(&map)?;
        tracing::debug!(path = %self.path.display(), key, "settings written");
        Ok(())
    }
}
