//! Error types for cycle state and settings persistence

use std::path::PathBuf;

/// Settings store failures
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing the backing file failed
    #[error("settings I/O failed for {}: {source}", path.display())]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored document is not valid JSON
    #[error("settings are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored document is JSON but not an object
    #[error("settings root must be a JSON object")]
    NotAnObject,

    /// Host refused the operation
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

/// Cycle state failures
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// Invalid static setup (empty sequence, blank key)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Cursor could not be read or persisted
    #[error("persistence error: {0}")]
    Persistence(#[from] SettingsError),

    /// Unparseable direction name
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
}

impl CycleError {
    /// Check if error is fatal (static misconfiguration)
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::UnknownDirection(_))
    }
}
