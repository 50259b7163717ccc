//! Error types for scene actions
//!
//! Provides error handling for:
//! - Static misconfiguration (palette, keys, versions)
//! - Empty selections
//! - Settings persistence failures
//! - Collection commit failures
//! - Broken structural invariants

use scene_batch::{BatchError, StoreError};
use scene_cycle::{CycleError, SettingsError};
use semver::Version;

/// Main action error type
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Invalid static setup
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Nothing selected
    #[error("selection is empty")]
    EmptySelection,

    /// Cursor could not be read or stored
    #[error("persistence error: {0}")]
    Persistence(#[source] SettingsError),

    /// Structural guarantee broken (id exhaustion, unknown entity)
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Host too old for this action
    #[error("host version {found} is older than required {required}")]
    UnsupportedHost {
        /// Minimum supported version
        required: Version,
        /// Version reported by the host
        found: Version,
    },

    /// Collection or tool update rejected
    #[error("scene update failed: {0}")]
    Store(#[from] StoreError),
}

impl ActionError {
    /// Check if error is fatal (aborts before any mutation, needs a fix)
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvariantViolation(_))
    }

    /// Check if error is recoverable (user can retry after acting)
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// User-facing notice text
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Configuration(msg) => format!("Action is misconfigured: {msg}"),
            Self::EmptySelection => "No elements selected to duplicate".to_string(),
            Self::Persistence(e) => format!("Could not save the color setting: {e}"),
            Self::InvariantViolation(msg) => format!("Action aborted: {msg}"),
            Self::UnsupportedHost { required, .. } => {
                format!("This action requires host version {required} or newer.")
            }
            Self::Store(e) => format!("Scene was not changed: {e}"),
        }
    }
}

impl From<CycleError> for ActionError {
    fn from(value: CycleError) -> Self {
        match value {
            CycleError::Persistence(e) => Self::Persistence(e),
            other @ (CycleError::Configuration(_) | CycleError::UnknownDirection(_)) => {
                Self::Configuration(other.to_string())
            }
        }
    }
}

impl From<BatchError> for ActionError {
    fn from(value: BatchError) -> Self {
        match value {
            BatchError::EmptySelection => Self::EmptySelection,
            BatchError::InvariantViolation(msg) => Self::InvariantViolation(msg),
            BatchError::Store(e) => Self::Store(e),
        }
    }
}

impl From<SettingsError> for ActionError {
    fn from(value: SettingsError) -> Self {
        Self::Persistence(value)
    }
}
