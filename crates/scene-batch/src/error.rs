//! Error types for batch mutation

use crate::host::StoreError;

/// Batch mutation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// Nothing selected to act on
    #[error("selection is empty")]
    EmptySelection,

    /// A structural guarantee could not be upheld (id exhaustion, id clash)
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Collection commit failed
    #[error("commit failed: {0}")]
    Store(#[from] StoreError),
}

impl BatchError {
    /// Check if error leaves the caller free to retry or ignore
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptySelection | Self::Store(_))
    }

    /// Create invariant violation
    #[inline]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(BatchError::EmptySelection.is_recoverable());
        assert!(BatchError::from(StoreError::Rejected("busy".to_string())).is_recoverable());
        assert!(!BatchError::invariant("ids exhausted").is_recoverable());
    }
}
