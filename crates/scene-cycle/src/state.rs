//! Persisted cycle cursor
//!
//! [`CycleState`] binds a [`CycleSequence`] to a cursor stored in a
//! [`SettingsStore`] under a stable key. The persisted record keeps the
//! host's existing shape: `{ "value": <index> }`.

use crate::error::CycleError;
use crate::sequence::{CycleEntry, CycleSequence, Direction};
use crate::settings::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored cursor record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorRecord {
    /// Persisted index
    pub value: usize,
}

/// Cursor over a fixed sequence, persisted on every move
///
/// # Invariants
/// - `index < sequence.len()`
/// - `index` equals the last successfully persisted record
#[derive(Debug)]
pub struct CycleState<'s, V, S: SettingsStore + ?Sized> {
    key: String,
    sequence: CycleSequence<V>,
    index: usize,
    store: &'s S,
}

impl<'s, V, S: SettingsStore + ?Sized> CycleState<'s, V, S> {
    /// Load the cursor for `key`, creating it at index 0 on first use
    ///
    /// Calling this again for an existing key loads the stored cursor and
    /// writes nothing. A record that no longer fits the sequence (malformed
    /// or out of range) is reset to 0.
    ///
    /// # Errors
    /// - [`CycleError::Configuration`] if `key` is blank
    /// - [`CycleError::Persistence`] if the store cannot be read or written
    pub fn initialize(
        key: impl Into<String>,
        sequence: CycleSequence<V>,
        store: &'s S,
    ) -> Result<Self, CycleError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CycleError::Configuration(
                "cycle key must not be empty".to_string(),
            ));
        }

        let stored = store.read(&key)?;
        let index = match stored.map(serde_json::from_value::<CursorRecord>) {
            Some(Ok(record)) if record.value < sequence.len() => record.value,
            Some(Ok(record)) => {
                tracing::warn!(
                    key = %key,
                    stored = record.value,
                    len = sequence.len(),
                    "stored cursor out of range, resetting"
                );
                Self::persist_to(store, &key, 0)?;
                0
            }
            Some(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "malformed cursor record, resetting");
                Self::persist_to(store, &key, 0)?;
                0
            }
            None => {
                tracing::debug!(key = %key, "creating cursor");
                Self::persist_to(store, &key, 0)?;
                0
            }
        };

        Ok(Self {
            key,
            sequence,
            index,
            store,
        })
    }

    /// Move one step and persist, returning the newly selected entry
    ///
    /// # Errors
    /// Returns [`CycleError::Persistence`] if the new index was not stored;
    /// the in-memory cursor is left where it was.
    pub fn advance(&mut self, direction: Direction) -> Result<&CycleEntry<V>, CycleError> {
        let next = self.sequence.step_from(self.index, direction);
        Self::persist_to(self.store, &self.key, next)?;
        tracing::debug!(key = %self.key, from = self.index, to = next, %direction, "cursor advanced");
        self.index = next;
        Ok(self.sequence.entry(next))
    }

    /// Entry `advance(direction)` would select, without moving
    #[inline]
    #[must_use]
    pub fn peek(&self, direction: Direction) -> &CycleEntry<V> {
        self.sequence
            .entry(self.sequence.step_from(self.index, direction))
    }

    /// Currently selected entry
    #[inline]
    #[must_use]
    pub fn current(&self) -> &CycleEntry<V> {
        self.sequence.entry(self.index)
    }

    /// Current cursor position
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Settings key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying sequence
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &CycleSequence<V> {
        &self.sequence
    }

    fn persist_to(store: &S, key: &str, index: usize) -> Result<(), CycleError> {
        let record = serde_json::to_value(CursorRecord { value: index })
            .map_err(crate::error::SettingsError::from)?;
        store.write(key, record)?;
        Ok(())
    }
}

/// Read a stored cursor without building a [`CycleState`]
///
/// # Errors
/// Returns error if the store cannot be read
pub fn stored_index<S: SettingsStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<usize>, CycleError> {
    Ok(store
        .read(key)?
        .and_then(|v: Value| serde_json::from_value::<CursorRecord>(v).ok())
        .map(|r| r.value))
}
