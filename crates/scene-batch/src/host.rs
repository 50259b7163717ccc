//! Host collaborators consumed by the mutator
//!
//! The scene graph, the live selection and id minting belong to the host.
//! These traits are the only surface the mutator touches.

use scene_model::{Entity, EntityId, ModelError};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Collection commit failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Host refused the replacement
    #[error("collection update rejected: {0}")]
    Rejected(String),

    /// Replacement set failed model validation
    #[error("invalid collection: {0}")]
    Invalid(#[from] ModelError),
}

/// Live selection at invocation time
pub trait SelectionProvider {
    /// Selected entities, in selection order
    fn selection(&self) -> Vec<Entity>;

    /// Replace the selection with `ids`
    fn select(&self, ids: &[EntityId]);
}

/// Owning entity collection
pub trait CollectionStore {
    /// Every entity, in z-order
    fn entities(&self) -> Vec<Entity>;

    /// Replace the whole collection
    ///
    /// With `atomic` set, the replacement is one undo step and either fully
    /// visible or not visible at all.
    ///
    /// # Errors
    /// Returns error if the host rejected the replacement; the previous
    /// collection stays in place.
    fn replace_all(&self, entities: Vec<Entity>, atomic: bool) -> Result<(), StoreError>;
}

/// Source of fresh entity ids
pub trait IdGenerator {
    /// Next id; expected (not trusted) to be unique for the process lifetime
    fn next_id(&self) -> EntityId;
}

impl<T: IdGenerator + ?Sized> IdGenerator for &T {
    fn next_id(&self) -> EntityId {
        (**self).next_id()
    }
}

/// Random v4 UUIDs in simple (hyphen-less) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> EntityId {
        EntityId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Monotonic counter ids: `prefix` followed by a number
///
/// Deterministic, for tests and replayable sessions.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Bare numeric ids starting at `start`
    #[inline]
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self::with_prefix("", start)
    }

    /// Prefixed ids starting at `start`
    #[inline]
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(start),
        }
    }

    /// Number the next call will use
    #[inline]
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EntityId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        EntityId::new(format!("{}{n}", self.prefix))
    }
}
