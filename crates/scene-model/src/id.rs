//! Identifiers for scene entities and groups
//!
//! Provides [`EntityId`], [`GroupId`] and the per-operation [`IdMap`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::ModelError;

/// Unique identifier of an entity within a scene
///
/// Opaque to this crate: hosts mint them, [`IdMap`] tracks them during
/// duplication. Stable for the lifetime of the entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a raw host identifier
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a group an entity belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Wrap a raw group identifier
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Original id → freshly generated id, scoped to one duplication
///
/// Keeps insertion order so callers can zip it against the selection.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap(IndexMap<EntityId, EntityId>);

impl IdMap {
    /// Create an empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original → fresh`, returning any previous mapping
    #[inline]
    pub fn insert(&mut self, original: EntityId, fresh: EntityId) -> Option<EntityId> {
        self.0.insert(original, fresh)
    }

    /// Mapped id for `original`, if it was part of the operation
    #[inline]
    #[must_use]
    pub fn get(&self, original: &EntityId) -> Option<&EntityId> {
        self.0.get(original)
    }

    /// Whether `original` was part of the operation
    #[inline]
    #[must_use]
    pub fn contains(&self, original: &EntityId) -> bool {
        self.0.contains_key(original)
    }

    /// Mapped id if present, otherwise `id` itself
    #[inline]
    #[must_use]
    pub fn resolve<'a>(&'a self, id: &'a EntityId) -> &'a EntityId {
        self.0.get(id).unwrap_or(id)
    }

    /// Number of mappings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no mappings were recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(original, fresh)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &EntityId)> {
        self.0.iter()
    }
}
