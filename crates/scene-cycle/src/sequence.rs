//! Labeled value sequences and cursor stepping
//!
//! [`CycleSequence`] is non-empty by construction, so
//! [`CycleSequence::step_from`] always lands on a valid index.

use crate::error::CycleError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Direction of a cursor step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Next entry, wrapping to the first
    Forward,
    /// Previous entry, wrapping to the last
    Backward,
}

impl Direction {
    /// Opposite direction
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

impl FromStr for Direction {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" | "next" => Ok(Self::Forward),
            "backward" | "back" | "prev" | "previous" => Ok(Self::Backward),
            other => Err(CycleError::UnknownDirection(other.to_string())),
        }
    }
}

/// One value in a cycle together with its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEntry<V> {
    /// Value applied when this entry is selected
    pub value: V,
    /// Human-readable name shown in notices
    pub label: String,
}

impl<V> CycleEntry<V> {
    /// Create an entry
    #[inline]
    #[must_use]
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Ordered, non-empty sequence of labeled values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSequence<V> {
    entries: Vec<CycleEntry<V>>,
}

impl<V> CycleSequence<V> {
    /// Build a sequence from entries
    ///
    /// # Errors
    /// Returns [`CycleError::Configuration`] if `entries` is empty
    pub fn new(entries: Vec<CycleEntry<V>>) -> Result<Self, CycleError> {
        if entries.is_empty() {
            return Err(CycleError::Configuration(
                "cycle sequence must contain at least one entry".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    /// Build a sequence from `(value, label)` pairs
    ///
    /// # Errors
    /// Returns [`CycleError::Configuration`] if no pairs are given
    pub fn from_pairs<L: Into<String>>(
        pairs: impl IntoIterator<Item = (V, L)>,
    ) -> Result<Self, CycleError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(value, label)| CycleEntry::new(value, label))
                .collect(),
        )
    }

    /// Number of entries (always ≥ 1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; present for API symmetry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if in range
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CycleEntry<V>> {
        self.entries.get(index)
    }

    /// All entries in order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[CycleEntry<V>] {
        &self.entries
    }

    /// Index one step away from `index`
    ///
    /// Wraps in both directions: backward from 0 lands on the last entry.
    #[inline]
    #[must_use]
    pub fn step_from(&self, index: usize, direction: Direction) -> usize {
        let len = self.entries.len();
        let index = index % len;
        match direction {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        }
    }

    /// Entry at an index already known to be in range
    pub(crate) fn entry(&self, index: usize) -> &CycleEntry<V> {
        &self.entries[index % self.entries.len()]
    }
}
