//! Whole-collection integrity checks
//!
//! Used before atomic commits and by tests asserting the duplication
//! postconditions.

use crate::entity::{Entity, Reference};
use crate::id::EntityId;
use crate::ModelError;
use std::collections::HashSet;

/// Set of ids present in `entities`
#[must_use]
pub fn id_set(entities: &[Entity]) -> HashSet<&EntityId> {
    entities.iter().map(|e| &e.id).collect()
}

/// Ids that occur more than once, in first-repeat order
#[must_use]
pub fn duplicate_ids(entities: &[Entity]) -> Vec<EntityId> {
    let mut seen = HashSet::with_capacity(entities.len());
    let mut repeated = Vec::new();
    for entity in entities {
        if !seen.insert(&entity.id) && !repeated.contains(&entity.id) {
            repeated.push(entity.id.clone());
        }
    }
    repeated
}

/// References whose target is not in `entities`
#[must_use]
pub fn dangling_references(entities: &[Entity]) -> Vec<(&EntityId, &Reference)> {
    let ids = id_set(entities);
    entities
        .iter()
        .flat_map(|e| e.references.iter().map(move |r| (&e.id, r)))
        .filter(|(_, r)| !ids.contains(&r.target))
        .collect()
}

/// Reject collections with repeated ids
///
/// # Errors
/// Returns [`ModelError::DuplicateId`] for the first repeated id
pub fn ensure_unique_ids(entities: &[Entity]) -> Result<(), ModelError> {
    match duplicate_ids(entities).into_iter().next() {
        Some(id) => Err(ModelError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// Reject collections with repeated ids or unresolved references
///
/// # Errors
/// Returns the first violation found
pub fn validate(entities: &[Entity]) -> Result<(), ModelError> {
    ensure_unique_ids(entities)?;
    if let Some((from, reference)) = dangling_references(entities).into_iter().next() {
        return Err(ModelError::DanglingReference {
            from: from.clone(),
            slot: reference.slot.clone(),
            target: reference.target.clone(),
        });
    }
    Ok(())
}
