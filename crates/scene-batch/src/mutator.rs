//! Batch mutator
//!
//! Two shapes of change over a selection:
//! - field updates that keep identity ([`BatchMutator::transform_in_place`])
//! - duplication with fresh ids and remapped references
//!   ([`BatchMutator::duplicate`])
//!
//! Both produce new entity values; the originals are never touched. The
//! results reach the collection only through [`BatchMutator::commit`] or
//! [`BatchMutator::commit_updates`], each a single atomic replacement.

use crate::error::BatchError;
use crate::host::{CollectionStore, IdGenerator};
use scene_model::{collection, Entity, EntityId, FieldMap, IdMap, Offset, ReferenceKind};
use std::collections::{HashMap, HashSet};

/// Field name → new value, applied to every selected entity
pub type FieldUpdates = FieldMap;

/// Default number of regenerations after an id collision
pub const DEFAULT_MAX_ID_RETRIES: u32 = 8;

/// Mutator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutatorConfig {
    /// Regenerations allowed after a colliding id before giving up
    pub max_id_retries: u32,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            max_id_retries: DEFAULT_MAX_ID_RETRIES,
        }
    }
}

/// Result of [`BatchMutator::duplicate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Duplication {
    /// Clones, in selection order
    pub entities: Vec<Entity>,
    /// Original id → clone id
    pub id_map: IdMap,
}

impl Duplication {
    /// Ids of the clones, in selection order
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }

    /// Number of clones
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing was cloned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// What a commit changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitReceipt {
    /// Entities appended
    pub added: usize,
    /// Entities replaced in place
    pub replaced: usize,
    /// Collection size after the commit
    pub total: usize,
}

/// Applies transforms to selections and commits the results
#[derive(Debug)]
pub struct BatchMutator<'g, G: IdGenerator + ?Sized> {
    ids: &'g G,
    config: MutatorConfig,
}

impl<'g, G: IdGenerator + ?Sized> BatchMutator<'g, G> {
    /// Create mutator with default configuration
    #[inline]
    #[must_use]
    pub fn new(ids: &'g G) -> Self {
        Self::with_config(ids, MutatorConfig::default())
    }

    /// Create mutator with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(ids: &'g G, config: MutatorConfig) -> Self {
        Self { ids, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MutatorConfig {
        &self.config
    }

    /// Run `transform` over each selected entity's fields
    ///
    /// Ids, references, groups and position are carried over unchanged.
    ///
    /// # Errors
    /// Returns [`BatchError::EmptySelection`] if `selection` is empty
    pub fn apply<F>(&self, selection: &[Entity], mut transform: F) -> Result<Vec<Entity>, BatchError>
    where
        F: FnMut(&mut FieldMap),
    {
        if selection.is_empty() {
            return Err(BatchError::EmptySelection);
        }
        Ok(selection
            .iter()
            .map(|entity| {
                let mut updated = entity.clone();
                transform(&mut updated.fields);
                updated
            })
            .collect())
    }

    /// Set every field in `updates` on each selected entity
    ///
    /// # Errors
    /// Returns [`BatchError::EmptySelection`] if `selection` is empty
    pub fn transform_in_place(
        &self,
        selection: &[Entity],
        updates: &FieldUpdates,
    ) -> Result<Vec<Entity>, BatchError> {
        self.apply(selection, |fields| {
            for (name, value) in updates {
                fields.insert(name.clone(), value.clone());
            }
        })
    }

    /// Clone the selection with fresh ids and consistent references
    ///
    /// Per entity: copy, assign a fresh id, clear groups, shift by
    /// `offset`, drop bindings to entities outside the selection. A second
    /// pass points references at selected entities to their clones; links
    /// to unselected entities keep pointing at the originals. `existing`
    /// is the full collection, used to keep fresh ids unique.
    ///
    /// Repeated ids in `selection` are cloned once.
    ///
    /// # Errors
    /// - [`BatchError::EmptySelection`] if `selection` is empty
    /// - [`BatchError::InvariantViolation`] if no unique id could be minted
    pub fn duplicate(
        &self,
        selection: &[Entity],
        existing: &[Entity],
        offset: Offset,
    ) -> Result<Duplication, BatchError> {
        if selection.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        let selected: HashSet<&EntityId> = selection.iter().map(|e| &e.id).collect();
        let present: HashSet<&EntityId> =
            existing.iter().chain(selection).map(|e| &e.id).collect();
        // Missing reference targets are reserved too, so a clone never
        // takes over an id something else still points at.
        let mut taken: HashSet<EntityId> = existing
            .iter()
            .chain(selection)
            .flat_map(|e| std::iter::once(&e.id).chain(e.reference_targets()))
            .cloned()
            .collect();

        let mut id_map = IdMap::new();
        let mut clones = Vec::with_capacity(selected.len());

        for original in selection {
            if id_map.contains(&original.id) {
                tracing::debug!(id = %original.id, "entity selected twice, cloning once");
                continue;
            }

            let mut clone = original.clone();
            let fresh = self.fresh_id(&taken)?;
            taken.insert(fresh.clone());
            id_map.insert(original.id.clone(), fresh.clone());
            clone.id = fresh;

            clone.groups.clear();
            clone.position = clone.position.map(|p| p.translate(offset));
            clone
                .references
                .retain(|r| r.kind != ReferenceKind::Binding || selected.contains(&r.target));

            clones.push(clone);
        }

        for clone in &mut clones {
            let clone_id = clone.id.clone();
            clone.references.retain_mut(|r| {
                if !present.contains(&r.target) {
                    tracing::warn!(
                        entity = %clone_id,
                        slot = %r.slot,
                        target = %r.target,
                        "dropping reference to missing entity"
                    );
                    return false;
                }
                let target = id_map.resolve(&r.target).clone();
                r.target = target;
                true
            });
        }

        tracing::debug!(count = clones.len(), "duplicated selection");
        Ok(Duplication {
            entities: clones,
            id_map,
        })
    }

    /// Append `new_entities` to the collection as one atomic step
    ///
    /// # Errors
    /// - [`BatchError::EmptySelection`] if `new_entities` is empty
    /// - [`BatchError::InvariantViolation`] if an id would repeat
    /// - [`BatchError::Store`] if the host rejected the replacement
    pub fn commit<C: CollectionStore + ?Sized>(
        &self,
        store: &C,
        new_entities: Vec<Entity>,
    ) -> Result<CommitReceipt, BatchError> {
        if new_entities.is_empty() {
            return Err(BatchError::EmptySelection);
        }
        let added = new_entities.len();
        let mut all = store.entities();
        all.extend(new_entities);
        collection::ensure_unique_ids(&all).map_err(|e| BatchError::invariant(e.to_string()))?;

        let total = all.len();
        store.replace_all(all, true)?;
        Ok(CommitReceipt {
            added,
            replaced: 0,
            total,
        })
    }

    /// Swap each updated entity into the collection by id, as one atomic step
    ///
    /// # Errors
    /// - [`BatchError::EmptySelection`] if `updated` is empty
    /// - [`BatchError::InvariantViolation`] if an updated id is not in the
    ///   collection
    /// - [`BatchError::Store`] if the host rejected the replacement
    pub fn commit_updates<C: CollectionStore + ?Sized>(
        &self,
        store: &C,
        updated: Vec<Entity>,
    ) -> Result<CommitReceipt, BatchError> {
        if updated.is_empty() {
            return Err(BatchError::EmptySelection);
        }
        let mut pending: HashMap<EntityId, Entity> =
            updated.into_iter().map(|e| (e.id.clone(), e)).collect();

        let mut all = store.entities();
        let mut replaced = 0;
        for slot in &mut all {
            if let Some(entity) = pending.remove(&slot.id) {
                *slot = entity;
                replaced += 1;
            }
        }
        if let Some(missing) = pending.keys().next() {
            return Err(BatchError::invariant(format!(
                "updated entity {missing} is not in the collection"
            )));
        }

        let total = all.len();
        store.replace_all(all, true)?;
        Ok(CommitReceipt {
            added: 0,
            replaced,
            total,
        })
    }

    /// Mint an id absent from `taken`, regenerating on collision
    fn fresh_id(&self, taken: &HashSet<EntityId>) -> Result<EntityId, BatchError> {
        for attempt in 0..=self.config.max_id_retries {
            let candidate = self.ids.next_id();
            if !candidate.as_str().is_empty() && !taken.contains(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(attempt, id = %candidate, "generated id collides, regenerating");
        }
        Err(BatchError::invariant(format!(
            "no unique id after {} attempts",
            u64::from(self.config.max_id_retries) + 1
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SequentialIdGenerator;
    use pretty_assertions::assert_eq;
    use scene_model::{FieldValue, Point};

    /// Always hands out the same id
    struct StuckIds;

    impl IdGenerator for StuckIds {
        fn next_id(&self) -> EntityId {
            EntityId::new("1")
        }
    }

    fn no_offset() -> Offset {
        Offset::default()
    }

    #[test]
    fn transform_in_place_sets_fields_only() {
        let ids = SequentialIdGenerator::starting_at(100);
        let mutator = BatchMutator::new(&ids);
        let selection = vec![
            Entity::new("1", "rectangle")
                .with_field("strokeColor", "#1e1e1e")
                .with_link("end", "2")
                .with_group("g"),
        ];
        let mut updates = FieldUpdates::new();
        updates.insert("strokeColor".to_string(), FieldValue::from("#1971c2"));

        let updated = mutator.transform_in_place(&selection, &updates).unwrap();

        assert_eq!(updated[0].id, selection[0].id);
        assert_eq!(updated[0].references, selection[0].references);
        assert_eq!(updated[0].groups, selection[0].groups);
        assert_eq!(updated[0].field("strokeColor"), Some(&FieldValue::from("#1971c2")));
        assert_eq!(selection[0].field("strokeColor"), Some(&FieldValue::from("#1e1e1e")));
        assert_eq!(ids.peek(), 100);
    }

    #[test]
    fn transform_in_place_empty_selection() {
        let ids = SequentialIdGenerator::default();
        let mutator = BatchMutator::new(&ids);
        let result = mutator.transform_in_place(&[], &FieldUpdates::new());
        assert_eq!(result, Err(BatchError::EmptySelection));
    }

    #[test]
    fn duplicate_remaps_internal_references() {
        let ids = SequentialIdGenerator::starting_at(3);
        let mutator = BatchMutator::new(&ids);
        let a = Entity::new("1", "arrow").with_link("end", "2");
        let b = Entity::new("2", "rectangle");
        let existing = vec![a.clone(), b.clone()];

        let dup = mutator.duplicate(&[a, b], &existing, no_offset()).unwrap();

        assert_eq!(dup.ids(), vec![EntityId::new("3"), EntityId::new("4")]);
        assert_eq!(dup.entities[0].references[0].target, EntityId::new("4"));
        assert_eq!(dup.id_map.get(&EntityId::new("1")), Some(&EntityId::new("3")));
    }

    #[test]
    fn duplicate_keeps_links_to_unselected() {
        let ids = SequentialIdGenerator::starting_at(3);
        let mutator = BatchMutator::new(&ids);
        let a = Entity::new("1", "arrow").with_link("end", "2");
        let existing = vec![a.clone(), Entity::new("2", "rectangle")];

        let dup = mutator.duplicate(&[a], &existing, no_offset()).unwrap();

        assert_eq!(dup.entities[0].id, EntityId::new("3"));
        assert_eq!(dup.entities[0].references[0].target, EntityId::new("2"));
    }

    #[test]
    fn duplicate_drops_bindings_to_unselected() {
        let ids = SequentialIdGenerator::starting_at(10);
        let mutator = BatchMutator::new(&ids);
        let container = Entity::new("box", "rectangle")
            .with_binding("boundText", "label")
            .with_binding("boundArrow", "arrow");
        let arrow = Entity::new("arrow", "arrow").with_binding("container", "box");
        let existing = vec![container.clone(), arrow.clone(), Entity::new("label", "text")];

        let dup = mutator.duplicate(&[container, arrow], &existing, no_offset()).unwrap();

        let box_clone = &dup.entities[0];
        assert_eq!(box_clone.references.len(), 1);
        assert_eq!(box_clone.references[0].slot, "boundArrow");
        assert_eq!(box_clone.references[0].target, EntityId::new("11"));
        assert_eq!(dup.entities[1].references[0].target, EntityId::new("10"));
    }

    #[test]
    fn duplicate_clears_groups_and_offsets() {
        let ids = SequentialIdGenerator::starting_at(5);
        let mutator = BatchMutator::new(&ids);
        let shape = Entity::new("1", "ellipse").with_position(10.0, 10.0).with_group("g1");
        let line = Entity::new("2", "freedraw");

        let dup = mutator
            .duplicate(&[shape.clone(), line], &[], Offset::new(20.0, 20.0))
            .unwrap();

        assert!(dup.entities[0].groups.is_empty());
        assert_eq!(dup.entities[0].position, Some(Point::new(30.0, 30.0)));
        assert_eq!(dup.entities[1].position, None);
        assert_eq!(shape.groups.len(), 1);
    }

    #[test]
    fn duplicate_skips_colliding_ids() {
        let ids = SequentialIdGenerator::starting_at(1);
        let mutator = BatchMutator::new(&ids);
        let existing = vec![Entity::new("1", "rectangle"), Entity::new("2", "rectangle")];

        let dup = mutator.duplicate(&existing[..1], &existing, no_offset()).unwrap();

        assert_eq!(dup.entities[0].id, EntityId::new("3"));
    }

    #[test]
    fn duplicate_gives_up_after_bounded_retries() {
        let mutator = BatchMutator::with_config(&StuckIds, MutatorConfig { max_id_retries: 2 });
        let existing = vec![Entity::new("1", "rectangle")];

        let result = mutator.duplicate(&existing, &existing, no_offset());
        assert!(matches!(result, Err(BatchError::InvariantViolation(msg)) if msg.contains("3 attempts")));
    }

    #[test]
    fn duplicate_repeated_selection_clones_once() {
        let ids = SequentialIdGenerator::starting_at(7);
        let mutator = BatchMutator::new(&ids);
        let a = Entity::new("1", "rectangle");

        let dup = mutator.duplicate(&[a.clone(), a], &[], no_offset()).unwrap();
        assert_eq!(dup.len(), 1);
    }

    #[test]
    fn duplicate_drops_dangling_links() {
        let ids = SequentialIdGenerator::starting_at(7);
        let mutator = BatchMutator::new(&ids);
        let arrow = Entity::new("1", "arrow").with_link("end", "ghost");

        let dup = mutator.duplicate(&[arrow.clone()], &[arrow], no_offset()).unwrap();
        assert!(dup.entities[0].references.is_empty());
    }

    #[test]
    fn duplicate_never_reuses_a_dangling_target() {
        let ids = SequentialIdGenerator::starting_at(2);
        let mutator = BatchMutator::new(&ids);
        let arrow = Entity::new("1", "arrow").with_link("end", "2");

        let dup = mutator.duplicate(&[arrow.clone()], &[arrow], no_offset()).unwrap();

        assert_eq!(dup.entities[0].id, EntityId::new("3"));
        assert!(dup.entities[0].references.is_empty());
    }

    #[test]
    fn duplicate_empty_selection() {
        let ids = SequentialIdGenerator::default();
        let mutator = BatchMutator::new(&ids);
        assert_eq!(
            mutator.duplicate(&[], &[], no_offset()),
            Err(BatchError::EmptySelection)
        );
    }
}
