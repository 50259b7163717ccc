//! Scene Model
//!
//! Typed entities for diagram scenes with explicit cross-entity references.
//!
//! # Core Concepts
//!
//! - [`Entity`]: selectable object with fields, position, references, groups
//! - [`Reference`]: named slot pointing at another entity by [`EntityId`]
//! - [`IdMap`]: original → fresh id table scoped to one duplication
//! - [`collection`]: integrity checks over whole entity sets
//!
//! # Example
//!
//! ```rust
//! use scene_model::{Entity, EntityId};
//!
//! let arrow = Entity::new("a1", "arrow")
//!     .with_position(10.0, 10.0)
//!     .with_field("strokeColor", "#1e1e1e")
//!     .with_link("end", "box");
//!
//! assert!(arrow.references_id(&EntityId::new("box")));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod entity;
mod id;

pub mod collection;

pub use entity::{Entity, FieldMap, FieldValue, Offset, Point, Reference, ReferenceKind};
pub use id::{EntityId, GroupId, IdMap};

/// Errors raised by model validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Blank identifier
    #[error("entity id must not be empty")]
    EmptyId,

    /// Same id used by more than one entity
    #[error("duplicate entity id: {0}")]
    DuplicateId(EntityId),

    /// Reference to an id absent from the collection
    #[error("{from}.{slot} references missing entity {target}")]
    DanglingReference {
        /// Referencing entity
        from: EntityId,
        /// Slot holding the reference
        slot: String,
        /// Missing target
        target: EntityId,
    },
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
