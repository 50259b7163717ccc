//! Scene Batch
//!
//! Batch mutation over selected scene entities with referential integrity.
//!
//! # Core Concepts
//!
//! - [`BatchMutator`]: field updates and id-remapping duplication
//! - [`Duplication`]: clones plus the [`IdMap`](scene_model::IdMap) used to build them
//! - [`SelectionProvider`], [`CollectionStore`], [`IdGenerator`]: host surface
//!
//! # Example
//!
//! ```rust
//! use scene_batch::{BatchMutator, SequentialIdGenerator};
//! use scene_model::{Entity, EntityId, Offset};
//!
//! let ids = SequentialIdGenerator::starting_at(3);
//! let mutator = BatchMutator::new(&ids);
//!
//! let a = Entity::new("1", "arrow").with_link("end", "2");
//! let b = Entity::new("2", "rectangle");
//! let dup = mutator.duplicate(&[a.clone(), b.clone()], &[a, b], Offset::new(20.0, 20.0))?;
//!
//! assert_eq!(dup.entities[0].references[0].target, EntityId::new("4"));
//! # Ok::<(), scene_batch::BatchError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod error;
mod host;
mod mutator;

pub use error::BatchError;
pub use host::{
    CollectionStore, IdGenerator, SelectionProvider, SequentialIdGenerator, StoreError,
    UuidIdGenerator,
};
pub use mutator::{
    BatchMutator, CommitReceipt, Duplication, FieldUpdates, MutatorConfig,
    DEFAULT_MAX_ID_RETRIES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
