//! Scene Actions
//!
//! User-triggered actions built on the cycle cursor and the batch mutator.
//!
//! # Core Concepts
//!
//! - [`ActionRunner`]: runs one action at a time against a [`Host`]
//! - [`ActionsConfig`]: palette, settings key, offsets and version gate
//! - [`MemoryHost`]: in-memory [`Host`] with undo history
//! - [`ActionError`]: failures, with user-facing notices
//!
//! # Example
//!
//! ```rust
//! use scene_actions::{ActionRunner, ActionsConfig, CycleOutcome, MemoryHost, SceneDocument};
//! use scene_cycle::Direction;
//! use scene_model::Entity;
//!
//! let doc = SceneDocument::new(vec![Entity::new("a", "rectangle")]).with_selection(["a"]);
//! let runner = ActionRunner::new(ActionsConfig::default(), MemoryHost::new(doc))?;
//!
//! let outcome = runner.cycle_color(Direction::Forward)?;
//! assert!(matches!(outcome, CycleOutcome::Selection { ref label, .. } if label == "Blue"));
//! # Ok::<(), scene_actions::ActionError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod config;
mod error;
mod host;
mod memory;
mod runner;

pub use config::{ActionsConfig, DEFAULT_CYCLE_KEY, DEFAULT_PALETTE};
pub use error::ActionError;
pub use host::{Host, HostInfo, Notifier, ToolState};
pub use memory::{MemoryHost, SceneDocument, DEFAULT_HISTORY_LIMIT};
pub use runner::{ActionRunner, CycleOutcome, DuplicateOutcome, NOTHING_TO_RECOLOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
