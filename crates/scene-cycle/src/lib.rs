//! Scene Cycle
//!
//! Persisted cyclic cursors: step forward or backward through a fixed,
//! labeled sequence and remember the position across invocations.
//!
//! # Core Concepts
//!
//! - [`CycleSequence`]: ordered, non-empty `(value, label)` entries
//! - [`CycleState`]: cursor bound to a [`SettingsStore`] key
//! - [`Direction`]: forward/backward with wraparound
//! - [`SettingsStore`]: host settings surface ([`MemorySettings`], [`JsonFileSettings`])
//!
//! # Example
//!
//! ```rust
//! use scene_cycle::{CycleSequence, CycleState, Direction, MemorySettings};
//!
//! let settings = MemorySettings::new();
//! let palette = CycleSequence::from_pairs([("#1e1e1e", "Black"), ("#1971c2", "Blue")])?;
//! let mut cursor = CycleState::initialize("Current Color Index", palette, &settings)?;
//!
//! assert_eq!(cursor.advance(Direction::Forward)?.label, "Blue");
//! assert_eq!(cursor.advance(Direction::Forward)?.label, "Black");
//! # Ok::<(), scene_cycle::CycleError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod error;
mod sequence;
mod settings;
mod state;

pub use error::{CycleError, SettingsError};
pub use sequence::{CycleEntry, CycleSequence, Direction};
pub use settings::{JsonFileSettings, MemorySettings, SettingsStore};
pub use state::{stored_index, CursorRecord, CycleState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
