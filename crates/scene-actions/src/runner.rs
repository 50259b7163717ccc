//! Action runner
//!
//! The entry point for user-triggered actions:
//! - checks the host version
//! - runs one action under the single-writer gate
//! - reports the outcome (or the error) through the host's notifier

use crate::config::ActionsConfig;
use crate::error::ActionError;
use crate::host::Host;
use parking_lot::Mutex;
use scene_batch::{BatchMutator, FieldUpdates};
use scene_cycle::{CycleSequence, CycleState, Direction};
use scene_model::{EntityId, FieldValue, IdMap};

/// Notice shown when there is nothing to recolor
pub const NOTHING_TO_RECOLOR: &str =
    "No elements selected. Switch to the drawing tool to change its color.";

/// Result of a color cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Selected entities were recolored
    Selection {
        /// Entities changed
        count: usize,
        /// New value
        value: String,
        /// Label of the new value
        label: String,
    },
    /// Nothing selected; the drawing tool's default was changed
    Tool {
        /// New value
        value: String,
        /// Label of the new value
        label: String,
    },
    /// Nothing selected and the drawing tool is not active; cursor untouched
    Skipped,
}

impl CycleOutcome {
    /// Notice text for this outcome
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Selection { count, label, .. } => format!("{count} element(s) changed to {label}"),
            Self::Tool { label, .. } => format!("Drawing color changed to {label}"),
            Self::Skipped => NOTHING_TO_RECOLOR.to_string(),
        }
    }
}

/// Result of a duplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOutcome {
    /// Ids of the committed clones, now selected
    pub ids: Vec<EntityId>,
    /// Original id → clone id
    pub id_map: IdMap,
}

impl DuplicateOutcome {
    /// Notice text for this outcome
    #[must_use]
    pub fn message(&self) -> String {
        format!("Duplicated {} element(s)", self.ids.len())
    }
}

/// Runs actions against a host
#[derive(Debug)]
pub struct ActionRunner<H: Host> {
    config: ActionsConfig,
    palette: CycleSequence<String>,
    host: H,
    writer: Mutex<()>,
}

impl<H: Host> ActionRunner<H> {
    /// Create runner
    ///
    /// # Errors
    /// Returns [`ActionError::Configuration`] if `config` is invalid
    pub fn new(config: ActionsConfig, host: H) -> Result<Self, ActionError> {
        config.validate()?;
        let palette = config.palette_sequence()?;
        Ok(Self {
            config,
            palette,
            host,
            writer: Mutex::new(()),
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ActionsConfig {
        &self.config
    }

    /// Host
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Release the host
    #[inline]
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Step the stroke palette and apply the new color
    ///
    /// Recolors the selection, or with nothing selected sets the drawing
    /// tool's default color. With nothing selected and another tool active
    /// the cursor is left alone and [`CycleOutcome::Skipped`] is returned.
    ///
    /// # Errors
    /// Any [`ActionError`]; the host has already been notified
    pub fn cycle_color(&self, direction: Direction) -> Result<CycleOutcome, ActionError> {
        let _writer = self.writer.lock();
        let result = self.run_cycle(direction);
        self.report(result, CycleOutcome::message)
    }

    /// Duplicate the selection, commit the clones and select them
    ///
    /// # Errors
    /// Any [`ActionError`]; the host has already been notified
    pub fn duplicate_selection(&self) -> Result<DuplicateOutcome, ActionError> {
        let _writer = self.writer.lock();
        let result = self.run_duplicate();
        self.report(result, DuplicateOutcome::message)
    }

    fn run_cycle(&self, direction: Direction) -> Result<CycleOutcome, ActionError> {
        self.check_host()?;

        let mut cursor =
            CycleState::initialize(self.config.cycle_key.as_str(), self.palette.clone(), &self.host)?;
        let selection = self.host.selection();

        if selection.is_empty() && !self.drawing_tool_active() {
            tracing::debug!(tool = ?self.host.active_tool(), "nothing to recolor");
            return Ok(CycleOutcome::Skipped);
        }

        let entry = cursor.advance(direction)?.clone();
        let field_value = FieldValue::Text(entry.value.clone());

        let applied = if selection.is_empty() {
            self.host
                .set_default_field(&self.config.stroke_field, field_value)
                .map(|()| CycleOutcome::Tool {
                    value: entry.value.clone(),
                    label: entry.label.clone(),
                })
                .map_err(ActionError::from)
        } else {
            let mutator = BatchMutator::with_config(&self.host, self.config.mutator_config());
            let mut updates = FieldUpdates::new();
            updates.insert(self.config.stroke_field.clone(), field_value);

            mutator
                .transform_in_place(&selection, &updates)
                .and_then(|updated| mutator.commit_updates(&self.host, updated))
                .map(|receipt| CycleOutcome::Selection {
                    count: receipt.replaced,
                    value: entry.value.clone(),
                    label: entry.label.clone(),
                })
                .map_err(ActionError::from)
        };

        if applied.is_err() {
            if let Err(e) = cursor.advance(direction.reverse()) {
                tracing::warn!(error = %e, "could not step cursor back after failed update");
            }
        }
        applied
    }

    fn run_duplicate(&self) -> Result<DuplicateOutcome, ActionError> {
        self.check_host()?;

        let selection = self.host.selection();
        if selection.is_empty() {
            return Err(ActionError::EmptySelection);
        }

        let mutator = BatchMutator::with_config(&self.host, self.config.mutator_config());
        let existing = self.host.entities();
        let duplication =
            mutator.duplicate(&selection, &existing, self.config.duplicate_offset)?;

        for (original, clone) in duplication.id_map.iter() {
            tracing::debug!(%original, %clone, "cloned");
        }
        let ids = duplication.ids();
        let receipt = mutator.commit(&self.host, duplication.entities)?;
        self.host.select(&ids);
        tracing::debug!(added = receipt.added, total = receipt.total, "duplicates committed");

        Ok(DuplicateOutcome {
            ids,
            id_map: duplication.id_map,
        })
    }

    fn check_host(&self) -> Result<(), ActionError> {
        let found = self.host.host_version();
        if found < self.config.min_host_version {
            return Err(ActionError::UnsupportedHost {
                required: self.config.min_host_version.clone(),
                found,
            });
        }
        Ok(())
    }

    fn drawing_tool_active(&self) -> bool {
        self.host.active_tool().as_deref() == Some(self.config.drawing_tool.as_str())
    }

    fn report<T>(
        &self,
        result: Result<T, ActionError>,
        message: impl FnOnce(&T) -> String,
    ) -> Result<T, ActionError> {
        match &result {
            Ok(outcome) => {
                let text = message(outcome);
                tracing::info!(notice = %text, "action completed");
                self.host.notify(&text);
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "action failed");
                self.host.notify(&e.notice());
            }
            Err(e) => {
                tracing::warn!(error = %e, "action aborted");
                self.host.notify(&e.notice());
            }
        }
        result
    }
}
