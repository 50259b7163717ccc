//! Action configuration
//!
//! Every knob has a default matching the stock scripts, so an empty TOML
//! document is a valid configuration.

use crate::error::ActionError;
use scene_batch::MutatorConfig;
use scene_cycle::{CycleEntry, CycleSequence};
use scene_model::Offset;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stock stroke palette: `(value, label)`
pub const DEFAULT_PALETTE: [(&str, &str); 4] = [
    ("#1e1e1e", "Black"),
    ("#1971c2", "Blue"),
    ("#2f9e44", "Green"),
    ("#f08c00", "Orange"),
];

/// Settings key the palette cursor is stored under
pub const DEFAULT_CYCLE_KEY: &str = "Current Color Index";

/// Action configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionsConfig {
    /// Values cycled through, in order
    pub palette: Vec<CycleEntry<String>>,
    /// Settings key for the palette cursor
    pub cycle_key: String,
    /// Entity field the palette value is written to
    pub stroke_field: String,
    /// Tool whose default color is updated when nothing is selected
    pub drawing_tool: String,
    /// Displacement of duplicates relative to their originals
    pub duplicate_offset: Offset,
    /// Id regenerations allowed after a collision
    pub max_id_retries: u32,
    /// Oldest host version the actions run against
    pub min_host_version: Version,
}

impl ActionsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With palette
    #[must_use]
    pub fn with_palette<V, L>(mut self, entries: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        self.palette = entries
            .into_iter()
            .map(|(value, label)| CycleEntry::new(value.into(), label))
            .collect();
        self
    }

    /// With settings key
    #[inline]
    #[must_use]
    pub fn with_cycle_key(mut self, key: impl Into<String>) -> Self {
        self.cycle_key = key.into();
        self
    }

    /// With target field
    #[inline]
    #[must_use]
    pub fn with_stroke_field(mut self, field: impl Into<String>) -> Self {
        self.stroke_field = field.into();
        self
    }

    /// With drawing tool name
    #[inline]
    #[must_use]
    pub fn with_drawing_tool(mut self, tool: impl Into<String>) -> Self {
        self.drawing_tool = tool.into();
        self
    }

    /// With duplicate offset
    #[inline]
    #[must_use]
    pub fn with_duplicate_offset(mut self, dx: f64, dy: f64) -> Self {
        self.duplicate_offset = Offset::new(dx, dy);
        self
    }

    /// With id retry bound
    #[inline]
    #[must_use]
    pub fn with_max_id_retries(mut self, retries: u32) -> Self {
        self.max_id_retries = retries;
        self
    }

    /// With minimum host version
    #[inline]
    #[must_use]
    pub fn with_min_host_version(mut self, version: Version) -> Self {
        self.min_host_version = version;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// Returns [`ActionError::Configuration`] on syntax errors, unknown keys
    /// or values that fail [`validate`](Self::validate)
    pub fn from_toml_str(raw: &str) -> Result<Self, ActionError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ActionError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ActionError::Configuration`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ActionError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ActionError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading action configuration");
        Self::from_toml_str(&raw)
    }

    /// Check static constraints
    ///
    /// # Errors
    /// Returns [`ActionError::Configuration`] for an empty palette, blank
    /// key/field/tool names, or a zero retry bound
    pub fn validate(&self) -> Result<(), ActionError> {
        if self.palette.is_empty() {
            return Err(ActionError::Configuration(
                "palette must contain at least one entry".to_string(),
            ));
        }
        for (name, value) in [
            ("cycle_key", &self.cycle_key),
            ("stroke_field", &self.stroke_field),
            ("drawing_tool", &self.drawing_tool),
        ] {
            if value.trim().is_empty() {
                return Err(ActionError::Configuration(format!("{name} must not be empty")));
            }
        }
        if self.max_id_retries == 0 {
            return Err(ActionError::Configuration(
                "max_id_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Palette as a cycle sequence
    ///
    /// # Errors
    /// Returns [`ActionError::Configuration`] if the palette is empty
    pub fn palette_sequence(&self) -> Result<CycleSequence<String>, ActionError> {
        Ok(CycleSequence::new(self.palette.clone())?)
    }

    /// Mutator settings derived from this configuration
    #[inline]
    #[must_use]
    pub fn mutator_config(&self) -> MutatorConfig {
        MutatorConfig {
            max_id_retries: self.max_id_retries,
        }
    }
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE
                .iter()
                .map(|(value, label)| CycleEntry::new((*value).to_string(), *label))
                .collect(),
            cycle_key: DEFAULT_CYCLE_KEY.to_string(),
            stroke_field: "strokeColor".to_string(),
            drawing_tool: "freedraw".to_string(),
            duplicate_offset: Offset::new(20.0, 20.0),
            max_id_retries: scene_batch::DEFAULT_MAX_ID_RETRIES,
            min_host_version: Version::new(2, 14, 2),
        }
    }
}
