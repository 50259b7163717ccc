//! In-memory host
//!
//! [`MemoryHost`] implements every host trait over a [`SceneDocument`]. It
//! backs the CLI and the integration tests, and keeps an undo history in
//! which each atomic replacement is a single step.

use crate::host::{HostInfo, Notifier, ToolState};
use parking_lot::Mutex;
use scene_batch::{
    CollectionStore, IdGenerator, SelectionProvider, StoreError, UuidIdGenerator,
};
use scene_cycle::{MemorySettings, SettingsError, SettingsStore};
use scene_model::{collection, Entity, EntityId, FieldMap, FieldValue};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};

/// Undo steps kept by default
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Serializable scene state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneDocument {
    /// Entities in z-order
    pub entities: Vec<Entity>,
    /// Selected ids
    pub selection: Vec<EntityId>,
    /// Active tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tool: Option<String>,
    /// Defaults applied to newly drawn elements
    #[serde(skip_serializing_if = "FieldMap::is_empty")]
    pub tool_defaults: FieldMap,
}

impl SceneDocument {
    /// Create document from entities
    #[inline]
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            ..Self::default()
        }
    }

    /// With selection
    #[must_use]
    pub fn with_selection<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With active tool
    #[inline]
    #[must_use]
    pub fn with_active_tool(mut self, tool: impl Into<String>) -> Self {
        self.active_tool = Some(tool.into());
        self
    }

    /// Entity by id
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }
}

/// Host over an in-memory scene
pub struct MemoryHost<S: SettingsStore = MemorySettings> {
    scene: Mutex<SceneDocument>,
    history: Mutex<VecDeque<Vec<Entity>>>,
    history_limit: usize,
    notices: Mutex<Vec<String>>,
    settings: S,
    ids: Box<dyn IdGenerator + Send + Sync>,
    version: Version,
    view_mode: bool,
}

impl MemoryHost<MemorySettings> {
    /// Host over `document` with in-memory settings
    #[inline]
    #[must_use]
    pub fn new(document: SceneDocument) -> Self {
        Self::with_settings(document, MemorySettings::new())
    }
}

impl<S: SettingsStore> MemoryHost<S> {
    /// Version reported when none is set
    pub const DEFAULT_VERSION: Version = Version::new(2, 14, 2);

    /// Host over `document` with the given settings store
    #[must_use]
    pub fn with_settings(document: SceneDocument, settings: S) -> Self {
        Self {
            scene: Mutex::new(document),
            history: Mutex::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            notices: Mutex::new(Vec::new()),
            settings,
            ids: Box::new(UuidIdGenerator),
            version: Self::DEFAULT_VERSION,
            view_mode: false,
        }
    }

    /// With id generator
    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + Send + Sync + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// With reported host version
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// With undo depth; older steps are discarded first
    #[inline]
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// With view mode; in view mode every scene change is rejected
    #[inline]
    #[must_use]
    pub fn with_view_mode(mut self, enabled: bool) -> Self {
        self.view_mode = enabled;
        self
    }

    /// Copy of the current scene
    #[must_use]
    pub fn document(&self) -> SceneDocument {
        self.scene.lock().clone()
    }

    /// Settings store
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Notices shown so far
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }

    /// Drain notices shown so far
    #[must_use]
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.lock())
    }

    /// Number of undoable steps
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Restore the collection as it was before the last atomic replacement
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&self) -> bool {
        let Some(previous) = self.history.lock().pop_back() else {
            return false;
        };
        let mut scene = self.scene.lock();
        scene.entities = previous;
        retain_present(&mut scene);
        tracing::debug!(entities = scene.entities.len(), "undo");
        true
    }

    fn ensure_editable(&self) -> Result<(), StoreError> {
        if self.view_mode {
            return Err(StoreError::Rejected("scene is in view mode".to_string()));
        }
        Ok(())
    }
}

/// Drop selected ids that no longer exist
fn retain_present(scene: &mut SceneDocument) {
    let present: HashSet<EntityId> = scene.entities.iter().map(|e| e.id.clone()).collect();
    scene.selection.retain(|id| present.contains(id));
}

impl<S: SettingsStore> std::fmt::Debug for MemoryHost<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("entities", &self.scene.lock().entities.len())
            .field("history", &self.history_len())
            .field("version", &self.version)
            .field("view_mode", &self.view_mode)
            .finish_non_exhaustive()
    }
}

impl<S: SettingsStore> SelectionProvider for MemoryHost<S> {
    fn selection(&self) -> Vec<Entity> {
        let scene = self.scene.lock();
        scene
            .selection
            .iter()
            .filter_map(|id| scene.entity(id).cloned())
            .collect()
    }

    fn select(&self, ids: &[EntityId]) {
        let mut scene = self.scene.lock();
        scene.selection = ids.to_vec();
        retain_present(&mut scene);
    }
}

impl<S: SettingsStore> CollectionStore for MemoryHost<S> {
    fn entities(&self) -> Vec<Entity> {
        self.scene.lock().entities.clone()
    }

    fn replace_all(&self, entities: Vec<Entity>, atomic: bool) -> Result<(), StoreError> {
        self.ensure_editable()?;
        collection::ensure_unique_ids(&entities)?;

        let mut scene = self.scene.lock();
        let previous = std::mem::replace(&mut scene.entities, entities);
        retain_present(&mut scene);
        if atomic && self.history_limit > 0 {
            let mut history = self.history.lock();
            history.push_back(previous);
            while history.len() > self.history_limit {
                history.pop_front();
            }
        }
        Ok(())
    }
}

impl<S: SettingsStore> SettingsStore for MemoryHost<S> {
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        self.settings.read(key)
    }

    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.settings.write(key, value)
    }
}

impl<S: SettingsStore> IdGenerator for MemoryHost<S> {
    fn next_id(&self) -> EntityId {
        self.ids.next_id()
    }
}

impl<S: SettingsStore> Notifier for MemoryHost<S> {
    fn notify(&self, message: &str) {
        tracing::info!(notice = message, "notice");
        self.notices.lock().push(message.to_string());
    }
}

impl<S: SettingsStore> ToolState for MemoryHost<S> {
    fn active_tool(&self) -> Option<String> {
        self.scene.lock().active_tool.clone()
    }

    fn set_default_field(&self, field: &str, value: FieldValue) -> Result<(), StoreError> {
        self.ensure_editable()?;
        self.scene
            .lock()
            .tool_defaults
            .insert(field.to_string(), value);
        Ok(())
    }
}

impl<S: SettingsStore> HostInfo for MemoryHost<S> {
    fn host_version(&self) -> Version {
        self.version.clone()
    }
}
