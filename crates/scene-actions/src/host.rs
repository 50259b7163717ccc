//! Host surface required by the actions
//!
//! Re-uses the selection/collection/id traits from `scene-batch` and the
//! settings trait from `scene-cycle`, and adds the few host capabilities
//! only the actions need.

use scene_batch::{CollectionStore, IdGenerator, SelectionProvider, StoreError};
use scene_cycle::SettingsStore;
use scene_model::FieldValue;
use semver::Version;

/// User-visible notices (toasts)
pub trait Notifier {
    /// Show `message`; fire-and-forget
    fn notify(&self, message: &str);
}

/// Active tool and its defaults for newly drawn elements
pub trait ToolState {
    /// Name of the active tool, if any
    fn active_tool(&self) -> Option<String>;

    /// Set the default `field` used for new elements
    ///
    /// # Errors
    /// Returns error if the host rejected the change
    fn set_default_field(&self, field: &str, value: FieldValue) -> Result<(), StoreError>;
}

/// Host identification
pub trait HostInfo {
    /// Host application version
    fn host_version(&self) -> Version;
}

/// Everything an action needs from its host
pub trait Host:
    SelectionProvider + CollectionStore + SettingsStore + IdGenerator + Notifier + ToolState + HostInfo
{
}

impl<T> Host for T where
    T: SelectionProvider
        + CollectionStore
        + SettingsStore
        + IdGenerator
        + Notifier
        + ToolState
        + HostInfo
{
}
