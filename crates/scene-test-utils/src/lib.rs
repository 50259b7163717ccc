//! Testing utilities for the scene actions workspace
//!
//! Shared scene fixtures and a failing settings double.

#![allow(missing_docs)]

use scene_cycle::{CycleSequence, MemorySettings, SettingsError, SettingsStore};
use scene_model::{Entity, EntityId};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const BLACK: &str = "#1e1e1e";
pub const BLUE: &str = "#1971c2";
pub const GREEN: &str = "#2f9e44";
pub const ORANGE: &str = "#f08c00";

/// Black, Blue, Green, Orange
pub fn palette() -> CycleSequence<String> {
    CycleSequence::from_pairs(vec![
        (BLACK.to_string(), "Black"),
        (BLUE.to_string(), "Blue"),
        (GREEN.to_string(), "Green"),
        (ORANGE.to_string(), "Orange"),
    ])
    .unwrap()
}

/// `A(1) --end--> B(2)`
pub fn linked_pair() -> Vec<Entity> {
    vec![
        Entity::new("1", "arrow")
            .with_position(0.0, 0.0)
            .with_link("end", "2"),
        Entity::new("2", "rectangle").with_position(100.0, 0.0),
    ]
}

/// A small scene with every reference flavor
///
/// - `box`: rectangle carrying bound text `label` and bound arrow `arrow`
/// - `label`: text bound to `box`
/// - `arrow`: arrow from `box` to `circle`
/// - `circle`: ellipse, grouped with `box`
pub fn sample_scene() -> Vec<Entity> {
    vec![
        Entity::new("box", "rectangle")
            .with_position(10.0, 10.0)
            .with_field("strokeColor", BLACK)
            .with_binding("boundText", "label")
            .with_binding("boundArrow", "arrow")
            .with_group("g1"),
        Entity::new("label", "text")
            .with_position(20.0, 20.0)
            .with_field("text", "hello")
            .with_binding("container", "box"),
        Entity::new("arrow", "arrow")
            .with_position(60.0, 30.0)
            .with_field("strokeColor", BLACK)
            .with_link("start", "box")
            .with_link("end", "circle"),
        Entity::new("circle", "ellipse")
            .with_position(200.0, 30.0)
            .with_field("strokeColor", BLACK)
            .with_group("g1"),
    ]
}

pub fn ids(raw: &[&str]) -> Vec<EntityId> {
    raw.iter().copied().map(EntityId::from).collect()
}

pub fn find<'a>(entities: &'a [Entity], id: &str) -> &'a Entity {
    entities
        .iter()
        .find(|e| e.id.as_str() == id)
        .unwrap_or_else(|| panic!("no entity {id}"))
}

/// Settings whose writes fail while `fail_writes` is set
#[derive(Debug, Default)]
pub struct FailingSettings {
    inner: MemorySettings,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
}

impl FailingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails
    pub fn read_only() -> Self {
        let settings = Self::new();
        settings.set_fail_writes(true);
        settings
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SettingsStore for FailingSettings {
    fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SettingsError::Unavailable("reads disabled".to_string()));
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SettingsError::Unavailable("writes disabled".to_string()));
        }
        self.inner.write(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
