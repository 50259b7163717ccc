//! Scene entities
//!
//! An [`Entity`] is a selectable shape with explicit mutable fields,
//! cross-entity [`Reference`]s and group membership. Cloning and rewriting
//! happen on these typed parts, never on loose property bags.

use crate::id::{EntityId, GroupId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Value of a mutable entity field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value (sizes, opacity, widths)
    Number(f64),
    /// Text value (colors, fonts, labels)
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered field name → value map
pub type FieldMap = IndexMap<String, FieldValue>;

/// Position of an entity on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point shifted by `offset`
    #[inline]
    #[must_use]
    pub fn translate(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }
}

/// Displacement applied to duplicated entities
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal displacement
    pub dx: f64,
    /// Vertical displacement
    pub dy: f64,
}

impl Offset {
    /// Create an offset
    #[inline]
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// How an entity relates to the entity it references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Relationship owned by the referencing entity (arrow endpoints).
    ///
    /// Survives duplication even when the target stays behind.
    Link,
    /// Attachment to an auxiliary bound structure (bound text, bound arrows).
    ///
    /// Only meaningful while both ends travel together.
    Binding,
}

/// Named reference slot holding another entity's id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Slot name, e.g. `start`, `end`, `boundText`
    pub slot: String,
    /// Referenced entity
    pub target: EntityId,
    /// Relationship kind
    pub kind: ReferenceKind,
}

impl Reference {
    /// Create a link reference
    #[inline]
    #[must_use]
    pub fn link(slot: impl Into<String>, target: impl Into<EntityId>) -> Self {
        Self {
            slot: slot.into(),
            target: target.into(),
            kind: ReferenceKind::Link,
        }
    }

    /// Create a binding reference
    #[inline]
    #[must_use]
    pub fn binding(slot: impl Into<String>, target: impl Into<EntityId>) -> Self {
        Self {
            slot: slot.into(),
            target: target.into(),
            kind: ReferenceKind::Binding,
        }
    }
}

/// Selectable, mutable scene object
///
/// # Invariants
/// - `id` is unique within its owning collection
/// - `references` name other entities only by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable identity
    pub id: EntityId,
    /// Host element type tag (`rectangle`, `arrow`, `text`, ...)
    pub kind: String,
    /// Spatial anchor, when the element has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// Transformable fields
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: FieldMap,
    /// Cross-entity references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    /// Groups, innermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupId>,
}

impl Entity {
    /// Create a bare entity
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<EntityId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: None,
            fields: FieldMap::new(),
            references: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// With position
    #[inline]
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// With field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// With link reference
    #[inline]
    #[must_use]
    pub fn with_link(mut self, slot: impl Into<String>, target: impl Into<EntityId>) -> Self {
        self.references.push(Reference::link(slot, target));
        self
    }

    /// With binding reference
    #[inline]
    #[must_use]
    pub fn with_binding(mut self, slot: impl Into<String>, target: impl Into<EntityId>) -> Self {
        self.references.push(Reference::binding(slot, target));
        self
    }

    /// With group membership
    #[inline]
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(GroupId::new(group));
        self
    }

    /// Field value by name
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a field, returning the previous value
    #[inline]
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// First reference stored in `slot`
    #[must_use]
    pub fn reference(&self, slot: &str) -> Option<&Reference> {
        self.references.iter().find(|r| r.slot == slot)
    }

    /// Whether any reference targets `id`
    #[must_use]
    pub fn references_id(&self, id: &EntityId) -> bool {
        self.references.iter().any(|r| &r.target == id)
    }

    /// Ids of all referenced entities
    pub fn reference_targets(&self) -> impl Iterator<Item = &EntityId> {
        self.references.iter().map(|r| &r.target)
    }
}
