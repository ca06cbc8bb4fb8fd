//! Scene graph collaborator: the entity model and the trait the editor drives.
//!
//! The editor never owns entity data. It asks the scene graph to create,
//! move, resize, rotate, embed and remove entities, and reads back what it
//! needs for the current operation only.

#[cfg(test)]
pub(crate) mod flaky;
mod memory;

pub use memory::MemoryScene;

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Shape data for a non-group entity.
///
/// Polygon vertices and line endpoints are stored relative to the entity's
/// top-left position so that translating the entity moves them too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    Rectangle,
    Ellipse,
    Polygon(Vec<Vec2>),
    Line { start: Vec2, end: Vec2 },
}

/// What an entity is. Groups carry the ids of the members they were built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Shape(ShapeGeometry),
    Group { members: Vec<EntityId> },
}

impl EntityKind {
    /// Check if this is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, EntityKind::Group { .. })
    }

    /// Member ids if this is a group.
    pub fn group_members(&self) -> Option<&[EntityId]> {
        match self {
            EntityKind::Group { members } => Some(members),
            EntityKind::Shape(_) => None,
        }
    }
}

/// Side of an entity's boundary an anchor can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Where an anchor sits on its entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortPosition {
    /// Offset from the entity's top-left corner.
    Offset(Vec2),
    /// Centered on one side of the bounding box.
    Side(PortSide),
}

/// A named connection point usable as a link endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique within the owning entity.
    pub id: String,
    /// Style/behavior bucket.
    pub group: String,
    pub position: PortPosition,
}

impl Port {
    /// Anchor at a fixed offset from the entity's top-left corner.
    pub fn at_offset(id: impl Into<String>, group: impl Into<String>, offset: Vec2) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            position: PortPosition::Offset(offset),
        }
    }

    /// Anchor centered on one side of the entity.
    pub fn on_side(id: impl Into<String>, group: impl Into<String>, side: PortSide) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            position: PortPosition::Side(side),
        }
    }
}

/// Everything needed to create an entity, and what a snapshot reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub kind: EntityKind,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
    /// Degrees about the geometric center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl EntitySpec {
    /// A plain shape entity.
    pub fn shape(geometry: ShapeGeometry, position: Point, size: Size) -> Self {
        Self {
            kind: EntityKind::Shape(geometry),
            position,
            size,
            rotation: 0.0,
            ports: Vec::new(),
        }
    }

    /// A group container covering `rect`.
    pub fn group(members: Vec<EntityId>, rect: Rect) -> Self {
        Self {
            kind: EntityKind::Group { members },
            position: rect.origin(),
            size: rect.size(),
            rotation: 0.0,
            ports: Vec::new(),
        }
    }

    /// Attach anchors.
    pub fn with_ports(mut self, ports: Vec<Port>) -> Self {
        self.ports = ports;
        self
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Who caused a position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOrigin {
    /// Direct user manipulation (or any editor move that is not propagation).
    User,
    /// Propagated by the editor itself, e.g. a drag follower.
    Synthetic,
}

/// Notification emitted by the scene graph whenever an entity's position changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub id: EntityId,
    /// Translation delta when the change came from a relative move.
    pub delta: Option<Vec2>,
    pub origin: MoveOrigin,
}

/// Visual affordance bound to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decoration {
    /// Lightweight outline around the bounding box.
    Boundary { padding: f64 },
    /// Rotation and resize handles.
    TransformHandles,
}

/// Pointer cursor affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Scene graph errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Entity {0} has no shape geometry")]
    NotAShape(EntityId),
    #[error("Cannot embed {child} under {parent}")]
    InvalidEmbedding { parent: EntityId, child: EntityId },
}

/// Result type for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// The external scene graph the editor drives.
///
/// Implementations own entity storage and rendering. Every mutating call is a
/// single logical operation; the editor never relies on partial application.
pub trait SceneGraph {
    /// Create an entity and return its handle.
    fn create(&mut self, spec: EntitySpec) -> EntityId;

    /// Remove an entity and all of its descendants.
    fn remove(&mut self, id: EntityId) -> SceneResult<()>;

    /// Check if an entity exists.
    fn contains(&self, id: EntityId) -> bool;

    /// All selectable entities, back to front.
    fn entities(&self) -> Vec<EntityId>;

    /// Current state of an entity.
    fn snapshot(&self, id: EntityId) -> Option<EntitySpec>;

    fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.snapshot(id).map(|s| s.kind)
    }

    fn position(&self, id: EntityId) -> Option<Point> {
        self.snapshot(id).map(|s| s.position)
    }

    fn size(&self, id: EntityId) -> Option<Size> {
        self.snapshot(id).map(|s| s.size)
    }

    /// Rotation in degrees.
    fn rotation(&self, id: EntityId) -> Option<f64> {
        self.snapshot(id).map(|s| s.rotation)
    }

    /// World-space bounding box (unrotated).
    fn bounds(&self, id: EntityId) -> Option<Rect> {
        self.snapshot(id).map(|s| s.bounds())
    }

    /// Set the absolute top-left position. Notifies without a delta.
    fn set_position(&mut self, id: EntityId, position: Point) -> SceneResult<()>;

    /// Resize, keeping the top-left corner fixed.
    fn set_size(&mut self, id: EntityId, size: Size) -> SceneResult<()>;

    /// Set the absolute rotation in degrees.
    fn set_rotation(&mut self, id: EntityId, degrees: f64) -> SceneResult<()>;

    /// Replace the shape data of a non-group entity.
    fn set_geometry(&mut self, id: EntityId, geometry: ShapeGeometry) -> SceneResult<()>;

    /// Move an entity (and its embedded descendants) by `delta`.
    /// Notifies with the delta and the given origin.
    fn translate(&mut self, id: EntityId, delta: Vec2, origin: MoveOrigin) -> SceneResult<()>;

    /// Reparent `child` under `parent`, preserving absolute position.
    fn embed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()>;

    /// Detach `child` from `parent`, making it top-level at its current position.
    fn unembed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()>;

    fn parent(&self, id: EntityId) -> Option<EntityId>;

    fn children(&self, id: EntityId) -> Vec<EntityId>;

    /// Bind a decoration to an entity, replacing any previous one.
    fn decorate(&mut self, id: EntityId, decoration: Decoration) -> SceneResult<()>;

    /// Remove whatever decoration is bound to an entity.
    fn clear_decoration(&mut self, id: EntityId);

    fn set_cursor(&mut self, cursor: Cursor);

    /// Show or move the transient rubber-band rectangle.
    fn show_overlay(&mut self, rect: Rect);

    fn hide_overlay(&mut self);

    /// Drain pending position-change notifications, oldest first.
    fn take_position_changes(&mut self) -> Vec<PositionChange>;
}

/// Check whether `id` is `ancestor` or sits anywhere below it.
pub fn is_descendant_of<S: SceneGraph + ?Sized>(scene: &S, id: EntityId, ancestor: EntityId) -> bool {
    let mut current = Some(id);
    while let Some(node) = current {
        if node == ancestor {
            return true;
        }
        current = scene.parent(node);
    }
    false
}

/// Generate a fresh entity id.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
