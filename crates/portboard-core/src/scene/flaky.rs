//! Scene wrapper that makes one kind of mutation fail, for exercising error paths.

use super::{
    Cursor, Decoration, EntityId, EntitySpec, MemoryScene, MoveOrigin, PositionChange, SceneError, SceneGraph,
    SceneResult, ShapeGeometry,
};
use kurbo::{Point, Rect, Size, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Remove,
    SetSize,
    Unembed,
}

/// Delegates to a [`MemoryScene`], failing `fail_on` once `allowed` calls of it have succeeded.
#[derive(Debug)]
pub struct FlakyScene {
    pub inner: MemoryScene,
    fail_on: Option<FailOn>,
    allowed: usize,
}

impl FlakyScene {
    pub fn new(inner: MemoryScene) -> Self {
        Self {
            inner,
            fail_on: None,
            allowed: 0,
        }
    }

    pub fn fail_after(&mut self, op: FailOn, allowed: usize) {
        self.fail_on = Some(op);
        self.allowed = allowed;
    }

    pub fn heal(&mut self) {
        self.fail_on = None;
    }

    fn check(&mut self, op: FailOn, id: EntityId) -> SceneResult<()> {
        if self.fail_on != Some(op) {
            return Ok(());
        }
        if self.allowed == 0 {
            return Err(SceneError::UnknownEntity(id));
        }
        self.allowed -= 1;
        Ok(())
    }
}

impl SceneGraph for FlakyScene {
    fn create(&mut self, spec: EntitySpec) -> EntityId {
        self.inner.create(spec)
    }

    fn remove(&mut self, id: EntityId) -> SceneResult<()> {
        self.check(FailOn::Remove, id)?;
        self.inner.remove(id)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.inner.contains(id)
    }

    fn entities(&self) -> Vec<EntityId> {
        self.inner.entities()
    }

    fn snapshot(&self, id: EntityId) -> Option<EntitySpec> {
        self.inner.snapshot(id)
    }

    fn set_position(&mut self, id: EntityId, position: Point) -> SceneResult<()> {
        self.inner.set_position(id, position)
    }

    fn set_size(&mut self, id: EntityId, size: Size) -> SceneResult<()> {
        self.check(FailOn::SetSize, id)?;
        self.inner.set_size(id, size)
    }

    fn set_rotation(&mut self, id: EntityId, degrees: f64) -> SceneResult<()> {
        self.inner.set_rotation(id, degrees)
    }

    fn set_geometry(&mut self, id: EntityId, geometry: ShapeGeometry) -> SceneResult<()> {
        self.inner.set_geometry(id, geometry)
    }

    fn translate(&mut self, id: EntityId, delta: Vec2, origin: MoveOrigin) -> SceneResult<()> {
        self.inner.translate(id, delta, origin)
    }

    fn embed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()> {
        self.inner.embed(parent, child)
    }

    fn unembed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()> {
        self.check(FailOn::Unembed, child)?;
        self.inner.unembed(parent, child)
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.inner.parent(id)
    }

    fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.inner.children(id)
    }

    fn decorate(&mut self, id: EntityId, decoration: Decoration) -> SceneResult<()> {
        self.inner.decorate(id, decoration)
    }

    fn clear_decoration(&mut self, id: EntityId) {
        self.inner.clear_decoration(id)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.inner.set_cursor(cursor)
    }

    fn show_overlay(&mut self, rect: Rect) {
        self.inner.show_overlay(rect)
    }

    fn hide_overlay(&mut self) {
        self.inner.hide_overlay()
    }

    fn take_position_changes(&mut self) -> Vec<PositionChange> {
        self.inner.take_position_changes()
    }
}
