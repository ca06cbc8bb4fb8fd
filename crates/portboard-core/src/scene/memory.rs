//! In-memory scene graph.

use super::{
    Cursor, Decoration, EntityId, EntityKind, EntitySpec, MoveOrigin, PositionChange, SceneError,
    SceneGraph, SceneResult, ShapeGeometry, is_descendant_of, new_entity_id,
};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Node {
    spec: EntitySpec,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

/// A complete [`SceneGraph`] kept in memory.
///
/// Group member lists mirror the embedding relation: embedding under a group
/// records the member, unembedding or removing a child drops it.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: HashMap<EntityId, Node>,
    /// Back to front.
    z_order: Vec<EntityId>,
    decorations: HashMap<EntityId, Decoration>,
    cursor: Cursor,
    overlay: Option<Rect>,
    changes: Vec<PositionChange>,
}

impl MemoryScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities, embedded ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Decoration currently bound to an entity.
    pub fn decoration(&self, id: EntityId) -> Option<Decoration> {
        self.decorations.get(&id).copied()
    }

    /// Number of entities carrying a decoration.
    pub fn decorated_count(&self) -> usize {
        self.decorations.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Rubber-band rectangle, if shown.
    pub fn overlay(&self) -> Option<Rect> {
        self.overlay
    }

    fn node(&self, id: EntityId) -> SceneResult<&Node> {
        self.nodes.get(&id).ok_or(SceneError::UnknownEntity(id))
    }

    fn node_mut(&mut self, id: EntityId) -> SceneResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(SceneError::UnknownEntity(id))
    }

    fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                for &child in &node.children {
                    out.push(child);
                    stack.push(child);
                }
            }
        }
        out
    }

    fn detach(&mut self, child: EntityId) {
        let Some(parent) = self.nodes.get(&child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|&c| c != child);
            if let EntityKind::Group { members } = &mut parent_node.spec.kind {
                members.retain(|&m| m != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
    }
}

impl SceneGraph for MemoryScene {
    fn create(&mut self, spec: EntitySpec) -> EntityId {
        let id = new_entity_id();
        self.nodes.insert(
            id,
            Node {
                spec,
                parent: None,
                children: Vec::new(),
            },
        );
        self.z_order.push(id);
        id
    }

    fn remove(&mut self, id: EntityId) -> SceneResult<()> {
        self.node(id)?;
        self.detach(id);
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for gone in &doomed {
            self.nodes.remove(gone);
            self.decorations.remove(gone);
        }
        self.z_order.retain(|z| !doomed.contains(z));
        Ok(())
    }

    fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn entities(&self) -> Vec<EntityId> {
        self.z_order.clone()
    }

    fn snapshot(&self, id: EntityId) -> Option<EntitySpec> {
        self.nodes.get(&id).map(|n| n.spec.clone())
    }

    fn set_position(&mut self, id: EntityId, position: Point) -> SceneResult<()> {
        let current = self.node(id)?.spec.position;
        let delta = position - current;
        for child in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.spec.position += delta;
            }
        }
        self.node_mut(id)?.spec.position = position;
        self.changes.push(PositionChange {
            id,
            delta: None,
            origin: MoveOrigin::User,
        });
        Ok(())
    }

    fn set_size(&mut self, id: EntityId, size: Size) -> SceneResult<()> {
        self.node_mut(id)?.spec.size = size;
        Ok(())
    }

    fn set_rotation(&mut self, id: EntityId, degrees: f64) -> SceneResult<()> {
        self.node_mut(id)?.spec.rotation = degrees;
        Ok(())
    }

    fn set_geometry(&mut self, id: EntityId, geometry: ShapeGeometry) -> SceneResult<()> {
        let node = self.node_mut(id)?;
        match &mut node.spec.kind {
            EntityKind::Shape(g) => {
                *g = geometry;
                Ok(())
            }
            EntityKind::Group { .. } => Err(SceneError::NotAShape(id)),
        }
    }

    fn translate(&mut self, id: EntityId, delta: Vec2, origin: MoveOrigin) -> SceneResult<()> {
        self.node_mut(id)?.spec.position += delta;
        for child in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.spec.position += delta;
            }
        }
        self.changes.push(PositionChange {
            id,
            delta: Some(delta),
            origin,
        });
        Ok(())
    }

    fn embed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if is_descendant_of(&*self, parent, child) {
            return Err(SceneError::InvalidEmbedding { parent, child });
        }
        self.detach(child);
        let parent_node = self.node_mut(parent)?;
        parent_node.children.push(child);
        if let EntityKind::Group { members } = &mut parent_node.spec.kind {
            if !members.contains(&child) {
                members.push(child);
            }
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn unembed(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(SceneError::InvalidEmbedding { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn decorate(&mut self, id: EntityId, decoration: Decoration) -> SceneResult<()> {
        self.node(id)?;
        self.decorations.insert(id, decoration);
        Ok(())
    }

    fn clear_decoration(&mut self, id: EntityId) {
        self.decorations.remove(&id);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn show_overlay(&mut self, rect: Rect) {
        self.overlay = Some(rect);
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }

    fn take_position_changes(&mut self) -> Vec<PositionChange> {
        std::mem::take(&mut self.changes)
    }
}
