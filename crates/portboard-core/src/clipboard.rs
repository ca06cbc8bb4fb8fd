//! Copy and paste of selected entities.

use crate::scene::{EntityId, EntityKind, EntitySpec, SceneGraph};
use crate::selection::SelectionSet;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Snapshots of copied entities, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    entries: Vec<EntitySpec>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[EntitySpec] {
        &self.entries
    }

    /// Snapshot every selected entity. Leaves the clipboard untouched and
    /// returns false when nothing is selected.
    pub fn copy_selected<S: SceneGraph + ?Sized>(&mut self, scene: &S, selection: &SelectionSet) -> bool {
        let entries: Vec<EntitySpec> = selection
            .ordered(scene)
            .into_iter()
            .filter_map(|id| scene.snapshot(id))
            .collect();
        if entries.is_empty() {
            return false;
        }
        log::debug!("Copied {} entities", entries.len());
        self.entries = entries;
        true
    }

    /// Recreate the copied entities shifted by `offset` and make them the selection.
    /// Groups come back empty; their members are pasted only if they were copied too.
    pub fn paste<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        selection: &mut SelectionSet,
        offset: Vec2,
    ) -> Vec<EntityId> {
        selection.clear(scene);
        let pasted: Vec<EntityId> = self
            .entries
            .iter()
            .map(|entry| {
                let mut spec = entry.clone();
                spec.position += offset;
                if let EntityKind::Group { members } = &mut spec.kind {
                    members.clear();
                }
                scene.create(spec)
            })
            .collect();
        selection.select_only(scene, pasted.iter().copied());
        log::info!("Pasted {} entities", pasted.len());
        pasted
    }
}
