//! Selection set and highlight policy.

use crate::config::EditorConfig;
use crate::input::{Modifiers, PointerTarget};
use crate::scene::{Decoration, EntityId, SceneGraph, SceneResult};
use std::collections::{HashMap, HashSet};

/// The set of selected entities, plus the highlights it has put on them.
///
/// Membership is the single source of truth; highlights are re-derived from it
/// after every change. A lone member gets transform handles (when enabled),
/// every member of a larger selection gets a boundary outline.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    selected: HashSet<EntityId>,
    /// Decorations this set has applied and not yet removed.
    highlighted: HashMap<EntityId, Decoration>,
    boundary_padding: f64,
    transform_handles: bool,
}

impl SelectionSet {
    /// Create an empty selection using the highlight settings of `config`.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            selected: HashSet::new(),
            highlighted: HashMap::new(),
            boundary_padding: config.boundary_padding,
            transform_handles: config.transform_handles,
        }
    }

    /// Selected ids (unordered).
    pub fn selected(&self) -> &HashSet<EntityId> {
        &self.selected
    }

    /// Selected ids in the scene's back-to-front order.
    pub fn ordered<S: SceneGraph + ?Sized>(&self, scene: &S) -> Vec<EntityId> {
        scene
            .entities()
            .into_iter()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<EntityId> {
        if self.selected.len() == 1 {
            self.selected.iter().next().copied()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    /// Decoration currently applied to `id` by this selection.
    pub fn highlight(&self, id: EntityId) -> Option<Decoration> {
        self.highlighted.get(&id).copied()
    }

    pub fn transform_handles(&self) -> bool {
        self.transform_handles
    }

    /// Add an entity. Returns false if it is not in the scene or already selected.
    pub fn select<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) -> bool {
        if !scene.contains(id) || !self.selected.insert(id) {
            return false;
        }
        self.refresh_highlights(scene);
        true
    }

    /// Remove an entity. Returns false if it was not selected.
    pub fn deselect<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) -> bool {
        if !self.selected.remove(&id) {
            return false;
        }
        self.refresh_highlights(scene);
        true
    }

    /// Flip membership of one entity, leaving the rest alone.
    pub fn toggle<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) {
        if self.contains(id) {
            self.deselect(scene, id);
        } else {
            self.select(scene, id);
        }
    }

    /// Empty the set and drop every highlight.
    pub fn clear<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        self.selected.clear();
        self.refresh_highlights(scene);
    }

    /// Replace the selection with `ids`. Ids not in the scene are skipped.
    pub fn select_only<S, I>(&mut self, scene: &mut S, ids: I)
    where
        S: SceneGraph + ?Sized,
        I: IntoIterator<Item = EntityId>,
    {
        self.selected.clear();
        self.selected
            .extend(ids.into_iter().filter(|&id| scene.contains(id)));
        self.refresh_highlights(scene);
    }

    /// Select every entity in the scene.
    pub fn select_all<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        let all = scene.entities();
        log::info!("Select all ({} entities)", all.len());
        self.select_only(scene, all);
    }

    /// Remove every selected entity from the scene, then clear. Returns how many were removed.
    pub fn delete_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> SceneResult<usize> {
        let mut removed = 0;
        for id in self.ordered(&*scene) {
            // Already gone if an ancestor was removed first.
            if scene.contains(id) {
                scene.clear_decoration(id);
                scene.remove(id)?;
                removed += 1;
            }
        }
        self.highlighted.clear();
        self.selected.clear();
        log::info!("Deleted {} selected entities", removed);
        Ok(removed)
    }

    /// Click semantics: plain click selects only the target, a toggle-modifier click
    /// flips the target, a plain click on blank canvas clears.
    pub fn click<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        target: PointerTarget,
        modifiers: Modifiers,
    ) {
        match target {
            PointerTarget::Entity(id) if modifiers.toggles_selection() => self.toggle(scene, id),
            PointerTarget::Entity(id) => self.select_only(scene, [id]),
            PointerTarget::Blank if modifiers.toggles_selection() => {}
            PointerTarget::Blank => self.clear(scene),
        }
    }

    /// Drop members the scene no longer has.
    pub fn retain_live<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        let before = self.selected.len();
        self.selected.retain(|&id| scene.contains(id));
        self.highlighted.retain(|&id, _| scene.contains(id));
        if self.selected.len() != before {
            self.refresh_highlights(scene);
        }
    }

    /// Enable or disable the single-selection transform handles.
    pub fn set_transform_handles<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, enabled: bool) {
        self.transform_handles = enabled;
        self.refresh_highlights(scene);
    }

    fn wanted_decoration(&self) -> Decoration {
        if self.selected.len() == 1 && self.transform_handles {
            Decoration::TransformHandles
        } else {
            Decoration::Boundary {
                padding: self.boundary_padding,
            }
        }
    }

    /// Bring the scene's highlights in line with membership.
    fn refresh_highlights<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        let stale: Vec<EntityId> = self
            .highlighted
            .keys()
            .filter(|id| !self.selected.contains(id))
            .copied()
            .collect();
        for id in stale {
            scene.clear_decoration(id);
            self.highlighted.remove(&id);
        }

        let wanted = self.wanted_decoration();
        let members: Vec<EntityId> = self.selected.iter().copied().collect();
        for id in members {
            if self.highlighted.get(&id) == Some(&wanted) {
                continue;
            }
            match scene.decorate(id, wanted) {
                Ok(()) => {
                    self.highlighted.insert(id, wanted);
                }
                Err(e) => {
                    log::warn!("Dropping {} from selection: {}", id, e);
                    self.selected.remove(&id);
                    self.highlighted.remove(&id);
                }
            }
        }
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
