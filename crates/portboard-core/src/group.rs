//! Grouping: wrap selected entities in a padded container, and undo it.

use crate::error::{EditError, EditResult};
use crate::geometry::union_bounds;
use crate::scene::{EntityId, EntityKind, EntitySpec, MoveOrigin, SceneGraph, is_descendant_of};
use crate::selection::SelectionSet;
use kurbo::{Rect, Vec2};

/// Group the selected entities under a new container sized to their union
/// bounds plus `padding`. The selection becomes just the new group.
///
/// Entities already embedded under another selected entity travel with their
/// ancestor and are not grouped separately.
pub fn group_selected<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &mut SelectionSet,
    padding: f64,
) -> EditResult<EntityId> {
    if selection.len() < 2 {
        return Err(EditError::NothingToGroup(selection.len()));
    }

    let selected = selection.ordered(&*scene);
    let members: Vec<EntityId> = selected
        .iter()
        .copied()
        .filter(|&m| {
            !selected
                .iter()
                .any(|&other| other != m && is_descendant_of(&*scene, m, other))
        })
        .collect();
    if members.len() < 2 {
        return Err(EditError::NothingToGroup(members.len()));
    }

    let mut boxes = Vec::with_capacity(members.len());
    for &m in &members {
        boxes.push(scene.bounds(m).ok_or(EditError::MissingEntity(m))?);
    }
    let Some(content) = union_bounds(boxes) else {
        return Err(EditError::NothingToGroup(0));
    };
    let rect = content.inflate(padding, padding);

    let group = scene.create(EntitySpec::group(members.clone(), rect));
    for (i, &m) in members.iter().enumerate() {
        if let Err(e) = scene.embed(group, m) {
            // Put back whatever was already moved under the container.
            for &done in &members[..i] {
                if let Err(undo) = scene.unembed(group, done) {
                    log::warn!("Failed to restore {} after grouping error: {}", done, undo);
                }
            }
            scene.remove(group)?;
            return Err(e.into());
        }
    }

    selection.select_only(scene, [group]);
    log::info!("Grouped {} entities into {}", members.len(), group);
    Ok(group)
}

/// Dissolve one group: its children become top-level at their current
/// positions and the container is removed. Returns the freed children.
///
/// If the scene refuses a step, the children already freed are embedded
/// again so the group is left as it was.
pub fn ungroup<S: SceneGraph + ?Sized>(scene: &mut S, group: EntityId) -> EditResult<Vec<EntityId>> {
    let kind = scene.kind(group).ok_or(EditError::MissingEntity(group))?;
    if !kind.is_group() {
        return Ok(Vec::new());
    }
    let children = scene.children(group);
    for (freed, &child) in children.iter().enumerate() {
        if let Err(e) = scene.unembed(group, child) {
            restore_children(scene, group, &children[..freed]);
            return Err(e.into());
        }
    }
    if let Err(e) = scene.remove(group) {
        restore_children(scene, group, &children);
        return Err(e.into());
    }
    log::info!("Ungrouped {} ({} children)", group, children.len());
    Ok(children)
}

fn restore_children<S: SceneGraph + ?Sized>(scene: &mut S, group: EntityId, children: &[EntityId]) {
    for &child in children {
        if let Err(err) = scene.embed(group, child) {
            log::warn!("Could not return {} to group {}: {}", child, group, err);
        }
    }
}

/// Ungroup every selected group. Freed children join the selection.
/// Returns whether anything was ungrouped.
pub fn ungroup_selected<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &mut SelectionSet,
) -> EditResult<bool> {
    let groups: Vec<EntityId> = selection
        .ordered(&*scene)
        .into_iter()
        .filter(|&id| scene.kind(id).is_some_and(|k| k.is_group()))
        .collect();
    if groups.is_empty() {
        return Ok(false);
    }

    let mut keep: Vec<EntityId> = selection
        .selected()
        .iter()
        .copied()
        .filter(|id| !groups.contains(id))
        .collect();
    for group in groups {
        // A nested group may already be gone with an outer one.
        if scene.contains(group) {
            keep.extend(ungroup(scene, group)?);
        }
    }
    selection.select_only(scene, keep);
    Ok(true)
}

/// Union of the bounds of a group's members, descending into nested groups.
/// `None` for a group without members or an unknown entity.
pub fn content_bounds<S: SceneGraph + ?Sized>(scene: &S, group: EntityId) -> Option<Rect> {
    let members = match scene.kind(group)? {
        EntityKind::Group { members } => members,
        EntityKind::Shape(_) => return None,
    };
    union_bounds(members.into_iter().filter_map(|m| match scene.kind(m)? {
        EntityKind::Group { .. } => content_bounds(scene, m).or_else(|| scene.bounds(m)),
        EntityKind::Shape(_) => scene.bounds(m),
    }))
}

/// Resize a group's container to its content plus `padding`. Returns the new box.
/// Members keep their absolute positions.
pub fn refit<S: SceneGraph + ?Sized>(scene: &mut S, group: EntityId, padding: f64) -> EditResult<Rect> {
    let current = scene.bounds(group).ok_or(EditError::MissingEntity(group))?;
    let content = content_bounds(&*scene, group).ok_or(EditError::NothingToGroup(0))?;
    let rect = content.inflate(padding, padding);

    let delta = rect.origin() - current.origin();
    if delta != Vec2::ZERO {
        // Moving the container carries its children; shift them straight back.
        scene.translate(group, delta, MoveOrigin::Synthetic)?;
        for child in scene.children(group) {
            scene.translate(child, -delta, MoveOrigin::Synthetic)?;
        }
    }
    scene.set_size(group, rect.size())?;
    log::debug!("Refit group {} to {:?}", group, rect);
    Ok(rect)
}

/// Check whether any selected entity is a group.
pub fn has_group_selected<S: SceneGraph + ?Sized>(scene: &S, selection: &SelectionSet) -> bool {
    selection
        .selected()
        .iter()
        .any(|&id| scene.kind(id).is_some_and(|k| k.is_group()))
}
