//! Moves the rest of a multi-selection along with the entity being dragged.

use crate::scene::{EntityId, MoveOrigin, PositionChange, SceneGraph, SceneResult, is_descendant_of};
use crate::selection::SelectionSet;

/// An engaged drag: the entity under the pointer and who follows it.
///
/// `primary` is the entity actually translated: the grabbed entity, or its
/// top-most selected ancestor, which carries the grabbed entity along.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub grabbed: EntityId,
    pub primary: EntityId,
    pub followers: Vec<EntityId>,
}

/// Propagates user translations of the dragged entity to its followers.
///
/// Follower moves are tagged [`MoveOrigin::Synthetic`], and only user-origin
/// changes of the primary are propagated, so followers never re-trigger it.
#[derive(Debug, Clone, Default)]
pub struct DragSync {
    session: Option<DragSession>,
}

impl DragSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage for a drag on `primary`. Does nothing unless `primary` is part of a
    /// selection of more than one entity. Returns whether a session started.
    pub fn begin<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        primary: EntityId,
        selection: &SelectionSet,
    ) -> bool {
        self.session = None;
        if selection.len() < 2 || !selection.contains(primary) {
            return false;
        }

        let selected = selection.ordered(scene);
        let mut mover = primary;
        let mut current = scene.parent(primary);
        while let Some(ancestor) = current {
            if selection.contains(ancestor) {
                mover = ancestor;
            }
            current = scene.parent(ancestor);
        }

        // Entities embedded under another moving entity are carried already.
        let followers: Vec<EntityId> = selected
            .iter()
            .copied()
            .filter(|&f| f != mover)
            .filter(|&f| {
                !selected
                    .iter()
                    .any(|&other| other != f && is_descendant_of(scene, f, other))
            })
            .collect();

        log::debug!("Drag sync on {} via {} with {} followers", primary, mover, followers.len());
        self.session = Some(DragSession {
            grabbed: primary,
            primary: mover,
            followers,
        });
        true
    }

    /// The entity to translate when `grabbed` is dragged.
    pub fn mover(&self, grabbed: EntityId) -> EntityId {
        match &self.session {
            Some(session) if session.grabbed == grabbed => session.primary,
            _ => grabbed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// React to a position change. Returns how many followers were moved.
    pub fn on_position_change<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        change: &PositionChange,
    ) -> SceneResult<usize> {
        let Some(session) = &self.session else {
            return Ok(0);
        };
        if change.id != session.primary || change.origin != MoveOrigin::User {
            return Ok(0);
        }
        let Some(delta) = change.delta else {
            return Ok(0);
        };

        let mut moved = 0;
        for &follower in &session.followers {
            if scene.contains(follower) {
                scene.translate(follower, delta, MoveOrigin::Synthetic)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Tear down the session.
    pub fn end(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Drag sync on {} ended", session.primary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntitySpec, MemoryScene, ShapeGeometry};
    use kurbo::{Point, Rect, Size, Vec2};

    fn setup(n: usize) -> (MemoryScene, Vec<EntityId>, SelectionSet) {
        let mut scene = MemoryScene::new();
        let ids: Vec<EntityId> = (0..n)
            .map(|i| {
                scene.create(EntitySpec::shape(
                    ShapeGeometry::Rectangle,
                    Point::new(i as f64 * 20.0, 0.0),
                    Size::new(10.0, 10.0),
                ))
            })
            .collect();
        let mut sel = SelectionSet::default();
        sel.select_all(&mut scene);
        (scene, ids, sel)
    }

    fn pump(scene: &mut MemoryScene, sync: &mut DragSync) {
        loop {
            let changes = scene.take_position_changes();
            if changes.is_empty() {
                break;
            }
            for change in &changes {
                sync.on_position_change(scene, change).unwrap();
            }
        }
    }

    #[test]
    fn test_followers_get_same_delta() {
        let (mut scene, ids, sel) = setup(3);
        let mut sync = DragSync::new();
        assert!(sync.begin(&scene, ids[0], &sel));
        assert_eq!(sync.session().unwrap().followers, vec![ids[1], ids[2]]);

        scene.translate(ids[0], Vec2::new(5.0, 7.0), MoveOrigin::User).unwrap();
        pump(&mut scene, &mut sync);

        assert_eq!(scene.position(ids[0]), Some(Point::new(5.0, 7.0)));
        assert_eq!(scene.position(ids[1]), Some(Point::new(25.0, 7.0)));
        assert_eq!(scene.position(ids[2]), Some(Point::new(45.0, 7.0)));
    }

    #[test]
    fn test_synthetic_moves_not_propagated() {
        let (mut scene, ids, sel) = setup(2);
        let mut sync = DragSync::new();
        sync.begin(&scene, ids[0], &sel);

        scene.translate(ids[0], Vec2::new(1.0, 0.0), MoveOrigin::Synthetic).unwrap();
        pump(&mut scene, &mut sync);
        assert_eq!(scene.position(ids[1]), Some(Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_absolute_set_not_propagated() {
        let (mut scene, ids, sel) = setup(2);
        let mut sync = DragSync::new();
        sync.begin(&scene, ids[0], &sel);

        scene.set_position(ids[0], Point::new(100.0, 100.0)).unwrap();
        pump(&mut scene, &mut sync);
        assert_eq!(scene.position(ids[1]), Some(Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_needs_multi_selection() {
        let (mut scene, ids, mut sel) = setup(2);
        sel.select_only(&mut scene, [ids[0]]);
        let mut sync = DragSync::new();
        assert!(!sync.begin(&scene, ids[0], &sel));

        sel.select_all(&mut scene);
        let outsider = scene.create(EntitySpec::shape(
            ShapeGeometry::Rectangle,
            Point::ZERO,
            Size::new(1.0, 1.0),
        ));
        assert!(!sync.begin(&scene, outsider, &sel));
    }

    #[test]
    fn test_embedded_followers_not_moved_twice() {
        let (mut scene, ids, sel) = setup(3);
        scene.embed(ids[1], ids[2]).unwrap();
        let mut sync = DragSync::new();
        sync.begin(&scene, ids[0], &sel);
        assert_eq!(sync.session().unwrap().followers, vec![ids[1]]);

        scene.translate(ids[0], Vec2::new(0.0, 10.0), MoveOrigin::User).unwrap();
        pump(&mut scene, &mut sync);
        assert_eq!(scene.position(ids[2]), Some(Point::new(40.0, 10.0)));
    }

    #[test]
    fn test_selected_ancestor_moves_instead_of_member() {
        let (mut scene, ids, mut sel) = setup(3);
        let group = scene.create(EntitySpec::group(vec![], Rect::new(-10.0, -10.0, 40.0, 20.0)));
        scene.embed(group, ids[0]).unwrap();
        scene.embed(group, ids[1]).unwrap();
        sel.select_all(&mut scene);

        let mut sync = DragSync::new();
        assert!(sync.begin(&scene, ids[0], &sel));
        let session = sync.session().unwrap();
        assert_eq!(session.primary, group);
        assert_eq!(session.followers, vec![ids[2]]);
        assert_eq!(sync.mover(ids[0]), group);
        assert_eq!(sync.mover(ids[2]), ids[2]);

        scene.translate(sync.mover(ids[0]), Vec2::new(10.0, 0.0), MoveOrigin::User).unwrap();
        pump(&mut scene, &mut sync);
        assert_eq!(scene.position(ids[0]), Some(Point::new(10.0, 0.0)));
        assert_eq!(scene.position(ids[1]), Some(Point::new(30.0, 0.0)));
        assert_eq!(scene.position(ids[2]), Some(Point::new(50.0, 0.0)));
        assert_eq!(scene.position(group), Some(Point::new(0.0, -10.0)));
    }

    #[test]
    fn test_end_tears_down() {
        let (mut scene, ids, sel) = setup(2);
        let mut sync = DragSync::new();
        sync.begin(&scene, ids[0], &sel);
        sync.end();
        assert!(!sync.is_active());

        scene.translate(ids[0], Vec2::new(3.0, 0.0), MoveOrigin::User).unwrap();
        pump(&mut scene, &mut sync);
        assert_eq!(scene.position(ids[1]), Some(Point::new(20.0, 0.0)));
    }
}
