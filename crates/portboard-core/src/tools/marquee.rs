//! Rubber-band selection gesture.

use crate::area::entities_intersecting;
use crate::geometry::normalized_rect;
use crate::scene::{EntityId, SceneGraph};
use kurbo::Point;

/// State of a rubber-band drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MarqueeState {
    #[default]
    Idle,
    Dragging { anchor: Point, current: Point },
}

/// Drags out an overlay rectangle and reports what it covers.
#[derive(Debug, Clone, Default)]
pub struct MarqueeTool {
    state: MarqueeState,
}

impl MarqueeTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MarqueeState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MarqueeState::Dragging { .. })
    }

    pub fn drag_start<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, point: Point) {
        self.state = MarqueeState::Dragging {
            anchor: point,
            current: point,
        };
        scene.show_overlay(normalized_rect(point, point));
    }

    pub fn drag_move<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, point: Point) {
        if let MarqueeState::Dragging { anchor, current } = &mut self.state {
            *current = point;
            scene.show_overlay(normalized_rect(*anchor, point));
        }
    }

    /// Hide the overlay and return every entity the band touches.
    pub fn drag_end<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
    ) -> Option<Vec<EntityId>> {
        let MarqueeState::Dragging { anchor, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        scene.hide_overlay();
        let hits = entities_intersecting(&*scene, anchor, point);
        log::debug!("Rubber band {:?} -> {:?} hit {} entities", anchor, point, hits.len());
        Some(hits)
    }

    pub fn cancel<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        if self.is_dragging() {
            scene.hide_overlay();
        }
        self.state = MarqueeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntitySpec, MemoryScene, ShapeGeometry};
    use kurbo::{Rect, Size};

    #[test]
    fn test_overlay_follows_drag() {
        let mut scene = MemoryScene::new();
        let a = scene.create(EntitySpec::shape(
            ShapeGeometry::Rectangle,
            Point::new(10.0, 10.0),
            Size::new(10.0, 10.0),
        ));
        scene.create(EntitySpec::shape(
            ShapeGeometry::Rectangle,
            Point::new(200.0, 200.0),
            Size::new(10.0, 10.0),
        ));

        let mut tool = MarqueeTool::new();
        tool.drag_start(&mut scene, Point::new(50.0, 50.0));
        tool.drag_move(&mut scene, Point::new(0.0, 0.0));
        assert_eq!(scene.overlay(), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));

        let hits = tool.drag_end(&mut scene, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(hits, vec![a]);
        assert_eq!(scene.overlay(), None);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_idle_end_ignored() {
        let mut scene = MemoryScene::new();
        let mut tool = MarqueeTool::new();
        tool.drag_move(&mut scene, Point::new(5.0, 5.0));
        assert_eq!(tool.drag_end(&mut scene, Point::new(5.0, 5.0)), None);
        assert_eq!(scene.overlay(), None);
    }

    #[test]
    fn test_cancel_hides_overlay() {
        let mut scene = MemoryScene::new();
        let mut tool = MarqueeTool::new();
        tool.drag_start(&mut scene, Point::new(5.0, 5.0));
        assert!(scene.overlay().is_some());
        tool.cancel(&mut scene);
        assert_eq!(scene.overlay(), None);
    }
}
