//! Area query: which entities a rectangle touches.

use crate::geometry::{aabb_intersects, normalized_rect};
use crate::scene::{EntityId, SceneGraph};
use kurbo::Point;

/// Every entity whose bounding box overlaps the rectangle spanned by the two corners.
/// Touching edges count as overlap. Order follows the scene's enumeration.
pub fn entities_intersecting<S: SceneGraph + ?Sized>(
    scene: &S,
    start: Point,
    end: Point,
) -> Vec<EntityId> {
    let area = normalized_rect(start, end);
    scene
        .entities()
        .into_iter()
        .filter(|&id| scene.bounds(id).is_some_and(|b| aabb_intersects(area, b)))
        .collect()
}
