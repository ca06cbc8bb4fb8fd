//! Geometry helpers shared by the tools and operators.
//!
//! Everything in here is pure: no scene access, no state.

use kurbo::{Point, Rect, Vec2};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Constrain `current` so the segment from `anchor` is horizontal or vertical.
///
/// The axis with the larger absolute delta stays free; the other snaps to the
/// anchor. On a tie the x coordinate snaps, producing a vertical segment.
pub fn axis_lock(anchor: Point, current: Point) -> Point {
    let dx = (current.x - anchor.x).abs();
    let dy = (current.y - anchor.y).abs();
    if dx > dy {
        Point::new(current.x, anchor.y)
    } else {
        Point::new(anchor.x, current.y)
    }
}

/// Axis-aligned rectangle spanned by two corner points, in any order.
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Union of a set of boxes: min of mins, max of maxes.
/// Returns `None` for an empty input.
pub fn union_bounds<I>(boxes: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    boxes.into_iter().fold(None, |acc, r| {
        Some(match acc {
            Some(u) => u.union(r),
            None => r,
        })
    })
}

/// AABB overlap test. Boxes that only touch along an edge count as overlapping.
pub fn aabb_intersects(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 > b.x1 || a.y1 < b.y0 || a.y0 > b.y1)
}

/// Translation that brings the center of `after` back onto the center of `before`.
pub fn recenter_offset(before: Rect, after: Rect) -> Vec2 {
    before.center() - after.center()
}

/// Vertices of the isosceles triangle dragged from `anchor` to `current`.
///
/// Order is apex, base-left, base-right. The apex sits at the horizontal
/// midpoint on the anchor's row and the base lies on the current row.
pub fn isosceles_triangle(anchor: Point, current: Point) -> [Point; 3] {
    let width = current.x - anchor.x;
    let height = current.y - anchor.y;
    [
        Point::new(anchor.x + width / 2.0, anchor.y),
        Point::new(anchor.x, anchor.y + height),
        Point::new(current.x, anchor.y + height),
    ]
}

/// Bounding box of an arbitrary point set.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    union_bounds(points.iter().map(|p| Rect::from_points(*p, *p)))
}
