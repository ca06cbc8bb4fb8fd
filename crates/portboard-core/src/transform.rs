//! Rotation and center-preserving resize.

use crate::error::{EditError, EditResult};
use crate::geometry::recenter_offset;
use crate::scene::{EntityId, EntityKind, MoveOrigin, SceneGraph, ShapeGeometry};
use crate::selection::SelectionSet;
use kurbo::{Size, Vec2};

/// Add `delta` degrees to the current rotation. Returns the new absolute angle.
pub fn rotate<S: SceneGraph + ?Sized>(scene: &mut S, id: EntityId, delta: f64) -> EditResult<f64> {
    if !delta.is_finite() {
        return Err(EditError::InvalidAngle(delta));
    }
    let current = scene.rotation(id).ok_or(EditError::MissingEntity(id))?;
    let angle = current + delta;
    scene.set_rotation(id, angle)?;
    Ok(angle)
}

/// Set the absolute rotation in degrees.
pub fn set_rotation<S: SceneGraph + ?Sized>(scene: &mut S, id: EntityId, angle: f64) -> EditResult<()> {
    if !angle.is_finite() {
        return Err(EditError::InvalidAngle(angle));
    }
    if !scene.contains(id) {
        return Err(EditError::MissingEntity(id));
    }
    scene.set_rotation(id, angle)?;
    Ok(())
}

/// Multiply width and height by `factor`, keeping the bounding-box center in place.
pub fn scale<S: SceneGraph + ?Sized>(scene: &mut S, id: EntityId, factor: f64) -> EditResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EditError::InvalidScale(factor));
    }
    let size = scene.size(id).ok_or(EditError::MissingEntity(id))?;
    resize_centered(scene, id, Size::new(size.width * factor, size.height * factor))
}

/// Resize to an explicit size, keeping the bounding-box center in place.
///
/// Polygon vertices and line endpoints are rescaled along with the box. A group
/// container is resized on its own; its members keep their place and size.
pub fn resize_centered<S: SceneGraph + ?Sized>(scene: &mut S, id: EntityId, size: Size) -> EditResult<()> {
    if !size.width.is_finite() || !size.height.is_finite() || size.width < 0.0 || size.height < 0.0 {
        return Err(EditError::InvalidSize {
            width: size.width,
            height: size.height,
        });
    }
    let before = scene.snapshot(id).ok_or(EditError::MissingEntity(id))?;

    scene.set_size(id, size)?;
    if let EntityKind::Shape(geometry) = &before.kind {
        let sx = axis_ratio(before.size.width, size.width);
        let sy = axis_ratio(before.size.height, size.height);
        if let Some(scaled) = scale_geometry(geometry, sx, sy) {
            scene.set_geometry(id, scaled)?;
        }
    }

    let after = scene.bounds(id).ok_or(EditError::MissingEntity(id))?;
    let offset = recenter_offset(before.bounds(), after);
    if offset != Vec2::ZERO {
        scene.translate(id, offset, MoveOrigin::User)?;
        if before.kind.is_group() {
            for child in scene.children(id) {
                scene.translate(child, -offset, MoveOrigin::Synthetic)?;
            }
        }
    }
    Ok(())
}

fn axis_ratio(old: f64, new: f64) -> f64 {
    if old > 0.0 { new / old } else { 1.0 }
}

/// Relative geometry stretched by (sx, sy). `None` when nothing changes.
fn scale_geometry(geometry: &ShapeGeometry, sx: f64, sy: f64) -> Option<ShapeGeometry> {
    let stretch = |v: Vec2| Vec2::new(v.x * sx, v.y * sy);
    match geometry {
        ShapeGeometry::Rectangle | ShapeGeometry::Ellipse => None,
        ShapeGeometry::Polygon(points) => {
            Some(ShapeGeometry::Polygon(points.iter().map(|p| stretch(*p)).collect()))
        }
        ShapeGeometry::Line { start, end } => Some(ShapeGeometry::Line {
            start: stretch(*start),
            end: stretch(*end),
        }),
    }
}

/// Resize the single selected entity.
pub fn set_size<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &SelectionSet,
    width: f64,
    height: f64,
) -> EditResult<()> {
    let id = selection
        .single()
        .ok_or(EditError::RequiresSingleSelection(selection.len()))?;
    resize_centered(scene, id, Size::new(width, height))
}

/// Rotate every selected entity by `delta` degrees about its own center.
pub fn rotate_selected<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &SelectionSet,
    delta: f64,
) -> EditResult<()> {
    if !delta.is_finite() {
        return Err(EditError::InvalidAngle(delta));
    }
    for id in selection.ordered(&*scene) {
        rotate(scene, id, delta)?;
    }
    Ok(())
}

/// Scale every selected entity about its own center.
pub fn scale_selected<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &SelectionSet,
    factor: f64,
) -> EditResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EditError::InvalidScale(factor));
    }
    for id in selection.ordered(&*scene) {
        scale(scene, id, factor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntitySpec, MemoryScene};
    use kurbo::{Point, Rect};

    fn rect(scene: &mut MemoryScene, x: f64, y: f64, w: f64, h: f64) -> EntityId {
        scene.create(EntitySpec::shape(
            ShapeGeometry::Rectangle,
            Point::new(x, y),
            Size::new(w, h),
        ))
    }

    #[test]
    fn test_rotation_is_absolute() {
        let mut scene = MemoryScene::new();
        let id = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        set_rotation(&mut scene, id, 45.0).unwrap();
        set_rotation(&mut scene, id, 45.0).unwrap();
        assert_eq!(scene.rotation(id), Some(45.0));

        assert_eq!(rotate(&mut scene, id, 30.0).unwrap(), 75.0);
        assert_eq!(rotate(&mut scene, id, 0.0).unwrap(), 75.0);
    }

    #[test]
    fn test_scale_preserves_center() {
        let mut scene = MemoryScene::new();
        let id = rect(&mut scene, 10.0, 20.0, 40.0, 30.0);
        let center = scene.bounds(id).unwrap().center();

        for factor in [2.0, 0.25, 1.0, 3.7] {
            scale(&mut scene, id, factor).unwrap();
            let now = scene.bounds(id).unwrap().center();
            assert!((now - center).hypot() < 1e-9, "center drifted at factor {}", factor);
        }
    }

    #[test]
    fn test_scale_values() {
        let mut scene = MemoryScene::new();
        let id = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        scale(&mut scene, id, 2.0).unwrap();
        assert_eq!(scene.bounds(id), Some(Rect::new(-5.0, -5.0, 15.0, 15.0)));
    }

    #[test]
    fn test_identity_scale_emits_no_move() {
        let mut scene = MemoryScene::new();
        let id = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        scene.take_position_changes();
        scale(&mut scene, id, 1.0).unwrap();
        assert!(scene.take_position_changes().is_empty());
    }

    #[test]
    fn test_scale_group_leaves_members_in_place() {
        let mut scene = MemoryScene::new();
        let a = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut scene, 20.0, 20.0, 10.0, 10.0);
        let group = scene.create(EntitySpec::group(vec![], Rect::new(-10.0, -10.0, 40.0, 40.0)));
        scene.embed(group, a).unwrap();
        scene.embed(group, b).unwrap();

        scale(&mut scene, group, 2.0).unwrap();
        assert_eq!(scene.bounds(group), Some(Rect::new(-35.0, -35.0, 65.0, 65.0)));
        assert_eq!(scene.bounds(a), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(scene.bounds(b), Some(Rect::new(20.0, 20.0, 30.0, 30.0)));
        assert_eq!(scene.children(group), vec![a, b]);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let mut scene = MemoryScene::new();
        let id = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(scale(&mut scene, id, 0.0), Err(EditError::InvalidScale(0.0)));
        assert!(scale(&mut scene, id, f64::NAN).is_err());
        assert_eq!(scene.size(id), Some(Size::new(10.0, 10.0)));
    }

    #[test]
    fn test_scale_stretches_polygon() {
        let mut scene = MemoryScene::new();
        let id = scene.create(EntitySpec::shape(
            ShapeGeometry::Polygon(vec![Vec2::new(5.0, 0.0), Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0)]),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        ));
        scale(&mut scene, id, 2.0).unwrap();
        assert_eq!(
            scene.kind(id),
            Some(EntityKind::Shape(ShapeGeometry::Polygon(vec![
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 20.0),
                Vec2::new(20.0, 20.0),
            ])))
        );
    }

    #[test]
    fn test_set_size_requires_single() {
        let mut scene = MemoryScene::new();
        let a = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut scene, 20.0, 0.0, 10.0, 10.0);
        let mut sel = SelectionSet::default();

        assert_eq!(
            set_size(&mut scene, &sel, 50.0, 50.0),
            Err(EditError::RequiresSingleSelection(0))
        );

        sel.select(&mut scene, a);
        sel.select(&mut scene, b);
        assert_eq!(
            set_size(&mut scene, &sel, 50.0, 50.0),
            Err(EditError::RequiresSingleSelection(2))
        );
        assert_eq!(scene.size(a), Some(Size::new(10.0, 10.0)));

        sel.deselect(&mut scene, b);
        set_size(&mut scene, &sel, 30.0, 20.0).unwrap();
        assert_eq!(scene.bounds(a), Some(Rect::new(-10.0, -5.0, 20.0, 15.0)));
    }

    #[test]
    fn test_rotate_selected() {
        let mut scene = MemoryScene::new();
        let a = rect(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut scene, 20.0, 0.0, 10.0, 10.0);
        let mut sel = SelectionSet::default();
        sel.select_all(&mut scene);
        rotate_selected(&mut scene, &sel, 90.0).unwrap();
        assert_eq!(scene.rotation(a), Some(90.0));
        assert_eq!(scene.rotation(b), Some(90.0));
    }
}
