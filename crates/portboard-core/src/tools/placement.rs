//! Single-click placement of fixed-size shapes with a connection anchor.

use crate::scene::{EntityId, EntitySpec, Port, PortSide, SceneGraph, ShapeGeometry};
use kurbo::{Point, Size, Vec2};

/// Outline of a placed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortedShape {
    Rectangle,
    Circle,
}

/// Places a ported shape centered on the click point.
#[derive(Debug, Clone)]
pub struct PlacementTool {
    shape: PortedShape,
    size: Size,
}

impl PlacementTool {
    pub fn new(shape: PortedShape, size: Size) -> Self {
        Self { shape, size }
    }

    pub fn shape(&self) -> PortedShape {
        self.shape
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Create the shape centered on `center` with one outward anchor on the right.
    pub fn place<S: SceneGraph + ?Sized>(&self, scene: &mut S, center: Point) -> EntityId {
        let geometry = match self.shape {
            PortedShape::Rectangle => ShapeGeometry::Rectangle,
            PortedShape::Circle => ShapeGeometry::Ellipse,
        };
        let position = center - Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        let spec = EntitySpec::shape(geometry, position, self.size)
            .with_ports(vec![Port::on_side("port1", "default", PortSide::Right)]);
        let id = scene.create(spec);
        log::debug!("Placed ported {:?} {} at {:?}", self.shape, id, center);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, PortPosition};
    use kurbo::Rect;

    #[test]
    fn test_ported_rectangle() {
        let mut scene = MemoryScene::new();
        let tool = PlacementTool::new(PortedShape::Rectangle, Size::new(100.0, 60.0));
        let id = tool.place(&mut scene, Point::new(100.0, 100.0));

        let snap = scene.snapshot(id).unwrap();
        assert_eq!(snap.bounds(), Rect::new(50.0, 70.0, 150.0, 130.0));
        assert_eq!(snap.ports.len(), 1);
        assert_eq!(snap.ports[0].id, "port1");
        assert_eq!(snap.ports[0].group, "default");
        assert_eq!(snap.ports[0].position, PortPosition::Side(PortSide::Right));
    }

    #[test]
    fn test_ported_circle_centered() {
        let mut scene = MemoryScene::new();
        let tool = PlacementTool::new(PortedShape::Circle, Size::new(80.0, 80.0));
        let id = tool.place(&mut scene, Point::new(0.0, 0.0));
        assert_eq!(scene.bounds(id).map(|b| b.center()), Some(Point::new(0.0, 0.0)));
    }
}
