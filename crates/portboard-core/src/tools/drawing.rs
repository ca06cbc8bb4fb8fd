//! Drag-drawn shapes: rectangle, circle, triangle and line.

use crate::geometry::{axis_lock, distance, isosceles_triangle, normalized_rect, points_bounds};
use crate::scene::{EntityId, EntitySpec, Port, SceneGraph, SceneResult, ShapeGeometry};
use kurbo::{Point, Rect, Size, Vec2};

/// Shape a drawing tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawShape {
    Rectangle,
    Circle,
    Triangle,
    Line,
}

/// State of a drawing gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DrawState {
    /// Waiting for a drag to start.
    #[default]
    Idle,
    /// A drag is in progress and `preview` tracks it.
    Dragging {
        anchor: Point,
        preview: EntityId,
        axis_lock: bool,
    },
}

/// Result of a finished drawing gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Committed(EntityId),
    /// Final shape fell below the minimum size and was removed.
    Discarded,
}

/// Geometry computed from an anchor and the current pointer.
#[derive(Debug, Clone, PartialEq)]
struct Layout {
    position: Point,
    size: Size,
    geometry: ShapeGeometry,
    /// Dimension compared against the minimum size.
    primary: f64,
}

impl Layout {
    fn compute(shape: DrawShape, anchor: Point, current: Point, locked: bool) -> Self {
        match shape {
            DrawShape::Rectangle => {
                let rect = normalized_rect(anchor, current);
                Self {
                    position: rect.origin(),
                    size: rect.size(),
                    geometry: ShapeGeometry::Rectangle,
                    primary: rect.width().min(rect.height()),
                }
            }
            DrawShape::Circle => {
                let radius = distance(anchor, current);
                Self {
                    position: anchor - Vec2::new(radius, radius),
                    size: Size::new(radius * 2.0, radius * 2.0),
                    geometry: ShapeGeometry::Ellipse,
                    primary: radius * 2.0,
                }
            }
            DrawShape::Triangle => {
                let points = isosceles_triangle(anchor, current);
                let bbox = points_bounds(&points).unwrap_or_else(|| Rect::from_points(anchor, anchor));
                let origin = bbox.origin();
                Self {
                    position: origin,
                    size: bbox.size(),
                    geometry: ShapeGeometry::Polygon(points.iter().map(|p| *p - origin).collect()),
                    primary: (current.x - anchor.x).abs().min((current.y - anchor.y).abs()),
                }
            }
            DrawShape::Line => {
                let end = if locked { axis_lock(anchor, current) } else { current };
                let rect = normalized_rect(anchor, end);
                let origin = rect.origin();
                Self {
                    position: origin,
                    size: Size::new(rect.width().max(1.0), rect.height().max(1.0)),
                    geometry: ShapeGeometry::Line {
                        start: anchor - origin,
                        end: end - origin,
                    },
                    primary: distance(anchor, end),
                }
            }
        }
    }

    /// Minimal preview created on drag start.
    fn initial(shape: DrawShape, anchor: Point) -> Self {
        match shape {
            DrawShape::Rectangle => Self {
                position: anchor,
                size: Size::new(1.0, 1.0),
                geometry: ShapeGeometry::Rectangle,
                primary: 1.0,
            },
            DrawShape::Circle => Self {
                position: anchor - Vec2::new(1.0, 1.0),
                size: Size::new(2.0, 2.0),
                geometry: ShapeGeometry::Ellipse,
                primary: 2.0,
            },
            DrawShape::Triangle | DrawShape::Line => Self::compute(shape, anchor, anchor, false),
        }
    }

    fn spec(&self) -> EntitySpec {
        EntitySpec::shape(self.geometry.clone(), self.position, self.size)
    }

    /// Apply this layout to an existing entity in place.
    fn apply<S: SceneGraph + ?Sized>(&self, scene: &mut S, id: EntityId) -> SceneResult<()> {
        scene.set_position(id, self.position)?;
        scene.set_size(id, self.size)?;
        scene.set_geometry(id, self.geometry.clone())
    }
}

/// Connection anchors carried by a committed line.
fn line_ports(geometry: &ShapeGeometry) -> Vec<Port> {
    match geometry {
        ShapeGeometry::Line { start, end } => vec![
            Port::at_offset("start", "connection", *start),
            Port::at_offset("end", "connection", *end),
        ],
        _ => Vec::new(),
    }
}

/// A tool that draws one kind of shape by dragging on empty canvas.
#[derive(Debug, Clone)]
pub struct DrawingTool {
    shape: DrawShape,
    state: DrawState,
    min_size: f64,
}

impl DrawingTool {
    pub fn new(shape: DrawShape, min_size: f64) -> Self {
        Self {
            shape,
            state: DrawState::Idle,
            min_size,
        }
    }

    pub fn shape(&self) -> DrawShape {
        self.shape
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DrawState::Dragging { .. })
    }

    /// Preview entity of the current drag, if any.
    pub fn preview(&self) -> Option<EntityId> {
        match self.state {
            DrawState::Dragging { preview, .. } => Some(preview),
            DrawState::Idle => None,
        }
    }

    /// Record the anchor and create the preview entity.
    pub fn drag_start<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<()> {
        // A stray second start must not orphan the first preview.
        self.cancel(scene)?;
        let preview = scene.create(Layout::initial(self.shape, point).spec());
        log::debug!("{:?} preview {} started at {:?}", self.shape, preview, point);
        self.state = DrawState::Dragging {
            anchor: point,
            preview,
            axis_lock,
        };
        Ok(())
    }

    /// Reshape the preview to follow the pointer. Ignored while idle.
    pub fn drag_move<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<()> {
        let DrawState::Dragging {
            anchor,
            preview,
            axis_lock: locked,
        } = &mut self.state
        else {
            return Ok(());
        };
        *locked = axis_lock;
        Layout::compute(self.shape, *anchor, point, axis_lock).apply(scene, *preview)
    }

    /// Finish the drag: keep the shape or discard it if it is too small.
    /// Returns `None` when no drag was in progress. On error the preview is
    /// removed rather than left without an owner.
    pub fn drag_end<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<Option<DrawOutcome>> {
        let DrawState::Dragging { anchor, preview, .. } = std::mem::take(&mut self.state) else {
            return Ok(None);
        };

        let layout = Layout::compute(self.shape, anchor, point, axis_lock);
        let result = self.finish(scene, layout, preview);
        if result.is_err() && scene.contains(preview) {
            if let Err(err) = scene.remove(preview) {
                log::warn!("Failed to drop {:?} preview {}: {}", self.shape, preview, err);
            }
        }
        result.map(Some)
    }

    fn finish<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        layout: Layout,
        preview: EntityId,
    ) -> SceneResult<DrawOutcome> {
        if layout.primary < self.min_size {
            scene.remove(preview)?;
            log::debug!("{:?} discarded, {} below minimum {}", self.shape, layout.primary, self.min_size);
            return Ok(DrawOutcome::Discarded);
        }

        let committed = match self.shape {
            DrawShape::Line => {
                // The final line is recreated so it carries its endpoint anchors.
                let spec = layout.spec().with_ports(line_ports(&layout.geometry));
                scene.remove(preview)?;
                scene.create(spec)
            }
            _ => {
                layout.apply(scene, preview)?;
                preview
            }
        };
        log::debug!("{:?} committed as {}", self.shape, committed);
        Ok(DrawOutcome::Committed(committed))
    }

    /// Abandon the drag, removing the preview. The drag stays in progress if
    /// the preview cannot be removed.
    pub fn cancel<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        if let DrawState::Dragging { preview, .. } = self.state {
            log::debug!("{:?} preview {} cancelled", self.shape, preview);
            if scene.contains(preview) {
                scene.remove(preview)?;
            }
            self.state = DrawState::Idle;
        }
        Ok(())
    }
}
