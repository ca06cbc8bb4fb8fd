//! Tool system: exclusive activation of one tool per editing mode.

mod drawing;
mod marquee;
mod placement;

pub use drawing::{DrawOutcome, DrawShape, DrawState, DrawingTool};
pub use marquee::{MarqueeState, MarqueeTool};
pub use placement::{PlacementTool, PortedShape};

use crate::config::EditorConfig;
use crate::scene::{Cursor, EntityId, SceneGraph, SceneResult};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available editing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Rectangle,
    Circle,
    Triangle,
    PortedRectangle,
    PortedCircle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::PortedRectangle,
        ToolKind::PortedCircle,
    ];

    /// Stable name used for parsing and display.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::PortedRectangle => "ported-rectangle",
            ToolKind::PortedCircle => "ported-circle",
        }
    }

    /// Cursor shown while this mode is active.
    pub fn cursor(self) -> Cursor {
        match self {
            ToolKind::Select => Cursor::Default,
            _ => Cursor::Crosshair,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for ToolKind {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// The one live tool instance.
#[derive(Debug, Clone)]
pub enum ActiveTool {
    /// Select mode: blank-canvas drags become rubber-band selections.
    Select(MarqueeTool),
    Draw(DrawingTool),
    Place(PlacementTool),
}

impl ActiveTool {
    fn for_mode(mode: ToolKind, config: &EditorConfig) -> Self {
        match mode {
            ToolKind::Select => ActiveTool::Select(MarqueeTool::new()),
            ToolKind::Line => ActiveTool::Draw(DrawingTool::new(DrawShape::Line, config.min_shape_size)),
            ToolKind::Rectangle => {
                ActiveTool::Draw(DrawingTool::new(DrawShape::Rectangle, config.min_shape_size))
            }
            ToolKind::Circle => ActiveTool::Draw(DrawingTool::new(DrawShape::Circle, config.min_shape_size)),
            ToolKind::Triangle => {
                ActiveTool::Draw(DrawingTool::new(DrawShape::Triangle, config.min_shape_size))
            }
            ToolKind::PortedRectangle => ActiveTool::Place(PlacementTool::new(
                PortedShape::Rectangle,
                config.ported_rectangle_size,
            )),
            ToolKind::PortedCircle => {
                ActiveTool::Place(PlacementTool::new(PortedShape::Circle, config.ported_circle_size))
            }
        }
    }

    /// Check if a gesture is in progress.
    pub fn is_busy(&self) -> bool {
        match self {
            ActiveTool::Select(t) => t.is_dragging(),
            ActiveTool::Draw(t) => t.is_dragging(),
            ActiveTool::Place(_) => false,
        }
    }

    /// Abandon any in-progress gesture without committing anything.
    fn deactivate<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        match self {
            ActiveTool::Select(t) => {
                t.cancel(scene);
                Ok(())
            }
            ActiveTool::Draw(t) => t.cancel(scene),
            ActiveTool::Place(_) => Ok(()),
        }
    }
}

/// What a blank-canvas gesture step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Nothing to report (preview updated, event ignored, ...).
    None,
    /// A drawn shape was kept.
    Committed(EntityId),
    /// A drawn shape was too small and was removed.
    Discarded,
    /// A ported shape was placed.
    Placed(EntityId),
    /// A rubber-band gesture finished over these entities.
    AreaSelected(Vec<EntityId>),
}

/// Manages the current mode and its tool.
#[derive(Debug, Clone)]
pub struct ToolController {
    mode: ToolKind,
    active: ActiveTool,
}

impl ToolController {
    /// Start in select mode.
    pub fn new() -> Self {
        Self {
            mode: ToolKind::Select,
            active: ActiveTool::Select(MarqueeTool::new()),
        }
    }

    /// Currently selected mode.
    pub fn current_mode(&self) -> ToolKind {
        self.mode
    }

    pub fn active(&self) -> &ActiveTool {
        &self.active
    }

    /// Switch modes: deactivate the current tool, activate the next, update the cursor.
    pub fn set_mode<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        mode: ToolKind,
        config: &EditorConfig,
    ) -> SceneResult<()> {
        let result = self.active.deactivate(scene);
        log::debug!("Tool {} -> {}", self.mode, mode);
        self.mode = mode;
        self.active = ActiveTool::for_mode(mode, config);
        scene.set_cursor(mode.cursor());
        result
    }

    /// Switch modes by name. Unknown names only reset the cursor.
    pub fn set_mode_by_name<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        name: &str,
        config: &EditorConfig,
    ) -> SceneResult<bool> {
        match name.parse::<ToolKind>() {
            Ok(mode) => self.set_mode(scene, mode, config).map(|_| true),
            Err(e) => {
                log::warn!("{}", e);
                scene.set_cursor(Cursor::Default);
                Ok(false)
            }
        }
    }

    /// Abandon the current gesture, keeping the mode.
    pub fn cancel_gesture<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        self.active.deactivate(scene)
    }

    /// Pointer went down on empty canvas.
    pub fn drag_start<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<ToolOutcome> {
        match &mut self.active {
            ActiveTool::Select(t) => {
                t.drag_start(scene, point);
                Ok(ToolOutcome::None)
            }
            ActiveTool::Draw(t) => {
                t.drag_start(scene, point, axis_lock)?;
                Ok(ToolOutcome::None)
            }
            ActiveTool::Place(t) => Ok(ToolOutcome::Placed(t.place(scene, point))),
        }
    }

    /// Pointer moved during a blank-canvas gesture.
    pub fn drag_move<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<ToolOutcome> {
        match &mut self.active {
            ActiveTool::Select(t) => t.drag_move(scene, point),
            ActiveTool::Draw(t) => t.drag_move(scene, point, axis_lock)?,
            ActiveTool::Place(_) => {}
        }
        Ok(ToolOutcome::None)
    }

    /// Pointer released at the end of a blank-canvas gesture.
    pub fn drag_end<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        point: Point,
        axis_lock: bool,
    ) -> SceneResult<ToolOutcome> {
        let outcome = match &mut self.active {
            ActiveTool::Select(t) => match t.drag_end(scene, point) {
                Some(hits) => ToolOutcome::AreaSelected(hits),
                None => ToolOutcome::None,
            },
            ActiveTool::Draw(t) => match t.drag_end(scene, point, axis_lock)? {
                Some(DrawOutcome::Committed(id)) => ToolOutcome::Committed(id),
                Some(DrawOutcome::Discarded) => ToolOutcome::Discarded,
                None => ToolOutcome::None,
            },
            ActiveTool::Place(_) => ToolOutcome::None,
        };
        Ok(outcome)
    }
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    #[test]
    fn test_tool_selection() {
        let mut scene = MemoryScene::new();
        let config = EditorConfig::default();
        let mut tc = ToolController::new();
        assert_eq!(tc.current_mode(), ToolKind::Select);

        tc.set_mode(&mut scene, ToolKind::Rectangle, &config).unwrap();
        assert_eq!(tc.current_mode(), ToolKind::Rectangle);
        assert_eq!(scene.cursor(), Cursor::Crosshair);
        assert!(matches!(tc.active(), ActiveTool::Draw(t) if t.shape() == DrawShape::Rectangle));

        tc.set_mode(&mut scene, ToolKind::Select, &config).unwrap();
        assert_eq!(scene.cursor(), Cursor::Default);
    }

    #[test]
    fn test_switching_mid_gesture_discards_preview() {
        let mut scene = MemoryScene::new();
        let config = EditorConfig::default();
        let mut tc = ToolController::new();
        tc.set_mode(&mut scene, ToolKind::Circle, &config).unwrap();

        tc.drag_start(&mut scene, Point::new(50.0, 50.0), false).unwrap();
        tc.drag_move(&mut scene, Point::new(90.0, 50.0), false).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(tc.active().is_busy());

        tc.set_mode(&mut scene, ToolKind::Line, &config).unwrap();
        assert!(scene.is_empty());
        assert!(!tc.active().is_busy());
    }

    #[test]
    fn test_unknown_mode_name() {
        let mut scene = MemoryScene::new();
        let config = EditorConfig::default();
        let mut tc = ToolController::new();
        tc.set_mode(&mut scene, ToolKind::Triangle, &config).unwrap();

        assert!(!tc.set_mode_by_name(&mut scene, "hexagon", &config).unwrap());
        assert_eq!(tc.current_mode(), ToolKind::Triangle);
        assert_eq!(scene.cursor(), Cursor::Default);

        assert!(tc.set_mode_by_name(&mut scene, "ported-circle", &config).unwrap());
        assert_eq!(tc.current_mode(), ToolKind::PortedCircle);
    }

    #[test]
    fn test_mode_names_parse_back() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.to_string().parse::<ToolKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_select_mode_draws_nothing() {
        let mut scene = MemoryScene::new();
        let mut tc = ToolController::new();
        tc.drag_start(&mut scene, Point::new(0.0, 0.0), false).unwrap();
        let outcome = tc.drag_end(&mut scene, Point::new(100.0, 100.0), false).unwrap();
        assert_eq!(outcome, ToolOutcome::AreaSelected(Vec::new()));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_placement_on_pointer_down() {
        let mut scene = MemoryScene::new();
        let config = EditorConfig::default();
        let mut tc = ToolController::new();
        tc.set_mode(&mut scene, ToolKind::PortedRectangle, &config).unwrap();

        let outcome = tc.drag_start(&mut scene, Point::new(100.0, 100.0), false).unwrap();
        let ToolOutcome::Placed(id) = outcome else {
            panic!("expected placement, got {:?}", outcome);
        };
        assert_eq!(scene.position(id), Some(Point::new(50.0, 70.0)));
        assert_eq!(tc.drag_end(&mut scene, Point::new(100.0, 100.0), false).unwrap(), ToolOutcome::None);
    }
}
