//! Portboard Core Library
//!
//! Editing engine for a port-based diagram canvas: drawing tools, selection,
//! grouping, transforms and drag propagation over an external scene graph.

pub mod area;
pub mod clipboard;
pub mod config;
pub mod drag_sync;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod group;
pub mod input;
pub mod scene;
pub mod selection;
pub mod tools;
pub mod transform;

pub use area::entities_intersecting;
pub use clipboard::Clipboard;
pub use config::{ConfigError, EditorConfig};
pub use drag_sync::{DragSession, DragSync};
pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use input::{EditorCommand, InputState, Key, KeyEvent, Modifiers, PointerEvent, PointerTarget, Shortcut, ShortcutRegistry};
pub use scene::{
    Cursor, Decoration, EntityId, EntityKind, EntitySpec, MemoryScene, MoveOrigin, Port, PortPosition, PortSide,
    PositionChange, SceneError, SceneGraph, SceneResult, ShapeGeometry,
};
pub use selection::SelectionSet;
pub use tools::{ActiveTool, ToolController, ToolKind, ToolOutcome, UnknownMode};
