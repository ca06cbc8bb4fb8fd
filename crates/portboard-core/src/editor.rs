//! The editor: routes pointer and key events to tools, selection and operators.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::drag_sync::DragSync;
use crate::error::{EditError, EditResult};
use crate::geometry::distance;
use crate::group;
use crate::input::{EditorCommand, InputState, KeyEvent, Modifiers, PointerEvent, PointerTarget};
use crate::scene::{EntityId, MoveOrigin, SceneGraph};
use crate::selection::SelectionSet;
use crate::tools::{ToolController, ToolKind, ToolOutcome};
use crate::transform;
use kurbo::{Point, Vec2};

/// A pointer gesture between Down and Up.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    target: PointerTarget,
    start: Point,
    last: Point,
    /// Pointer left the click tolerance at some point.
    moved: bool,
}

/// Editing session state for one scene.
///
/// Handlers never panic on bad input: events that make no sense in the current
/// state are dropped, and scene failures are logged and drop the event.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    tools: ToolController,
    selection: SelectionSet,
    drag_sync: DragSync,
    input: InputState,
    clipboard: Clipboard,
    gesture: Option<Gesture>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            selection: SelectionSet::new(&config),
            config,
            tools: ToolController::new(),
            drag_sync: DragSync::new(),
            input: InputState::new(),
            clipboard: Clipboard::new(),
            gesture: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn current_mode(&self) -> ToolKind {
        self.tools.current_mode()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.input.modifiers
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn drag_sync(&self) -> &DragSync {
        &self.drag_sync
    }

    /// Check if a pointer gesture is in progress.
    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Switch editing mode, abandoning any in-progress drawing or rubber band.
    pub fn set_mode<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, mode: ToolKind) -> EditResult<()> {
        self.drop_blank_gesture();
        self.tools.set_mode(scene, mode, &self.config)?;
        Ok(())
    }

    /// Switch mode by name. Unknown names only reset the cursor; returns whether the mode changed.
    pub fn set_mode_by_name<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, name: &str) -> EditResult<bool> {
        let switched = self.tools.set_mode_by_name(scene, name, &self.config)?;
        if switched {
            self.drop_blank_gesture();
        }
        Ok(switched)
    }

    fn drop_blank_gesture(&mut self) {
        if matches!(self.gesture, Some(g) if g.target == PointerTarget::Blank) {
            self.gesture = None;
        }
    }

    /// Handle a pointer event.
    pub fn handle_pointer_event<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, event: PointerEvent) {
        let result = match event {
            PointerEvent::Down { position, target } => self.pointer_down(scene, position, target),
            PointerEvent::Move { position } => self.pointer_move(scene, position),
            PointerEvent::Up { position } => self.pointer_up(scene, position),
        };
        if let Err(e) = result {
            log::warn!("Dropped {:?}: {}", event, e);
        }
    }

    /// Handle a key event: track modifiers and run any bound shortcut.
    pub fn handle_key_event<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, event: KeyEvent) {
        let Some(command) = self.input.handle_key_event(event) else {
            return;
        };
        if let Err(e) = self.execute(scene, command) {
            log::warn!("{:?} failed: {}", command, e);
        }
    }

    /// Run an editor command.
    pub fn execute<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, command: EditorCommand) -> EditResult<()> {
        self.selection.retain_live(scene);
        match command {
            EditorCommand::SelectAll => self.selection.select_all(scene),
            EditorCommand::ClearSelection => self.selection.clear(scene),
            EditorCommand::DeleteSelected => {
                self.selection.delete_selected(scene)?;
            }
            EditorCommand::Group => {
                self.group_selected(scene)?;
            }
            EditorCommand::Ungroup => {
                self.ungroup_selected(scene)?;
            }
            EditorCommand::Copy => {
                self.copy_selected(&*scene);
            }
            EditorCommand::Paste => {
                self.paste(scene);
            }
        }
        Ok(())
    }

    fn pointer_down<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        position: Point,
        target: PointerTarget,
    ) -> EditResult<()> {
        // A Down without the previous Up: abandon the old gesture.
        if self.gesture.take().is_some() {
            self.tools.cancel_gesture(scene)?;
            self.drag_sync.end();
        }

        match target {
            PointerTarget::Blank => {
                let outcome = self.tools.drag_start(scene, position, self.input.modifiers.axis_lock())?;
                if let ToolOutcome::Placed(id) = outcome {
                    log::debug!("Placed {} in {} mode", id, self.tools.current_mode());
                }
            }
            PointerTarget::Entity(id) => {
                if !scene.contains(id) {
                    return Err(EditError::MissingEntity(id));
                }
                self.selection.retain_live(scene);
                self.drag_sync.begin(&*scene, id, &self.selection);
            }
        }

        self.gesture = Some(Gesture {
            target,
            start: position,
            last: position,
            moved: false,
        });
        Ok(())
    }

    fn pointer_move<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, position: Point) -> EditResult<()> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(());
        };
        if distance(gesture.start, position) > self.config.click_tolerance {
            gesture.moved = true;
        }
        let last = std::mem::replace(&mut gesture.last, position);
        let target = gesture.target;

        match target {
            PointerTarget::Blank => {
                self.tools.drag_move(scene, position, self.input.modifiers.axis_lock())?;
            }
            PointerTarget::Entity(id) => self.drag_entity(scene, id, position - last)?,
        }
        Ok(())
    }

    fn pointer_up<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, position: Point) -> EditResult<()> {
        let Some(mut gesture) = self.gesture.take() else {
            return Ok(());
        };
        if distance(gesture.start, position) > self.config.click_tolerance {
            gesture.moved = true;
        }
        let modifiers = self.input.modifiers;

        match gesture.target {
            PointerTarget::Blank => {
                let is_click = !gesture.moved;
                if is_click && self.tools.current_mode() == ToolKind::Select {
                    // No rubber band for a plain click.
                    self.tools.cancel_gesture(scene)?;
                } else {
                    match self.tools.drag_end(scene, position, modifiers.axis_lock())? {
                        ToolOutcome::AreaSelected(hits) => self.selection.select_only(scene, hits),
                        ToolOutcome::Committed(id) => log::debug!("Drew {}", id),
                        ToolOutcome::Discarded | ToolOutcome::Placed(_) | ToolOutcome::None => {}
                    }
                }
                self.pump_notifications(scene)?;
                if is_click {
                    self.selection.click(scene, PointerTarget::Blank, modifiers);
                }
            }
            PointerTarget::Entity(id) => {
                let result = self.drag_entity(scene, id, position - gesture.last);
                self.drag_sync.end();
                result?;
                if !gesture.moved {
                    self.selection.click(scene, gesture.target, modifiers);
                }
            }
        }
        Ok(())
    }

    /// Move the pressed entity by a pointer delta and let followers catch up.
    /// A selected ancestor of the pressed entity moves in its place.
    fn drag_entity<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId, delta: Vec2) -> EditResult<()> {
        let mover = self.drag_sync.mover(id);
        if delta != Vec2::ZERO && scene.contains(mover) {
            scene.translate(mover, delta, MoveOrigin::User)?;
        }
        self.pump_notifications(scene)
    }

    /// Drain scene notifications until none are left, feeding each to drag-sync.
    pub fn pump_notifications<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> EditResult<()> {
        loop {
            let changes = scene.take_position_changes();
            if changes.is_empty() {
                return Ok(());
            }
            for change in &changes {
                self.drag_sync.on_position_change(scene, change)?;
            }
        }
    }

    /// Select a single entity, replacing the selection.
    pub fn select<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) {
        self.selection.select_only(scene, [id]);
    }

    /// Add an entity to the selection.
    pub fn add_to_selection<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) -> bool {
        self.selection.select(scene, id)
    }

    pub fn deselect<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) -> bool {
        self.selection.deselect(scene, id)
    }

    pub fn clear_selection<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        self.selection.clear(scene);
    }

    pub fn select_all<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        self.selection.select_all(scene);
    }

    /// Delete selected entities. Returns how many were removed.
    pub fn delete_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> EditResult<usize> {
        Ok(self.selection.delete_selected(scene)?)
    }

    /// Group the selection with the configured padding.
    pub fn group_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> EditResult<EntityId> {
        group::group_selected(scene, &mut self.selection, self.config.group_padding)
    }

    /// Ungroup selected groups. Returns whether anything was ungrouped.
    pub fn ungroup_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> EditResult<bool> {
        group::ungroup_selected(scene, &mut self.selection)
    }

    pub fn has_group_selected<S: SceneGraph + ?Sized>(&self, scene: &S) -> bool {
        group::has_group_selected(scene, &self.selection)
    }

    /// Refit a group's container to its content with the configured padding.
    pub fn refit_group<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, id: EntityId) -> EditResult<kurbo::Rect> {
        group::refit(scene, id, self.config.group_padding)
    }

    pub fn copy_selected<S: SceneGraph + ?Sized>(&mut self, scene: &S) -> bool {
        self.clipboard.copy_selected(scene, &self.selection)
    }

    /// Paste the clipboard at the configured offset. Returns the new entities.
    pub fn paste<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Vec<EntityId> {
        self.clipboard
            .paste(scene, &mut self.selection, self.config.paste_offset)
    }

    pub fn rotate_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, delta: f64) -> EditResult<()> {
        transform::rotate_selected(scene, &self.selection, delta)
    }

    pub fn scale_selected<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, factor: f64) -> EditResult<()> {
        transform::scale_selected(scene, &self.selection, factor)?;
        self.pump_notifications(scene)
    }

    /// Resize the single selected entity about its center.
    pub fn set_size<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, width: f64, height: f64) -> EditResult<()> {
        transform::set_size(scene, &self.selection, width, height)?;
        self.pump_notifications(scene)
    }

    /// Enable or disable transform handles for a single selection.
    pub fn set_transform_handles<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, enabled: bool) {
        self.config.transform_handles = enabled;
        self.selection.set_transform_handles(scene, enabled);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
