//! Input events, modifier tracking and keyboard shortcuts.
//!
//! The host feeds pointer and key events in; nothing here reads global state.

use crate::scene::EntityId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Keys the editor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Shift,
    Control,
    Meta,
    Alt,
    Escape,
    Delete,
    Backspace,
    Char(char),
}

impl Key {
    fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Modifier that toggles selection membership on click.
    pub fn toggles_selection(&self) -> bool {
        self.command()
    }

    /// Modifier that constrains lines to horizontal/vertical.
    pub fn axis_lock(&self) -> bool {
        self.shift
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// Empty canvas.
    Blank,
    Entity(EntityId),
}

/// Pointer event in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, target: PointerTarget },
    Move { position: Point },
    Up { position: Point },
}

/// Keyboard event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Editor operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorCommand {
    SelectAll,
    ClearSelection,
    DeleteSelected,
    Group,
    Ungroup,
    Copy,
    Paste,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub key: Key,
    /// Ctrl (or Cmd) must be held.
    pub command: bool,
    pub shift: bool,
    pub action: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        command: bool,
        shift: bool,
        action: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+G").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
            other => format!("{:?}", other),
        });
        parts.join("+")
    }

    /// Plain-key shortcuts fire whatever modifiers are held.
    fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        if self.key != key.normalized() {
            return false;
        }
        if !self.command && !self.shift {
            return true;
        }
        self.command == modifiers.command() && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::Char('a'), true, false, EditorCommand::SelectAll, "Select all entities"),
            Shortcut::new(Key::Escape, false, false, EditorCommand::ClearSelection, "Clear selection"),
            Shortcut::new(Key::Delete, false, false, EditorCommand::DeleteSelected, "Delete selected entities"),
            Shortcut::new(Key::Backspace, false, false, EditorCommand::DeleteSelected, "Delete selected entities"),
            Shortcut::new(Key::Char('g'), true, false, EditorCommand::Group, "Group selected entities"),
            Shortcut::new(Key::Char('g'), true, true, EditorCommand::Ungroup, "Ungroup selected groups"),
            Shortcut::new(Key::Char('c'), true, false, EditorCommand::Copy, "Copy selected entities"),
            Shortcut::new(Key::Char('v'), true, false, EditorCommand::Paste, "Paste entities"),
        ]
    }

    /// Find the command bound to a key press under the given modifiers.
    pub fn lookup(key: Key, modifiers: Modifiers) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.action)
    }
}

/// Tracks held modifier keys across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update modifier state. Returns the shortcut command a press triggers, if any.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Option<EditorCommand> {
        match event {
            KeyEvent::Pressed(key) => {
                if !self.set_modifier(key, true) {
                    return ShortcutRegistry::lookup(key, self.modifiers);
                }
                None
            }
            KeyEvent::Released(key) => {
                self.set_modifier(key, false);
                None
            }
        }
    }

    fn set_modifier(&mut self, key: Key, held: bool) -> bool {
        match key {
            Key::Shift => self.modifiers.shift = held,
            Key::Control => self.modifiers.ctrl = held,
            Key::Meta => self.modifiers.meta = held,
            Key::Alt => self.modifiers.alt = held,
            _ => return false,
        }
        true
    }
}
