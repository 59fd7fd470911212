//! Keystroke to editor command mapping.

use crate::error::Result;
use std::collections::HashMap;
use std::fmt;

use super::types::{KeyCode, Keystroke};

/// Commands the editor exposes to keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Undo,
    Redo,
    Save,
    Cancel,
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
            EditorCommand::Save => "save",
            EditorCommand::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// Maps keystrokes to commands. Several keystrokes may share a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<Keystroke, EditorCommand>,
}

impl Keymap {
    /// Create an empty keymap.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The editor's standard bindings.
    ///
    /// Cmd is Ctrl outside macOS.
    pub fn standard() -> Self {
        let mut keymap = Self::empty();
        keymap.bind(Keystroke::cmd(KeyCode::Char('z')), EditorCommand::Undo);
        keymap.bind(Keystroke::cmd_shift(KeyCode::Char('z')), EditorCommand::Redo);
        keymap.bind(Keystroke::cmd(KeyCode::Char('y')), EditorCommand::Redo);
        keymap.bind(Keystroke::cmd(KeyCode::Char('s')), EditorCommand::Save);
        keymap.bind(Keystroke::key(KeyCode::Escape), EditorCommand::Cancel);
        keymap
    }

    /// Build a keymap from `(keystroke, command)` string pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, EditorCommand)>,
    {
        let mut keymap = Self::empty();
        for (stroke, command) in pairs {
            keymap.bind(stroke.parse()?, command);
        }
        Ok(keymap)
    }

    /// Bind a keystroke, replacing any previous binding for it.
    pub fn bind(&mut self, keystroke: Keystroke, command: EditorCommand) -> Option<EditorCommand> {
        self.bindings.insert(keystroke, command)
    }

    pub fn unbind(&mut self, keystroke: &Keystroke) -> Option<EditorCommand> {
        self.bindings.remove(keystroke)
    }

    pub fn lookup(&self, keystroke: &Keystroke) -> Option<EditorCommand> {
        self.bindings.get(keystroke).copied()
    }

    /// All keystrokes bound to `command`, for menus and tooltips.
    pub fn keystrokes_for(&self, command: EditorCommand) -> Vec<Keystroke> {
        let mut strokes: Vec<Keystroke> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| *k)
            .collect();
        strokes.sort_by_key(|k| k.to_string());
        strokes
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::types::Modifiers;

    #[test]
    fn test_standard_bindings() {
        let keymap = Keymap::standard();
        let cmd = Modifiers::cmd();

        assert_eq!(
            keymap.lookup(&Keystroke::new(KeyCode::Char('z'), cmd)),
            Some(EditorCommand::Undo)
        );
        assert_eq!(
            keymap.lookup(&Keystroke::new(KeyCode::Char('Z'), cmd | Modifiers::SHIFT)),
            Some(EditorCommand::Redo)
        );
        assert_eq!(
            keymap.lookup(&Keystroke::new(KeyCode::Char('y'), cmd)),
            Some(EditorCommand::Redo)
        );
        assert_eq!(
            keymap.lookup(&Keystroke::key(KeyCode::Escape)),
            Some(EditorCommand::Cancel)
        );
        assert_eq!(keymap.lookup(&Keystroke::key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_keystrokes_for() {
        let keymap = Keymap::standard();
        assert_eq!(keymap.keystrokes_for(EditorCommand::Redo).len(), 2);
        assert_eq!(keymap.keystrokes_for(EditorCommand::Save).len(), 1);
    }

    #[test]
    fn test_from_pairs() {
        let keymap = Keymap::from_pairs([
            ("alt+u", EditorCommand::Undo),
            ("alt+r", EditorCommand::Redo),
        ])
        .unwrap();

        assert_eq!(keymap.len(), 2);
        assert_eq!(
            keymap.lookup(&"alt+u".parse().unwrap()),
            Some(EditorCommand::Undo)
        );
        assert!(Keymap::from_pairs([("nope+u", EditorCommand::Undo)]).is_err());
    }

    #[test]
    fn test_rebind_replaces() {
        let mut keymap = Keymap::empty();
        let stroke = Keystroke::cmd(KeyCode::Char('z'));
        assert_eq!(keymap.bind(stroke, EditorCommand::Undo), None);
        assert_eq!(keymap.bind(stroke, EditorCommand::Redo), Some(EditorCommand::Undo));
        assert_eq!(keymap.unbind(&stroke), Some(EditorCommand::Redo));
        assert!(keymap.is_empty());
    }
}
