//! Keystroke types: Modifiers, KeyCode, Keystroke.

use crate::error::{EditorError, Result};
use std::fmt;
use std::str::FromStr;

/// Modifier keys as a bitfield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The platform "command" modifier (Cmd on macOS, Ctrl elsewhere).
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    Up,
    Down,
    Left,
    Right,

    F(u8),
}

impl KeyCode {
    /// Parse a single key name ("z", "escape", "f5", ...).
    fn parse(name: &str) -> Option<KeyCode> {
        let lower = name.to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Space,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    (Some('f'), Some(_)) => {
                        let n: u8 = lower[1..].parse().ok()?;
                        if !(1..=24).contains(&n) {
                            return None;
                        }
                        KeyCode::F(n)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::F(n) => write!(f, "F{}", n),
        }
    }
}

/// A key press with its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl Keystroke {
    /// Create a keystroke. Character keys are normalized to lowercase so that
    /// shifted letters match bindings written in lowercase.
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        let key = match key {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { key, modifiers }
    }

    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn cmd(key: KeyCode) -> Self {
        Self::new(key, Modifiers::cmd())
    }

    pub fn cmd_shift(key: KeyCode) -> Self {
        Self::new(key, Modifiers::cmd() | Modifiers::SHIFT)
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

impl FromStr for Keystroke {
    type Err = EditorError;

    /// Parse strings like "ctrl+shift+z", "cmd+s" or "escape".
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EditorError::InvalidKeystroke(s.to_string());

        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key_part, modifier_parts) = parts.split_last().ok_or_else(invalid)?;

        let mut modifiers = Modifiers::NONE;
        for part in modifier_parts {
            let modifier = match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "shift" => Modifiers::SHIFT,
                "alt" | "option" => Modifiers::ALT,
                "meta" | "super" | "win" => Modifiers::META,
                "cmd" | "mod" => Modifiers::cmd(),
                _ => return Err(invalid()),
            };
            modifiers = modifiers | modifier;
        }

        let key = KeyCode::parse(key_part).ok_or_else(invalid)?;
        Ok(Keystroke::new(key, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_modifiers() {
        let stroke: Keystroke = "ctrl+shift+z".parse().unwrap();
        assert_eq!(stroke.key, KeyCode::Char('z'));
        assert!(stroke.modifiers.ctrl());
        assert!(stroke.modifiers.shift());
        assert!(!stroke.modifiers.alt());
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("escape".parse::<Keystroke>().unwrap(), Keystroke::key(KeyCode::Escape));
        assert_eq!("Esc".parse::<Keystroke>().unwrap(), Keystroke::key(KeyCode::Escape));
        assert_eq!("f5".parse::<Keystroke>().unwrap(), Keystroke::key(KeyCode::F(5)));
        assert_eq!("f".parse::<Keystroke>().unwrap(), Keystroke::key(KeyCode::Char('f')));
    }

    #[test]
    fn test_parse_cmd_is_platform_modifier() {
        let stroke: Keystroke = "cmd+s".parse().unwrap();
        assert_eq!(stroke, Keystroke::cmd(KeyCode::Char('s')));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "ctrl+", "hyper+z", "ctrl+zz", "f99"] {
            assert!(
                matches!(input.parse::<Keystroke>(), Err(EditorError::InvalidKeystroke(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_uppercase_char_normalized() {
        let shifted = Keystroke::new(KeyCode::Char('Z'), Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(shifted, "ctrl+shift+z".parse().unwrap());
    }

    #[test]
    fn test_display() {
        let stroke = Keystroke::new(KeyCode::Char('z'), Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(stroke.to_string(), "Ctrl+Shift+Z");
        assert_eq!(Keystroke::key(KeyCode::Escape).to_string(), "Escape");
    }
}
