//! Keyboard shortcuts for the editor.
//!
//! A [`Keymap`] maps keystrokes to [`EditorCommand`]s. The
//! [`ShortcutRegistry`] stands in for the window-level key listener: binding
//! returns a [`ListenerGuard`] and the binding lives exactly as long as the
//! guard, so a component that binds on mount is unbound on teardown.

mod keymap;
mod registry;
mod types;

pub use keymap::{EditorCommand, Keymap};
pub use registry::{CommandHandler, ListenerGuard, ListenerId, ShortcutRegistry};
pub use types::{KeyCode, Keystroke, Modifiers};
