//! # Page Editor Core
//!
//! Undo/redo history and editing session for a visual page-layout editor.
//!
//! ## Core Concepts
//!
//! - **History**: Linear past/present/future buffer with optional depth limit
//! - **Sections**: Typed blocks of page content (hero, grid, call to action, ...)
//! - **Layout stores**: Load/save section lists by page name, with revision checks
//! - **Sessions**: One page being edited; edits, undo/redo, save and cancel
//! - **Shortcuts**: Keymaps bound for the lifetime of a guard
//! - **Notifications**: Save/load outcomes broadcast to UI subscribers
//!
//! ## Example
//!
//! ```ignore
//! use pagewright::{EditorConfig, EditorSession, FileLayoutStore, FileStoreConfig};
//!
//! let store = Arc::new(FileLayoutStore::open(FileStoreConfig {
//!     path: "./layouts".into(),
//!     ..Default::default()
//! })?);
//!
//! let mut session = EditorSession::open(store, "home", EditorConfig::default())?;
//! let _shortcuts = session.bind_shortcuts(&registry);
//!
//! session.add_section(SectionKind::Hero, None)?;
//! session.pump_shortcuts()?;
//! session.save()?;
//! ```

pub mod editor;
pub mod error;
pub mod history;
pub mod layouts;
pub mod notifications;
pub mod shortcuts;
pub mod types;

// Re-exports
pub use editor::{EditorConfig, EditorSession, MoveDirection};
pub use error::{EditorError, Result};
pub use history::History;
pub use layouts::{FileLayoutStore, FileStoreConfig, LayoutStore, MemoryLayoutStore};
pub use notifications::{
    Notification, NotificationHandle, NotificationId, NotificationLevel, NotificationQueue,
    SubscriberId,
};
pub use shortcuts::{
    CommandHandler, EditorCommand, KeyCode, Keymap, Keystroke, ListenerGuard, ListenerId,
    Modifiers, ShortcutRegistry,
};
pub use types::*;
