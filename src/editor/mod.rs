//! Visual page editor session.
//!
//! An [`EditorSession`] owns the undo/redo history for one page. Edits (add,
//! duplicate, delete, move, update) each record one history entry; save and
//! cancel reset the history to the stored layout.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pagewright::{EditorConfig, EditorSession, MemoryLayoutStore, SectionKind};
//!
//! let store = Arc::new(MemoryLayoutStore::new());
//! let mut session = EditorSession::open(store, "home", EditorConfig::default())?;
//!
//! let hero = session.add_section(SectionKind::Hero, None)?;
//! session.add_section(SectionKind::EventList, None)?;
//! session.undo();
//! assert_eq!(session.sections().len(), 1);
//!
//! session.save()?;
//! assert!(!session.can_undo());
//! assert_eq!(session.sections()[0].id, hero);
//! # Ok::<(), pagewright::EditorError>(())
//! ```

mod session;

pub use session::{EditorConfig, EditorSession, MoveDirection};
