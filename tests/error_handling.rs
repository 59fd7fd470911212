//! Error handling and edge case tests.

use pagewright::{
    EditorConfig, EditorError, EditorSession, FileLayoutStore, FileStoreConfig, Keymap,
    Keystroke, LayoutStore, MemoryLayoutStore, MoveDirection, NotificationLevel, PageLayout,
    Revision, Section, SectionContent, SectionId, SectionKind,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Store whose writes always fail, for exercising save error paths.
struct ReadOnlyStore {
    inner: MemoryLayoutStore,
}

impl LayoutStore for ReadOnlyStore {
    fn load(&self, page: &str) -> pagewright::Result<Option<PageLayout>> {
        self.inner.load(page)
    }

    fn save(
        &self,
        _page: &str,
        _sections: &[Section],
        _expected: Option<Revision>,
    ) -> pagewright::Result<PageLayout> {
        Err(EditorError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn delete(&self, _page: &str) -> pagewright::Result<bool> {
        Ok(false)
    }

    fn pages(&self) -> pagewright::Result<Vec<String>> {
        self.inner.pages()
    }
}

// --- Session Errors ---

#[test]
fn test_open_invalid_page_name() {
    let result = EditorSession::open(
        Arc::new(MemoryLayoutStore::new()),
        "../../etc/passwd",
        EditorConfig::default(),
    );
    assert!(matches!(result, Err(EditorError::InvalidPageName(_))));
}

#[test]
fn test_failed_save_keeps_history() {
    let store = Arc::new(ReadOnlyStore {
        inner: MemoryLayoutStore::new(),
    });
    let mut session = EditorSession::open(store, "home", EditorConfig::default()).unwrap();
    let handle = session.notifications().subscribe(8);

    session.add_section(SectionKind::Hero, None).unwrap();
    session.add_section(SectionKind::Text, None).unwrap();

    let result = session.save();
    assert!(matches!(result, Err(EditorError::Io(_))));

    assert_eq!(session.sections().len(), 2);
    assert_eq!(session.history().undo_depth(), 2);
    assert!(session.is_dirty());

    let note = handle.try_recv().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert!(note.message.contains("read-only"));
}

#[test]
fn test_update_missing_section() {
    let mut session = EditorSession::open(
        Arc::new(MemoryLayoutStore::new()),
        "home",
        EditorConfig::default(),
    )
    .unwrap();

    let result = session.update_section(
        SectionId(5),
        SectionContent::default_for(SectionKind::Cta),
    );
    assert!(matches!(result, Err(EditorError::SectionNotFound(SectionId(5)))));

    assert!(matches!(
        session.duplicate_section(SectionId(5)),
        Err(EditorError::SectionNotFound(_))
    ));
}

#[test]
fn test_deleted_section_cannot_be_moved() {
    let mut session = EditorSession::open(
        Arc::new(MemoryLayoutStore::new()),
        "home",
        EditorConfig::default(),
    )
    .unwrap();

    let id = session.add_section(SectionKind::Grid, None).unwrap();
    session.delete_section(id).unwrap();

    let result = session.move_section(id, MoveDirection::Down);
    assert!(matches!(result, Err(EditorError::SectionNotFound(_))));

    // Undo brings it back and it can be addressed again
    session.undo();
    assert!(session.section(id).is_some());
}

#[test]
fn test_undo_redo_on_fresh_session_are_noops() {
    let mut session = EditorSession::open(
        Arc::new(MemoryLayoutStore::new()),
        "home",
        EditorConfig::default(),
    )
    .unwrap();

    assert!(!session.undo());
    assert!(!session.redo());
    assert!(session.sections().is_empty());
}

// --- Store Errors ---

#[test]
fn test_file_store_rejects_stale_revision() {
    let dir = TempDir::new().unwrap();
    let store = FileLayoutStore::open(FileStoreConfig {
        path: dir.path().join("layouts"),
        ..Default::default()
    })
    .unwrap();

    let first = store.save("home", &[], None).unwrap();
    let hero = Section::new(SectionId(1), SectionContent::default_for(SectionKind::Hero));
    store.save("home", &[hero], Some(first.revision)).unwrap();

    let result = store.save("home", &[], Some(first.revision));
    match result {
        Err(EditorError::RevisionConflict {
            page,
            expected,
            found,
        }) => {
            assert_eq!(page, "home");
            assert_eq!(expected, Some(first.revision));
            assert_ne!(found, Some(first.revision));
        }
        other => panic!("Expected RevisionConflict, got {:?}", other),
    }

    assert_eq!(store.load("home").unwrap().unwrap().sections.len(), 1);
}

#[test]
fn test_file_store_pages_ignore_other_files() {
    let dir = TempDir::new().unwrap();
    let store = FileLayoutStore::open(FileStoreConfig {
        path: dir.path().join("layouts"),
        ..Default::default()
    })
    .unwrap();

    store.save("home", &[], None).unwrap();
    std::fs::write(store.path().join("notes.txt"), b"hello").unwrap();

    assert_eq!(store.pages().unwrap(), vec!["home"]);
}

// --- Parsing Errors ---

#[test]
fn test_bad_keystroke_in_keymap() {
    let result = Keymap::from_pairs([("ctrl+banana", pagewright::EditorCommand::Undo)]);
    assert!(matches!(result, Err(EditorError::InvalidKeystroke(_))));
    assert!("".parse::<Keystroke>().is_err());
}

#[test]
fn test_unknown_section_kind() {
    let result = "carousel".parse::<SectionKind>();
    match result {
        Err(EditorError::UnknownSectionKind(kind)) => assert_eq!(kind, "carousel"),
        other => panic!("Expected UnknownSectionKind, got {:?}", other),
    }
}
