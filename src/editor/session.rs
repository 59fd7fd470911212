//! Editing session for one page layout.

use crate::error::{EditorError, Result};
use crate::history::History;
use crate::layouts::LayoutStore;
use crate::notifications::{NotificationLevel, NotificationQueue};
use crate::shortcuts::{EditorCommand, Keymap, ListenerGuard, ShortcutRegistry};
use crate::types::{Revision, Section, SectionContent, SectionId, SectionKind};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Editor session configuration.
#[derive(Clone, Debug)]
pub struct EditorConfig {
    /// Maximum undo depth (None = unbounded).
    pub history_limit: Option<usize>,

    /// Bindings used by [`EditorSession::bind_shortcuts`].
    pub keymap: Keymap,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(100),
            keymap: Keymap::standard(),
        }
    }
}

/// Direction for [`EditorSession::move_section`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// An open editor for one page.
///
/// Every structural edit records a history entry. Saving and cancelling reset
/// the history to the last saved layout.
pub struct EditorSession {
    store: Arc<dyn LayoutStore>,
    page: String,

    history: History<Vec<Section>>,

    /// Sections as last loaded or saved.
    saved: Vec<Section>,

    /// Revision of `saved` in the store (None = page never saved).
    revision: Option<Revision>,

    /// Next id to hand out (None once `u64::MAX` is taken).
    next_id: Option<SectionId>,

    notifications: Arc<NotificationQueue>,

    /// Commands queued by bound shortcuts, applied by `pump_shortcuts`.
    command_tx: Sender<EditorCommand>,
    command_rx: Receiver<EditorCommand>,

    config: EditorConfig,
}

impl EditorSession {
    /// Open a page for editing. A page that was never saved starts empty.
    pub fn open(store: Arc<dyn LayoutStore>, page: &str, config: EditorConfig) -> Result<Self> {
        Self::open_with_notifications(store, page, config, Arc::new(NotificationQueue::new()))
    }

    /// Open a page, posting outcomes to a shared notification queue.
    pub fn open_with_notifications(
        store: Arc<dyn LayoutStore>,
        page: &str,
        config: EditorConfig,
        notifications: Arc<NotificationQueue>,
    ) -> Result<Self> {
        let layout = store.load(page)?;
        let (saved, revision) = match layout {
            Some(layout) => (layout.sections, Some(layout.revision)),
            None => (Vec::new(), None),
        };

        info!(page, sections = saved.len(), "opened page for editing");

        let (command_tx, command_rx) = unbounded();
        Ok(Self {
            store,
            page: page.to_string(),
            history: History::bounded(saved.clone(), config.history_limit),
            next_id: next_free_id(&saved),
            saved,
            revision,
            notifications,
            command_tx,
            command_rx,
            config,
        })
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Current sections, top of page first.
    pub fn sections(&self) -> &[Section] {
        self.history.present()
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections().iter().find(|s| s.id == id)
    }

    pub fn history(&self) -> &History<Vec<Section>> {
        &self.history
    }

    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }

    pub fn notifications(&self) -> &Arc<NotificationQueue> {
        &self.notifications
    }

    /// Whether the current sections differ from the saved layout.
    pub fn is_dirty(&self) -> bool {
        self.history.present() != &self.saved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Edits ---

    /// Insert a template section of `kind` at `at` (clamped), or append.
    pub fn add_section(&mut self, kind: SectionKind, at: Option<usize>) -> Result<SectionId> {
        let id = self.allocate_id()?;
        let section = Section::new(id, SectionContent::default_for(kind));

        let mut sections = self.history.present().clone();
        let index = at.unwrap_or(sections.len()).min(sections.len());
        sections.insert(index, section);
        self.history.set(sections);

        debug!(page = %self.page, %id, %kind, index, "added section");
        Ok(id)
    }

    /// Insert a copy of a section directly below it.
    pub fn duplicate_section(&mut self, id: SectionId) -> Result<SectionId> {
        let index = self.position(id)?;
        let new_id = self.allocate_id()?;

        let mut sections = self.history.present().clone();
        let copy = Section::new(new_id, sections[index].content.clone());
        sections.insert(index + 1, copy);
        self.history.set(sections);

        debug!(page = %self.page, from = %id, to = %new_id, "duplicated section");
        Ok(new_id)
    }

    /// Remove a section, returning it.
    pub fn delete_section(&mut self, id: SectionId) -> Result<Section> {
        let index = self.position(id)?;

        let mut sections = self.history.present().clone();
        let removed = sections.remove(index);
        self.history.set(sections);

        debug!(page = %self.page, %id, "deleted section");
        Ok(removed)
    }

    /// Swap a section with its neighbour. Returns false at the page edge.
    pub fn move_section(&mut self, id: SectionId, direction: MoveDirection) -> Result<bool> {
        let index = self.position(id)?;
        let len = self.history.present().len();

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < len => index + 1,
            _ => return Ok(false),
        };

        let mut sections = self.history.present().clone();
        sections.swap(index, target);
        self.history.set(sections);

        debug!(page = %self.page, %id, ?direction, "moved section");
        Ok(true)
    }

    /// Replace a section's content. Returns false if nothing changed.
    pub fn update_section(&mut self, id: SectionId, content: SectionContent) -> Result<bool> {
        let index = self.position(id)?;
        if self.history.present()[index].content == content {
            return Ok(false);
        }

        let mut sections = self.history.present().clone();
        sections[index].content = content;
        self.history.set(sections);

        debug!(page = %self.page, %id, "updated section");
        Ok(true)
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            debug!(page = %self.page, depth = self.history.undo_depth(), "undo");
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            debug!(page = %self.page, depth = self.history.redo_depth(), "redo");
        }
        moved
    }

    // --- Persistence ---

    /// Save the current sections.
    ///
    /// On success the history restarts from the saved layout. On failure the
    /// history is left untouched so the user can retry, undo, or reload.
    pub fn save(&mut self) -> Result<Revision> {
        let sections = self.history.present().clone();

        match self.store.save(&self.page, &sections, self.revision) {
            Ok(layout) => {
                info!(page = %self.page, revision = %layout.revision, "saved page");
                self.revision = Some(layout.revision);
                self.saved = layout.sections.clone();
                self.history.reset(layout.sections);
                self.notifications
                    .post(NotificationLevel::Success, format!("Saved {}", self.page));
                Ok(layout.revision)
            }
            Err(e) => {
                warn!(page = %self.page, error = %e, "save failed");
                let message = match &e {
                    EditorError::RevisionConflict { .. } => format!(
                        "{} was changed elsewhere; reload before saving",
                        self.page
                    ),
                    other => format!("Failed to save {}: {}", self.page, other),
                };
                self.notifications.post(NotificationLevel::Error, message);
                Err(e)
            }
        }
    }

    /// Discard unsaved edits. Returns false if there was nothing to discard.
    pub fn cancel(&mut self) -> bool {
        let discarded = self.is_dirty() || self.history.can_redo();
        self.history.reset(self.saved.clone());

        if discarded {
            info!(page = %self.page, "discarded unsaved changes");
            self.notifications
                .post(NotificationLevel::Info, "Changes discarded");
        }
        discarded
    }

    /// Re-read the page from the store, dropping local edits.
    pub fn reload(&mut self) -> Result<()> {
        let layout = match self.store.load(&self.page) {
            Ok(layout) => layout,
            Err(e) => {
                self.notifications.post(
                    NotificationLevel::Error,
                    format!("Failed to load {}: {}", self.page, e),
                );
                return Err(e);
            }
        };

        let (saved, revision) = match layout {
            Some(layout) => (layout.sections, Some(layout.revision)),
            None => (Vec::new(), None),
        };

        self.next_id = match (self.next_id, next_free_id(&saved)) {
            (Some(current), Some(loaded)) => Some(current.max(loaded)),
            _ => None,
        };
        self.revision = revision;
        self.saved = saved;
        self.history.reset(self.saved.clone());

        info!(page = %self.page, "reloaded page");
        self.notifications
            .post(NotificationLevel::Info, format!("Reloaded {}", self.page));
        Ok(())
    }

    // --- Commands & shortcuts ---

    pub fn execute(&mut self, command: EditorCommand) -> Result<()> {
        match command {
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::Save => {
                self.save()?;
            }
            EditorCommand::Cancel => {
                self.cancel();
            }
        }
        Ok(())
    }

    /// Bind this session's keymap on `registry`.
    ///
    /// Matching keystrokes queue commands; call [`pump_shortcuts`] from the
    /// session's own loop to apply them. Dropping the guard unbinds.
    ///
    /// [`pump_shortcuts`]: EditorSession::pump_shortcuts
    pub fn bind_shortcuts(&self, registry: &ShortcutRegistry) -> ListenerGuard {
        let tx = self.command_tx.clone();
        registry.bind(self.config.keymap.clone(), move |command| {
            // The receiver lives in the session; a send error means it is gone.
            let _ = tx.send(command);
        })
    }

    /// Apply queued shortcut commands. Stops at the first failing command.
    pub fn pump_shortcuts(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Ok(command) = self.command_rx.try_recv() {
            self.execute(command)?;
            applied += 1;
        }
        Ok(applied)
    }

    // --- Helpers ---

    fn position(&self, id: SectionId) -> Result<usize> {
        self.history
            .present()
            .iter()
            .position(|s| s.id == id)
            .ok_or(EditorError::SectionNotFound(id))
    }

    fn allocate_id(&mut self) -> Result<SectionId> {
        let id = self
            .next_id
            .ok_or_else(|| EditorError::SectionIdsExhausted(self.page.clone()))?;
        self.next_id = id.next();
        Ok(id)
    }
}

/// One past the largest id in `sections` (ids start at 1).
///
/// None when the largest id is `u64::MAX`.
fn next_free_id(sections: &[Section]) -> Option<SectionId> {
    match sections.iter().map(|s| s.id).max() {
        Some(max) => max.next(),
        None => Some(SectionId(1)),
    }
}
