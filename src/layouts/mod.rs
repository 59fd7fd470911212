//! Page layout persistence.
//!
//! The editor loads and saves section lists by page name through the
//! [`LayoutStore`] trait. Saves are compare-and-swap on the layout
//! [`Revision`]: a writer states which revision it edited, and the save is
//! rejected if someone else saved in between.
//!
//! Two stores are provided:
//! - [`MemoryLayoutStore`] for tests and embedding
//! - [`FileLayoutStore`], one checksummed file per page in a locked directory

mod file;
mod memory;

pub use file::{FileLayoutStore, FileStoreConfig};
pub use memory::MemoryLayoutStore;

use crate::error::{EditorError, Result};
use crate::types::{PageLayout, Revision, Section};

/// Load/save collaborator for page layouts.
pub trait LayoutStore: Send + Sync {
    /// Load a page. Returns `None` if it was never saved.
    fn load(&self, page: &str) -> Result<Option<PageLayout>>;

    /// Save a page, provided its stored revision still equals `expected`.
    ///
    /// `expected = None` skips the check (unconditional overwrite).
    fn save(&self, page: &str, sections: &[Section], expected: Option<Revision>)
        -> Result<PageLayout>;

    /// Delete a page. Returns false if it did not exist.
    fn delete(&self, page: &str) -> Result<bool>;

    /// All saved page names, sorted.
    fn pages(&self) -> Result<Vec<String>>;
}

/// Reject a save whose expected revision no longer matches storage.
pub(crate) fn check_revision(
    page: &str,
    expected: Option<Revision>,
    current: Option<&PageLayout>,
) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let found = current.map(|layout| layout.revision);
    if found == Some(expected) {
        Ok(())
    } else {
        Err(EditorError::RevisionConflict {
            page: page.to_string(),
            expected: Some(expected),
            found,
        })
    }
}
