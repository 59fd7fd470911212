//! In-memory layout store.

use crate::error::Result;
use crate::types::{validate_page_name, PageLayout, Revision, Section};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{check_revision, LayoutStore};

/// Layout store backed by a map. Contents vanish with the store.
#[derive(Default)]
pub struct MemoryLayoutStore {
    pages: RwLock<HashMap<String, PageLayout>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with layouts.
    pub fn with_layouts(layouts: impl IntoIterator<Item = PageLayout>) -> Self {
        let pages = layouts
            .into_iter()
            .map(|layout| (layout.page.clone(), layout))
            .collect();
        Self {
            pages: RwLock::new(pages),
        }
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, page: &str) -> Result<Option<PageLayout>> {
        validate_page_name(page)?;
        Ok(self.pages.read().get(page).cloned())
    }

    fn save(
        &self,
        page: &str,
        sections: &[Section],
        expected: Option<Revision>,
    ) -> Result<PageLayout> {
        validate_page_name(page)?;

        let mut pages = self.pages.write();
        check_revision(page, expected, pages.get(page))?;

        let layout = PageLayout::new(page, sections.to_vec())?;
        pages.insert(page.to_string(), layout.clone());
        Ok(layout)
    }

    fn delete(&self, page: &str) -> Result<bool> {
        validate_page_name(page)?;
        Ok(self.pages.write().remove(page).is_some())
    }

    fn pages(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.pages.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
