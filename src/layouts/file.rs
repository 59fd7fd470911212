//! File-backed layout store.
//!
//! Each page lives in `<dir>/<page>.layout`:
//!
//! ```text
//! magic "PGL\0" | version u8 | len u64 LE | MessagePack(PageLayout) | crc32 u32 LE
//! ```
//!
//! Writes go to a temp file that is synced and renamed over the old one, so a
//! crash mid-save leaves the previous layout in place.

use crate::error::{EditorError, Result};
use crate::types::{validate_page_name, PageLayout, Revision, Section};
use fs2::FileExt;
use lru::LruCache;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{check_revision, LayoutStore};

/// Magic bytes for layout files.
const LAYOUT_MAGIC: &[u8; 4] = b"PGL\0";

/// Current layout file format version.
const LAYOUT_VERSION: u8 = 1;

/// Bytes around the payload: magic, version, length prefix and checksum.
const FRAME_OVERHEAD: u64 = 4 + 1 + 8 + 4;

/// File extension for layout files.
const LAYOUT_EXT: &str = "layout";

/// File store configuration.
#[derive(Clone, Debug)]
pub struct FileStoreConfig {
    /// Directory holding the layout files.
    pub path: PathBuf,

    /// Layout cache size (number of pages).
    pub cache_size: usize,

    /// Whether to create the directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./layouts"),
            cache_size: 64,
            create_if_missing: true,
        }
    }
}

/// Layout store keeping one checksummed file per page.
pub struct FileLayoutStore {
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,

    /// Recently loaded or saved layouts.
    cache: Mutex<LruCache<String, PageLayout>>,

    /// Serializes check-and-write in `save`.
    write_lock: Mutex<()>,
}

impl FileLayoutStore {
    /// Open the store directory, creating it if configured to.
    pub fn open(config: FileStoreConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.create_if_missing {
                return Err(EditorError::NotInitialized(
                    config.path.display().to_string(),
                ));
            }
            fs::create_dir_all(&config.path)?;
            info!(path = %config.path.display(), "created layout store");
        }

        let lock_file = Self::acquire_lock(&config.path)?;
        let cache_size = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            path: config.path,
            _lock_file: lock_file,
            cache: Mutex::new(LruCache::new(cache_size)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(path.join("LOCK"))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| EditorError::Locked)?;
        Ok(lock_file)
    }

    fn page_path(&self, page: &str) -> PathBuf {
        self.path.join(format!("{}.{}", page, LAYOUT_EXT))
    }

    /// Load a page, preferring the cache.
    fn read_layout(&self, page: &str) -> Result<Option<PageLayout>> {
        if let Some(cached) = self.cache.lock().get(page).cloned() {
            return Ok(Some(cached));
        }

        let path = self.page_path(page);
        if !path.exists() {
            return Ok(None);
        }

        let layout = Self::read_file(&path)?;
        self.cache.lock().put(page.to_string(), layout.clone());
        Ok(Some(layout))
    }

    fn read_file(path: &Path) -> Result<PageLayout> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != LAYOUT_MAGIC {
            return Err(EditorError::InvalidFormat("Invalid layout magic".into()));
        }

        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != LAYOUT_VERSION {
            return Err(EditorError::InvalidFormat(format!(
                "Unsupported layout version: {}",
                version[0]
            )));
        }

        let mut len_bytes = [0u8; 8];
        file.read_exact(&mut len_bytes)?;
        let len = u64::from_le_bytes(len_bytes);
        let file_len = file.metadata()?.len();
        if file_len.checked_sub(FRAME_OVERHEAD) != Some(len) {
            return Err(EditorError::InvalidFormat(format!(
                "Layout length {} does not match file size {}",
                len, file_len
            )));
        }

        let mut encoded = vec![0u8; len as usize];
        file.read_exact(&mut encoded)?;

        let mut checksum_bytes = [0u8; 4];
        file.read_exact(&mut checksum_bytes)?;
        let expected = u32::from_le_bytes(checksum_bytes);
        let got = crc32fast::hash(&encoded);
        if expected != got {
            return Err(EditorError::ChecksumMismatch { expected, got });
        }

        Ok(rmp_serde::from_slice(&encoded)?)
    }

    fn write_file(&self, layout: &PageLayout) -> Result<()> {
        let encoded = rmp_serde::to_vec_named(layout)?;

        let final_path = self.page_path(&layout.page);
        let tmp_path = final_path.with_extension(format!("{}.tmp", LAYOUT_EXT));

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(LAYOUT_MAGIC)?;
            file.write_all(&[LAYOUT_VERSION])?;
            file.write_all(&(encoded.len() as u64).to_le_bytes())?;
            file.write_all(&encoded)?;
            file.write_all(&crc32fast::hash(&encoded).to_le_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self, page: &str) -> Result<Option<PageLayout>> {
        validate_page_name(page)?;
        self.read_layout(page)
    }

    fn save(
        &self,
        page: &str,
        sections: &[Section],
        expected: Option<Revision>,
    ) -> Result<PageLayout> {
        validate_page_name(page)?;
        let _lock = self.write_lock.lock();

        // Unconditional saves never read the old file, so they can replace a
        // corrupt one.
        if expected.is_some() {
            let current = self.read_layout(page)?;
            if let Err(e) = check_revision(page, expected, current.as_ref()) {
                warn!(page, "rejected save with stale revision");
                return Err(e);
            }
        }

        let layout = PageLayout::new(page, sections.to_vec())?;
        self.write_file(&layout)?;
        self.cache.lock().put(page.to_string(), layout.clone());

        debug!(page, revision = %layout.revision, sections = sections.len(), "wrote layout");
        Ok(layout)
    }

    fn delete(&self, page: &str) -> Result<bool> {
        validate_page_name(page)?;
        let _lock = self.write_lock.lock();

        self.cache.lock().pop(page);
        let path = self.page_path(page);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn pages(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LAYOUT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
