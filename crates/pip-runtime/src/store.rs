#![forbid(unsafe_code)]

//! Persistence of the last settled [`Layout`].
//!
//! A [`LayoutStore`] is a plain key/value store: last write wins and there
//! are no transactions. [`restore_layout`] is the only reader the window
//! runtime uses; it never fails. A record that cannot be decoded is removed
//! and the fallback layout is returned instead.
//!
//! # File Format
//!
//! [`FileLayoutStore`] keeps one JSON file per key:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": 1760601600,
//!   "layout": { "bottom": 0.45, "trailing": 0.0 }
//! }
//! ```
//!
//! # Atomic Writes
//!
//! Writes go to a temp file that is then renamed over the record.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use pip_core::Layout;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Current file format version.
const FORMAT_VERSION: u64 = 1;

/// Key/value storage for layouts.
pub trait LayoutStore {
    /// Read the layout stored under `key`.
    ///
    /// Missing records are `Ok(None)`; unreadable ones are errors.
    fn load(&self, key: &str) -> Result<Option<Layout>>;

    /// Store `layout` under `key`, replacing any previous record.
    fn save(&mut self, key: &str, layout: &Layout) -> Result<()>;

    /// Delete the record under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Load the layout under `key`, falling back when it is missing or corrupt.
///
/// A corrupt record is removed. Without a `fallback` the default layout
/// (flush bottom-trailing) is used.
pub fn restore_layout(store: &mut dyn LayoutStore, key: &str, fallback: Option<Layout>) -> Layout {
    match store.load(key) {
        Ok(Some(layout)) => layout,
        Ok(None) => fallback.unwrap_or_default(),
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable persisted layout");
            if let Err(err) = store.remove(key) {
                warn!(key, error = %err, "failed to remove unreadable layout");
            }
            fallback.unwrap_or_default()
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store keeping encoded layouts in memory.
///
/// Records are kept in their JSON encoding so decode failures behave the
/// same as with [`FileLayoutStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    records: HashMap<String, String>,
}

impl MemoryLayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw, possibly invalid, record under `key`.
    pub fn insert_raw(&mut self, key: impl Into<String>, data: impl Into<String>) {
        self.records.insert(key.into(), data.into());
    }

    /// The raw record under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, key: &str) -> Result<Option<Layout>> {
        self.records
            .get(key)
            .map(|data| Layout::from_json(data))
            .transpose()
            .map_err(Into::into)
    }

    fn save(&mut self, key: &str, layout: &Layout) -> Result<()> {
        self.records.insert(key.to_owned(), layout.to_json()?);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// On-disk record.
#[derive(Debug, Serialize, Deserialize)]
struct LayoutFile {
    version: u64,
    saved_at: u64,
    layout: Layout,
}

/// Store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    dir: PathBuf,
}

impl FileLayoutStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `key`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self, key: &str) -> Result<Option<Layout>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let file: LayoutFile = serde_json::from_str(&contents)?;
        if file.version != FORMAT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "unsupported layout file version: {} (expected {FORMAT_VERSION})",
                    file.version
                ),
            )
            .into());
        }
        Ok(Some(file.layout))
    }

    fn save(&mut self, key: &str, layout: &Layout) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let file = LayoutFile {
            version: FORMAT_VERSION,
            saved_at: unix_now(),
            layout: *layout,
        };
        let json = serde_json::to_string_pretty(&file)?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &path)?;
        debug!(key, path = %path.display(), "layout saved");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Seconds since the Unix epoch.
fn unix_now() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pip_core::Edge;

    const KEY: &str = "pip.floating.layout";

    fn docked() -> Layout {
        Layout::new(None, None, Some(0.3), None, Some(Edge::Left)).unwrap()
    }

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryLayoutStore::new();
        assert_eq!(store.load(KEY).unwrap(), None);
        store.save(KEY, &docked()).unwrap();
        assert_eq!(store.load(KEY).unwrap(), Some(docked()));
        store.remove(KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn restore_missing_uses_fallback() {
        let mut store = MemoryLayoutStore::new();
        assert_eq!(restore_layout(&mut store, KEY, Some(docked())), docked());
        assert_eq!(restore_layout(&mut store, KEY, None), Layout::default());
    }

    #[test]
    fn restore_corrupt_removes_record() {
        let mut store = MemoryLayoutStore::new();
        store.insert_raw(KEY, r#"{"top":0.2,"bottom":0.2}"#);
        assert_eq!(restore_layout(&mut store, KEY, None), Layout::default());
        assert_eq!(store.raw(KEY), None);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileLayoutStore::new(dir.path().join("layouts"));
        assert_eq!(store.load(KEY).unwrap(), None);

        store.save(KEY, &docked()).unwrap();
        assert_eq!(store.load(KEY).unwrap(), Some(docked()));
        assert!(!store.path_for(KEY).with_extension("json.tmp").exists());

        let latest = Layout::default();
        store.save(KEY, &latest).unwrap();
        assert_eq!(store.load(KEY).unwrap(), Some(latest));
    }

    #[test]
    fn file_keys_are_sanitized() {
        let store = FileLayoutStore::new("/tmp/pip");
        assert_eq!(
            store.path_for("user/42:layout"),
            Path::new("/tmp/pip/user_42_layout.json")
        );
    }

    #[test]
    fn file_corrupt_record_is_error_then_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileLayoutStore::new(dir.path());
        std::fs::write(store.path_for(KEY), "{ not json").unwrap();
        assert!(store.load(KEY).is_err());

        assert_eq!(restore_layout(&mut store, KEY, Some(docked())), docked());
        assert!(!store.path_for(KEY).exists());
    }

    #[test]
    fn file_version_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLayoutStore::new(dir.path());
        std::fs::write(
            store.path_for(KEY),
            r#"{"version":99,"saved_at":0,"layout":{"bottom":0,"trailing":0}}"#,
        )
        .unwrap();
        let err = store.load(KEY).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn file_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileLayoutStore::new(dir.path());
        store.remove(KEY).unwrap();
    }
}
