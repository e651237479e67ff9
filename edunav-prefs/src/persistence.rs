//! File-backed preference store with atomic saves
//!
//! The whole store is one small JSON document. Every `set`/`remove` rewrites
//! it through a temporary file that is renamed over the original, so a crash
//! mid-write leaves either the old or the new document on disk. A `.bak` copy
//! of the previous document is kept and consulted when the main file is
//! unreadable.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{KeyValueStore, PrefError, PrefResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Copy the previous document to `<file>.bak` before each save
    pub create_backups: bool,

    /// Pretty-print the JSON document
    pub pretty: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            create_backups: true,
            pretty: true,
        }
    }
}

/// On-disk document with versioning
#[derive(Debug, Serialize, Deserialize)]
struct PersistedPrefs {
    version: u32,
    entries: IndexMap<CompactString, String>,
}

pub struct FileStore {
    file_path: PathBuf,
    temp_path: PathBuf,
    backup_path: PathBuf,
    config: PersistenceConfig,
    entries: IndexMap<CompactString, String>,
}

impl FileStore {
    const CURRENT_VERSION: u32 = 1;

    /// Open the store at `file_path`, creating the parent directory if needed.
    ///
    /// A missing file yields an empty store. A corrupt file falls back to the
    /// backup, and to an empty store when the backup is unusable too.
    pub fn open(file_path: PathBuf, config: PersistenceConfig) -> PrefResult<Self> {
        let temp_path = file_path.with_extension("tmp");
        let backup_path = file_path.with_extension("bak");

        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| PrefError::file_system(parent, &e))?;
        }

        let entries = match Self::read_document(&file_path) {
            Ok(entries) => entries,
            Err(e) if e.is_recoverable() => {
                warn!(path = %file_path.display(), error = %e, "Preference file unreadable, trying backup");
                Self::read_document(&backup_path).unwrap_or_else(|e| {
                    warn!(error = %e, "Preference backup unusable, starting empty");
                    IndexMap::new()
                })
            }
            Err(e) => return Err(e),
        };

        debug!(path = %file_path.display(), keys = entries.len(), "Preference store opened");

        Ok(Self {
            file_path,
            temp_path,
            backup_path,
            config,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_document(path: &Path) -> PrefResult<IndexMap<CompactString, String>> {
        if !path.exists() {
            return Ok(IndexMap::new());
        }

        let data = fs::read(path).map_err(|e| PrefError::file_system(path, &e))?;
        let doc: PersistedPrefs =
            serde_json::from_slice(&data).map_err(|_| PrefError::corrupted(path))?;

        if doc.version > Self::CURRENT_VERSION {
            return Err(PrefError::corrupted(path));
        }

        Ok(doc.entries)
    }

    fn save(&self) -> PrefResult<()> {
        if self.config.create_backups && self.file_path.exists() {
            fs::copy(&self.file_path, &self.backup_path)
                .map_err(|e| PrefError::atomic_save(format!("Failed to create backup: {e}")))?;
        }

        let doc = PersistedPrefs {
            version: Self::CURRENT_VERSION,
            entries: self.entries.clone(),
        };
        let data = if self.config.pretty {
            serde_json::to_vec_pretty(&doc)?
        } else {
            serde_json::to_vec(&doc)?
        };

        fs::write(&self.temp_path, data)
            .map_err(|e| PrefError::atomic_save(format!("Failed to write temp file: {e}")))?;
        fs::rename(&self.temp_path, &self.file_path)
            .map_err(|e| PrefError::atomic_save(format!("Failed to rename temp file: {e}")))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// On a failed save the previous value is restored in memory.
    fn set(&mut self, key: &str, value: String) -> PrefResult<()> {
        let previous = self.entries.insert(CompactString::from(key), value);
        self.save().inspect_err(|_| match previous {
            Some(old) => {
                self.entries.insert(CompactString::from(key), old);
            }
            None => {
                self.entries.shift_remove(key);
            }
        })
    }

    fn remove(&mut self, key: &str) -> PrefResult<()> {
        let Some((index, old_key, old)) = self.entries.shift_remove_full(key) else {
            return Ok(());
        };
        self.save().inspect_err(|_| {
            self.entries.shift_insert(index, old_key, old);
        })
    }
}
