//! Load cache keyed on source file identity.
//!
//! A cached batch is reused only while the file's canonical path, modification
//! time and length are unchanged. Batches are handed out as shared immutable
//! snapshots; a reload replaces the snapshot and never mutates one in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::entry::LeaderboardEntry;
use crate::error::LoadError;

/// Identity of a source file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    pub fn for_path(path: &Path) -> Result<Self, LoadError> {
        let metadata = std::fs::metadata(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Ok(Self {
            path: canonical_path(path),
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Slot key for `path`. A file that no longer exists still maps to the slot
/// it was cached under, through its parent directory.
fn canonical_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CachedLoad {
    pub entries: Arc<[LeaderboardEntry]>,
    /// True when the loader ran for this lookup
    pub reloaded: bool,
}

#[derive(Debug, Default)]
pub struct LoadCache {
    slots: HashMap<PathBuf, (SourceKey, Arc<[LeaderboardEntry]>)>,
    hits: u64,
    misses: u64,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached batch for `path`, or run `load` when the file is new
    /// or has changed since it was cached. Failed loads are not cached.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<CachedLoad, LoadError>
    where
        F: FnOnce(&Path) -> Result<Vec<LeaderboardEntry>, LoadError>,
    {
        let key = match SourceKey::for_path(path) {
            Ok(key) => key,
            Err(e) => {
                self.slots.remove(&canonical_path(path));
                return Err(e);
            }
        };

        if let Some((cached_key, entries)) = self.slots.get(&key.path) {
            if *cached_key == key {
                self.hits += 1;
                log::debug!("Cache hit for {}", key.path.display());
                return Ok(CachedLoad {
                    entries: Arc::clone(entries),
                    reloaded: false,
                });
            }
        }

        self.misses += 1;
        let entries: Arc<[LeaderboardEntry]> = match load(path) {
            Ok(entries) => entries.into(),
            Err(e) => {
                self.slots.remove(&key.path);
                return Err(e);
            }
        };
        log::debug!("Cached {} entries for {}", entries.len(), key.path.display());
        self.slots
            .insert(key.path.clone(), (key, Arc::clone(&entries)));

        Ok(CachedLoad {
            entries,
            reloaded: true,
        })
    }

    /// Drop the cached batch for one file.
    pub fn invalidate(&mut self, path: &Path) {
        self.slots.remove(&canonical_path(path));
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
