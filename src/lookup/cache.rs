//! Persistent key→profile store backing the nutrition lookup.
//!
//! The store is an injected collaborator, not a process-wide singleton:
//! created once at startup, read and written per lookup, flushed to disk
//! on write. Cached nutrition data is a performance optimization only, so
//! every failure path degrades to "no cached value" instead of erroring,
//! and concurrent writers resolve last-writer-wins per key.

use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::nutrition::NutrientProfile;

/// Interface of the persistence collaborator: `get` returns the cached
/// profile if present, `set` records one. Neither operation may fail the
/// caller.
pub trait ProfileStore: Send + Sync {
    fn get(&self, key: &str) -> Option<NutrientProfile>;
    fn set(&self, key: &str, profile: &NutrientProfile);
}

/// JSON-file backed store. The whole map is rewritten on each `set`; for
/// cache sizes in the hundreds of entries that is cheaper than being
/// clever, and it keeps the on-disk file human-inspectable.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, NutrientProfile>>,
}

impl JsonFileStore {
    /// Opens the store, loading any existing cache file. A missing or
    /// unreadable file starts the cache empty rather than failing.
    pub fn open(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, NutrientProfile>>(&contents)
            {
                Ok(map) => map,
                Err(e) => {
                    warn!("nutrition cache {:?} is corrupt, starting empty: {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn flush(&self, entries: &HashMap<String, NutrientProfile>) {
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!("failed to flush nutrition cache to {:?}: {}", self.path, e);
                }
            }
            Err(e) => warn!("failed to serialize nutrition cache: {}", e),
        }
    }
}

impl ProfileStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<NutrientProfile> {
        let entries = self.entries.lock().ok()?;
        entries.get(&key.to_lowercase()).copied()
    }

    fn set(&self, key: &str, profile: &NutrientProfile) {
        let Ok(mut entries) = self.entries.lock() else {
            warn!("nutrition cache mutex poisoned, dropping write for '{}'", key);
            return;
        };
        entries.insert(key.to_lowercase(), *profile);
        self.flush(&entries);
    }
}

/// Volatile store for tests and for callers that opt out of persistence.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, NutrientProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, key: &str) -> Option<NutrientProfile> {
        let entries = self.entries.lock().ok()?;
        entries.get(&key.to_lowercase()).copied()
    }

    fn set(&self, key: &str, profile: &NutrientProfile) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_lowercase(), *profile);
        }
    }
}
