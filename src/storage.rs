use std::{
    collections::{HashMap, HashSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace};

use crate::{write_atomically, Note, Result, TextNodeError};

/// Key under which the note collection is stored unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "textnode_notes";

/// A string-to-string storage substrate.
///
/// Implementations must make a successful `set` visible to every later `get`
/// on the same key.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each key as a `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    /// Directory holding one file per key
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Helper method to get the file path for a key
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            error!("Rejected storage key: {:?}", key);
            return Err(TextNodeError::InvalidKey {
                key: key.to_string(),
            });
        }

        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        trace!("Reading key {} from {}", key, path.display());

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value at {}", path.display());
                Ok(None)
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(TextNodeError::Io(e))
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        write_atomically(&path, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(TextNodeError::Io(e))
            }
        }
    }
}

/// Volatile store, used for tests and for embedding without a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Bridges the in-memory note collection to a key-value substrate under a
/// single fixed key.
#[derive(Debug, Clone)]
pub struct NotePersistence<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> NotePersistence<S> {
    /// Uses the default `textnode_notes` key
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Serializes the full ordered collection and overwrites the stored value
    pub fn save(&mut self, notes: &[Note]) -> Result<()> {
        trace!("Serializing {} notes", notes.len());
        let json = serde_json::to_string(notes).map_err(|e| {
            error!("Failed to serialize notes: {}", e);
            TextNodeError::Serialization(e)
        })?;

        self.backend.set(&self.key, &json).map_err(|e| {
            error!("Failed to write notes under key {}: {}", self.key, e);
            e
        })?;

        debug!("Saved {} notes under key {}", notes.len(), self.key);
        Ok(())
    }

    /// Reads the stored collection; an absent key yields an empty collection
    pub fn load(&self) -> Result<Vec<Note>> {
        let Some(json) = self.backend.get(&self.key)? else {
            info!("No notes stored under key {}, starting empty", self.key);
            return Ok(Vec::new());
        };

        let notes: Vec<Note> = serde_json::from_str(&json).map_err(|e| {
            error!("Stored notes under key {} are malformed: {}", self.key, e);
            TextNodeError::Serialization(e)
        })?;

        let mut seen = HashSet::with_capacity(notes.len());
        if let Some(dup) = notes.iter().find(|note| !seen.insert(note.id)) {
            error!("Stored notes under key {} repeat id {}", self.key, dup.id);
            return Err(TextNodeError::DuplicateNoteId {
                id: dup.id.as_i64(),
            });
        }

        info!("Loaded {} notes from key {}", notes.len(), self.key);
        Ok(notes)
    }
}
