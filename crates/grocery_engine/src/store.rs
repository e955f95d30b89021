//! Persistent store: the canonical JSON array of lists plus load recovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use grocery_core::{GroceryItem, GroceryList};
use grocery_logging::{grocery_error, grocery_info, grocery_warn};

use crate::persist::{AtomicFileWriter, StorageError};

pub const LISTS_FILENAME: &str = "grocery-lists.json";
pub const LEGACY_ITEMS_FILENAME: &str = "grocery-list-items.json";

/// Raw key/value access to wherever the serialized lists live.
pub trait ListStore: Send {
    /// Serialized lists, or `None` when nothing was ever stored.
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&self, contents: &str) -> Result<(), StorageError>;

    /// Items stored by the older single-list layout, if any.
    fn read_legacy(&self) -> Result<Option<String>, StorageError> {
        Ok(None)
    }
}

/// Stores lists as `grocery-lists.json` inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    writer: AtomicFileWriter,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            writer: AtomicFileWriter::new(dir.clone()),
            dir,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(LISTS_FILENAME)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::Io(err)),
    }
}

impl ListStore for JsonFileStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        read_optional(&self.path())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        self.writer.write(LISTS_FILENAME, contents)?;
        Ok(())
    }

    fn read_legacy(&self) -> Result<Option<String>, StorageError> {
        read_optional(&self.dir.join(LEGACY_ITEMS_FILENAME))
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    contents: Option<String>,
    legacy: Option<String>,
    fail_writes: bool,
    fail_reads: bool,
    writes: usize,
}

/// In-memory store for tests and embedding. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().contents = Some(contents.into());
        store
    }

    pub fn with_legacy(legacy: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().legacy = Some(legacy.into());
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ListStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StorageError::Unavailable("read refused".into()));
        }
        Ok(inner.contents.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        inner.contents = Some(contents.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn read_legacy(&self) -> Result<Option<String>, StorageError> {
        Ok(self.lock().legacy.clone())
    }
}

/// Result of the startup load. `lists` is never empty.
#[derive(Debug)]
pub struct LoadOutcome {
    pub lists: Vec<GroceryList>,
    /// Set when stored data was unreadable and a fresh default list was used.
    pub recovered: Option<StorageError>,
}

pub fn save_lists(store: &dyn ListStore, lists: &[GroceryList]) -> Result<(), StorageError> {
    let json = serde_json::to_string(lists).map_err(|e| StorageError::Serialize(e.to_string()))?;
    store.write(&json)
}

/// Loads the list collection, synthesizing and persisting a default list
/// when storage is empty, unreadable or malformed. Never fails.
pub fn load_lists(store: &dyn ListStore) -> LoadOutcome {
    let (lists, recovered) = match read_lists(store) {
        Ok(Some(lists)) if !lists.is_empty() => {
            grocery_info!("Loaded {} grocery lists", lists.len());
            return LoadOutcome {
                lists,
                recovered: None,
            };
        }
        Ok(_) => (vec![migrate_legacy(store)], None),
        Err(err) => {
            grocery_error!("Error loading lists: {}", err);
            (vec![GroceryList::default_list()], Some(err))
        }
    };

    if let Err(err) = save_lists(store, &lists) {
        grocery_error!("Failed to persist default list: {}", err);
    }
    LoadOutcome { lists, recovered }
}

fn read_lists(store: &dyn ListStore) -> Result<Option<Vec<GroceryList>>, StorageError> {
    let Some(text) = store.read()? else {
        return Ok(None);
    };
    serde_json::from_str::<Vec<GroceryList>>(&text)
        .map(Some)
        .map_err(|e| StorageError::Malformed(e.to_string()))
}

/// Default list, seeded with items from the legacy layout when present.
fn migrate_legacy(store: &dyn ListStore) -> GroceryList {
    let mut list = GroceryList::default_list();
    let legacy = match store.read_legacy() {
        Ok(Some(text)) => text,
        Ok(None) => return list,
        Err(err) => {
            grocery_warn!("Failed to read legacy items: {}", err);
            return list;
        }
    };
    match serde_json::from_str::<Vec<GroceryItem>>(&legacy) {
        Ok(items) => {
            grocery_info!("Migrated {} legacy items into {:?}", items.len(), list.name);
            list.items = items;
        }
        Err(err) => grocery_warn!("Ignoring malformed legacy items: {}", err),
    }
    list
}
