// src/services/cache.rs
use log::{debug, error, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::WideYieldTable;
use crate::services::loader;

/// A cached load result. A failed load is cached as an empty table together
/// with the error message shown to users.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub table: WideYieldTable,
    pub load_error: Option<String>,
}

impl LoadedTable {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Load-once store of yield sheets keyed by path. Entries live for the
/// whole process; there is no invalidation.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: Mutex<HashMap<PathBuf, Arc<LoadedTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        TableCache::default()
    }

    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Arc<LoadedTable> {
        let path = path.as_ref();
        // Held across the load so concurrent first requests read the file once.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(hit) = entries.get(path) {
            debug!("Cache hit for {}", path.display());
            return Arc::clone(hit);
        }

        info!("Cache miss for {}, loading", path.display());
        let loaded = match loader::try_load(path) {
            Ok(table) => LoadedTable {
                table,
                load_error: None,
            },
            Err(e) => {
                error!("Error loading file '{}': {}", path.display(), e);
                LoadedTable {
                    table: WideYieldTable::empty(),
                    load_error: Some(format!("Error loading file: {}", e)),
                }
            }
        };

        let loaded = Arc::new(loaded);
        entries.insert(path.to_path_buf(), Arc::clone(&loaded));
        loaded
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<LoadedTable>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(path.as_ref()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The configured yield sheet plus the cache it is loaded through. Shared by
/// the HTTP handlers.
#[derive(Debug)]
pub struct YieldStore {
    cache: TableCache,
    data_path: PathBuf,
}

impl YieldStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        YieldStore {
            cache: TableCache::new(),
            data_path: data_path.into(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn table(&self) -> Arc<LoadedTable> {
        self.cache.get_or_load(&self.data_path)
    }
}
