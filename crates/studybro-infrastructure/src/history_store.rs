//! JSON-backed history repository.
//!
//! The whole collection is loaded once on construction and rewritten to
//! `history.json` after every mutation.

use crate::paths::StudyPaths;
use crate::storage::AtomicJsonFile;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use studybro_core::history::{History, HistoryItem, HistoryRepository};
use studybro_core::{Result, StudyError};

pub struct JsonHistoryRepository {
    file: AtomicJsonFile<History>,
    history: RwLock<History>,
}

impl JsonHistoryRepository {
    /// Opens the slot at `path`. Missing or corrupt data yields an empty
    /// history.
    pub fn open(path: PathBuf) -> Self {
        let file = AtomicJsonFile::<History>::new(path);
        let loaded = file.load_or_default();
        let history = History::from_items(loaded.items().to_vec());

        tracing::debug!(
            "[HistoryStore] Loaded {} item(s) from {:?}",
            history.len(),
            file.path()
        );

        Self {
            file,
            history: RwLock::new(history),
        }
    }

    pub fn from_paths(paths: &StudyPaths) -> Result<Self> {
        let path = paths
            .history_file()
            .map_err(|e| StudyError::config(e.to_string()))?;
        Ok(Self::open(path))
    }

    fn read(&self) -> RwLockReadGuard<'_, History> {
        self.history.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, History> {
        self.history.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl HistoryRepository for JsonHistoryRepository {
    fn list(&self) -> Vec<HistoryItem> {
        self.read().items().to_vec()
    }

    fn find(&self, id: &str) -> Option<HistoryItem> {
        self.read().get(id).cloned()
    }

    fn insert(&self, item: HistoryItem) -> Result<()> {
        let mut history = self.write();
        history.insert(item);
        self.file.save(&history)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut history = self.write();
        history.clear();
        self.file.save(&history)?;
        tracing::info!("[HistoryStore] History cleared");
        Ok(())
    }
}
