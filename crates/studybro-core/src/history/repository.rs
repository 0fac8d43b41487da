//! History repository trait.

use super::model::HistoryItem;
use crate::error::Result;

/// Durable store for solved doubts.
///
/// Implementations load once when constructed and write the whole collection
/// back after every mutation. Reads are served from memory.
pub trait HistoryRepository: Send + Sync {
    /// Returns all items, newest first.
    fn list(&self) -> Vec<HistoryItem>;

    /// Finds an item by id.
    fn find(&self, id: &str) -> Option<HistoryItem>;

    /// Prepends an item, evicting the oldest beyond capacity, and persists.
    fn insert(&self, item: HistoryItem) -> Result<()>;

    /// Removes every item and persists the empty collection.
    fn clear(&self) -> Result<()>;
}
