//! History domain module.
//!
//! - `model`: Solved-doubt records and the capacity-bounded collection
//! - `repository`: Persistence trait for the collection

mod model;
mod repository;

pub use model::{HISTORY_CAPACITY, History, HistoryItem, IMAGE_DOUBT_PLACEHOLDER};
pub use repository::HistoryRepository;
