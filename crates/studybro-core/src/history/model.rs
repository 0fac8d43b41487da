//! HistoryItem domain model and the bounded History collection.

use crate::doubt::{DoubtRequest, ImageAttachment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of solved doubts kept; older ones are dropped.
pub const HISTORY_CAPACITY: usize = 50;

/// Stored in place of the query when a doubt was asked with a photo only.
pub const IMAGE_DOUBT_PLACEHOLDER: &str = "Image-based doubt";

/// A solved doubt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Time-ordered unique identifier (UUIDv7)
    pub id: String,
    pub query: String,
    pub result: String,
    pub timestamp_ms: i64,
    pub student_class: String,
    /// Data URL of the attached photo, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl HistoryItem {
    /// Snapshots a completed request and its full explanation.
    ///
    /// An image-only request is recorded with [`IMAGE_DOUBT_PLACEHOLDER`] as
    /// its query.
    pub fn from_solved(request: &DoubtRequest, result: impl Into<String>, now: DateTime<Utc>) -> Self {
        let query = if request.query.trim().is_empty() {
            IMAGE_DOUBT_PLACEHOLDER.to_string()
        } else {
            request.query.clone()
        };

        Self {
            id: Uuid::now_v7().to_string(),
            query,
            result: result.into(),
            timestamp_ms: now.timestamp_millis(),
            student_class: request.config.student_class.clone(),
            image_data: request.image.as_ref().map(ImageAttachment::to_data_url),
        }
    }

    /// The query to put back into the input box when replaying this item.
    ///
    /// The image-only placeholder is never restored verbatim.
    pub fn restored_query(&self) -> &str {
        if self.query == IMAGE_DOUBT_PLACEHOLDER {
            ""
        } else {
            &self.query
        }
    }

    pub fn image(&self) -> Option<ImageAttachment> {
        self.image_data.as_deref().map(ImageAttachment::from_data_url)
    }
}

/// Newest-first list of solved doubts, capped at [`HISTORY_CAPACITY`].
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from stored items, enforcing the cap.
    pub fn from_items(mut items: Vec<HistoryItem>) -> Self {
        items.truncate(HISTORY_CAPACITY);
        Self { items }
    }

    /// Prepends `item`, then drops whatever falls beyond the cap.
    pub fn insert(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAPACITY);
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doubt::SessionConfig;

    fn item(n: usize) -> HistoryItem {
        HistoryItem {
            id: format!("id-{n}"),
            query: format!("question {n}"),
            result: format!("answer {n}"),
            timestamp_ms: n as i64,
            student_class: "Class 8".to_string(),
            image_data: None,
        }
    }

    #[test]
    fn test_insert_prepends() {
        let mut history = History::new();
        history.insert(item(1));
        history.insert(item(2));
        assert_eq!(history.items()[0].id, "id-2");
        assert_eq!(history.items()[1].id, "id-1");
    }

    #[test]
    fn test_fifty_first_insert_evicts_oldest() {
        let mut history = History::new();
        for n in 1..=HISTORY_CAPACITY + 1 {
            history.insert(item(n));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(history.get("id-1").is_none());
        assert!(history.get("id-2").is_some());
        assert_eq!(history.items()[0].id, format!("id-{}", HISTORY_CAPACITY + 1));
    }

    #[test]
    fn test_from_items_enforces_cap() {
        let items = (0..80).map(item).collect();
        let history = History::from_items(items);
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.items()[0].id, "id-0");
    }

    #[test]
    fn test_history_serializes_as_array() {
        let mut history = History::new();
        history.insert(item(1));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["studentClass"], "Class 8");
        assert!(json[0].get("imageData").is_none());
    }

    #[test]
    fn test_from_solved_uses_literal_query() {
        let config = SessionConfig {
            student_class: "Class 7".to_string(),
            ..Default::default()
        };
        let request = DoubtRequest::new("What is photosynthesis?", None, config);
        let solved = HistoryItem::from_solved(&request, "answer", Utc::now());

        assert_eq!(solved.query, "What is photosynthesis?");
        assert_eq!(solved.student_class, "Class 7");
        assert_eq!(solved.restored_query(), "What is photosynthesis?");
        assert!(solved.image_data.is_none());
    }

    #[test]
    fn test_image_only_doubt_uses_placeholder() {
        let image = ImageAttachment::from_data_url("data:image/png;base64,AAAA");
        let request = DoubtRequest::new("", Some(image.clone()), SessionConfig::default());
        let solved = HistoryItem::from_solved(&request, "answer", Utc::now());

        assert_eq!(solved.query, IMAGE_DOUBT_PLACEHOLDER);
        assert_eq!(solved.restored_query(), "");
        assert_eq!(solved.image(), Some(image));
    }

    #[test]
    fn test_ids_are_unique() {
        let request = DoubtRequest::new("q", None, SessionConfig::default());
        let a = HistoryItem::from_solved(&request, "r", Utc::now());
        let b = HistoryItem::from_solved(&request, "r", Utc::now());
        assert_ne!(a.id, b.id);
    }
}
