use studybro_core::history::{History, HistoryItem, IMAGE_DOUBT_PLACEHOLDER};
use studybro_core::user::UserProfile;

fn sample_item(id: &str, image: Option<&str>) -> HistoryItem {
    HistoryItem {
        id: id.to_string(),
        query: "What is photosynthesis?".to_string(),
        result: "## Restate\nPlants make food...".to_string(),
        timestamp_ms: 1_760_000_000_000,
        student_class: "Class 7".to_string(),
        image_data: image.map(str::to_string),
    }
}

#[test]
fn test_history_round_trips_through_json() {
    let mut history = History::new();
    history.insert(sample_item("a", None));
    history.insert(HistoryItem {
        query: IMAGE_DOUBT_PLACEHOLDER.to_string(),
        ..sample_item("b", Some("data:image/jpeg;base64,/9j/"))
    });

    let json = serde_json::to_string(&history).expect("serialize history");
    let restored: History = serde_json::from_str(&json).expect("deserialize history");
    assert_eq!(restored, history);
}

#[test]
fn test_empty_history_round_trips() {
    let json = serde_json::to_string(&History::default()).unwrap();
    assert_eq!(json, "[]");
    let restored: History = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}

#[test]
fn test_profile_round_trips_including_default() {
    for profile in [
        UserProfile::default(),
        UserProfile {
            display_name: "অর্ক".to_string(),
            profile_picture: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        },
    ] {
        let json = serde_json::to_string(&profile).unwrap();
        let restored: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }
}
