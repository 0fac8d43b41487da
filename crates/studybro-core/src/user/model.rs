//! UserProfile domain model.
//!
//! Represents the single local user: a display name and an optional picture.

use serde::{Deserialize, Serialize};

/// User profile domain model.
///
/// One per installation, edited directly from the settings surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Name shown in the header
    pub display_name: String,
    /// Profile picture as a data URL
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            display_name: "Student".to_string(),
            profile_picture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.display_name, "Student");
        assert!(profile.profile_picture.is_none());
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = UserProfile {
            display_name: "Riya".to_string(),
            profile_picture: Some("data:image/png;base64,AA".to_string()),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["displayName"], "Riya");
        assert_eq!(json["profilePicture"], "data:image/png;base64,AA");
    }
}
