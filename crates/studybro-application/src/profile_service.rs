//! Profile editing.

use std::sync::Arc;
use studybro_core::doubt::ImageAttachment;
use studybro_core::user::{ProfileRepository, UserProfile};
use studybro_core::{Result, StudyError};

/// Edits the installation's single user profile.
///
/// Every mutation writes the whole profile back. A failed write is logged and
/// the in-memory profile is still returned.
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub fn profile(&self) -> UserProfile {
        self.repository.get()
    }

    pub fn rename(&self, display_name: &str) -> Result<UserProfile> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(StudyError::validation("display name must not be empty"));
        }

        let mut profile = self.repository.get();
        profile.display_name = display_name.to_string();
        self.persist(&profile);
        Ok(profile)
    }

    pub fn set_picture(&self, picture: &ImageAttachment) -> UserProfile {
        let mut profile = self.repository.get();
        profile.profile_picture = Some(picture.to_data_url());
        self.persist(&profile);
        profile
    }

    pub fn remove_picture(&self) -> UserProfile {
        let mut profile = self.repository.get();
        profile.profile_picture = None;
        self.persist(&profile);
        profile
    }

    fn persist(&self, profile: &UserProfile) {
        if let Err(e) = self.repository.save(profile) {
            tracing::warn!("[Profile] Failed to persist profile: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryProfiles {
        profile: Mutex<UserProfile>,
        fail_writes: bool,
    }

    impl ProfileRepository for MemoryProfiles {
        fn get(&self) -> UserProfile {
            self.profile.lock().unwrap().clone()
        }

        fn save(&self, profile: &UserProfile) -> Result<()> {
            *self.profile.lock().unwrap() = profile.clone();
            if self.fail_writes {
                return Err(StudyError::io("disk full"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_rename_trims_and_persists() {
        let repo = Arc::new(MemoryProfiles::default());
        let service = ProfileService::new(repo.clone());

        let profile = service.rename("  Rupa ").unwrap();
        assert_eq!(profile.display_name, "Rupa");
        assert_eq!(repo.get().display_name, "Rupa");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let service = ProfileService::new(Arc::new(MemoryProfiles::default()));
        assert!(matches!(service.rename("   "), Err(StudyError::Validation(_))));
        assert_eq!(service.profile().display_name, "Student");
    }

    #[test]
    fn test_picture_set_and_removed() {
        let service = ProfileService::new(Arc::new(MemoryProfiles::default()));

        let profile = service.set_picture(&ImageAttachment::new("image/jpeg", "/9j/"));
        assert_eq!(profile.profile_picture.as_deref(), Some("data:image/jpeg;base64,/9j/"));

        let profile = service.remove_picture();
        assert!(profile.profile_picture.is_none());
        assert!(service.profile().profile_picture.is_none());
    }

    #[test]
    fn test_write_failure_does_not_fail_rename() {
        let repo = Arc::new(MemoryProfiles {
            fail_writes: true,
            ..MemoryProfiles::default()
        });
        let service = ProfileService::new(repo);
        assert_eq!(service.rename("Arif").unwrap().display_name, "Arif");
    }
}
