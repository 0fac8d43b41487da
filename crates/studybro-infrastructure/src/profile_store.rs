//! JSON-backed profile repository.

use crate::paths::StudyPaths;
use crate::storage::AtomicJsonFile;
use std::path::PathBuf;
use std::sync::RwLock;
use studybro_core::user::{ProfileRepository, UserProfile};
use studybro_core::{Result, StudyError};

/// Keeps the profile in memory and mirrors every change to `profile.json`.
pub struct JsonProfileRepository {
    file: AtomicJsonFile<UserProfile>,
    profile: RwLock<UserProfile>,
}

impl JsonProfileRepository {
    pub fn open(path: PathBuf) -> Self {
        let file = AtomicJsonFile::<UserProfile>::new(path);
        let profile = file.load_or_default();
        Self {
            file,
            profile: RwLock::new(profile),
        }
    }

    pub fn from_paths(paths: &StudyPaths) -> Result<Self> {
        let path = paths
            .profile_file()
            .map_err(|e| StudyError::config(e.to_string()))?;
        Ok(Self::open(path))
    }
}

impl ProfileRepository for JsonProfileRepository {
    fn get(&self) -> UserProfile {
        self.profile
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        let mut current = self.profile.write().unwrap_or_else(|e| e.into_inner());
        *current = profile.clone();
        self.file.save(&current)?;
        Ok(())
    }
}
