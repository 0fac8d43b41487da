//! Profile repository trait.

use super::model::UserProfile;
use crate::error::Result;

/// Durable store for the singleton user profile.
pub trait ProfileRepository: Send + Sync {
    /// Returns the current profile (the default if nothing was stored).
    fn get(&self) -> UserProfile;

    /// Replaces the profile and persists it.
    fn save(&self, profile: &UserProfile) -> Result<()>;
}
