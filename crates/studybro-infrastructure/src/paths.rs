//! Unified path management for StudyBro files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/studybro/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/studybro/     # Data directory (overridable)
//! ├── profile.json             # UserProfile slot
//! ├── history.json             # History slot
//! ├── media/                   # Downloaded videos
//! └── logs/                    # Daily rolling logs
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "studybro";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver for StudyBro.
///
/// With a base directory every path lives under it (tests, portable
/// installs); otherwise the platform config and data directories are used.
#[derive(Debug, Clone, Default)]
pub struct StudyPaths {
    base_dir: Option<PathBuf>,
}

impl StudyPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/studybro/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/studybro/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn profile_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("profile.json"))
    }

    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("history.json"))
    }

    pub fn media_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("media"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_overrides_everything() {
        let paths = StudyPaths::new(Some(Path::new("/tmp/studybro-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/studybro-test/config.toml")
        );
        assert_eq!(
            paths.history_file().unwrap(),
            PathBuf::from("/tmp/studybro-test/history.json")
        );
        assert_eq!(
            paths.media_dir().unwrap(),
            PathBuf::from("/tmp/studybro-test/media")
        );
    }

    #[test]
    fn test_platform_dirs_end_with_app_name() {
        let paths = StudyPaths::default();
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with(APP_DIR_NAME));
        }
        if let Ok(profile) = paths.profile_file() {
            assert!(profile.ends_with("profile.json"));
        }
    }
}
