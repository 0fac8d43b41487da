//! Configuration loading.
//!
//! Reads `config.toml` into [`RootConfig`]. A missing file means defaults; a
//! file that exists but does not parse is a configuration error, so a typo
//! never silently resets the models or the poll budget.

use crate::paths::StudyPaths;
use std::fs;
use std::path::{Path, PathBuf};
use studybro_core::config::RootConfig;
use studybro_core::{Result, StudyError};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_paths(paths: &StudyPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| StudyError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!("[Config] {:?} not found, using defaults", self.path);
            return Ok(RootConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: RootConfig = toml::from_str(&content).map_err(|e| {
            StudyError::config(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the default `config.toml` if none exists yet.
    pub fn ensure_config_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = toml::to_string_pretty(&RootConfig::default())?;
        fs::write(&self.path, template)?;
        tracing::info!("[Config] Created default config at {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybro_core::doubt::{ExplanationMode, Language};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), RootConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[video\nmax_poll_attempts = ").unwrap();

        let err = ConfigService::new(path).load().unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
    }

    #[test]
    fn test_session_values_ignore_case() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[session]\nlanguage = \"english\"\nmode = \"EXAM\"\n").unwrap();

        let loaded = ConfigService::new(path).load().unwrap();
        assert_eq!(loaded.session.language, Language::English);
        assert_eq!(loaded.session.mode, ExplanationMode::Exam);
    }

    #[test]
    fn test_zero_poll_budget_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[video]\nmax_poll_attempts = 0\n").unwrap();

        let err = ConfigService::new(path.clone()).load().unwrap_err();
        assert!(err.to_string().contains("max_poll_attempts"));

        fs::write(&path, "[video]\npoll_interval_secs = 0\n").unwrap();
        assert!(matches!(
            ConfigService::new(path).load(),
            Err(StudyError::Config(_))
        ));
    }

    #[test]
    fn test_template_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("nested").join("config.toml"));

        service.ensure_config_file().unwrap();
        let loaded = service.load().unwrap();

        assert_eq!(loaded, RootConfig::default());
        assert_eq!(loaded.session.language, Language::Bengali);
    }
}
