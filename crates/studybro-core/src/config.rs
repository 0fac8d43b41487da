//! Configuration model.
//!
//! Mirrors `config.toml`. Every section and field has a default so a missing
//! file, a missing section and a partially written section all load.

use crate::doubt::{ExplanationMode, Language, SessionConfig};
use crate::error::{Result, StudyError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub provider: ProviderSettings,
    pub video: VideoSettings,
    pub session: SessionDefaults,
    pub storage: StorageSettings,
}

impl RootConfig {
    /// Rejects settings that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.video.validate()
    }
}

/// Provider endpoint and model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
    /// Attach the search tool to explanation requests and surface citations
    pub search_grounding: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            search_grounding: false,
        }
    }
}

/// Video job polling budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            max_poll_attempts: 60,
        }
    }
}

impl VideoSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Both the interval and the attempt budget must be at least one.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(StudyError::config("video.poll_interval_secs must be at least 1"));
        }
        if self.max_poll_attempts == 0 {
            return Err(StudyError::config("video.max_poll_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Initial class, language and mode of a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub student_class: String,
    pub language: Language,
    pub mode: ExplanationMode,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            student_class: config.student_class,
            language: config.language,
            mode: config.mode,
        }
    }
}

impl SessionDefaults {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            student_class: self.student_class.clone(),
            language: self.language,
            mode: self.mode,
        }
    }
}

/// Where the profile, history and media live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.video.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.provider.text_model, DEFAULT_TEXT_MODEL);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [video]
            max_poll_attempts = 5

            [session]
            student_class = "Class 7"
            language = "English"
            mode = "exam"
            "#,
        )
        .unwrap();

        assert_eq!(config.video.max_poll_attempts, 5);
        assert_eq!(config.video.poll_interval_secs, 10);

        let session = config.session.to_session_config();
        assert_eq!(session.student_class, "Class 7");
        assert_eq!(session.language, Language::English);
        assert_eq!(session.mode, ExplanationMode::Exam);
    }

    #[test]
    fn test_session_enums_ignore_case() {
        let config: RootConfig = toml::from_str(
            r#"
            [session]
            language = "english"
            mode = "EXAM"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.language, Language::English);
        assert_eq!(config.session.mode, ExplanationMode::Exam);

        let err = toml::from_str::<RootConfig>("[session]\nlanguage = \"klingon\"").unwrap_err();
        assert!(err.to_string().contains("unknown language"));
    }

    #[test]
    fn test_video_settings_reject_zero() {
        assert!(RootConfig::default().validate().is_ok());

        let no_attempts = VideoSettings {
            max_poll_attempts: 0,
            ..VideoSettings::default()
        };
        assert!(matches!(no_attempts.validate(), Err(StudyError::Config(_))));

        let busy_loop = VideoSettings {
            poll_interval_secs: 0,
            ..VideoSettings::default()
        };
        assert!(busy_loop.validate().is_err());
    }
}
