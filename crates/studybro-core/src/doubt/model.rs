//! Session configuration and doubt request models.

use super::image::ImageAttachment;
use crate::error::{Result, StudyError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Language the explanation is written in.
///
/// Bengali is the primary language, English the secondary one and Banglish
/// the hybrid of the two.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(try_from = "String")]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[default]
    Bengali,
    English,
    Banglish,
}

impl TryFrom<String> for Language {
    type Error = StudyError;

    fn try_from(value: String) -> Result<Self> {
        value
            .trim()
            .parse()
            .map_err(|_| StudyError::validation(format!("unknown language '{value}'")))
    }
}

impl Language {
    /// Picks the label matching this language.
    ///
    /// Only English gets the English text; Bengali and Banglish readers both
    /// get the Bengali one.
    pub fn localize<'a>(&self, english: &'a str, bengali: &'a str) -> &'a str {
        match self {
            Language::English => english,
            Language::Bengali | Language::Banglish => bengali,
        }
    }
}

/// How the explanation should be pitched.
///
/// Serializes as its display label. Parsing, from text or from a config
/// file, accepts the label or a short name in any ASCII case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(try_from = "String")]
#[strum(ascii_case_insensitive)]
pub enum ExplanationMode {
    #[default]
    #[strum(to_string = "Normal")]
    #[serde(rename = "Normal")]
    Normal,
    #[strum(
        to_string = "Explain like I’m 10",
        serialize = "Explain like I'm 10",
        serialize = "eli10",
        serialize = "simplified"
    )]
    #[serde(rename = "Explain like I’m 10")]
    Eli10,
    #[strum(to_string = "Exam Mode", serialize = "exam")]
    #[serde(rename = "Exam Mode")]
    Exam,
}

impl TryFrom<String> for ExplanationMode {
    type Error = StudyError;

    fn try_from(value: String) -> Result<Self> {
        value
            .trim()
            .parse()
            .map_err(|_| StudyError::validation(format!("unknown explanation mode '{value}'")))
    }
}

/// Per-request settings chosen by the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Free-text class, e.g. "Class 7"
    pub student_class: String,
    pub language: Language,
    pub mode: ExplanationMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            student_class: "Class 9".to_string(),
            language: Language::default(),
            mode: ExplanationMode::default(),
        }
    }
}

impl SessionConfig {
    /// Rejects a blank class; nothing else is validated.
    pub fn validate(&self) -> Result<()> {
        if self.student_class.trim().is_empty() {
            return Err(StudyError::validation("student class must not be empty"));
        }
        Ok(())
    }
}

/// One question sent to the provider.
///
/// The request type itself accepts an empty query without an image; the
/// submit action is what refuses to send one (see [`DoubtRequest::has_content`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubtRequest {
    pub query: String,
    pub image: Option<ImageAttachment>,
    pub config: SessionConfig,
}

impl DoubtRequest {
    pub fn new(
        query: impl Into<String>,
        image: Option<ImageAttachment>,
        config: SessionConfig,
    ) -> Self {
        Self {
            query: query.into(),
            image,
            config,
        }
    }

    /// True when the request carries a non-blank query or an image.
    pub fn has_content(&self) -> bool {
        !self.query.trim().is_empty() || self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_language_parse_is_case_insensitive() {
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!("BANGLISH".parse::<Language>().unwrap(), Language::Banglish);
        assert!("french".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_localize() {
        assert_eq!(Language::English.localize("Gallery", "গ্যালারি"), "Gallery");
        assert_eq!(Language::Bengali.localize("Gallery", "গ্যালারি"), "গ্যালারি");
        assert_eq!(Language::Banglish.localize("Gallery", "গ্যালারি"), "গ্যালারি");
    }

    #[test]
    fn test_mode_display_and_aliases() {
        assert_eq!(ExplanationMode::Eli10.to_string(), "Explain like I’m 10");
        assert_eq!(
            "explain like i'm 10".parse::<ExplanationMode>().unwrap(),
            ExplanationMode::Eli10
        );
        assert_eq!(ExplanationMode::Exam.to_string(), "Exam Mode");
        assert_eq!("eli10".parse::<ExplanationMode>().unwrap(), ExplanationMode::Eli10);
        assert_eq!("EXAM".parse::<ExplanationMode>().unwrap(), ExplanationMode::Exam);
        assert_eq!(ExplanationMode::iter().count(), 3);
    }

    #[test]
    fn test_mode_serde_uses_display_names() {
        let json = serde_json::to_string(&ExplanationMode::Exam).unwrap();
        assert_eq!(json, "\"Exam Mode\"");
        let parsed: ExplanationMode = serde_json::from_str("\"eli10\"").unwrap();
        assert_eq!(parsed, ExplanationMode::Eli10);
        let label = serde_json::to_string(&ExplanationMode::Eli10).unwrap();
        assert_eq!(label, "\"Explain like I’m 10\"");
        assert_eq!(serde_json::from_str::<ExplanationMode>(&label).unwrap(), ExplanationMode::Eli10);
    }

    #[test]
    fn test_deserialize_ignores_case() {
        let language: Language = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(language, Language::English);
        let mode: ExplanationMode = serde_json::from_str("\"EXAM\"").unwrap();
        assert_eq!(mode, ExplanationMode::Exam);
        let mode: ExplanationMode = serde_json::from_str("\"exam mode\"").unwrap();
        assert_eq!(mode, ExplanationMode::Exam);

        let err = serde_json::from_str::<Language>("\"klingon\"").unwrap_err();
        assert!(err.to_string().contains("unknown language 'klingon'"));
    }

    #[test]
    fn test_session_config_validation() {
        let mut config = SessionConfig::default();
        assert!(config.validate().is_ok());
        config.student_class = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_content_rules() {
        let config = SessionConfig::default();
        assert!(!DoubtRequest::new("", None, config.clone()).has_content());
        assert!(!DoubtRequest::new("  \n", None, config.clone()).has_content());
        assert!(DoubtRequest::new("What is photosynthesis?", None, config.clone()).has_content());

        let image = ImageAttachment::from_data_url("data:image/jpeg;base64,AAAA");
        assert!(DoubtRequest::new("", Some(image), config).has_content());
    }
}
