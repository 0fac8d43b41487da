use clap::Parser;
use std::path::PathBuf;
use studybro_core::doubt::{ExplanationMode, Language, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "studybro")]
#[command(about = "StudyBro - solve school doubts with step-by-step explanations", long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for profile, history, media and logs
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Initial class, e.g. "Class 7"
    #[arg(long = "class", value_name = "CLASS")]
    pub student_class: Option<String>,

    /// Initial language: bengali, english or banglish
    #[arg(long = "lang", value_name = "LANGUAGE")]
    pub language: Option<Language>,

    /// Initial mode: normal, eli10 or exam
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ExplanationMode>,
}

impl Cli {
    /// Applies command-line overrides on top of the configured defaults.
    pub fn apply_overrides(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(student_class) = self.student_class.as_deref() {
            if !student_class.trim().is_empty() {
                config.student_class = student_class.trim().to_string();
            }
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        config
    }
}
