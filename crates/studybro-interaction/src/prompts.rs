//! Prompt templates for the three provider operations.

use minijinja::{Environment, context};
use studybro_core::doubt::DoubtRequest;
use studybro_core::{Result, StudyError};

/// System instruction sent with every explanation request.
pub const TUTOR_SYSTEM_INSTRUCTION: &str = "\
You are Study Bro, a patient and friendly tutor for school students in India.
Explain at the level of the student's class and in the requested language.
When the language is Banglish, write Bengali in Latin script mixed with English terms.
Always answer with these sections, in this order, each under its own heading:
1. Restate the question
2. Concept
3. Step-by-step explanation
4. Calculations (write \"Not applicable\" when there are none)
5. Final answer
6. Quick recap
In \"Explain like I’m 10\" mode use everyday examples and very short sentences.
In \"Exam Mode\" keep to the marking scheme and point out common mistakes.
Never invent facts; say so when something is outside the syllabus.";

const EXPLANATION_TEMPLATE: &str = "\
Student Class: {{ student_class }}
Language: {{ language }}
Mode: {{ mode }}
Query: {{ query }}

Rules:
- Adapt to regional Indian school syllabus where appropriate (West Bengal/Pan-India).
- Strictly follow the structure: Restate, Concept, Step-by-Step, Calculations, Final Answer, Recap.
- Detect if the question is trending/exam-important and mention it.
{% if has_image %}- The question is in the attached photo; read it carefully before answering.
{% endif %}";

const DIAGRAM_TEMPLATE: &str = "A clear, simple educational diagram for a {{ student_class }} student explaining: {{ topic }}. White background, minimalist, labeled clearly. No text overload. High educational value.";

const VIDEO_TEMPLATE: &str = "Educational video for a {{ student_class }} student about: {{ topic }}. Focus on concept clarity.";

/// Renders prompts from the fixed templates.
#[derive(Clone)]
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    pub fn explanation(&self, request: &DoubtRequest) -> Result<String> {
        self.render(
            EXPLANATION_TEMPLATE,
            context! {
                student_class => request.config.student_class,
                language => request.config.language.to_string(),
                mode => request.config.mode.to_string(),
                query => request.query,
                has_image => request.image.is_some(),
            },
        )
    }

    pub fn diagram(&self, topic: &str, student_class: &str) -> Result<String> {
        self.render(
            DIAGRAM_TEMPLATE,
            context! { topic => topic, student_class => student_class },
        )
    }

    pub fn video(&self, topic: &str, student_class: &str) -> Result<String> {
        self.render(
            VIDEO_TEMPLATE,
            context! { topic => topic, student_class => student_class },
        )
    }

    fn render(&self, template: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .render_str(template, ctx)
            .map_err(|e| StudyError::internal(format!("failed to render prompt: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybro_core::doubt::{ExplanationMode, ImageAttachment, Language, SessionConfig};

    fn request(query: &str, image: Option<ImageAttachment>) -> DoubtRequest {
        DoubtRequest::new(
            query,
            image,
            SessionConfig {
                student_class: "Class 7".to_string(),
                language: Language::English,
                mode: ExplanationMode::Eli10,
            },
        )
    }

    #[test]
    fn test_explanation_embeds_session_settings() {
        let prompt = PromptBuilder::new()
            .explanation(&request("What is photosynthesis?", None))
            .unwrap();

        assert!(prompt.starts_with("Student Class: Class 7\nLanguage: English\n"));
        assert!(prompt.contains("Mode: Explain like I’m 10"));
        assert!(prompt.contains("Query: What is photosynthesis?"));
        assert!(prompt.contains("Restate, Concept, Step-by-Step, Calculations, Final Answer, Recap"));
        assert!(prompt.contains("exam-important"));
        assert!(!prompt.contains("attached photo"));
    }

    #[test]
    fn test_explanation_mentions_photo_when_attached() {
        let image = ImageAttachment::from_data_url("data:image/png;base64,AAAA");
        let prompt = PromptBuilder::new()
            .explanation(&request("", Some(image)))
            .unwrap();
        assert!(prompt.contains("attached photo"));
    }

    #[test]
    fn test_query_is_not_html_escaped() {
        let prompt = PromptBuilder::new()
            .explanation(&request("Is 3 < 5 & 5 > 3?", None))
            .unwrap();
        assert!(prompt.contains("Query: Is 3 < 5 & 5 > 3?"));
    }

    #[test]
    fn test_media_prompts() {
        let builder = PromptBuilder::new();
        let diagram = builder.diagram("the water cycle", "Class 6").unwrap();
        assert!(diagram.starts_with("A clear, simple educational diagram for a Class 6 student explaining: the water cycle."));
        assert!(diagram.contains("minimalist"));

        let video = builder.video("Newton's third law", "Class 9").unwrap();
        assert_eq!(
            video,
            "Educational video for a Class 9 student about: Newton's third law. Focus on concept clarity."
        );
    }
}
