//! Remote model interaction for StudyBro.
//!
//! Holds the Gemini REST client that implements
//! [`studybro_core::provider::TutorProvider`], along with the prompt
//! templates and the video job poller it is built from.

pub mod gemini_api_client;
pub mod prompts;
pub mod video_job;

pub use gemini_api_client::GeminiApiClient;
