//! Tutor provider trait.
//!
//! The seam between the session flow and the hosted generative model. The
//! HTTP implementation lives in `studybro-interaction`; tests substitute an
//! in-memory one.

use crate::doubt::{DoubtRequest, ImageAttachment};
use crate::error::Result;
use futures::Stream;
use std::pin::Pin;

/// One item of a streamed explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationChunk {
    /// A non-empty text fragment, in arrival order
    Text(String),
    /// Source URLs the provider grounded the answer on
    Citations(Vec<String>),
}

/// Lazy, finite, non-restartable sequence of explanation chunks.
///
/// The first `Err` ends the sequence.
pub type ExplanationStream = Pin<Box<dyn Stream<Item = Result<ExplanationChunk>> + Send>>;

/// A finished video job's asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVideo {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Remote generative operations used by a tutoring session.
#[async_trait::async_trait]
pub trait TutorProvider: Send + Sync {
    /// Opens a streamed, structured explanation for `request`.
    ///
    /// Errors opening the stream are returned directly; errors after that
    /// arrive as the last stream item.
    async fn stream_explanation(&self, request: &DoubtRequest) -> Result<ExplanationStream>;

    /// Generates one square educational diagram.
    ///
    /// Returns a data URL of the first image in the response, or `None` when
    /// the response contains no image.
    async fn generate_diagram(&self, topic: &str, student_class: &str) -> Result<Option<String>>;

    /// Submits a video job, waits for it and downloads the asset.
    ///
    /// Returns [`crate::StudyError::GenerationTimedOut`] when the job does not
    /// finish within the configured poll budget.
    async fn generate_video(
        &self,
        topic: &str,
        student_class: &str,
        seed_image: Option<&ImageAttachment>,
    ) -> Result<GeneratedVideo>;
}
