//! Doubt solver use case.
//!
//! Drives the request/stream/persist flow of one tutoring session and the
//! media generation that hangs off its result. Every operation that talks to
//! the provider claims the session's [`OperationGuard`] first, so a second
//! start while one is in flight is rejected with [`StudyError::Busy`].

use crate::session::{OperationGuard, SessionState};
use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use studybro_core::doubt::{
    DoubtRequest, ExplanationMode, GENERIC_FAILURE_MESSAGE, ImageAttachment, Language,
    OperationKind, SessionConfig,
};
use studybro_core::history::{HistoryItem, HistoryRepository};
use studybro_core::media::MediaStore;
use studybro_core::provider::{ExplanationChunk, TutorProvider};
use studybro_core::{Result, StudyError};
use tokio::sync::RwLock;

/// How a submit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to send: empty query and no image. No request was issued.
    Ignored,
    /// The explanation completed and was recorded in history.
    Solved(HistoryItem),
    /// The request failed; the session shows the generic failure message.
    Failed,
}

/// How a diagram or video request ended.
///
/// Only `Ready` changes the session. The failure variants leave the media
/// area empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    /// There is no explanation to illustrate yet.
    Skipped,
    /// Media is available at the contained URL or path.
    Ready(String),
    /// The provider answered without producing any media.
    NotProduced,
    Failed,
    /// The video job did not finish within its poll budget.
    TimedOut,
}

/// Use case for solving doubts within one session.
pub struct DoubtSolverUseCase {
    provider: Arc<dyn TutorProvider>,
    history: Arc<dyn HistoryRepository>,
    media_store: Arc<dyn MediaStore>,
    state: RwLock<SessionState>,
    guard: OperationGuard,
}

impl DoubtSolverUseCase {
    /// Creates a session starting from `config`.
    pub fn new(
        provider: Arc<dyn TutorProvider>,
        history: Arc<dyn HistoryRepository>,
        media_store: Arc<dyn MediaStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            provider,
            history,
            media_store,
            state: RwLock::new(SessionState::new(config)),
            guard: OperationGuard::new(),
        }
    }

    /// Returns a copy of the session with the media flag taken from the guard.
    pub async fn snapshot(&self) -> SessionState {
        let mut state = self.state.read().await.clone();
        state.result.media_generation = self.guard.media_generation();
        state
    }

    pub fn running(&self) -> Option<OperationKind> {
        self.guard.running()
    }

    // ============================================================================
    // Session setters
    // ============================================================================

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
    }

    pub async fn set_student_class(&self, student_class: impl Into<String>) -> Result<()> {
        let student_class = student_class.into();
        if student_class.trim().is_empty() {
            return Err(StudyError::validation("student class must not be empty"));
        }
        self.state.write().await.config.student_class = student_class;
        Ok(())
    }

    pub async fn set_language(&self, language: Language) {
        self.state.write().await.config.language = language;
    }

    pub async fn set_mode(&self, mode: ExplanationMode) {
        self.state.write().await.config.mode = mode;
    }

    pub async fn attach_image(&self, image: ImageAttachment) {
        self.state.write().await.image = Some(image);
    }

    pub async fn remove_image(&self) {
        self.state.write().await.image = None;
    }

    // ============================================================================
    // Solving
    // ============================================================================

    /// Sends the current query and image and streams the explanation.
    ///
    /// `on_fragment` sees every text fragment in arrival order as it is
    /// appended to the session result. A completed explanation is prepended
    /// to history.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Busy`] when another operation is in flight and
    /// a validation error for a blank class. Provider failures are not
    /// errors: they end in [`SubmitOutcome::Failed`].
    pub async fn submit<F>(&self, mut on_fragment: F) -> Result<SubmitOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let request = self.state.read().await.to_request();
        if !request.has_content() {
            tracing::debug!("[Solver] Nothing to submit");
            return Ok(SubmitOutcome::Ignored);
        }
        request.config.validate()?;

        let _permit = self.guard.try_begin(OperationKind::Solving)?;
        self.state.write().await.result.begin();

        tracing::info!(
            class = %request.config.student_class,
            language = %request.config.language,
            mode = %request.config.mode,
            has_image = request.image.is_some(),
            "[Solver] Submitting doubt"
        );

        let text = match self.consume_explanation(&request, &mut on_fragment).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[Solver] Explanation failed: {}", e);
                self.state.write().await.result.fail(GENERIC_FAILURE_MESSAGE);
                return Ok(SubmitOutcome::Failed);
            }
        };

        let item = HistoryItem::from_solved(&request, text, Utc::now());
        let history = Arc::clone(&self.history);
        let stored = item.clone();
        if let Err(e) = run_blocking(move || history.insert(stored)).await {
            tracing::warn!("[Solver] Failed to persist history item {}: {}", item.id, e);
        }

        tracing::info!("[Solver] Doubt solved ({} chars)", item.result.len());
        Ok(SubmitOutcome::Solved(item))
    }

    async fn consume_explanation<F>(
        &self,
        request: &DoubtRequest,
        on_fragment: &mut F,
    ) -> Result<String>
    where
        F: FnMut(&str) + Send,
    {
        let mut stream = self.provider.stream_explanation(request).await?;

        while let Some(chunk) = stream.next().await {
            match chunk? {
                ExplanationChunk::Text(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    self.state.write().await.result.append_fragment(&fragment);
                    on_fragment(&fragment);
                }
                ExplanationChunk::Citations(urls) => {
                    self.state.write().await.result.add_citations(urls);
                }
            }
        }

        let mut state = self.state.write().await;
        state.result.is_analyzing = false;
        if !state.result.has_result() {
            return Err(StudyError::provider(None, "explanation stream ended without text"));
        }
        Ok(state.result.text().to_string())
    }

    // ============================================================================
    // History
    // ============================================================================

    pub fn history(&self) -> Vec<HistoryItem> {
        self.history.list()
    }

    /// Replays a past doubt into the session.
    ///
    /// Restores query, class, image and result, and drops any diagram or
    /// video generated for the previous result. The session is held for the
    /// whole restore, so nothing can start halfway through it.
    pub async fn load_history_item(&self, id: &str) -> Result<HistoryItem> {
        let _permit = self.guard.try_begin(OperationKind::RestoringHistory)?;

        let item = self
            .history
            .find(id)
            .ok_or_else(|| StudyError::not_found("HistoryItem", id))?;

        let mut state = self.state.write().await;
        state.query = item.restored_query().to_string();
        state.config.student_class = item.student_class.clone();
        state.image = item.image();
        state.result.restore(item.result.clone());

        tracing::debug!("[Solver] Loaded history item {}", item.id);
        Ok(item)
    }

    pub async fn clear_history(&self) {
        let history = Arc::clone(&self.history);
        if let Err(e) = run_blocking(move || history.clear()).await {
            tracing::warn!("[Solver] Failed to persist cleared history: {}", e);
        }
    }

    // ============================================================================
    // Media generation
    // ============================================================================

    /// Requests a diagram for the current topic.
    pub async fn generate_diagram(&self) -> Result<MediaOutcome> {
        let _permit = self.guard.try_begin(OperationKind::GeneratingImage)?;

        let (topic, student_class) = {
            let state = self.state.read().await;
            if !state.result.has_result() {
                return Ok(MediaOutcome::Skipped);
            }
            (state.media_topic(), state.config.student_class.clone())
        };

        tracing::info!("[Solver] Generating diagram for '{}'", topic);

        match self.provider.generate_diagram(&topic, &student_class).await {
            Ok(Some(url)) => {
                self.state.write().await.result.diagram_url = Some(url.clone());
                Ok(MediaOutcome::Ready(url))
            }
            Ok(None) => {
                tracing::info!("[Solver] Diagram response contained no image");
                Ok(MediaOutcome::NotProduced)
            }
            Err(e) => {
                tracing::warn!("[Solver] Diagram generation failed: {}", e);
                Ok(MediaOutcome::Failed)
            }
        }
    }

    /// Requests a short video for the current topic.
    ///
    /// The attached image, if any, seeds the video. The finished asset is
    /// written through the media store and its path becomes the video URL.
    pub async fn generate_video(&self) -> Result<MediaOutcome> {
        let _permit = self.guard.try_begin(OperationKind::GeneratingVideo)?;

        let (topic, student_class, seed_image) = {
            let state = self.state.read().await;
            if !state.result.has_result() {
                return Ok(MediaOutcome::Skipped);
            }
            (
                state.media_topic(),
                state.config.student_class.clone(),
                state.image.clone(),
            )
        };

        tracing::info!(
            has_seed_image = seed_image.is_some(),
            "[Solver] Generating video for '{}'",
            topic
        );

        let video = match self
            .provider
            .generate_video(&topic, &student_class, seed_image.as_ref())
            .await
        {
            Ok(video) => video,
            Err(e) if e.is_timed_out() => {
                tracing::warn!("[Solver] Video generation timed out: {}", e);
                return Ok(MediaOutcome::TimedOut);
            }
            Err(e) => {
                tracing::warn!("[Solver] Video generation failed: {}", e);
                return Ok(MediaOutcome::Failed);
            }
        };

        match self.media_store.store_video(&video) {
            Ok(path) => {
                self.state.write().await.result.video_url = Some(path.clone());
                Ok(MediaOutcome::Ready(path))
            }
            Err(e) => {
                tracing::warn!("[Solver] Failed to store generated video: {}", e);
                Ok(MediaOutcome::Failed)
            }
        }
    }
}

/// Runs a repository write on the blocking pool.
async fn run_blocking<F>(write: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(write)
        .await
        .map_err(|e| StudyError::io(format!("history write task failed: {e}")))?
}
