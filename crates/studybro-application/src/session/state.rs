use studybro_core::doubt::{DoubtRequest, ImageAttachment, SessionConfig, SolverResult};

/// Topic sent for media generation when the query box is empty.
pub const FALLBACK_TOPIC: &str = "Current topic";

/// In-memory state of the active session. Discarded when the process exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub config: SessionConfig,
    pub query: String,
    pub image: Option<ImageAttachment>,
    pub result: SolverResult,
}

impl SessionState {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds the request a submit would send right now.
    pub fn to_request(&self) -> DoubtRequest {
        DoubtRequest::new(self.query.clone(), self.image.clone(), self.config.clone())
    }

    /// Topic for diagram and video prompts.
    pub fn media_topic(&self) -> String {
        let query = self.query.trim();
        if query.is_empty() {
            FALLBACK_TOPIC.to_string()
        } else {
            query.to_string()
        }
    }
}
