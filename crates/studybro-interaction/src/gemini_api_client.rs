//! GeminiApiClient - Direct REST API implementation of the tutor provider.
//!
//! Talks to the Gemini REST API for the three remote operations a session
//! needs: a streamed explanation (`streamGenerateContent` over SSE, read with
//! `reqwest-eventsource`), a one-shot diagram (`generateContent` with an
//! image model) and a video job (`predictLongRunning`, polled until done,
//! then downloaded).

use crate::prompts::{PromptBuilder, TUTOR_SYSTEM_INSTRUCTION};
use crate::video_job;
use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use reqwest::{Client, Response, StatusCode};
use reqwest_eventsource::retry::Never;
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;
use studybro_core::config::{ProviderSettings, VideoSettings};
use studybro_core::doubt::{DEFAULT_IMAGE_MIME, DoubtRequest, ImageAttachment};
use studybro_core::provider::{ExplanationChunk, ExplanationStream, GeneratedVideo, TutorProvider};
use studybro_core::{Result, StudyError};

const DIAGRAM_ASPECT_RATIO: &str = "1:1";
const VIDEO_ASPECT_RATIO: &str = "16:9";
const VIDEO_RESOLUTION: &str = "720p";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Tutor provider implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    settings: ProviderSettings,
    video: VideoSettings,
    prompts: PromptBuilder,
    system_instruction: String,
}

impl GeminiApiClient {
    /// Creates a new client with the provided API key and provider settings.
    pub fn new(api_key: impl Into<String>, settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
            video: VideoSettings::default(),
            prompts: PromptBuilder::new(),
            system_instruction: TUTOR_SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Overrides the video polling budget.
    pub fn with_video_settings(mut self, video: VideoSettings) -> Self {
        self.video = video;
        self
    }

    /// Replaces the tutor system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn build_explanation_request(&self, request: &DoubtRequest) -> Result<GenerateContentRequest> {
        let prompt = self.prompts.explanation(request)?;

        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(image) = &request.image {
            parts.push(Part::inline(image));
        }

        Ok(GenerateContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: self.system_instruction.clone(),
                }],
            }),
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
                image_config: None,
            }),
            tools: self
                .settings
                .search_grounding
                .then(|| vec![Tool::default()]),
        })
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| transport_error("Gemini API request failed", err))?;

        ensure_success(response).await
    }

    async fn fetch_operation(&self, name: &str) -> Result<Option<Operation>> {
        let url = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        );

        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| transport_error("Video status request failed", err))?;
        let operation: Operation = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| transport_error("Failed to parse video operation", err))?;

        Ok(operation.done.then_some(operation))
    }

    async fn download_video(&self, uri: &str) -> Result<GeneratedVideo> {
        let response = self
            .client
            .get(with_api_key(uri, &self.api_key))
            .send()
            .await
            .map_err(|err| transport_error("Video download failed", err))?;
        let response = ensure_success(response).await?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("video/"))
            .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|err| transport_error("Video download interrupted", err))?;

        Ok(GeneratedVideo {
            bytes: bytes.to_vec(),
            mime_type,
        })
    }
}

#[async_trait]
impl TutorProvider for GeminiApiClient {
    async fn stream_explanation(&self, request: &DoubtRequest) -> Result<ExplanationStream> {
        let body = self.build_explanation_request(request)?;
        let url = self.model_url(&self.settings.text_model, "streamGenerateContent");

        tracing::info!(
            model = %self.settings.text_model,
            has_image = request.image.is_some(),
            "[Gemini] Opening explanation stream"
        );

        let builder = self
            .client
            .post(&url)
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&body);
        let mut events = EventSource::new(builder).map_err(|err| {
            StudyError::provider(None, format!("Failed to build explanation request: {err}"))
        })?;
        // A dropped stream is a failed explanation, never a reconnect
        events.set_retry_policy(Box::new(Never));

        match events.next().await {
            Some(Ok(Event::Open)) => Ok(explanation_stream(events)),
            Some(Ok(Event::Message(_))) => {
                events.close();
                Err(StudyError::provider(None, "Explanation stream sent data before opening"))
            }
            Some(Err(err)) => {
                events.close();
                Err(event_source_error(err).await.unwrap_or_else(|| {
                    StudyError::provider(None, "Explanation stream closed before opening")
                }))
            }
            None => Err(StudyError::provider(None, "Explanation stream closed before opening")),
        }
    }

    async fn generate_diagram(&self, topic: &str, student_class: &str) -> Result<Option<String>> {
        let prompt = self.prompts.diagram(topic, student_class)?;
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::Text { text: prompt }])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                thinking_config: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: DIAGRAM_ASPECT_RATIO,
                }),
            }),
            tools: None,
        };
        let url = self.model_url(&self.settings.image_model, "generateContent");

        tracing::info!(model = %self.settings.image_model, "[Gemini] Requesting diagram");

        let parsed: GenerateContentResponse = self
            .post_json(&url, &[], &body)
            .await?
            .json()
            .await
            .map_err(|err| transport_error("Failed to parse Gemini response", err))?;

        Ok(extract_inline_image(&parsed))
    }

    async fn generate_video(
        &self,
        topic: &str,
        student_class: &str,
        seed_image: Option<&ImageAttachment>,
    ) -> Result<GeneratedVideo> {
        let prompt = self.prompts.video(topic, student_class)?;
        let body = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt,
                image: seed_image.map(|image| VideoImage {
                    bytes_base64_encoded: image.data().to_string(),
                    mime_type: image.mime_type().to_string(),
                }),
            }],
            parameters: VideoParameters {
                aspect_ratio: VIDEO_ASPECT_RATIO,
                resolution: VIDEO_RESOLUTION,
                sample_count: 1,
            },
        };
        let url = self.model_url(&self.settings.video_model, "predictLongRunning");

        let submitted: Operation = self
            .post_json(&url, &[], &body)
            .await?
            .json()
            .await
            .map_err(|err| transport_error("Failed to parse video operation", err))?;

        tracing::info!(
            model = %self.settings.video_model,
            operation = %submitted.name,
            "[Gemini] Video job submitted"
        );

        let finished = if submitted.done {
            submitted
        } else {
            let client = self;
            let name = submitted.name.as_str();
            video_job::poll_until_done(
                self.video.poll_interval(),
                self.video.max_poll_attempts,
                move || client.fetch_operation(name),
            )
            .await?
        };

        let uri = finished.into_video_uri()?;
        self.download_video(&uri).await
    }
}

// ============================================================================
// Streaming
// ============================================================================

struct StreamState<S> {
    events: Pin<Box<S>>,
    pending: VecDeque<Result<ExplanationChunk>>,
    done: bool,
}

/// Adapts an SSE event stream into explanation chunks.
///
/// The server closing the stream ends it normally. The first error
/// (transport, malformed event, or provider error event) is yielded once and
/// ends the stream.
pub(crate) fn explanation_stream<S>(events: S) -> ExplanationStream
where
    S: Stream<Item = std::result::Result<Event, EventSourceError>> + Send + 'static,
{
    let state = StreamState {
        events: Box::pin(events),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }

            match state.events.next().await {
                Some(Ok(Event::Open)) => {}
                Some(Ok(Event::Message(message))) => match parse_stream_event(&message.data) {
                    Ok(chunks) => state.pending.extend(chunks.into_iter().map(Ok)),
                    Err(err) => {
                        state.done = true;
                        state.pending.push_back(Err(err));
                    }
                },
                Some(Err(err)) => {
                    state.done = true;
                    if let Some(err) = event_source_error(err).await {
                        state.pending.push_back(Err(err));
                    }
                }
                None => state.done = true,
            }
        }
    }))
}

/// Maps an event source error; `None` means the server ended the stream.
async fn event_source_error(err: EventSourceError) -> Option<StudyError> {
    match err {
        EventSourceError::StreamEnded => None,
        EventSourceError::InvalidStatusCode(status, response) => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            Some(map_http_error(status, body))
        }
        EventSourceError::Transport(err) => {
            Some(transport_error("Explanation stream interrupted", err))
        }
        other => Some(StudyError::provider(
            None,
            format!("Explanation stream interrupted: {other}"),
        )),
    }
}

/// Turns one SSE payload into zero or more chunks.
fn parse_stream_event(payload: &str) -> Result<Vec<ExplanationChunk>> {
    let event: GenerateContentResponse = serde_json::from_str(payload)
        .map_err(|err| StudyError::provider(None, format!("Malformed stream event: {err}")))?;

    if let Some(error) = event.error {
        return Err(StudyError::provider(
            error.code.and_then(|code| u16::try_from(code).ok()),
            error.describe(),
        ));
    }

    let mut chunks = Vec::new();
    let Some(candidate) = event.candidates.and_then(|candidates| candidates.into_iter().next())
    else {
        return Ok(chunks);
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text)
        .collect();
    if !text.is_empty() {
        chunks.push(ExplanationChunk::Text(text));
    }

    let citations: Vec<String> = candidate
        .grounding_metadata
        .and_then(|metadata| metadata.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web.and_then(|web| web.uri))
        .collect();
    if !citations.is_empty() {
        chunks.push(ExplanationChunk::Citations(citations));
    }

    Ok(chunks)
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

impl Part {
    fn inline(image: &ImageAttachment) -> Self {
        Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type().to_string(),
                data: image.data().to_string(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize, Default)]
struct GoogleSearch {}

#[derive(Serialize)]
struct PredictLongRunningRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Serialize)]
struct VideoInstance {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<VideoImage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoImage {
    bytes_base64_encoded: String,
    mime_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    aspect_ratio: &'static str,
    resolution: &'static str,
    sample_count: u32,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    text: Option<String>,
    thought: Option<bool>,
    inline_data: Option<InlineDataResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataResponse {
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
}

#[derive(Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<ErrorBody>,
    response: Option<OperationResponse>,
}

impl Operation {
    fn into_video_uri(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(StudyError::provider(
                error.code.and_then(|code| u16::try_from(code).ok()),
                error.describe(),
            ));
        }

        self.response
            .and_then(|response| response.generate_video_response)
            .and_then(|response| response.generated_samples)
            .and_then(|samples| samples.into_iter().next())
            .and_then(|sample| sample.video)
            .and_then(|video| video.uri)
            .ok_or_else(|| {
                StudyError::provider(None, "Video job finished without a downloadable video")
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    generated_samples: Option<Vec<GeneratedSample>>,
}

#[derive(Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

impl ErrorBody {
    fn describe(&self) -> String {
        let message = self.message.clone().unwrap_or_else(|| "unknown error".to_string());
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => format!("{status}: {message}"),
            _ => message,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .map(|inline| {
            let mime = inline.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME);
            format!("data:{mime};base64,{}", inline.data)
        })
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
    Err(map_http_error(status, body_text))
}

fn map_http_error(status: StatusCode, body: String) -> StudyError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| wrapper.error.describe())
        .unwrap_or(body);

    tracing::warn!(status = status.as_u16(), "[Gemini] Request rejected: {}", message);
    StudyError::provider(Some(status.as_u16()), message)
}

/// Maps a transport error without leaking the keyed URL.
fn transport_error(context: &str, err: reqwest::Error) -> StudyError {
    let err = err.without_url();
    StudyError::provider(
        err.status().map(|status| status.as_u16()),
        format!("{context}: {err}"),
    )
}

/// Appends the API key to a provider-issued download URI.
fn with_api_key(uri: &str, api_key: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}key={api_key}")
}
