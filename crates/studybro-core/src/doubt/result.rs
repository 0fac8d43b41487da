//! Transient solver result.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The only message shown to the student when a doubt fails to solve.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Which kind of media, if any, is currently being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaGeneration {
    #[default]
    None,
    Image,
    Video,
}

/// Result fields of the current session.
///
/// Lives only as long as the session. `result_text` grows monotonically while
/// a stream is being consumed; at a terminal state either it is non-empty or
/// `error_message` is set, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    /// True from submission until the first fragment (or a failure) arrives
    pub is_analyzing: bool,
    pub result_text: Option<String>,
    pub error_message: Option<String>,
    /// Data URL of the generated diagram
    pub diagram_url: Option<String>,
    /// Local handle (file path) of the generated video
    pub video_url: Option<String>,
    pub citation_urls: Vec<String>,
    pub media_generation: MediaGeneration,
}

impl SolverResult {
    /// Resets the fields for a fresh submission.
    ///
    /// Previously generated diagram and video are dropped along with the old
    /// text.
    pub fn begin(&mut self) {
        self.is_analyzing = true;
        self.result_text = Some(String::new());
        self.error_message = None;
        self.diagram_url = None;
        self.video_url = None;
        self.citation_urls.clear();
    }

    pub fn append_fragment(&mut self, fragment: &str) {
        self.is_analyzing = false;
        self.result_text
            .get_or_insert_with(String::new)
            .push_str(fragment);
    }

    /// Adds citation URLs, keeping first-seen order and skipping duplicates.
    pub fn add_citations<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        for url in urls {
            if !self.citation_urls.contains(&url) {
                self.citation_urls.push(url);
            }
        }
    }

    /// Terminal failure: the partial text is discarded.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_analyzing = false;
        self.result_text = None;
        self.citation_urls.clear();
        self.error_message = Some(message.into());
    }

    /// Replaces the text with a stored result, clearing any generated media.
    pub fn restore(&mut self, result_text: impl Into<String>) {
        self.is_analyzing = false;
        self.result_text = Some(result_text.into());
        self.error_message = None;
        self.diagram_url = None;
        self.video_url = None;
        self.citation_urls.clear();
    }

    /// True when there is a non-empty explanation to build media from.
    pub fn has_result(&self) -> bool {
        self.result_text
            .as_deref()
            .is_some_and(|text| !text.is_empty())
    }

    pub fn text(&self) -> &str {
        self.result_text.as_deref().unwrap_or_default()
    }
}
