//! Kinds of operations a tutoring session can have in flight.

use super::result::MediaGeneration;
use serde::{Deserialize, Serialize};
use strum::Display;

/// An operation that occupies the session while it runs.
///
/// A session runs at most one of these at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum OperationKind {
    #[strum(to_string = "doubt solving")]
    Solving,
    #[strum(to_string = "diagram generation")]
    GeneratingImage,
    #[strum(to_string = "video generation")]
    GeneratingVideo,
    #[strum(to_string = "history restore")]
    RestoringHistory,
}

impl OperationKind {
    /// The media flag this operation raises, if any.
    pub fn media_generation(&self) -> MediaGeneration {
        match self {
            OperationKind::Solving | OperationKind::RestoringHistory => MediaGeneration::None,
            OperationKind::GeneratingImage => MediaGeneration::Image,
            OperationKind::GeneratingVideo => MediaGeneration::Video,
        }
    }
}
