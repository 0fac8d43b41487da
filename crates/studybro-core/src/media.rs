//! Local materialization of generated media.

use crate::error::Result;
use crate::provider::GeneratedVideo;

/// Turns downloaded media into a locally addressable handle.
pub trait MediaStore: Send + Sync {
    /// Writes the video somewhere local and returns a handle (a file path)
    /// the presentation layer can open.
    fn store_video(&self, video: &GeneratedVideo) -> Result<String>;
}
