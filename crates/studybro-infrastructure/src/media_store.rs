//! File-backed media store.

use crate::paths::StudyPaths;
use std::fs;
use std::path::PathBuf;
use studybro_core::media::MediaStore;
use studybro_core::provider::GeneratedVideo;
use studybro_core::{Result, StudyError};
use uuid::Uuid;

/// Writes generated videos into a media directory and hands back their
/// paths.
pub struct FileMediaStore {
    media_dir: PathBuf,
}

impl FileMediaStore {
    pub fn new(media_dir: PathBuf) -> Self {
        Self { media_dir }
    }

    pub fn from_paths(paths: &StudyPaths) -> Result<Self> {
        let media_dir = paths
            .media_dir()
            .map_err(|e| StudyError::config(e.to_string()))?;
        Ok(Self::new(media_dir))
    }

    fn extension_for(mime_type: &str) -> &'static str {
        if mime_type == "video/mp4" {
            return "mp4";
        }
        mime_guess::get_mime_extensions_str(mime_type)
            .and_then(|extensions| extensions.first().copied())
            .unwrap_or("mp4")
    }
}

impl MediaStore for FileMediaStore {
    fn store_video(&self, video: &GeneratedVideo) -> Result<String> {
        fs::create_dir_all(&self.media_dir)?;

        let file_name = format!(
            "video-{}.{}",
            Uuid::now_v7(),
            Self::extension_for(&video.mime_type)
        );
        let path = self.media_dir.join(file_name);
        fs::write(&path, &video.bytes)?;

        tracing::info!(
            "[MediaStore] Stored {} byte video at {:?}",
            video.bytes.len(),
            path
        );

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_video_writes_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMediaStore::new(temp_dir.path().join("media"));
        let video = GeneratedVideo {
            bytes: vec![0, 0, 0, 24, b'f', b't', b'y', b'p'],
            mime_type: "video/mp4".to_string(),
        };

        let handle = store.store_video(&video).unwrap();

        assert!(handle.ends_with(".mp4"));
        assert_eq!(fs::read(&handle).unwrap(), video.bytes);
    }

    #[test]
    fn test_unknown_mime_defaults_to_mp4() {
        assert_eq!(FileMediaStore::extension_for("application/x-unknown-thing"), "mp4");
    }
}
