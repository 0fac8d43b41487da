//! Loading photographed questions and profile pictures from disk.

use std::fs;
use std::path::Path;
use studybro_core::doubt::{DEFAULT_IMAGE_MIME, ImageAttachment};
use studybro_core::{Result, StudyError};

/// Reads an image file into an attachment, guessing its MIME type from the
/// extension.
pub fn load_image_attachment(path: &Path) -> Result<ImageAttachment> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(StudyError::validation(format!(
            "{} is empty",
            path.display()
        )));
    }

    let mime = mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME);

    Ok(ImageAttachment::from_bytes(&bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_comes_from_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notebook.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let image = load_image_attachment(&path).unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.decode_bytes().unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_unknown_extension_defaults_to_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.bin");
        fs::write(&path, [1, 2, 3]).unwrap();

        let image = load_image_attachment(&path).unwrap();
        assert_eq!(image.mime_type(), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn test_missing_and_empty_files_fail() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_image_attachment(&temp_dir.path().join("nope.png")).is_err());

        let empty = temp_dir.path().join("empty.png");
        fs::write(&empty, b"").unwrap();
        assert!(load_image_attachment(&empty).is_err());
    }
}
