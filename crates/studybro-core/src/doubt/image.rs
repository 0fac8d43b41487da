//! Inline image attachments.
//!
//! Photographed questions travel through the system as base64 payloads. The
//! stored and displayed form is a data URL (`data:<mime>;base64,<payload>`);
//! the provider receives the bare payload plus its MIME type.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

/// MIME type assumed when an attachment does not carry one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// A base64-encoded image with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    mime_type: String,
    data: String,
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(mime_type, BASE64_STANDARD.encode(bytes))
    }

    /// Parses a data URL, or accepts a bare base64 payload.
    ///
    /// Anything after the first comma is the payload. A missing or empty MIME
    /// type in the header falls back to [`DEFAULT_IMAGE_MIME`].
    pub fn from_data_url(value: &str) -> Self {
        match value.split_once(',') {
            Some((header, payload)) => {
                let mime = header
                    .strip_prefix("data:")
                    .unwrap_or(header)
                    .split(';')
                    .next()
                    .map(str::trim)
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or(DEFAULT_IMAGE_MIME);
                Self::new(mime, payload)
            }
            None => Self::new(DEFAULT_IMAGE_MIME, value),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without any data-URL header.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        Ok(BASE64_STANDARD.decode(self.data.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_url_extracts_mime_and_payload() {
        let image = ImageAttachment::from_data_url("data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.data(), "/9j/4AAQ");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn test_bare_payload_defaults_to_png() {
        let image = ImageAttachment::from_data_url("iVBORw0KGgo=");
        assert_eq!(image.mime_type(), DEFAULT_IMAGE_MIME);
        assert_eq!(image.data(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_header_without_mime_defaults_to_png() {
        let image = ImageAttachment::from_data_url("data:;base64,AAAA");
        assert_eq!(image.mime_type(), DEFAULT_IMAGE_MIME);
        assert_eq!(image.data(), "AAAA");
    }

    #[test]
    fn test_bytes_survive_encoding() {
        let bytes = [0x89, b'P', b'N', b'G', 0, 1, 2, 255];
        let image = ImageAttachment::from_bytes(&bytes, "image/png");
        assert_eq!(image.decode_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_invalid_payload_fails_to_decode() {
        let image = ImageAttachment::new("image/png", "not base64!!");
        assert!(image.decode_bytes().is_err());
    }
}
