//! Content encoder — binary media to transport-safe inline parts.
//!
//! Anchor images are read and base64-encoded once per request; nothing is
//! cached or retained past the request that needed it.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reelsmith_core::error::{Error, Result};
use reelsmith_core::message::Part;
use std::path::{Path, PathBuf};

/// Number of anchor image slots.
pub const ANCHOR_SLOTS: usize = 3;

/// Ordered, optionally-empty anchor image slots.
pub type AnchorImages = [Option<Media>; ANCHOR_SLOTS];

/// MIME type used when none is declared and none can be inferred.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Where the media bytes live.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// Read from disk at encode time
    File(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
}

/// A binary media object with an optional declared MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub source: MediaSource,
    pub mime_type: Option<String>,
}

impl Media {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: MediaSource::File(path.into()),
            mime_type: None,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            source: MediaSource::Bytes(bytes),
            mime_type: Some(mime_type.into()),
        }
    }

    /// Declared MIME type, else one inferred from the file extension, else PNG.
    pub fn resolved_mime_type(&self) -> String {
        if let Some(declared) = self.mime_type.as_deref().filter(|m| !m.trim().is_empty()) {
            return declared.to_string();
        }
        match &self.source {
            MediaSource::File(path) => mime_for_path(path).unwrap_or(DEFAULT_MIME_TYPE),
            MediaSource::Bytes(_) => DEFAULT_MIME_TYPE,
        }
        .to_string()
    }

    fn display_name(&self) -> String {
        match &self.source {
            MediaSource::File(path) => path.display().to_string(),
            MediaSource::Bytes(bytes) => format!("<{} in-memory bytes>", bytes.len()),
        }
    }
}

/// Encoded media paired with its MIME type for re-declaration at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMedia {
    pub mime_type: String,
    pub data: String,
}

impl EncodedMedia {
    pub fn into_part(self) -> Part {
        Part::InlineData {
            mime_type: self.mime_type,
            data: self.data,
        }
    }
}

/// Read and base64-encode a media object.
///
/// Fails with `Error::MediaRead` if the bytes cannot be read. No retry.
pub async fn encode(media: &Media) -> Result<EncodedMedia> {
    let bytes = match &media.source {
        MediaSource::File(path) => tokio::fs::read(path).await.map_err(|e| Error::MediaRead {
            source_name: media.display_name(),
            reason: e.to_string(),
        })?,
        MediaSource::Bytes(bytes) => bytes.clone(),
    };

    Ok(EncodedMedia {
        mime_type: media.resolved_mime_type(),
        data: BASE64.encode(bytes),
    })
}

/// Decode the textual form back to bytes.
pub fn decode(encoded: &EncodedMedia) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.data.as_bytes())
        .map_err(|e| Error::MediaRead {
            source_name: format!("<inline {}>", encoded.mime_type),
            reason: e.to_string(),
        })
}

/// Whether any anchor slot is filled.
pub fn has_anchor_images(anchors: &[Option<Media>]) -> bool {
    anchors.iter().take(ANCHOR_SLOTS).any(Option::is_some)
}

/// Encode filled slots in slot order, skipping empty ones.
pub async fn encode_anchor_images(anchors: &[Option<Media>]) -> Result<Vec<Part>> {
    let mut parts = Vec::new();
    for media in anchors.iter().take(ANCHOR_SLOTS).flatten() {
        parts.push(encode(media).await?.into_part());
    }
    Ok(parts)
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip_reproduces_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let media = Media::from_bytes(bytes.clone(), "image/webp");
        let encoded = encode(&media).await.unwrap();
        assert_eq!(encoded.mime_type, "image/webp");
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }

    #[tokio::test]
    async fn file_media_infers_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchor.JPG");
        std::fs::write(&path, b"\xff\xd8\xff").unwrap();

        let encoded = encode(&Media::from_path(&path)).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(decode(&encoded).unwrap(), b"\xff\xd8\xff");
    }

    #[test]
    fn unknown_extension_defaults_to_png() {
        let media = Media::from_path("/tmp/anchor.bin");
        assert_eq!(media.resolved_mime_type(), DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn missing_file_is_media_read_error() {
        let err = encode(&Media::from_path("/nonexistent/anchor.png")).await.unwrap_err();
        assert!(matches!(err, Error::MediaRead { .. }));
        assert!(err.to_string().contains("anchor.png"));
    }

    #[test]
    fn invalid_base64_fails_to_decode() {
        let encoded = EncodedMedia {
            mime_type: "image/png".into(),
            data: "not base64!".into(),
        };
        assert!(decode(&encoded).is_err());
    }

    #[tokio::test]
    async fn anchors_encode_in_slot_order_skipping_empty() {
        let anchors: AnchorImages = [
            None,
            Some(Media::from_bytes(vec![1], "image/png")),
            Some(Media::from_bytes(vec![2], "image/gif")),
        ];
        assert!(has_anchor_images(&anchors));

        let parts = encode_anchor_images(&anchors).await.unwrap();
        let mimes: Vec<_> = parts
            .iter()
            .map(|p| match p {
                Part::InlineData { mime_type, .. } => mime_type.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(mimes, vec!["image/png", "image/gif"]);
    }

    #[test]
    fn empty_slots_mean_no_anchors() {
        let anchors: AnchorImages = [None, None, None];
        assert!(!has_anchor_images(&anchors));
    }
}
