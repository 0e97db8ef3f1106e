//! Image loading and base64 encoding.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::errors::OcrError;

/// Base64 text of an image file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Read the whole file at `path` and base64-encode it.
///
/// Fails with `FileAccess` if the path is missing, unreadable, or not a
/// regular file. Nothing is written.
pub fn encode_image(path: &Path) -> Result<EncodedImage, OcrError> {
    let file_access = |reason: String| OcrError::FileAccess {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| file_access(e.to_string()))?;
    if !metadata.is_file() {
        return Err(file_access("not a regular file".into()));
    }

    let bytes = std::fs::read(path).map_err(|e| file_access(e.to_string()))?;

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        "encoded image"
    );

    Ok(EncodedImage::from_bytes(&bytes))
}
