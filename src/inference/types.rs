//! Wire types for the generate API.
//!
//! Request types are serialized as-is; response fields are all optional so a
//! server that leaves one out still parses.

use serde::{Deserialize, Deserializer, Serialize};

use super::encoder::EncodedImage;

/// Model identifier requested from the server.
pub const OCR_MODEL: &str = "deepseek-ocr";

// ─── Request Types ───────────────────────────────────────────────────────────

/// Request body for `POST /api/generate`.
///
/// `images` is a one-element array: the client sends exactly one file.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub images: [String; 1],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

impl GenerateRequest {
    /// Build a request carrying the default inference options.
    pub fn new(image: EncodedImage, prompt: impl Into<String>, stream: bool) -> Self {
        Self {
            model: OCR_MODEL.to_string(),
            prompt: prompt.into(),
            images: [image.into_inner()],
            stream,
            options: Some(GenerateOptions::default()),
        }
    }

    /// Drop the `options` block from the request.
    pub fn without_options(mut self) -> Self {
        self.options = None;
        self
    }
}

/// Inference options. Fixed policy, not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    /// Thread hint for the server runtime.
    pub num_thread: u32,
    /// Output length cap; bounds worst-case latency.
    pub num_predict: u32,
    /// Zero for reproducible extraction.
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            num_thread: 16,
            num_predict: 1024,
            temperature: 0.0,
        }
    }
}

// ─── Response Types ──────────────────────────────────────────────────────────

/// One line of a streamed response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateChunk {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// A single-shot response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::from_bytes(b"\x89PNG")
    }

    #[test]
    fn test_request_serializes_options() {
        let req = GenerateRequest::new(image(), "Free OCR.", false);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["model"], "deepseek-ocr");
        assert_eq!(value["prompt"], "Free OCR.");
        assert_eq!(value["stream"], false);
        assert_eq!(value["images"].as_array().unwrap().len(), 1);
        assert_eq!(value["images"][0], "iVBORw==");
        assert_eq!(value["options"]["num_thread"], 16);
        assert_eq!(value["options"]["num_predict"], 1024);
        assert_eq!(value["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_request_without_options_omits_block() {
        let req = GenerateRequest::new(image(), "Free OCR.", true).without_options();
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("options").is_none());
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn test_chunk_defaults_missing_fields() {
        let chunk: GenerateChunk = serde_json::from_str(r#"{"model":"deepseek-ocr"}"#).unwrap();
        assert_eq!(chunk.response, "");
        assert!(!chunk.done);
        assert!(chunk.error.is_none());
    }

    #[test]
    fn test_chunk_null_fields_take_defaults() {
        let chunk: GenerateChunk =
            serde_json::from_str(r#"{"response":null,"done":null}"#).unwrap();
        assert_eq!(chunk.response, "");
        assert!(!chunk.done);
    }

    #[test]
    fn test_response_null_text_is_none() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"response":null}"#).unwrap();
        assert!(resp.response.is_none());
    }

    #[test]
    fn test_response_without_text_is_none() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(resp.response.is_none());
    }
}
