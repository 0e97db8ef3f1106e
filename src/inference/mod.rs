//! OCR inference client for a remote generate-style API.
//!
//! This module handles the whole exchange with the inference server:
//! - Image loading and base64 encoding
//! - Request building with fixed inference options
//! - Single-shot and NDJSON streaming responses
//!
//! The server is an external collaborator reached only over HTTP; nothing
//! here knows how the model is hosted.

pub mod client;
pub mod config;
pub mod encoder;
pub mod errors;
pub mod streaming;
pub mod types;

// Re-exports for convenience
pub use client::OcrClient;
pub use config::{ClientConfig, DEFAULT_PROMPT, SERVER_ENV_VAR};
pub use encoder::{encode_image, EncodedImage};
pub use errors::OcrError;
pub use types::{GenerateChunk, GenerateOptions, GenerateRequest, GenerateResponse};
