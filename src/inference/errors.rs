//! OCR client error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Every transport
//! failure renders with a `Request Failed:` prefix so both response modes
//! report failures the same way.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running an OCR request.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The server address was not provided by flag, environment, or `.env`.
    #[error("SERVER_IP not found in environment or .env file")]
    MissingConfiguration,

    /// The image file could not be read.
    #[error("File '{}' could not be read: {reason}", path.display())]
    FileAccess {
        path: PathBuf,
        reason: String,
    },

    /// TCP/HTTP connection to the inference server failed.
    #[error("Request Failed: connection to {endpoint} failed: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// The exchange did not finish within the request timeout.
    #[error("Request Failed: timed out after {duration_secs}s")]
    Timeout {
        duration_secs: u64,
    },

    /// Non-2xx HTTP response from the inference server.
    #[error("Request Failed: HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
    },

    /// Transport failure while reading a streamed body.
    #[error("Request Failed: stream error: {reason}")]
    StreamError {
        reason: String,
    },

    /// A single-shot response body was not valid JSON.
    #[error("Request Failed: malformed response: {reason}")]
    MalformedResponse {
        reason: String,
    },

    /// A streamed line was not valid JSON.
    #[error("malformed chunk: {reason} (line: {line})")]
    MalformedChunk {
        line: String,
        reason: String,
    },

    /// The server answered 2xx but reported an error in the body.
    #[error("server error: {message}")]
    ServerError {
        message: String,
    },

    /// Writing extracted text to the output sink failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl OcrError {
    /// Whether this error came from the network exchange itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OcrError::ConnectionFailed { .. }
                | OcrError::Timeout { .. }
                | OcrError::HttpError { .. }
                | OcrError::StreamError { .. }
        )
    }

    /// Map a `reqwest` failure onto the matching transport variant.
    pub(crate) fn from_reqwest(err: reqwest::Error, endpoint: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            OcrError::Timeout {
                duration_secs: timeout_secs,
            }
        } else {
            OcrError::ConnectionFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
