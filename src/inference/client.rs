//! Generate-API OCR client.
//!
//! Sends one image to the inference server and returns the extracted text,
//! either from a single JSON body or from a newline-delimited chunk stream
//! that is echoed to an output sink as it arrives.

use std::io::Write;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client as HttpClient;

use super::config::{generate_url, ClientConfig};
use super::encoder::encode_image;
use super::errors::OcrError;
use super::streaming::{parse_ndjson_stream, StreamEvent, StreamState};
use super::types::{GenerateRequest, GenerateResponse};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// End-to-end bound for one exchange, including reading a streamed body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Written once the server has accepted a streaming request.
pub const STREAM_HEADER: &str = "\n--- OCR EXTRACTED TEXT ---\n";

/// Written after the chunk carrying `done = true`.
pub const COMPLETION_BANNER: &str = "\n\n--- Extraction Complete ---\n";

// ─── OcrClient ───────────────────────────────────────────────────────────────

/// Client for the inference server's generate endpoint.
pub struct OcrClient {
    http: HttpClient,
    base_url: String,
}

impl OcrClient {
    /// Create a client targeting the server named in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, OcrError> {
        Self::with_base_url(config.base_url())
    }

    /// Create a client targeting an explicit base URL (scheme, host, port).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, OcrError> {
        let base_url = base_url.into();

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OcrError::ConnectionFailed {
                endpoint: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, base_url })
    }

    /// Full URL of the generate endpoint.
    pub fn endpoint(&self) -> String {
        generate_url(&self.base_url)
    }

    /// Run one OCR request end to end.
    ///
    /// Encodes the image, builds the request, and reads the response in the
    /// mode `config.streaming` selects. Streaming mode writes the header,
    /// each fragment, and the completion banner to `out` as they arrive.
    /// Both modes return the assembled text.
    ///
    /// The image is read before any network activity, so a bad path never
    /// reaches the server.
    pub async fn run_ocr<W: Write>(
        &self,
        config: &ClientConfig,
        out: &mut W,
    ) -> Result<String, OcrError> {
        let image = encode_image(&config.image_path)?;

        let mut request = GenerateRequest::new(image, config.prompt.clone(), config.streaming);
        if !config.sends_options() {
            request = request.without_options();
        }

        if config.streaming {
            self.generate_stream(&request, out).await
        } else {
            self.generate(&request).await
        }
    }

    // ─── Single-shot ─────────────────────────────────────────────────────

    /// Send a request and parse one JSON body.
    ///
    /// A body without a `response` field yields an empty string.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, OcrError> {
        let url = self.endpoint();
        let response = self.send(&url, request).await?;

        let body = response
            .text()
            .await
            .map_err(|e| OcrError::from_reqwest(e, &url, REQUEST_TIMEOUT.as_secs()))?;

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| OcrError::MalformedResponse {
                reason: format!("{e}"),
            })?;

        if let Some(message) = parsed.error {
            return Err(OcrError::ServerError { message });
        }

        let text = parsed.response.unwrap_or_default();
        tracing::info!(chars = text.len(), "OCR response received");
        Ok(text)
    }

    // ─── Streaming ───────────────────────────────────────────────────────

    /// Send a streaming request and echo chunks to `out` until `done`.
    ///
    /// Lines after the completion chunk are not read. A body that ends
    /// without one still returns the text received, without the banner.
    pub async fn generate_stream<W: Write>(
        &self,
        request: &GenerateRequest,
        out: &mut W,
    ) -> Result<String, OcrError> {
        let mut state = StreamState::Connecting;
        let result = self.read_stream(request, out, &mut state).await;

        if let Err(ref e) = result {
            state = state.next(StreamEvent::Error);
            tracing::warn!(state = ?state, error = %e, "streaming OCR failed");
        }

        result
    }

    async fn read_stream<W: Write>(
        &self,
        request: &GenerateRequest,
        out: &mut W,
        state: &mut StreamState,
    ) -> Result<String, OcrError> {
        let url = self.endpoint();
        let response = self.send(&url, request).await?;
        *state = state.next(StreamEvent::Connected);

        out.write_all(STREAM_HEADER.as_bytes())?;
        out.flush()?;

        let mut chunks = std::pin::pin!(parse_ndjson_stream(response.bytes_stream()));
        let mut text = String::new();
        let mut count = 0usize;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            count += 1;
            *state = state.next(StreamEvent::Chunk { done: chunk.done });

            out.write_all(chunk.response.as_bytes())?;
            out.flush()?;
            text.push_str(&chunk.response);

            if *state == StreamState::Done {
                out.write_all(COMPLETION_BANNER.as_bytes())?;
                out.flush()?;
                tracing::info!(chunks = count, chars = text.len(), "OCR stream complete");
                return Ok(text);
            }
        }

        tracing::warn!(
            state = ?state,
            chunks = count,
            chars = text.len(),
            "OCR stream closed without a completion chunk"
        );
        Ok(text)
    }

    // ─── Transport ───────────────────────────────────────────────────────

    /// POST the request and reject non-2xx statuses.
    async fn send(
        &self,
        url: &str,
        request: &GenerateRequest,
    ) -> Result<reqwest::Response, OcrError> {
        // Log request metadata only; the image payload can be megabytes
        tracing::info!(
            url = %url,
            model = %request.model,
            stream = request.stream,
            has_options = request.options.is_some(),
            image_b64_len = request.images[0].len(),
            "=== OCR REQUEST ==="
        );

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| OcrError::from_reqwest(e, url, REQUEST_TIMEOUT.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
