//! NDJSON streaming response parser for the generate API.
//!
//! Reads a response body as a byte stream, splits it on newlines, and parses
//! each non-empty line as a `GenerateChunk`. Lines may be split across byte
//! chunks in any way.

use std::fmt::Display;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use super::errors::OcrError;
use super::types::GenerateChunk;

// ─── Line parser ─────────────────────────────────────────────────────────────

/// Parse a raw byte stream into `GenerateChunk`s.
///
/// Yields one item per non-empty line. A trailing line without a newline is
/// still parsed when the body ends. Read failures surface as `StreamError`.
pub fn parse_ndjson_stream<S, B, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<GenerateChunk, OcrError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let byte_stream: Pin<Box<S>> = Box::pin(byte_stream);

    stream::unfold(
        (byte_stream, Vec::<u8>::new(), false),
        |(mut byte_stream, mut buffer, mut finished)| async move {
            loop {
                // Emit any complete line already buffered
                if let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line_bytes: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line_bytes);
                    if line.trim().is_empty() {
                        continue;
                    }
                    let item = decode_chunk_line(&line);
                    return Some((item, (byte_stream, buffer, finished)));
                }

                if finished {
                    let rest = String::from_utf8_lossy(&buffer).to_string();
                    buffer.clear();
                    if rest.trim().is_empty() {
                        return None;
                    }
                    return Some((decode_chunk_line(&rest), (byte_stream, buffer, finished)));
                }

                match byte_stream.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(bytes.as_ref()),
                    Some(Err(e)) => {
                        return Some((
                            Err(OcrError::StreamError {
                                reason: format!("stream read error: {e}"),
                            }),
                            (byte_stream, buffer, finished),
                        ));
                    }
                    None => finished = true,
                }
            }
        },
    )
}

/// Parse one NDJSON line.
///
/// A chunk carrying an `error` field becomes `ServerError`.
pub fn decode_chunk_line(line: &str) -> Result<GenerateChunk, OcrError> {
    let line = line.trim();
    let chunk: GenerateChunk =
        serde_json::from_str(line).map_err(|e| OcrError::MalformedChunk {
            line: line.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(message) = chunk.error {
        return Err(OcrError::ServerError { message });
    }

    Ok(chunk)
}

// ─── Stream State ────────────────────────────────────────────────────────────

/// Lifecycle of one streaming exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Streaming,
    Done,
    Failed,
}

/// Inputs that drive `StreamState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// The server answered with a 2xx status.
    Connected,
    /// A chunk was decoded.
    Chunk { done: bool },
    /// Any transport or parse failure.
    Error,
}

impl StreamState {
    /// Apply one event. Terminal states absorb everything.
    pub fn next(self, event: StreamEvent) -> StreamState {
        use StreamEvent::*;
        use StreamState::*;

        match (self, event) {
            (Done, _) | (Failed, _) => self,
            (_, Error) => Failed,
            (Connecting, Connected) => Streaming,
            (Streaming, Chunk { done: true }) => Done,
            (Streaming, Chunk { done: false }) => Streaming,
            (Streaming, Connected) => Streaming,
            (Connecting, Chunk { .. }) => Failed,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
