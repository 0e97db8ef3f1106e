//! Client configuration.
//!
//! Built once at startup from the command line and the process environment,
//! then passed by reference into the client. Nothing here is global.

use std::path::PathBuf;

use super::errors::OcrError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Environment variable holding the inference server's host name or IP.
pub const SERVER_ENV_VAR: &str = "SERVER_IP";

/// Port the generate API listens on.
pub const SERVER_PORT: u16 = 11434;

/// Path of the generate endpoint on the inference server.
pub const GENERATE_PATH: &str = "/api/generate";

/// Prompt sent when the user does not supply one.
pub const DEFAULT_PROMPT: &str = "Free OCR.";

// ─── ClientConfig ────────────────────────────────────────────────────────────

/// Everything one OCR invocation needs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or IP of the inference server.
    pub server_host: String,
    /// Prompt text sent to the model.
    pub prompt: String,
    /// Local image to send.
    pub image_path: PathBuf,
    /// Read the response as a stream of chunks instead of one body.
    pub streaming: bool,
    /// Send the inference `options` block in streaming mode too.
    ///
    /// Single-shot requests always carry it.
    pub stream_options: bool,
}

impl ClientConfig {
    /// Validate the server address and build a configuration.
    ///
    /// A missing or blank address fails with `MissingConfiguration` before
    /// any other work happens.
    pub fn new(
        server_host: Option<String>,
        image_path: impl Into<PathBuf>,
        prompt: impl Into<String>,
    ) -> Result<Self, OcrError> {
        let server_host = server_host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or(OcrError::MissingConfiguration)?;

        Ok(Self {
            server_host,
            prompt: prompt.into(),
            image_path: image_path.into(),
            streaming: true,
            stream_options: true,
        })
    }

    /// Choose between streaming and single-shot response handling.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Choose whether streaming requests carry the `options` block.
    pub fn with_stream_options(mut self, stream_options: bool) -> Self {
        self.stream_options = stream_options;
        self
    }

    /// Base URL of the inference server, e.g. `http://10.0.0.5:11434`.
    ///
    /// Bare IPv6 literals are bracketed.
    pub fn base_url(&self) -> String {
        let host = &self.server_host;
        if host.contains(':') && !host.starts_with('[') {
            format!("http://[{host}]:{SERVER_PORT}")
        } else {
            format!("http://{host}:{SERVER_PORT}")
        }
    }

    /// Whether the request for this configuration carries inference options.
    pub fn sends_options(&self) -> bool {
        !self.streaming || self.stream_options
    }
}

/// Join a base URL and the generate path.
pub fn generate_url(base_url: &str) -> String {
    format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/'))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_server_host_fails() {
        let err = ClientConfig::new(None, "scan.png", DEFAULT_PROMPT).unwrap_err();
        assert!(matches!(err, OcrError::MissingConfiguration));
        assert!(err.to_string().contains("SERVER_IP"));
    }

    #[test]
    fn test_blank_server_host_fails() {
        let err = ClientConfig::new(Some("   ".into()), "scan.png", DEFAULT_PROMPT).unwrap_err();
        assert!(matches!(err, OcrError::MissingConfiguration));
    }

    #[test]
    fn test_defaults_to_streaming_with_options() {
        let config = ClientConfig::new(Some("10.0.0.5".into()), "scan.png", "Read it.").unwrap();
        assert!(config.streaming);
        assert!(config.sends_options());
        assert_eq!(config.prompt, "Read it.");
    }

    #[test]
    fn test_base_url_ipv4() {
        let config = ClientConfig::new(Some(" 10.0.0.5 ".into()), "scan.png", DEFAULT_PROMPT).unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.5:11434");
        assert_eq!(
            generate_url(&config.base_url()),
            "http://10.0.0.5:11434/api/generate"
        );
    }

    #[test]
    fn test_base_url_ipv6_is_bracketed() {
        let config = ClientConfig::new(Some("fe80::1".into()), "scan.png", DEFAULT_PROMPT).unwrap();
        assert_eq!(config.base_url(), "http://[fe80::1]:11434");
    }

    #[test]
    fn test_single_shot_always_sends_options() {
        let config = ClientConfig::new(Some("gpu-box".into()), "scan.png", DEFAULT_PROMPT)
            .unwrap()
            .with_streaming(false)
            .with_stream_options(false);
        assert!(config.sends_options());

        let streaming = config.with_streaming(true);
        assert!(!streaming.sends_options());
    }

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        assert_eq!(
            generate_url("http://127.0.0.1:4000/"),
            "http://127.0.0.1:4000/api/generate"
        );
    }
}
