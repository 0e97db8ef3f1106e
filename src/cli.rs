//! Command-line interface.
//!
//! The server address comes from `--server-ip` or the `SERVER_IP`
//! environment variable, which may be populated from a `.env` file in the
//! working directory.

use std::path::PathBuf;

use clap::Parser;

use crate::inference::{ClientConfig, OcrError, DEFAULT_PROMPT};

/// Remote DeepSeek-OCR client.
#[derive(Debug, Clone, Parser)]
#[command(name = "ocr-client")]
#[command(about = "Send a local image to a remote DeepSeek-OCR server and print the text")]
#[command(version)]
pub struct Cli {
    /// Path to the local image file (JPG/PNG).
    pub image: PathBuf,

    /// Custom prompt for the model (e.g. '<|grounding|>Convert to markdown.').
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Host name or IP of the inference server.
    #[arg(long = "server-ip", env = "SERVER_IP")]
    pub server_ip: Option<String>,

    /// Wait for the whole response instead of streaming it.
    #[arg(long)]
    pub no_stream: bool,

    /// Leave the inference options out of streaming requests.
    #[arg(long)]
    pub omit_stream_options: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load `.env` and parse arguments.
    ///
    /// `.env` must be loaded first so clap's `env` fallback can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                eprintln!("Warning: failed to load .env file: {err}");
            }
        }
    }

    /// Build the client configuration, failing fast on a missing server.
    pub fn to_config(&self) -> Result<ClientConfig, OcrError> {
        Ok(
            ClientConfig::new(self.server_ip.clone(), &self.image, self.prompt.clone())?
                .with_streaming(!self.no_stream)
                .with_stream_options(!self.omit_stream_options),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ocr-client", "scan.png", "--server-ip", "10.0.0.5"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("scan.png"));
        assert_eq!(cli.prompt, "Free OCR.");

        let config = cli.to_config().unwrap();
        assert!(config.streaming);
        assert!(config.stream_options);
        assert_eq!(config.server_host, "10.0.0.5");
    }

    #[test]
    fn test_prompt_short_flag_and_modes() {
        let cli = Cli::try_parse_from([
            "ocr-client",
            "scan.png",
            "-p",
            "<|grounding|>Convert to markdown.",
            "--server-ip",
            "gpu-box",
            "--no-stream",
            "--omit-stream-options",
        ])
        .unwrap();
        assert_eq!(cli.prompt, "<|grounding|>Convert to markdown.");

        let config = cli.to_config().unwrap();
        assert!(!config.streaming);
        assert!(!config.stream_options);
        assert!(config.sends_options());
    }

    #[test]
    fn test_image_is_required() {
        assert!(Cli::try_parse_from(["ocr-client"]).is_err());
    }

    #[test]
    fn test_missing_server_is_configuration_error() {
        let cli = Cli {
            image: PathBuf::from("scan.png"),
            prompt: DEFAULT_PROMPT.into(),
            server_ip: None,
            no_stream: false,
            omit_stream_options: false,
            verbose: false,
        };
        let err = cli.to_config().unwrap_err();
        assert!(err.to_string().contains("SERVER_IP"));
    }
}
