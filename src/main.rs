use std::io::{self, Write};
use std::process;

use anyhow::Context;

use ocr_client::cli::Cli;
use ocr_client::inference::OcrClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    tracing::error!(error = %error, "ocr-client terminated with error");
    eprintln!("Error: {error:#}");
    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    ocr_client::init_tracing(cli.verbose);

    let config = cli.to_config()?;
    let client = OcrClient::from_config(&config)?;

    if config.streaming {
        println!("Connecting to {} (Streaming)...", config.server_host);
    } else {
        println!(
            "Sending {} to {}...",
            config.image_path.display(),
            config.server_host
        );
    }

    let mut stdout = io::stdout();
    let text = client
        .run_ocr(&config, &mut stdout)
        .await
        .context("OCR request failed")?;

    if !config.streaming {
        writeln!(stdout, "\n--- OCR RESULTS ---")?;
        writeln!(stdout, "{text}")?;
    }

    Ok(())
}
