pub mod cli;
pub mod inference;

/// Initialize the tracing subscriber on stderr.
///
/// Stdout carries only OCR output, so logs never interleave with it.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "ocr_client=debug,warn"
    } else {
        "ocr_client=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        "=== ocr-client starting ==="
    );
}
