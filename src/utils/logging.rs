use tracing::Level;

/// Map a textual level from configuration onto a `tracing` level.
///
/// Unknown values fall back to `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Initialize tracing output for the `wishlist` binary.
pub fn init(level: &str) {
    // try_init: tests and embedding applications may call this more than once
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
