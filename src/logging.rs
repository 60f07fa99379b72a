//! Tracing subscriber setup for hosts embedding the overlay

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Map a `LOG_LEVEL` value to a tracing level (unknown values fall back to info)
pub fn parse_level(value: &str) -> Level {
    match value.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install a global fmt subscriber, level taken from the `LOG_LEVEL` env var.
///
/// Fails if a global subscriber has already been set.
pub fn init() -> anyhow::Result<()> {
    let level = parse_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
