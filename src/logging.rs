//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `WBS_SCHEDULER_LOG` environment variable
//! (e.g. "info", "debug"), falling back to the caller's default.

use tracing::Level;
use tracing_subscriber::fmt;

pub const LOG_ENV: &str = "WBS_SCHEDULER_LOG";

/// Install the global subscriber, writing to stderr.
///
/// Call once at startup; a second call leaves the first subscriber in place.
pub fn init_logging(default_level: Level) {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(default_level);

    let _ = fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
