use intentroute_core::config::{LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber. Logs go to stderr; stdout carries the conversation.
///
/// Repeated calls keep the first subscriber.
pub fn init(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(max_level(&config.level));

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn max_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::WARN)
}
