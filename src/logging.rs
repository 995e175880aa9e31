use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

// RUST_LOG wins over the configured level
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_target(false)
        .init();
}
