use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::error::{ColsumError, ColsumResult};

/// Initialize console logging.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(level: &str) -> ColsumResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| ColsumError::configuration(format!("Failed to init logging: {}", e)))
}
