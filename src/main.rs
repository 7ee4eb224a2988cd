//! framesink server binary.
//!
//! Binds a fixed set of loopback ports and logs every length-prefixed
//! transaction received on them. Configuration comes from an optional TOML
//! file passed as the first argument, otherwise from `FRAMESINK_*`
//! environment variables and defaults.

use framesink::config::SinkConfig;
use framesink::service::ListenerSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> framesink::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SinkConfig::from_file(path)?,
        None => SinkConfig::from_env()?,
    };
    config.validate_strict()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        host = %config.server.host,
        ports = ?config.server.ports,
        "Starting framesink server"
    );

    let listeners = ListenerSet::bind(&config.server).await?;
    listeners.run().await
}
