use std::sync::{Arc, Mutex};
use std::time::Duration;

use blinkchat::config::load_config;
use blinkchat::persistence::MessageLog;
use blinkchat::transport::relay::run_sweeper;
use blinkchat::transport::{Relay, start_relay_server};
use blinkchat::utils::logging;
use tracing::warn;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.relay.log_level);

    let relay = match MessageLog::open(&config.relay.persist_path, config.relay.message_ttl_secs) {
        Ok(log) => Relay::with_log(log),
        Err(e) => {
            warn!("running without durable log: {e}");
            Relay::new()
        }
    };
    let relay = Arc::new(Mutex::new(relay));

    tokio::spawn(run_sweeper(
        relay.clone(),
        config.relay.message_ttl_secs,
        Duration::from_secs(config.relay.sweep_interval_secs),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    start_relay_server(&addr, relay).await;
}
