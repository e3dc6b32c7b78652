//! The `config` module loads relay configuration from an optional config
//! file and the environment, merged over built-in defaults.

mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{RelaySettings, ServerSettings, Settings};

/// Load configuration from `config/default.*` (if present) and environment
/// variables, filling anything unspecified from `Settings::default()`.
///
/// Environment variables nest with a double underscore so snake_case leaf
/// keys stay addressable: `SERVER__PORT`, `RELAY__MESSAGE_TTL_SECS`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("__"));

    let config = builder.build()?;

    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        relay: RelaySettings {
            message_ttl_secs: partial
                .relay
                .as_ref()
                .and_then(|r| r.message_ttl_secs)
                .unwrap_or(default.relay.message_ttl_secs),
            sweep_interval_secs: partial
                .relay
                .as_ref()
                .and_then(|r| r.sweep_interval_secs)
                .unwrap_or(default.relay.sweep_interval_secs),
            persist_path: partial
                .relay
                .as_ref()
                .and_then(|r| r.persist_path.clone())
                .unwrap_or(default.relay.persist_path),
            log_level: partial
                .relay
                .as_ref()
                .and_then(|r| r.log_level.clone())
                .unwrap_or(default.relay.log_level),
        },
    })
}

#[cfg(test)]
mod tests;
