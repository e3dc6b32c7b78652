use serde::Deserialize;

/// Top-level configuration for the relay binary.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub relay: RelaySettings,
}

/// Where the relay listens for chat clients.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Operational parameters of the relay.
#[derive(Debug, Deserialize, Clone)]
pub struct RelaySettings {
    /// Message lifetime. 60 seconds is the product's defining constant;
    /// configurable mainly so tests can shorten it.
    pub message_ttl_secs: u64,
    /// How often the sweeper re-derives expiry from stored timestamps.
    pub sweep_interval_secs: u64,
    /// sled directory for the durable message log.
    pub persist_path: String,
    pub log_level: String,
}

/// Partial configuration loaded from files or environment. Missing values
/// fall back to defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub relay: Option<PartialRelaySettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRelaySettings {
    pub message_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
    pub persist_path: Option<String>,
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            relay: RelaySettings {
                message_ttl_secs: 60,
                sweep_interval_secs: 30,
                persist_path: "blinkchat_db".to_string(),
                log_level: "info".to_string(),
            },
        }
    }
}
