use super::{load_config, settings::Settings};
use serial_test::serial;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.relay.message_ttl_secs, 60);
    assert_eq!(settings.relay.sweep_interval_secs, 30);
    assert_eq!(settings.relay.persist_path, "blinkchat_db");
    assert_eq!(settings.relay.log_level, "info");
}

#[test]
#[serial]
fn test_load_config_falls_back_to_defaults() {
    let settings = load_config().unwrap();
    assert_eq!(settings.relay.message_ttl_secs, 60);
}

#[test]
#[serial]
fn test_env_overrides_server_port() {
    temp_env::with_var("SERVER__PORT", Some("9099"), || {
        let settings = load_config().unwrap();
        assert_eq!(settings.server.port, 9099);
    });
}

#[test]
#[serial]
fn test_env_overrides_server_host() {
    temp_env::with_var("SERVER__HOST", Some("0.0.0.0"), || {
        let settings = load_config().unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
    });
}

#[test]
#[serial]
fn test_env_overrides_snake_case_relay_keys() {
    temp_env::with_vars(
        [
            ("RELAY__MESSAGE_TTL_SECS", Some("90")),
            ("RELAY__SWEEP_INTERVAL_SECS", Some("15")),
        ],
        || {
            let settings = load_config().unwrap();
            assert_eq!(settings.relay.message_ttl_secs, 90);
            assert_eq!(settings.relay.sweep_interval_secs, 15);
        },
    );
}
