/// Initialize tracing for the relay binary and tests.
///
/// Level comes from `BLINKCHAT_LOG` when set, otherwise `default_level`.
/// Uses `try_init` so repeated calls (library consumers, test harness) are
/// harmless.
pub fn init(default_level: &str) {
    let configured = std::env::var("BLINKCHAT_LOG").unwrap_or_else(|_| default_level.to_string());

    let lvl = match configured.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}
