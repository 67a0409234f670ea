//! Logging configuration and initialization tests.

use std::sync::Once;

use request_http::logging::{try_init_logging, LogConfig, LogFormat, LogLevel};

static INIT: Once = Once::new();

/// Ensure the logging system is initialized only once across tests.
fn setup_logging(config: &LogConfig) {
    INIT.call_once(|| {
        try_init_logging(config);
    });
}

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.show_time);
}

#[test]
fn test_log_config_development() {
    let config = LogConfig::development();
    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.show_target);
}

#[test]
fn test_log_config_production() {
    let config = LogConfig::production();
    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn test_log_config_test() {
    let config = LogConfig::test();
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.format, LogFormat::Compact);
    assert!(!config.show_time);
    assert!(!config.show_target);
}

#[test]
fn test_log_level_conversion() {
    use tracing::Level;

    assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
    assert_eq!(Level::from(LogLevel::Info), Level::INFO);
    assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
    assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
}

#[test]
fn test_init_logging_is_idempotent_via_try_init() {
    setup_logging(&LogConfig::test());

    // Already initialized; subsequent calls must fail silently.
    try_init_logging(&LogConfig::test());
}
