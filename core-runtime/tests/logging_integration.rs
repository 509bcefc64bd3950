//! Integration tests for logging and configuration

use bridge_traits::logging::LogLevel;
use bridge_traits::Platform;
use core_runtime::config::PluginConfig;
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_logging_config_builder() {
    // Logging can only be initialized once per process; the builder is
    // exercised here and initialization once below.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Debug)
        .with_spans(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Debug);
    assert!(config.enable_spans);
    assert!(config.logger_sink.is_none());
}

#[test]
fn test_init_logging_twice_fails() {
    let first = init_logging(LoggingConfig::default().with_format(LogFormat::Compact));
    assert!(first.is_ok());

    let second = init_logging(LoggingConfig::default());
    assert!(matches!(second, Err(Error::Logging(_))));
}

#[test]
fn test_credentials_are_redacted() {
    assert_eq!(redact_if_sensitive("api_key", "abc123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("API_KEY", "abc123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("client_secret", "s3cr3t"), "[REDACTED]");
}

#[test]
fn test_plain_values_pass_through() {
    assert_eq!(redact_if_sensitive("event", "onSpeedUpdate"), "onSpeedUpdate");
    assert_eq!(redact_if_sensitive("platform", "web"), "web");
}

#[test]
fn test_config_for_web_host() {
    let config = PluginConfig::builder()
        .platform(Platform::Web)
        .build()
        .unwrap();

    assert!(!config.is_native_platform());
    assert_eq!(
        config.unavailable_reason(),
        "AxPlugin is only available on Android"
    );
}

#[test]
fn test_config_rejects_bad_name() {
    let err = PluginConfig::builder().plugin_name("").build().unwrap_err();
    assert!(err.to_string().contains("Plugin name cannot be empty"));
}
