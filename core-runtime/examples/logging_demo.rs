//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example logging_demo
//! cargo run -p core-runtime --example logging_demo -- json
//! cargo run -p core-runtime --example logging_demo -- compact "bridge_web=trace"
//! ```

use async_trait::async_trait;
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use bridge_traits::{EventName, PluginEvent};
use core_runtime::events::ListenerRegistry;
use core_runtime::logging::{init_logging, secret_hint, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stands in for a host pipeline such as Logcat.
struct HostSink;

#[async_trait]
impl LoggerSink for HostSink {
    async fn log(&self, entry: LogEntry) -> bridge_traits::Result<()> {
        eprintln!(
            "[host] {} {}: {} {:?}",
            entry.level, entry.target, entry.message, entry.fields
        );
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Warn
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_logger_sink(Arc::new(HostSink));
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(err) = init_logging(config) {
        eprintln!("Failed to initialize logging: {err}");
        return;
    }

    info!("Logging demo started");

    let api_key = "demo-key-1234";
    debug!(api_key = %secret_hint(api_key), "setup requested");

    let registry = ListenerRegistry::new();
    let _handle = registry.add(
        EventName::SpeedUpdate,
        Arc::new(|event: &PluginEvent| info!(?event, "speed update received")),
    );

    for value in [12.5, 48.0, 95.25] {
        registry.emit(&PluginEvent::speed(value));
    }

    // Forwarded to the host sink as well (>= Warn)
    warn!(api_key, "this field is redacted before it reaches the host sink");
}
