//! Host log forwarding
//!
//! The bridge logs through `tracing`. Hosts that want those records in their
//! own pipeline (Logcat on Android, the browser console on the web) register a
//! [`LoggerSink`]; the runtime converts each surviving event into a
//! [`LogEntry`] with credentials already redacted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};
use crate::platform::PlatformSendSync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = BridgeError;

    /// Accepts the level names hosts pass from JS or Android config,
    /// case-insensitively. `warning` is an alias for `warn`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}

/// One log record handed to the host.
///
/// Fields are kept sorted so hosts rendering them get a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Emitting module, e.g. `bridge_native::backend`
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
    /// Name of the innermost span, such as the facade operation being run
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: BTreeMap::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Receiver for bridge log records on the host side.
///
/// Entries arrive with sensitive fields (the API key among them) already
/// replaced by `[REDACTED]`.
///
/// ```ignore
/// use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
///
/// struct Logcat;
///
/// #[async_trait::async_trait]
/// impl LoggerSink for Logcat {
///     async fn log(&self, entry: LogEntry) -> bridge_traits::Result<()> {
///         android_log(entry.level, &entry.target, &entry.message);
///         Ok(())
///     }
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LoggerSink: PlatformSendSync {
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Entries below this level are dropped before conversion.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = LogEntry::new(LogLevel::Warn, "bridge_web", "setup rejected")
            .with_field("plugin", "AxPlugin")
            .with_field("api_key", "[REDACTED]")
            .with_span("setup");

        assert_eq!(entry.field("plugin"), Some("AxPlugin"));
        assert_eq!(entry.field("api_key"), Some("[REDACTED]"));
        assert_eq!(entry.field("missing"), None);
        assert_eq!(entry.span.as_deref(), Some("setup"));

        let keys: Vec<_> = entry.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["api_key", "plugin"]);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn test_entry_wire_shape() {
        let entry = LogEntry::new(LogLevel::Error, "bridge_native", "engine failed");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["level"], "error");
        assert_eq!(json["target"], "bridge_native");
        assert!(json["span"].is_null());
        assert!(json.get("timestamp").is_some());
    }
}
