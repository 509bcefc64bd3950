//! Speed-test plugin bridge.
//!
//! Umbrella crate re-exporting the plugin facade so host applications depend
//! on one crate and pick backends through features:
//!
//! - `web-fallback` (default): platforms without the engine resolve to a
//!   backend that reports the capability as unavailable
//! - `native`: enables `PluginRegistration::native_engine` for injecting the
//!   platform measurement engine

pub use bridge_traits::{
    AvailabilityResponse, BridgeError, ErrorEvent, EventName, Listener, ListenerHandle, LogLevel,
    Platform, PluginEvent, SetupRequest, SetupResponse, SpeedTestBackend, SpeedUpdateEvent,
    StopResponse,
};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_service::{
    register_plugin, CoreError, PluginConfig, PluginRegistration, SpeedTestPlugin,
};
