//! # Speed-Test Bridge Traits
//!
//! The contract between the plugin facade and its platform backends.
//!
//! ## Overview
//!
//! Host application code talks to one facade. The facade forwards to a
//! [`SpeedTestBackend`](backend::SpeedTestBackend) picked at initialization
//! for the running platform. This crate defines that trait together with the
//! records, events and errors every backend has to honor so host code behaves
//! identically whichever backend is active.
//!
//! ## Modules
//!
//! - [`backend`] - the seven-operation capability set
//! - [`types`] - request/response records (`SetupRequest`, `StopResponse`, ...)
//! - [`events`] - event names, payloads and [`ListenerHandle`](events::ListenerHandle)
//! - [`platform`] - [`Platform`](platform::Platform) and thread-safety markers
//! - [`logging`] - [`LoggerSink`](logging::LoggerSink) for forwarding logs to the host
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Availability |
//! |----------|---------------------|--------------|
//! | Android  | `bridge-native`     | ✅ real engine |
//! | Web      | `bridge-web`        | ❌ always unavailable |
//! | iOS      | `bridge-web` fallback | ❌ always unavailable |
//! | Desktop  | `bridge-web` fallback | ❌ always unavailable |
//!
//! ## Error Handling
//!
//! All operations use [`BridgeError`](error::BridgeError). A backend that
//! cannot run on the current platform rejects operational calls with
//! `BridgeError::Unavailable`, carrying a message that names the plugin and
//! the platform it requires.
//!
//! ## Thread Safety
//!
//! On native targets every backend is `Send + Sync`; engine callbacks may
//! arrive on a foreign thread. On `wasm32` the bounds are dropped (see
//! [`PlatformSendSync`](platform::PlatformSendSync)).

pub mod backend;
pub mod error;
pub mod events;
pub mod logging;
pub mod platform;
pub mod types;

pub use error::{BridgeError, Result};

// Re-export commonly used types
pub use backend::SpeedTestBackend;
pub use events::{
    ErrorEvent, EventName, Listener, ListenerHandle, ListenerId, ListenerStore, PluginEvent,
    SpeedUpdateEvent,
};
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use platform::{Platform, PlatformSendSync};
pub use types::{
    AvailabilityResponse, SessionState, SetupRequest, SetupResponse, StopResponse,
};
