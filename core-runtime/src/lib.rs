//! # Core Runtime Module
//!
//! Ambient runtime infrastructure shared by the speed-test bridge crates:
//! - Logging and tracing setup
//! - Plugin configuration
//! - Listener registry (typed publish/subscribe for plugin events)
//!
//! ## Overview
//!
//! Backends in `bridge-native` and `bridge-web` keep their subscriptions in a
//! [`ListenerRegistry`](events::ListenerRegistry), read naming and platform
//! requirements from [`PluginConfig`](config::PluginConfig), and log through
//! `tracing`. Hosts call [`init_logging`](logging::init_logging) once at
//! startup.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{PluginConfig, PluginConfigBuilder};
pub use error::{Error, Result};
pub use events::ListenerRegistry;
