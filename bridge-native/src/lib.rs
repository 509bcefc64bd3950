//! Native Bridge Implementation
//!
//! Adapts the platform's black-box measurement engine to the
//! [`SpeedTestBackend`](bridge_traits::SpeedTestBackend) contract.
//!
//! The engine binding itself lives in the host (JNI on Android). It is
//! injected as an `Arc<dyn SpeedTestEngine>`, which keeps this crate free of
//! platform SDKs and lets tests drive sessions with a fake engine.
//!
//! # Example
//!
//! ```ignore
//! use bridge_native::{NativeBackend, SpeedTestEngine};
//! use core_runtime::config::PluginConfig;
//!
//! let backend = NativeBackend::new(Arc::new(JniEngine::attach(env)?), PluginConfig::default());
//! backend.setup(SetupRequest::new("abc123")).await?;
//! backend.start().await?;
//! ```

pub mod backend;
pub mod engine;
pub mod error;

pub use backend::NativeBackend;
pub use engine::{EngineEvents, SpeedTestEngine};
pub use error::{EngineError, EngineResult};
