//! Web Bridge Implementation
//!
//! Provides [`WebFallbackBackend`], the backend selected on every platform that
//! lacks the native speed-test engine. It reports the capability as
//! unavailable, rejects operational calls with `BridgeError::Unavailable`,
//! and accepts listener registrations without ever firing them.
//!
//! # Platform Support
//!
//! The backend itself is platform-neutral so the facade can fall back to it
//! anywhere (web, desktop, iOS). On `wasm32-unknown-unknown` the [`wasm`]
//! module additionally exports an `AxPluginWeb` class for direct use from
//! JavaScript.
//!
//! # Examples
//!
//! ```ignore
//! use bridge_traits::{SetupRequest, SpeedTestBackend};
//! use bridge_web::WebFallbackBackend;
//!
//! let backend = WebFallbackBackend::default();
//! assert!(!backend.is_available().await.available);
//! assert!(backend.setup(SetupRequest::new("abc123")).await.is_err());
//! ```

pub mod fallback;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use fallback::WebFallbackBackend;
