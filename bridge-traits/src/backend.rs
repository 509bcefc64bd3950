//! Speed-Test Backend Abstraction
//!
//! One implementation exists per platform. The plugin facade resolves the
//! backend once at initialization and forwards every call to it.

use crate::{
    error::Result,
    events::{EventName, Listener, ListenerHandle},
    platform::{Platform, PlatformSendSync},
    types::{AvailabilityResponse, SetupRequest, SetupResponse, StopResponse},
};

/// Speed-test capability set
///
/// Operational calls (`setup`, `start`, `stop`) are fallible. Inspection
/// calls (`is_available`, `add_listener`, `remove_all_listeners`) never fail,
/// so host code can always check the capability and manage listeners before
/// deciding whether to run a test.
///
/// # Platform Support
///
/// - **Android**: `bridge-native`, driving the native measurement engine
/// - **Web / Desktop / iOS**: `bridge-web` fallback, always unavailable
///
/// # Example
///
/// ```ignore
/// use bridge_traits::{SetupRequest, SpeedTestBackend};
///
/// async fn run(backend: &dyn SpeedTestBackend) -> bridge_traits::Result<()> {
///     if !backend.is_available().await.available {
///         return Ok(());
///     }
///     backend.setup(SetupRequest::new("my-key")).await?;
///     backend.start().await
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SpeedTestBackend: PlatformSendSync {
    /// Platform this backend implements the capability for.
    fn platform(&self) -> Platform;

    /// Configure the backend with credentials.
    async fn setup(&self, request: SetupRequest) -> Result<SetupResponse>;

    /// Begin a measurement session. Samples arrive through `onSpeedUpdate`.
    async fn start(&self) -> Result<()>;

    /// End the active session, if any.
    async fn stop(&self) -> Result<StopResponse>;

    /// Report whether the capability is usable on this platform.
    async fn is_available(&self) -> AvailabilityResponse;

    /// Register a callback for one event name.
    async fn add_listener(&self, event: EventName, listener: Listener) -> ListenerHandle;

    /// Drop every registration made through this backend.
    async fn remove_all_listeners(&self);

    /// Release backend resources when the plugin is torn down.
    async fn shutdown(&self) {}
}
