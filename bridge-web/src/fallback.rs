//! Fallback backend for platforms without the native engine.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    AvailabilityResponse, EventName, Listener, ListenerHandle, Platform, SetupRequest,
    SetupResponse, SpeedTestBackend, StopResponse,
};
use core_runtime::{config::PluginConfig, events::ListenerRegistry, logging::secret_hint};
use tracing::debug;

/// Backend used wherever the native engine does not exist.
///
/// Every operational call (`setup`, `start`, `stop`) is rejected with
/// [`BridgeError::Unavailable`] naming the plugin and the platform that
/// carries the real implementation. Inspection calls always succeed:
/// `is_available` reports `false` and listeners are recorded so host code
/// does not have to branch on platform, but no event is ever published.
pub struct WebFallbackBackend {
    config: PluginConfig,
    listeners: ListenerRegistry,
}

impl WebFallbackBackend {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            config,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Registrations currently held. Nothing is ever emitted to them.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    fn unavailable(&self) -> BridgeError {
        BridgeError::Unavailable(self.config.unavailable_reason())
    }
}

impl Default for WebFallbackBackend {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SpeedTestBackend for WebFallbackBackend {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn setup(&self, request: SetupRequest) -> Result<SetupResponse> {
        debug!(
            plugin = %self.config.plugin_name,
            api_key = %secret_hint(&request.api_key),
            "setup called on fallback backend"
        );
        Err(self.unavailable())
    }

    async fn start(&self) -> Result<()> {
        debug!(plugin = %self.config.plugin_name, "start called on fallback backend");
        Err(self.unavailable())
    }

    async fn stop(&self) -> Result<StopResponse> {
        debug!(plugin = %self.config.plugin_name, "stop called on fallback backend");
        Err(self.unavailable())
    }

    async fn is_available(&self) -> AvailabilityResponse {
        AvailabilityResponse::UNAVAILABLE
    }

    async fn add_listener(&self, event: EventName, listener: Listener) -> ListenerHandle {
        debug!(
            plugin = %self.config.plugin_name,
            event = %event,
            "addListener called on fallback backend"
        );
        self.listeners.add(event, listener)
    }

    async fn remove_all_listeners(&self) {
        let dropped = self.listeners.remove_all();
        debug!(
            plugin = %self.config.plugin_name,
            dropped,
            "removeAllListeners called on fallback backend"
        );
    }
}
