//! Speed-test plugin facade.

use std::fmt;
use std::sync::Arc;

use bridge_traits::{
    AvailabilityResponse, ErrorEvent, EventName, Listener, ListenerHandle, Platform,
    PlatformSendSync, PluginEvent, SetupRequest, SetupResponse, SpeedUpdateEvent,
    SpeedTestBackend, StopResponse,
};
use core_runtime::config::PluginConfig;
use tracing::{debug, instrument, warn};

/// Host-facing plugin handle.
///
/// Cheap to clone; every clone forwards to the same backend, chosen once
/// by [`register_plugin`](crate::register_plugin). Operational calls return
/// the backend's [`bridge_traits::Result`] unchanged, so on platforms without
/// the engine the caller sees `BridgeError::Unavailable` as-is.
#[derive(Clone)]
pub struct SpeedTestPlugin {
    backend: Arc<dyn SpeedTestBackend>,
    config: Arc<PluginConfig>,
}

impl SpeedTestPlugin {
    pub fn new(backend: Arc<dyn SpeedTestBackend>, config: PluginConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.plugin_name
    }

    /// Platform of the resolved backend.
    pub fn backend_platform(&self) -> Platform {
        self.backend.platform()
    }

    #[instrument(skip_all, fields(plugin = %self.config.plugin_name))]
    pub async fn setup(&self, api_key: impl Into<String>) -> bridge_traits::Result<SetupResponse> {
        self.setup_with(SetupRequest::new(api_key)).await
    }

    pub async fn setup_with(&self, request: SetupRequest) -> bridge_traits::Result<SetupResponse> {
        self.backend.setup(request).await.inspect_err(|err| {
            warn!(code = err.code(), error = %err, "setup rejected");
        })
    }

    #[instrument(skip_all, fields(plugin = %self.config.plugin_name))]
    pub async fn start(&self) -> bridge_traits::Result<()> {
        self.backend.start().await.inspect_err(|err| {
            warn!(code = err.code(), error = %err, "start rejected");
        })
    }

    #[instrument(skip_all, fields(plugin = %self.config.plugin_name))]
    pub async fn stop(&self) -> bridge_traits::Result<StopResponse> {
        self.backend.stop().await.inspect_err(|err| {
            warn!(code = err.code(), error = %err, "stop rejected");
        })
    }

    pub async fn is_available(&self) -> AvailabilityResponse {
        self.backend.is_available().await
    }

    /// Subscribe to raw plugin events under `event`.
    pub async fn add_listener(&self, event: EventName, listener: Listener) -> ListenerHandle {
        debug!(plugin = %self.config.plugin_name, event = %event, "addListener");
        self.backend.add_listener(event, listener).await
    }

    /// Subscribe by wire name (`"onSpeedUpdate"` or `"onError"`), as host
    /// bindings receive it. Registration never fails: an unknown name yields
    /// an unbound handle that no event reaches.
    pub async fn add_listener_by_name(&self, event_name: &str, listener: Listener) -> ListenerHandle {
        match event_name.parse::<EventName>() {
            Ok(event) => self.add_listener(event, listener).await,
            Err(_) => {
                debug!(
                    plugin = %self.config.plugin_name,
                    event = event_name,
                    "addListener for an event this plugin never publishes"
                );
                ListenerHandle::unbound()
            }
        }
    }

    /// Subscribe to speed samples.
    pub async fn on_speed_update<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn(SpeedUpdateEvent) + PlatformSendSync + 'static,
    {
        let listener: Listener = Arc::new(move |event: &PluginEvent| {
            if let PluginEvent::SpeedUpdate(update) = event {
                callback(*update);
            }
        });
        self.add_listener(EventName::SpeedUpdate, listener).await
    }

    /// Subscribe to session failures.
    pub async fn on_error<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn(ErrorEvent) + PlatformSendSync + 'static,
    {
        let listener: Listener = Arc::new(move |event: &PluginEvent| {
            if let PluginEvent::Error(error) = event {
                callback(error.clone());
            }
        });
        self.add_listener(EventName::Error, listener).await
    }

    pub async fn remove_all_listeners(&self) {
        debug!(plugin = %self.config.plugin_name, "removeAllListeners");
        self.backend.remove_all_listeners().await
    }

    /// Tear the plugin down. Stops a running native session.
    pub async fn shutdown(&self) {
        debug!(plugin = %self.config.plugin_name, "shutdown");
        self.backend.shutdown().await
    }
}

impl fmt::Debug for SpeedTestPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeedTestPlugin")
            .field("config", &self.config)
            .field("backend", &self.backend.platform())
            .finish()
    }
}
