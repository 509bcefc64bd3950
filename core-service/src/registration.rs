//! Backend selection at plugin initialization.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bridge_traits::{Platform, SpeedTestBackend};
use core_runtime::config::PluginConfig;
use tracing::{debug, info};

use crate::error::Result;
use crate::plugin::SpeedTestPlugin;

/// Builds the backend for one platform.
pub type BackendFactory = Box<dyn Fn(&PluginConfig) -> Result<Arc<dyn SpeedTestBackend>>>;

/// Maps platforms to backend factories, plus an optional fallback.
///
/// Resolution order for the configured platform:
/// 1. the factory registered for that platform
/// 2. the native factory, when running on `native_platform`
/// 3. the fallback factory
/// 4. with the `web-fallback` feature, `bridge_web::WebFallbackBackend`
///
/// If none applies, resolution fails with [`CoreError::CapabilityMissing`].
#[derive(Default)]
pub struct PluginRegistration {
    platforms: HashMap<Platform, BackendFactory>,
    native: Option<BackendFactory>,
    fallback: Option<BackendFactory>,
}

impl PluginRegistration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the implementation used on `platform`. Replaces any earlier one.
    pub fn platform<F>(mut self, platform: Platform, factory: F) -> Self
    where
        F: Fn(&PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> + 'static,
    {
        self.platforms.insert(platform, Box::new(factory));
        self
    }

    /// Register the implementation used on platforms with no entry of their own.
    pub fn fallback<F>(mut self, factory: F) -> Self
    where
        F: Fn(&PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> + 'static,
    {
        self.fallback = Some(Box::new(factory));
        self
    }

    /// Register the implementation used when running on the configured
    /// `native_platform`. An explicit [`platform`](Self::platform) entry for
    /// the same platform takes precedence.
    pub fn native<F>(mut self, factory: F) -> Self
    where
        F: Fn(&PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> + 'static,
    {
        self.native = Some(Box::new(factory));
        self
    }

    /// Register the native measurement engine.
    #[cfg(feature = "native")]
    pub fn native_engine(self, engine: Arc<dyn bridge_native::SpeedTestEngine>) -> Self {
        self.native(move |config| {
            let backend = bridge_native::NativeBackend::new(Arc::clone(&engine), config.clone());
            Ok(Arc::new(backend) as Arc<dyn SpeedTestBackend>)
        })
    }

    pub fn has_platform(&self, platform: Platform) -> bool {
        self.platforms.contains_key(&platform)
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some() || cfg!(feature = "web-fallback")
    }

    /// Pick and build the backend for `config.platform`.
    pub fn resolve(&self, config: &PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> {
        if let Some(factory) = self.platforms.get(&config.platform) {
            debug!(platform = %config.platform, "Resolved platform backend");
            return factory(config);
        }

        if let Some(factory) = self.native.as_ref().filter(|_| config.is_native_platform()) {
            debug!(platform = %config.platform, "Resolved native backend");
            return factory(config);
        }

        if let Some(factory) = &self.fallback {
            debug!(platform = %config.platform, "Resolved registered fallback backend");
            return factory(config);
        }

        self.default_fallback(config)
    }

    #[cfg(feature = "web-fallback")]
    fn default_fallback(&self, config: &PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> {
        debug!(platform = %config.platform, "Resolved web fallback backend");
        Ok(Arc::new(bridge_web::WebFallbackBackend::new(config.clone())))
    }

    #[cfg(not(feature = "web-fallback"))]
    fn default_fallback(&self, config: &PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> {
        Err(crate::error::CoreError::not_implemented(config))
    }
}

impl fmt::Debug for PluginRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut platforms: Vec<_> = self.platforms.keys().collect();
        platforms.sort();
        f.debug_struct("PluginRegistration")
            .field("platforms", &platforms)
            .field("native", &self.native.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Resolve the backend for `config` and wrap it in the plugin facade.
///
/// ```ignore
/// use core_service::{register_plugin, PluginRegistration};
/// use core_runtime::config::PluginConfig;
///
/// let plugin = register_plugin(PluginConfig::default(), PluginRegistration::new())?;
/// assert!(!plugin.is_available().await.available); // web fallback off Android
/// ```
pub fn register_plugin(
    config: PluginConfig,
    registration: PluginRegistration,
) -> Result<SpeedTestPlugin> {
    let backend = registration.resolve(&config)?;
    info!(
        plugin = %config.plugin_name,
        platform = %config.platform,
        backend = %backend.platform(),
        "Plugin registered"
    );
    Ok(SpeedTestPlugin::new(backend, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use async_trait::async_trait;
    use bridge_traits::{
        AvailabilityResponse, EventName, Listener, ListenerHandle, SetupRequest, SetupResponse,
        StopResponse,
    };

    struct Marker(Platform);

    #[async_trait]
    impl SpeedTestBackend for Marker {
        fn platform(&self) -> Platform {
            self.0
        }
        async fn setup(&self, _: SetupRequest) -> bridge_traits::Result<SetupResponse> {
            Ok(SetupResponse::new("ok"))
        }
        async fn start(&self) -> bridge_traits::Result<()> {
            Ok(())
        }
        async fn stop(&self) -> bridge_traits::Result<StopResponse> {
            Ok(StopResponse::new("ok"))
        }
        async fn is_available(&self) -> AvailabilityResponse {
            AvailabilityResponse::AVAILABLE
        }
        async fn add_listener(&self, event: EventName, _: Listener) -> ListenerHandle {
            ListenerHandle::detached(event)
        }
        async fn remove_all_listeners(&self) {}
    }

    fn config_on(platform: Platform) -> PluginConfig {
        PluginConfig::builder().platform(platform).build().unwrap()
    }

    fn marker(platform: Platform) -> impl Fn(&PluginConfig) -> Result<Arc<dyn SpeedTestBackend>> {
        move |_| Ok(Arc::new(Marker(platform)) as Arc<dyn SpeedTestBackend>)
    }

    #[test]
    fn test_platform_entry_wins_over_fallback() {
        let registration = PluginRegistration::new()
            .platform(Platform::Android, marker(Platform::Android))
            .fallback(marker(Platform::Web));

        let backend = registration.resolve(&config_on(Platform::Android)).unwrap();
        assert_eq!(backend.platform(), Platform::Android);
    }

    #[test]
    fn test_fallback_used_for_unregistered_platform() {
        let registration = PluginRegistration::new()
            .platform(Platform::Android, marker(Platform::Android))
            .fallback(marker(Platform::Desktop));

        let backend = registration.resolve(&config_on(Platform::Ios)).unwrap();
        assert_eq!(backend.platform(), Platform::Desktop);
    }

    #[test]
    fn test_native_factory_only_on_native_platform() {
        let registration = PluginRegistration::new()
            .native(marker(Platform::Android))
            .fallback(marker(Platform::Web));

        let native = registration.resolve(&config_on(Platform::Android)).unwrap();
        assert_eq!(native.platform(), Platform::Android);

        let other = registration.resolve(&config_on(Platform::Ios)).unwrap();
        assert_eq!(other.platform(), Platform::Web);
    }

    #[test]
    fn test_factory_error_propagates() {
        let registration = PluginRegistration::new().platform(Platform::Web, |_| {
            Err(CoreError::InitializationFailed("engine missing".to_string()))
        });

        let err = registration
            .resolve(&config_on(Platform::Web))
            .err()
            .expect("resolution should fail");
        assert!(matches!(err, CoreError::InitializationFailed(_)));
    }

    #[cfg(feature = "web-fallback")]
    #[test]
    fn test_web_fallback_injected_by_default() {
        let registration = PluginRegistration::new();
        assert!(registration.has_fallback());

        let backend = registration.resolve(&config_on(Platform::Desktop)).unwrap();
        assert_eq!(backend.platform(), Platform::Web);
    }

    #[cfg(not(feature = "web-fallback"))]
    #[test]
    fn test_missing_backend_is_capability_error() {
        let err = PluginRegistration::new()
            .resolve(&config_on(Platform::Desktop))
            .err()
            .expect("resolution should fail");
        assert_eq!(
            err.to_string(),
            "Capability missing: AxPlugin - AxPlugin plugin is not implemented on desktop"
        );
    }

    #[test]
    fn test_debug_lists_platforms() {
        let registration =
            PluginRegistration::new().platform(Platform::Android, marker(Platform::Android));
        let debug = format!("{registration:?}");
        assert!(debug.contains("Android"));
        assert!(debug.contains("fallback: false"));
    }
}
