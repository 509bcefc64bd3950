use bridge_traits::BridgeError;
#[cfg(not(feature = "web-fallback"))]
use core_runtime::config::PluginConfig;
use thiserror::Error;

/// Failures while assembling the plugin.
///
/// Operational calls on [`SpeedTestPlugin`](crate::SpeedTestPlugin) return
/// [`bridge_traits::Result`] instead, so the backend's error kind reaches the
/// caller untouched.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

#[cfg(not(feature = "web-fallback"))]
impl CoreError {
    pub(crate) fn not_implemented(config: &PluginConfig) -> Self {
        CoreError::CapabilityMissing {
            capability: config.plugin_name.clone(),
            message: config.unimplemented_reason(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
