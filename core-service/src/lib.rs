//! Speed-test plugin façade and registration.
//!
//! Host applications build a [`PluginConfig`], describe which backends exist
//! through a [`PluginRegistration`], and call [`register_plugin`] once at
//! startup. The returned [`SpeedTestPlugin`] forwards every call to the
//! selected backend:
//!
//! - on the native platform, `bridge-native` driving the injected engine
//!   (`native` feature)
//! - everywhere else, the `bridge-web` fallback that reports the capability
//!   as unavailable (`web-fallback` feature, on by default)
//!
//! ```ignore
//! use core_service::{register_plugin, PluginRegistration};
//! use core_runtime::config::PluginConfig;
//!
//! let plugin = register_plugin(
//!     PluginConfig::default(),
//!     PluginRegistration::new().native_engine(engine),
//! )?;
//!
//! let handle = plugin.on_speed_update(|update| println!("{} Mbps", update.value)).await;
//! plugin.setup("abc123").await?;
//! plugin.start().await?;
//! ```

pub mod error;
pub mod plugin;
pub mod registration;

pub use error::{CoreError, Result};
pub use plugin::SpeedTestPlugin;
pub use registration::{register_plugin, BackendFactory, PluginRegistration};

pub use core_runtime::config::{PluginConfig, PluginConfigBuilder};
