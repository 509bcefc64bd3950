//! # Plugin Configuration
//!
//! Naming and platform settings shared by the facade and every backend.
//!
//! ## Overview
//!
//! [`PluginConfig`] is built through [`PluginConfigBuilder`], which validates
//! its inputs and fails fast with actionable messages. The defaults describe
//! the shipped plugin: `AxPlugin`, implemented natively on Android, running on
//! whatever platform the crate was compiled for.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::Platform;
//! use core_runtime::config::PluginConfig;
//!
//! let config = PluginConfig::builder()
//!     .platform(Platform::Web)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(
//!     config.unavailable_reason(),
//!     "AxPlugin is only available on Android"
//! );
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::PluginConfig;
//!
//! // Plugin names are identifiers; this fails validation.
//! let config = PluginConfig::builder()
//!     .plugin_name("speed test!")
//!     .build()
//!     .expect("Should fail - invalid plugin name");
//! ```

use crate::error::{Error, Result};
use bridge_traits::Platform;

/// Plugin name used when none is configured.
pub const DEFAULT_PLUGIN_NAME: &str = "AxPlugin";

/// Platform carrying the native implementation when none is configured.
pub const DEFAULT_NATIVE_PLATFORM: Platform = Platform::Android;

/// Immutable plugin settings. Use [`PluginConfig::builder`] to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Name host code registers the plugin under
    pub plugin_name: String,

    /// Platform that ships the real measurement engine
    pub native_platform: Platform,

    /// Platform the plugin is running on
    pub platform: Platform,
}

impl PluginConfig {
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::default()
    }

    /// Whether the running platform is the one with the native engine.
    pub fn is_native_platform(&self) -> bool {
        self.platform == self.native_platform
    }

    /// Message carried by `Unavailable` rejections.
    pub fn unavailable_reason(&self) -> String {
        format!(
            "{} is only available on {}",
            self.plugin_name, self.native_platform
        )
    }

    /// Message used when no backend at all exists for the running platform.
    pub fn unimplemented_reason(&self) -> String {
        format!(
            "{} plugin is not implemented on {}",
            self.plugin_name,
            self.platform.as_str()
        )
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            native_platform: DEFAULT_NATIVE_PLATFORM,
            platform: Platform::current(),
        }
    }
}

/// Builder for [`PluginConfig`].
#[derive(Debug, Default, Clone)]
pub struct PluginConfigBuilder {
    plugin_name: Option<String>,
    native_platform: Option<Platform>,
    platform: Option<Platform>,
}

impl PluginConfigBuilder {
    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = Some(name.into());
        self
    }

    pub fn native_platform(mut self, platform: Platform) -> Self {
        self.native_platform = Some(platform);
        self
    }

    /// Override the detected platform (tests, hybrid shells).
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Validates the settings and builds the config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the plugin name is empty or is not an
    /// identifier (ASCII letters, digits and `_`, starting with a letter).
    pub fn build(self) -> Result<PluginConfig> {
        let plugin_name = self
            .plugin_name
            .unwrap_or_else(|| DEFAULT_PLUGIN_NAME.to_string());
        validate_plugin_name(&plugin_name)?;

        Ok(PluginConfig {
            plugin_name,
            native_platform: self.native_platform.unwrap_or(DEFAULT_NATIVE_PLATFORM),
            platform: self.platform.unwrap_or_else(Platform::current),
        })
    }
}

fn validate_plugin_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(Error::Config("Plugin name cannot be empty".to_string()));
    };

    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Config(format!(
            "Invalid plugin name '{name}': use ASCII letters, digits and '_', starting with a letter"
        )));
    }
    Ok(())
}
