//! WebAssembly bindings for the fallback backend
//!
//! Exposes the plugin surface to JavaScript with the same method names and
//! Promise-based signatures host code uses on native platforms.
//!
//! # Example
//!
//! ```javascript
//! const plugin = new AxPluginWeb();
//!
//! const { available } = await plugin.isAvailable(); // false
//! const handle = await plugin.addListener('onSpeedUpdate', ({ value }) => {
//!   console.log(value); // never called on the web
//! });
//! await handle.remove();
//!
//! try {
//!   await plugin.setup({ apiKey: 'abc123' });
//! } catch (err) {
//!   console.log(err.code, err.message); // UNAVAILABLE AxPlugin is only available on Android
//! }
//! ```

use crate::fallback::WebFallbackBackend;
use bridge_traits::{BridgeError, EventName, Listener, ListenerHandle, PluginEvent, SetupRequest, SpeedTestBackend};
use core_runtime::config::PluginConfig;
use js_sys::{Function as JsFunction, Promise};
use serde::Serialize;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

// =============================================================================
// Error Handling
// =============================================================================

/// Converts a bridge error into a JS `Error` carrying a `code` property.
fn to_js_error(err: BridgeError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    // Reflect::set only fails on frozen objects; a fresh Error is not.
    let _ = js_sys::Reflect::set(
        &js_err,
        &JsValue::from_str("code"),
        &JsValue::from_str(err.code()),
    );
    js_err.into()
}

fn serialization_error<E: std::fmt::Display>(err: E) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(serialization_error)
}

// =============================================================================
// Plugin
// =============================================================================

/// JavaScript-accessible fallback plugin
#[wasm_bindgen(js_name = AxPluginWeb)]
pub struct JsSpeedTestPlugin {
    backend: Rc<WebFallbackBackend>,
}

#[wasm_bindgen(js_class = AxPluginWeb)]
impl JsSpeedTestPlugin {
    /// Create the plugin, optionally renaming it (defaults to `AxPlugin`)
    #[wasm_bindgen(constructor)]
    pub fn new(plugin_name: Option<String>) -> Result<JsSpeedTestPlugin, JsValue> {
        console_error_panic_hook::set_once();

        let mut builder = PluginConfig::builder().platform(bridge_traits::Platform::Web);
        if let Some(name) = plugin_name {
            builder = builder.plugin_name(name);
        }
        let config = builder.build().map_err(serialization_error)?;

        Ok(Self {
            backend: Rc::new(WebFallbackBackend::new(config)),
        })
    }

    /// `setup({ apiKey })` - always rejects with `UNAVAILABLE`
    pub fn setup(&self, options: JsValue) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move {
            let request: SetupRequest =
                serde_wasm_bindgen::from_value(options).map_err(serialization_error)?;
            let response = backend.setup(request).await.map_err(to_js_error)?;
            to_js(&response)
        })
    }

    /// `start()` - always rejects with `UNAVAILABLE`
    pub fn start(&self) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move {
            backend.start().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `stop()` - always rejects with `UNAVAILABLE`
    pub fn stop(&self) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move {
            let response = backend.stop().await.map_err(to_js_error)?;
            to_js(&response)
        })
    }

    /// `isAvailable()` - resolves to `{ available: false }`
    #[wasm_bindgen(js_name = isAvailable)]
    pub fn is_available(&self) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move { to_js(&backend.is_available().await) })
    }

    /// `addListener(eventName, callback)` - resolves to a handle; the
    /// callback is never invoked on the web. Unknown names also resolve.
    #[wasm_bindgen(js_name = addListener)]
    pub fn add_listener(&self, event_name: String, callback: JsFunction) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move {
            let listener: Listener = Arc::new(move |event: &PluginEvent| {
                if let Ok(payload) = serde_wasm_bindgen::to_value(event) {
                    let _ = callback.call1(&JsValue::NULL, &payload);
                }
            });
            let handle = match event_name.parse::<EventName>() {
                Ok(event) => backend.add_listener(event, listener).await,
                Err(_) => {
                    debug!(event = %event_name, "addListener for an event that is never published");
                    ListenerHandle::unbound()
                }
            };
            Ok(JsListenerHandle {
                inner: Rc::new(handle),
                event_name,
            }
            .into())
        })
    }

    /// `removeAllListeners()`
    #[wasm_bindgen(js_name = removeAllListeners)]
    pub fn remove_all_listeners(&self) -> Promise {
        let backend = Rc::clone(&self.backend);
        future_to_promise(async move {
            backend.remove_all_listeners().await;
            Ok(JsValue::UNDEFINED)
        })
    }
}

/// JavaScript-accessible listener handle
#[wasm_bindgen]
pub struct JsListenerHandle {
    inner: Rc<ListenerHandle>,
    event_name: String,
}

#[wasm_bindgen]
impl JsListenerHandle {
    /// Event name this handle was issued for
    #[wasm_bindgen(getter, js_name = eventName)]
    pub fn event_name(&self) -> String {
        self.event_name.clone()
    }

    /// `remove()` - idempotent
    pub fn remove(&self) -> Promise {
        let handle = Rc::clone(&self.inner);
        future_to_promise(async move {
            handle.remove().await;
            Ok(JsValue::UNDEFINED)
        })
    }
}
