//! Native Engine Abstraction
//!
//! The measurement engine ships as a platform library (an Android `.aar`)
//! and is driven through JNI by the host. These traits describe what the
//! backend needs from it, so the host injects the real binding and tests
//! inject a fake.

use bridge_traits::platform::PlatformSendSync;
use std::sync::Arc;

use crate::error::EngineResult;

/// Callbacks the engine invokes while a measurement runs.
///
/// Calls may arrive on any thread.
pub trait EngineEvents: PlatformSendSync {
    /// A speed sample was measured.
    fn on_success(&self, value: i32);

    /// The measurement failed; the session is over.
    fn on_fail(&self, message: String);
}

/// Black-box native speed-measurement engine.
///
/// `configure` may be called again before each `start` to rebind the
/// callbacks; the most recent sink receives all subsequent events.
pub trait SpeedTestEngine: PlatformSendSync {
    fn configure(&self, api_key: &str, events: Arc<dyn EngineEvents>) -> EngineResult<()>;

    fn start(&self) -> EngineResult<()>;

    fn stop(&self) -> EngineResult<()>;
}
