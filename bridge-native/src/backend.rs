//! Native backend driving the platform measurement engine

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    AvailabilityResponse, EventName, Listener, ListenerHandle, Platform, PluginEvent,
    SessionState, SetupRequest, SetupResponse, SpeedTestBackend, StopResponse,
};
use core_runtime::{config::PluginConfig, events::ListenerRegistry, logging::secret_hint};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::engine::{EngineEvents, SpeedTestEngine};

pub const SETUP_MESSAGE: &str = "Plugin configured successfully";
pub const STOP_MESSAGE: &str = "Plugin stopped successfully";
pub const NOT_CONFIGURED_MESSAGE: &str = "Plugin not configured. Call setup() first.";

#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    api_key: Option<String>,
}

type SharedSession = Arc<Mutex<Session>>;

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink handed to the engine during `setup`, before any session exists.
struct DetachedEvents;

impl EngineEvents for DetachedEvents {
    fn on_success(&self, value: i32) {
        debug!(value, "Dropping speed sample received outside a session");
    }

    fn on_fail(&self, message: String) {
        debug!(%message, "Dropping engine failure received outside a session");
    }
}

/// Sink bound on `start`: forwards engine callbacks to plugin listeners.
struct SessionEvents {
    listeners: ListenerRegistry,
    session: Weak<Mutex<Session>>,
}

impl EngineEvents for SessionEvents {
    fn on_success(&self, value: i32) {
        let running = self
            .session
            .upgrade()
            .is_some_and(|session| lock(&session).state.is_running());
        if !running {
            debug!(value, "Dropping speed sample received after the session ended");
            return;
        }

        self.listeners.emit(&PluginEvent::speed(f64::from(value)));
    }

    fn on_fail(&self, message: String) {
        if let Some(session) = self.session.upgrade() {
            let mut session = lock(&session);
            if session.state.is_running() {
                session.state = SessionState::Stopped;
            }
        }

        warn!(%message, "Speed test failed");
        self.listeners.emit(&PluginEvent::error(message));
    }
}

/// Backend for the platform that ships the measurement engine.
///
/// Tracks one session at a time:
///
/// ```text
///   setup        start            stop / on_fail
/// ───────> Idle ───────> Running ────────────────> Stopped
///                           ^                         │
///                           └──────── start ──────────┘
/// ```
///
/// `start` requires a prior successful `setup`. `setup`, `start` and `stop`
/// run one at a time under `operation`, held across the engine calls, so
/// the state check and the engine call of one operation cannot interleave
/// with another. `stop` is idempotent and only commits `Stopped` once the
/// engine has stopped.
pub struct NativeBackend {
    engine: Arc<dyn SpeedTestEngine>,
    config: PluginConfig,
    listeners: ListenerRegistry,
    session: SharedSession,
    operation: AsyncMutex<()>,
}

impl NativeBackend {
    pub fn new(engine: Arc<dyn SpeedTestEngine>, config: PluginConfig) -> Self {
        Self {
            engine,
            config,
            listeners: ListenerRegistry::new(),
            session: Arc::new(Mutex::new(Session::default())),
            operation: AsyncMutex::new(()),
        }
    }

    pub fn session_state(&self) -> SessionState {
        lock(&self.session).state
    }

    pub fn is_configured(&self) -> bool {
        lock(&self.session).api_key.is_some()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SpeedTestBackend for NativeBackend {
    fn platform(&self) -> Platform {
        self.config.native_platform
    }

    async fn setup(&self, request: SetupRequest) -> Result<SetupResponse> {
        request.validate()?;
        let _operation = self.operation.lock().await;

        if lock(&self.session).state.is_running() {
            return Err(BridgeError::InvalidState(
                "cannot reconfigure while a speed test is running".to_string(),
            ));
        }

        self.engine
            .configure(&request.api_key, Arc::new(DetachedEvents))?;

        debug!(
            plugin = %self.config.plugin_name,
            api_key = %secret_hint(&request.api_key),
            "Engine configured"
        );
        lock(&self.session).api_key = Some(request.api_key);

        Ok(SetupResponse::new(SETUP_MESSAGE))
    }

    async fn start(&self) -> Result<()> {
        let _operation = self.operation.lock().await;

        // The session lock is released before calling into the engine
        // because its callbacks take the same lock.
        let (api_key, previous) = {
            let mut session = lock(&self.session);
            let Some(api_key) = session.api_key.clone() else {
                return Err(BridgeError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()));
            };
            if !session.state.can_start() {
                return Err(BridgeError::InvalidState(
                    "a speed test is already running".to_string(),
                ));
            }
            let previous = session.state;
            session.state = SessionState::Running;
            (api_key, previous)
        };

        let events = Arc::new(SessionEvents {
            listeners: self.listeners.clone(),
            session: Arc::downgrade(&self.session),
        });

        let started = self
            .engine
            .configure(&api_key, events)
            .and_then(|_| self.engine.start());

        if let Err(err) = started {
            lock(&self.session).state = previous;
            warn!(error = %err, "Engine failed to start");
            return Err(err.into());
        }

        info!(plugin = %self.config.plugin_name, "Speed test started");
        Ok(())
    }

    async fn stop(&self) -> Result<StopResponse> {
        let _operation = self.operation.lock().await;

        if !lock(&self.session).state.is_running() {
            debug!(plugin = %self.config.plugin_name, "stop called without an active session");
            return Ok(StopResponse::new(STOP_MESSAGE));
        }

        if let Err(err) = self.engine.stop() {
            warn!(error = %err, "Engine failed to stop");
            return Err(err.into());
        }

        // on_fail may have already ended the session while the engine stopped.
        lock(&self.session).state = SessionState::Stopped;
        info!(plugin = %self.config.plugin_name, "Speed test stopped");

        Ok(StopResponse::new(STOP_MESSAGE))
    }

    async fn is_available(&self) -> AvailabilityResponse {
        AvailabilityResponse::AVAILABLE
    }

    async fn add_listener(&self, event: EventName, listener: Listener) -> ListenerHandle {
        self.listeners.add(event, listener)
    }

    async fn remove_all_listeners(&self) {
        let dropped = self.listeners.remove_all();
        debug!(dropped, "All listeners removed");
    }

    async fn shutdown(&self) {
        if let Err(err) = self.stop().await {
            warn!(error = %err, "Engine failed to stop during shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, EngineResult};
    use mockall::{mock, Sequence};

    mock! {
        Engine {}

        impl SpeedTestEngine for Engine {
            fn configure(&self, api_key: &str, events: Arc<dyn EngineEvents>) -> EngineResult<()>;
            fn start(&self) -> EngineResult<()>;
            fn stop(&self) -> EngineResult<()>;
        }
    }

    fn backend(engine: MockEngine) -> NativeBackend {
        let config = PluginConfig::builder()
            .platform(Platform::Android)
            .build()
            .unwrap();
        NativeBackend::new(Arc::new(engine), config)
    }

    #[tokio::test]
    async fn test_setup_configures_engine() {
        let mut engine = MockEngine::new();
        engine
            .expect_configure()
            .withf(|key, _| key == "abc123")
            .times(1)
            .returning(|_, _| Ok(()));

        let backend = backend(engine);
        let response = backend.setup(SetupRequest::new("abc123")).await.unwrap();

        assert_eq!(response.message, SETUP_MESSAGE);
        assert!(backend.is_configured());
        assert_eq!(backend.session_state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_setup_rejects_empty_key_without_touching_engine() {
        let mut engine = MockEngine::new();
        engine.expect_configure().never();

        let backend = backend(engine);
        let err = backend.setup(SetupRequest::new("")).await.unwrap_err();

        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert!(!backend.is_configured());
    }

    #[tokio::test]
    async fn test_start_before_setup() {
        let mut engine = MockEngine::new();
        engine.expect_start().never();

        let backend = backend(engine);
        let err = backend.start().await.unwrap_err();

        assert_eq!(
            err,
            BridgeError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string())
        );
        assert_eq!(backend.session_state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_start_rebinds_then_starts() {
        let mut seq = Sequence::new();
        let mut engine = MockEngine::new();
        engine
            .expect_configure()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        engine
            .expect_start()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();

        assert_eq!(backend.session_state(), SessionState::Running);
    }

    #[tokio::test]
    async fn test_second_start_rejected() {
        let mut engine = MockEngine::new();
        engine.expect_configure().returning(|_, _| Ok(()));
        engine.expect_start().times(1).returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();

        let err = backend.start().await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_failed_engine_start_restores_state() {
        let mut engine = MockEngine::new();
        engine.expect_configure().returning(|_, _| Ok(()));
        engine
            .expect_start()
            .returning(|| Err(EngineError::Failure("radio off".to_string())));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();

        let err = backend.start().await.unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(ref m) if m.contains("radio off")));
        assert_eq!(backend.session_state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_stop_without_session_skips_engine() {
        let mut engine = MockEngine::new();
        engine.expect_stop().never();

        let backend = backend(engine);
        let response = backend.stop().await.unwrap();
        assert_eq!(response.message, STOP_MESSAGE);
    }

    #[tokio::test]
    async fn test_stop_running_session_once() {
        let mut engine = MockEngine::new();
        engine.expect_configure().returning(|_, _| Ok(()));
        engine.expect_start().returning(|| Ok(()));
        engine.expect_stop().times(1).returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();

        backend.stop().await.unwrap();
        backend.stop().await.unwrap();
        assert_eq!(backend.session_state(), SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_failed_engine_stop_keeps_session_running() {
        let mut seq = Sequence::new();
        let mut engine = MockEngine::new();
        engine.expect_configure().returning(|_, _| Ok(()));
        engine.expect_start().returning(|| Ok(()));
        engine
            .expect_stop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(EngineError::Failure("busy".to_string())));
        engine
            .expect_stop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();

        let err = backend.stop().await.unwrap_err();
        assert_eq!(
            err,
            BridgeError::OperationFailed("Engine failure: busy".to_string())
        );
        assert_eq!(backend.session_state(), SessionState::Running);

        let response = backend.stop().await.unwrap();
        assert_eq!(response.message, STOP_MESSAGE);
        assert_eq!(backend.session_state(), SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_setup_while_running_rejected() {
        let mut engine = MockEngine::new();
        engine
            .expect_configure()
            .withf(|key, _| key == "abc123")
            .times(2)
            .returning(|_, _| Ok(()));
        engine.expect_start().returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();

        let err = backend.setup(SetupRequest::new("other")).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_shutdown_stops_running_engine() {
        let mut engine = MockEngine::new();
        engine.expect_configure().returning(|_, _| Ok(()));
        engine.expect_start().returning(|| Ok(()));
        engine.expect_stop().times(1).returning(|| Ok(()));

        let backend = backend(engine);
        backend.setup(SetupRequest::new("abc123")).await.unwrap();
        backend.start().await.unwrap();
        backend.shutdown().await;

        assert_eq!(backend.session_state(), SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_reports_available_on_native_platform() {
        let backend = backend(MockEngine::new());
        assert!(backend.is_available().await.available);
        assert_eq!(backend.platform(), Platform::Android);
    }
}
