//! Plugin events and listener bookkeeping types.
//!
//! Backends publish two kinds of events while a measurement session runs:
//!
//! | Event name      | Payload              | Meaning                          |
//! |-----------------|----------------------|----------------------------------|
//! | `onSpeedUpdate` | [`SpeedUpdateEvent`] | periodic speed sample            |
//! | `onError`       | [`ErrorEvent`]       | fatal failure during the session |
//!
//! Subscribing returns a [`ListenerHandle`]. The handle only keeps a weak
//! reference to the store that issued it, so it never keeps a backend alive
//! and removing through it after the store is gone is a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use crate::error::BridgeError;
use crate::platform::PlatformSendSync;

/// Names under which host code subscribes to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventName {
    #[serde(rename = "onSpeedUpdate")]
    SpeedUpdate,
    #[serde(rename = "onError")]
    Error,
}

impl EventName {
    pub const ALL: [EventName; 2] = [EventName::SpeedUpdate, EventName::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::SpeedUpdate => "onSpeedUpdate",
            EventName::Error => "onError",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onSpeedUpdate" => Ok(EventName::SpeedUpdate),
            "onError" => Ok(EventName::Error),
            other => Err(BridgeError::UnknownEvent(other.to_string())),
        }
    }
}

/// Speed sample emitted repeatedly during an active test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedUpdateEvent {
    pub value: f64,
}

/// Failure reported by the measurement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error: String,
}

/// Any event a backend can publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginEvent {
    SpeedUpdate(SpeedUpdateEvent),
    Error(ErrorEvent),
}

impl PluginEvent {
    pub fn speed(value: f64) -> Self {
        PluginEvent::SpeedUpdate(SpeedUpdateEvent { value })
    }

    pub fn error(error: impl Into<String>) -> Self {
        PluginEvent::Error(ErrorEvent {
            error: error.into(),
        })
    }

    /// Event name listeners must be registered under to receive this event.
    pub fn name(&self) -> EventName {
        match self {
            PluginEvent::SpeedUpdate(_) => EventName::SpeedUpdate,
            PluginEvent::Error(_) => EventName::Error,
        }
    }
}

/// Callback invoked for every event published under the name it was
/// registered for.
#[cfg(not(target_arch = "wasm32"))]
pub type Listener = std::sync::Arc<dyn Fn(&PluginEvent) + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type Listener = std::sync::Arc<dyn Fn(&PluginEvent)>;

/// Identifier of one registration inside a listener store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Storage that can drop a single registration.
///
/// Implemented by the listener registry; handles call back into it.
pub trait ListenerStore: PlatformSendSync {
    /// Remove one registration. Returns `false` when it was already gone.
    fn remove_listener(&self, event: EventName, id: ListenerId) -> bool;
}

/// Token returned by `add_listener`, used to cancel that one subscription.
///
/// `remove` is idempotent: the first call drops the registration, later
/// calls resolve without doing anything.
pub struct ListenerHandle {
    id: ListenerId,
    event: Option<EventName>,
    store: Option<Weak<dyn ListenerStore>>,
    removed: AtomicBool,
}

impl ListenerHandle {
    pub fn new(id: ListenerId, event: EventName, store: Weak<dyn ListenerStore>) -> Self {
        Self {
            id,
            event: Some(event),
            store: Some(store),
            removed: AtomicBool::new(false),
        }
    }

    /// A handle not attached to any store. Removing it does nothing.
    pub fn detached(event: EventName) -> Self {
        Self {
            id: ListenerId(0),
            event: Some(event),
            store: None,
            removed: AtomicBool::new(false),
        }
    }

    /// Handle for a registration under a name no backend publishes.
    /// Nothing ever reaches it and removing it does nothing.
    pub fn unbound() -> Self {
        Self {
            id: ListenerId(0),
            event: None,
            store: None,
            removed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// `None` for [`unbound`](Self::unbound) handles.
    pub fn event(&self) -> Option<EventName> {
        self.event
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    /// Cancel the subscription this handle was issued for.
    pub async fn remove(&self) {
        if self.removed.swap(true, Ordering::AcqRel) {
            return;
        }

        let store = self.store.as_ref().and_then(Weak::upgrade);
        if let (Some(store), Some(event)) = (store, self.event) {
            store.remove_listener(event, self.id);
        }
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("event", &self.event)
            .field("attached", &self.store.is_some())
            .field("removed", &self.is_removed())
            .finish()
    }
}
