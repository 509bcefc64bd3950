//! # Listener Registry
//!
//! Typed publish/subscribe registry backing `addListener` /
//! `removeAllListeners`.
//!
//! ## Overview
//!
//! The registry maps each [`EventName`] to an insertion-ordered list of
//! callbacks. Every registration gets its own [`ListenerId`] and a
//! [`ListenerHandle`] that removes exactly that entry, so two listeners for
//! the same event (or for different events) never disturb each other.
//!
//! ```text
//!                  add(onSpeedUpdate, cb1) ──┐
//!                  add(onSpeedUpdate, cb2) ──┤   ┌──────────────────────────┐
//!                  add(onError, cb3) ────────┼──>│ onSpeedUpdate: [cb1, cb2]│
//!                                            │   │ onError:       [cb3]     │
//! engine callback ── emit(SpeedUpdate) ──────┘   └──────────────────────────┘
//!                                                    cb1(ev), cb2(ev)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{EventName, PluginEvent};
//! use core_runtime::events::ListenerRegistry;
//! use std::sync::Arc;
//!
//! let registry = ListenerRegistry::new();
//! let _handle = registry.add(
//!     EventName::SpeedUpdate,
//!     Arc::new(|event: &PluginEvent| println!("{:?}", event)),
//! );
//!
//! assert_eq!(registry.emit(&PluginEvent::speed(87.5)), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Engine callbacks can arrive on a foreign thread, so the map sits behind a
//! `RwLock`. [`ListenerRegistry::emit`] snapshots the callbacks and releases
//! the lock before invoking them; a callback may add or remove listeners
//! (including itself) without deadlocking.

use bridge_traits::{EventName, Listener, ListenerHandle, ListenerId, ListenerStore, PluginEvent};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::trace;

struct Registration {
    id: ListenerId,
    listener: Listener,
}

struct RegistryInner {
    next_id: AtomicU64,
    listeners: RwLock<BTreeMap<EventName, Vec<Registration>>>,
}

impl ListenerStore for RegistryInner {
    fn remove_listener(&self, event: EventName, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(entries) = listeners.get_mut(&event) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|registration| registration.id != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            listeners.remove(&event);
        }

        if removed {
            trace!(event = %event, listener = %id, "Listener removed");
        }
        removed
    }
}

/// Registry of plugin event listeners.
///
/// Cloning is cheap and yields a view of the same registry.
#[derive(Clone)]
pub struct ListenerRegistry {
    inner: Arc<RegistryInner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                next_id: AtomicU64::new(1),
                listeners: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Registers `listener` under `event` and returns the handle that
    /// cancels this registration.
    pub fn add(&self, event: EventName, listener: Listener) -> ListenerHandle {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push(Registration { id, listener });

        trace!(event = %event, listener = %id, "Listener added");

        let store: Weak<dyn ListenerStore> = Arc::downgrade(&self.inner) as Weak<dyn ListenerStore>;
        ListenerHandle::new(id, event, store)
    }

    /// Invokes every listener registered under the event's name, in
    /// registration order. Returns how many listeners were called.
    pub fn emit(&self, event: &PluginEvent) -> usize {
        let name = event.name();
        let snapshot: Vec<Listener> = {
            let listeners = self
                .inner
                .listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match listeners.get(&name) {
                Some(entries) => entries
                    .iter()
                    .map(|registration| Arc::clone(&registration.listener))
                    .collect(),
                None => Vec::new(),
            }
        };

        for listener in &snapshot {
            listener(event);
        }

        trace!(event = %name, delivered = snapshot.len(), "Event emitted");
        snapshot.len()
    }

    /// Removes one registration. Returns `false` if it was already gone.
    pub fn remove(&self, event: EventName, id: ListenerId) -> bool {
        self.inner.remove_listener(event, id)
    }

    /// Removes every registration and returns how many were dropped.
    pub fn remove_all(&self) -> usize {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let dropped = listeners.values().map(Vec::len).sum();
        listeners.clear();
        dropped
    }

    pub fn listener_count(&self, event: EventName) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event)
            .map_or(0, Vec::len)
    }

    pub fn total_listeners(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_listeners() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field(
                "speed_update_listeners",
                &self.listener_count(EventName::SpeedUpdate),
            )
            .field("error_listeners", &self.listener_count(EventName::Error))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Listener, Arc<Mutex<Vec<PluginEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Listener = Arc::new(move |event: &PluginEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (listener, seen)
    }

    #[test]
    fn test_registry_creation() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.listener_count(EventName::SpeedUpdate), 0);
    }

    #[test]
    fn test_emit_without_listeners() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.emit(&PluginEvent::speed(10.0)), 0);
    }

    #[test]
    fn test_emit_reaches_only_matching_event() {
        let registry = ListenerRegistry::new();
        let (speed_listener, speed_seen) = recorder();
        let (error_listener, error_seen) = recorder();

        let _speed = registry.add(EventName::SpeedUpdate, speed_listener);
        let _error = registry.add(EventName::Error, error_listener);

        assert_eq!(registry.emit(&PluginEvent::speed(55.0)), 1);

        assert_eq!(
            speed_seen.lock().unwrap().as_slice(),
            &[PluginEvent::speed(55.0)]
        );
        assert!(error_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_listeners_called_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.add(
                EventName::SpeedUpdate,
                Arc::new(move |_: &PluginEvent| order.lock().unwrap().push(tag)),
            );
        }

        registry.emit(&PluginEvent::speed(1.0));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_handle_removes_only_its_registration() {
        let registry = ListenerRegistry::new();
        let (first, first_seen) = recorder();
        let (second, second_seen) = recorder();

        let first_handle = registry.add(EventName::SpeedUpdate, first);
        let _second_handle = registry.add(EventName::SpeedUpdate, second);

        first_handle.remove().await;
        registry.emit(&PluginEvent::speed(3.0));

        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(second_seen.lock().unwrap().len(), 1);
        assert_eq!(registry.listener_count(EventName::SpeedUpdate), 1);
    }

    #[tokio::test]
    async fn test_double_remove_is_noop() {
        let registry = ListenerRegistry::new();
        let (listener, _) = recorder();
        let (other, _) = recorder();

        let handle = registry.add(EventName::Error, listener);
        let _other = registry.add(EventName::Error, other);

        handle.remove().await;
        handle.remove().await;

        assert_eq!(registry.listener_count(EventName::Error), 1);
        assert!(!registry.remove(EventName::Error, handle.id()));
    }

    #[test]
    fn test_remove_all() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.remove_all(), 0);

        let (a, _) = recorder();
        let (b, _) = recorder();
        registry.add(EventName::SpeedUpdate, a);
        registry.add(EventName::Error, b);

        assert_eq!(registry.remove_all(), 2);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_handle_after_remove_all() {
        let registry = ListenerRegistry::new();
        let (listener, _) = recorder();
        let handle = registry.add(EventName::SpeedUpdate, listener);

        registry.remove_all();
        handle.remove().await;

        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_can_remove_itself() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicU64::new(0));
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let listener: Listener = {
            let registry = registry.clone();
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            Arc::new(move |_: &PluginEvent| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *slot.lock().unwrap() {
                    registry.remove(EventName::SpeedUpdate, id);
                }
            })
        };

        let handle = registry.add(EventName::SpeedUpdate, listener);
        *slot.lock().unwrap() = Some(handle.id());

        registry.emit(&PluginEvent::speed(1.0));
        registry.emit(&PluginEvent::speed(2.0));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ListenerRegistry::new();
        let (a, _) = recorder();
        let (b, _) = recorder();
        let first = registry.add(EventName::SpeedUpdate, a);
        let second = registry.add(EventName::Error, b);
        assert_ne!(first.id(), second.id());
        assert_ne!(first.id(), ListenerId(0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_emitters() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicU64::new(0));
        {
            let count = Arc::clone(&count);
            registry.add(
                EventName::SpeedUpdate,
                Arc::new(move |_: &PluginEvent| {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        let mut tasks = Vec::new();
        for _ in 0..2 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..10 {
                    registry.emit(&PluginEvent::speed(i as f64));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 20);
    }
}
