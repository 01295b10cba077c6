//! Navigation lifecycle events and the bus they are published on
//!
//! The controller publishes one [`LifecycleEvent`] per state change worth
//! observing. Application code subscribes by [`EventKind`], optionally with
//! `once` so the handler is dropped after its first call:
//!
//! ```
//! use slot_navigator::{EventBus, EventKind, LifecycleEvent, SubscribeOptions};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let bus = EventBus::new();
//! let fired = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&fired);
//! bus.subscribe(EventKind::NavigationEnd, SubscribeOptions::once(), move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bus.publish(LifecycleEvent::end("", ""));
//! bus.publish(LifecycleEvent::end("demo", "demo"));
//! assert_eq!(fired.load(Ordering::SeqCst), 1);
//! ```

use crate::error::RouterError;
use crate::trace_log;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

// ============================================================================
// Events
// ============================================================================

/// Kinds of lifecycle events, used to pick what to subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NavigationStart,
    NavigationEnd,
    NavigationCancel,
    NavigationError,
}

/// Event emitted as a navigation moves through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A navigation was requested and matching began
    NavigationStart { path: String },
    /// The navigation's component was mounted
    NavigationEnd {
        path: String,
        /// Path that matched after redirects
        resolved_path: String,
    },
    /// A newer navigation superseded this one; nothing was mounted
    NavigationCancel { path: String },
    /// Matching or loading failed; the previous mount is untouched
    NavigationError { path: String, error: RouterError },
}

impl LifecycleEvent {
    pub fn start(path: impl Into<String>) -> Self {
        Self::NavigationStart { path: path.into() }
    }

    pub fn end(path: impl Into<String>, resolved_path: impl Into<String>) -> Self {
        Self::NavigationEnd {
            path: path.into(),
            resolved_path: resolved_path.into(),
        }
    }

    pub fn cancel(path: impl Into<String>) -> Self {
        Self::NavigationCancel { path: path.into() }
    }

    pub fn error(path: impl Into<String>, error: RouterError) -> Self {
        Self::NavigationError {
            path: path.into(),
            error,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::NavigationStart { .. } => EventKind::NavigationStart,
            LifecycleEvent::NavigationEnd { .. } => EventKind::NavigationEnd,
            LifecycleEvent::NavigationCancel { .. } => EventKind::NavigationCancel,
            LifecycleEvent::NavigationError { .. } => EventKind::NavigationError,
        }
    }

    /// Path that was requested
    pub fn path(&self) -> &str {
        match self {
            LifecycleEvent::NavigationStart { path }
            | LifecycleEvent::NavigationEnd { path, .. }
            | LifecycleEvent::NavigationCancel { path }
            | LifecycleEvent::NavigationError { path, .. } => path,
        }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Options for [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Drop the handler after its first invocation
    pub once: bool,
}

impl SubscribeOptions {
    /// Handler stays subscribed until removed
    pub fn always() -> Self {
        Self { once: false }
    }

    /// Handler is removed after its first invocation
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// Handle identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Event handler
pub type EventHandler = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

struct Listener {
    id: u64,
    kind: EventKind,
    once: bool,
    handler: EventHandler,
}

struct BusInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

// ============================================================================
// EventBus
// ============================================================================

/// Publish/subscribe channel for lifecycle events.
///
/// Cloning yields another handle to the same bus. Delivery is synchronous,
/// in subscription order. The listener list is not locked while handlers
/// run, so handlers may publish, subscribe or unsubscribe; a handler removed
/// during a publish still receives that event.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(1),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Process-wide bus.
    ///
    /// Created on first use; call [`EventBus::clear`] on it at shutdown.
    /// Components take an explicit handle, so this is only the default an
    /// application can pass around.
    pub fn global() -> &'static EventBus {
        static GLOBAL: OnceLock<EventBus> = OnceLock::new();
        GLOBAL.get_or_init(EventBus::new)
    }

    /// Register `handler` for events of `kind`
    pub fn subscribe<F>(&self, kind: EventKind, options: SubscribeOptions, handler: F) -> Subscription
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(Listener {
            id,
            kind,
            once: options.once,
            handler: Arc::new(handler),
        });
        trace_log!("Subscribed #{} to {:?} (once: {})", id, kind, options.once);
        Subscription { id, kind }
    }

    /// Register a handler that fires at most once
    pub fn once<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, SubscribeOptions::once(), handler)
    }

    /// Remove a subscription.
    ///
    /// Returns `false` if it was already removed (or was a `once`
    /// subscription that already fired).
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != subscription.id);
        listeners.len() != before
    }

    /// Deliver `event` to every handler subscribed to its kind.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: LifecycleEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<EventHandler> = {
            let mut listeners = self.inner.listeners.lock();
            let handlers = listeners
                .iter()
                .filter(|listener| listener.kind == kind)
                .map(|listener| Arc::clone(&listener.handler))
                .collect();
            listeners.retain(|listener| !(listener.once && listener.kind == kind));
            handlers
        };

        trace_log!("Publishing {:?} to {} handler(s)", kind, handlers.len());
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    /// Number of live subscriptions for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .listeners
            .lock()
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.inner.listeners.lock().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.inner.listeners.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(bus: &EventBus, kind: EventKind, options: SubscribeOptions) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(kind, options, move |event| {
            sink.lock().push(event.path().to_string());
        });
        seen
    }

    #[test]
    fn test_event_kind_and_path() {
        let event = LifecycleEvent::error(
            "demo",
            RouterError::RouteNotFound {
                path: "demo".to_string(),
            },
        );
        assert_eq!(event.kind(), EventKind::NavigationError);
        assert_eq!(event.path(), "demo");
        assert_eq!(LifecycleEvent::start("a").kind(), EventKind::NavigationStart);
    }

    #[test]
    fn test_publish_filters_by_kind() {
        let bus = EventBus::new();
        let starts = recorder(&bus, EventKind::NavigationStart, SubscribeOptions::always());
        let ends = recorder(&bus, EventKind::NavigationEnd, SubscribeOptions::always());

        assert_eq!(bus.publish(LifecycleEvent::start("a")), 1);
        bus.publish(LifecycleEvent::end("a", "a"));
        bus.publish(LifecycleEvent::cancel("b"));

        assert_eq!(*starts.lock(), vec!["a"]);
        assert_eq!(*ends.lock(), vec!["a"]);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(EventKind::NavigationEnd, SubscribeOptions::always(), move |_| {
                order.lock().push(label);
            });
        }

        bus.publish(LifecycleEvent::end("", ""));
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_once_fires_once() {
        let bus = EventBus::new();
        let seen = recorder(&bus, EventKind::NavigationEnd, SubscribeOptions::once());
        assert_eq!(bus.subscriber_count(EventKind::NavigationEnd), 1);

        bus.publish(LifecycleEvent::end("", ""));
        bus.publish(LifecycleEvent::end("demo", "demo"));

        assert_eq!(*seen.lock(), vec![""]);
        assert_eq!(bus.subscriber_count(EventKind::NavigationEnd), 0);
    }

    #[test]
    fn test_once_survives_other_kinds() {
        let bus = EventBus::new();
        let seen = recorder(&bus, EventKind::NavigationEnd, SubscribeOptions::once());

        bus.publish(LifecycleEvent::start("demo"));
        bus.publish(LifecycleEvent::end("demo", "demo"));
        assert_eq!(*seen.lock(), vec!["demo"]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let subscription = bus.subscribe(EventKind::NavigationStart, SubscribeOptions::always(), |_| {
            panic!("handler should have been removed");
        });

        assert!(bus.unsubscribe(subscription));
        assert!(!bus.unsubscribe(subscription));
        assert_eq!(bus.publish(LifecycleEvent::start("a")), 0);
    }

    #[test]
    fn test_reentrant_publish() {
        let bus = EventBus::new();
        let ends = recorder(&bus, EventKind::NavigationEnd, SubscribeOptions::always());

        let inner = bus.clone();
        bus.once(EventKind::NavigationStart, move |event| {
            inner.publish(LifecycleEvent::end(event.path(), event.path()));
        });

        bus.publish(LifecycleEvent::start("nested"));
        bus.publish(LifecycleEvent::start("again"));
        assert_eq!(*ends.lock(), vec!["nested"]);
    }

    #[test]
    fn test_clear() {
        let bus = EventBus::new();
        let _ = recorder(&bus, EventKind::NavigationStart, SubscribeOptions::always());
        let _ = recorder(&bus, EventKind::NavigationEnd, SubscribeOptions::once());

        bus.clear();
        assert_eq!(bus.subscriber_count(EventKind::NavigationStart), 0);
        assert_eq!(bus.subscriber_count(EventKind::NavigationEnd), 0);
    }

    #[test]
    fn test_global_is_shared() {
        let a = EventBus::global();
        let b = EventBus::global();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
    }
}
