//! Synchronous publish/subscribe bus with deterministic delivery order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::types::{Event, Topic};

/// Handler invoked for each matching published event.
///
/// A handler returning `Err` never stops delivery to the remaining handlers;
/// the bus logs the failure and surfaces it as an [`Event::Error`].
pub type EventHandler = dyn FnMut(&Event) -> anyhow::Result<()> + Send;

/// What a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionFilter {
    /// Events of one topic.
    Topic(Topic),
    /// Every event — the supported introspection mechanism for loggers and
    /// debug tooling.
    All,
}

impl SubscriptionFilter {
    fn matches(&self, topic: Topic) -> bool {
        match self {
            SubscriptionFilter::Topic(wanted) => *wanted == topic,
            SubscriptionFilter::All => true,
        }
    }
}

impl From<Topic> for SubscriptionFilter {
    fn from(topic: Topic) -> Self {
        SubscriptionFilter::Topic(topic)
    }
}

struct HandlerEntry {
    id: u64,
    filter: SubscriptionFilter,
    once: bool,
    fired: AtomicBool,
    // try_lock during delivery: a handler that publishes an event it is
    // itself subscribed to is skipped for that inner publish rather than
    // delivered reentrantly.
    handler: Mutex<Box<EventHandler>>,
}

struct BusInner {
    handlers: Mutex<Vec<Arc<HandlerEntry>>>,
    next_id: AtomicU64,
}

/// Synchronous event bus.
///
/// `publish` invokes all currently-subscribed matching handlers on the
/// caller's thread, in subscription order. Handlers subscribed during a
/// publish are not invoked for that same publish; `once` handlers fire at
/// most one time even across recursive publishes.
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                handlers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Subscribe a handler for events matching `filter`.
    pub fn subscribe(
        &self,
        filter: impl Into<SubscriptionFilter>,
        handler: impl FnMut(&Event) -> anyhow::Result<()> + Send + 'static,
    ) -> Subscription {
        self.attach(filter.into(), false, Box::new(handler))
    }

    /// Subscribe a handler that fires at most once, then detaches itself.
    pub fn once(
        &self,
        filter: impl Into<SubscriptionFilter>,
        handler: impl FnMut(&Event) -> anyhow::Result<()> + Send + 'static,
    ) -> Subscription {
        self.attach(filter.into(), true, Box::new(handler))
    }

    fn attach(&self, filter: SubscriptionFilter, once: bool, handler: Box<EventHandler>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(HandlerEntry {
            id,
            filter,
            once,
            fired: AtomicBool::new(false),
            handler: Mutex::new(handler),
        });

        let mut handlers = self.inner.handlers.lock().expect("event bus lock poisoned");
        handlers.push(entry);

        Subscription {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Deliver `event` to all matching handlers, synchronously and in
    /// subscription order.
    pub fn publish(&self, event: &Event) {
        let topic = event.topic();

        // Snapshot so handlers added during this publish are not delivered
        // to, and unsubscribes from inside handlers take effect afterwards.
        let snapshot: Vec<Arc<HandlerEntry>> = {
            let handlers = self.inner.handlers.lock().expect("event bus lock poisoned");
            handlers
                .iter()
                .filter(|entry| entry.filter.matches(topic))
                .cloned()
                .collect()
        };

        let mut spent = Vec::new();
        for entry in snapshot {
            if entry.once {
                if entry.fired.swap(true, Ordering::SeqCst) {
                    continue;
                }
                spent.push(entry.id);
            }

            let result = match entry.handler.try_lock() {
                Ok(mut handler) => (handler)(event),
                Err(_) => {
                    tracing::debug!(?topic, "skipping reentrant delivery to busy handler");
                    continue;
                }
            };

            if let Err(error) = result {
                tracing::warn!(?topic, %error, "event handler failed");
                if topic != Topic::Error {
                    self.publish(&Event::error(format!("event handler failed: {error}")));
                }
            }
        }

        if !spent.is_empty() {
            let mut handlers = self.inner.handlers.lock().expect("event bus lock poisoned");
            handlers.retain(|entry| !spent.contains(&entry.id));
        }
    }

    /// Remove all handlers. Used on module teardown.
    pub fn clear(&self) {
        let mut handlers = self.inner.handlers.lock().expect("event bus lock poisoned");
        handlers.clear();
    }

    /// Number of attached handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.lock().expect("event bus lock poisoned").len()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for detaching a subscribed handler.
///
/// Dropping the subscription does **not** detach the handler; subscribers
/// are responsible for calling [`Subscription::unsubscribe`] when they no
/// longer want deliveries (e.g. on screen unmount).
pub struct Subscription {
    id: u64,
    inner: Arc<BusInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        let mut handlers = self.inner.handlers.lock().expect("event bus lock poisoned");
        handlers.retain(|entry| entry.id != self.id);
    }
}
